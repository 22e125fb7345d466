//! Dropdown Smoke Harness
//!
//! Mounts a `<dropdown-menu>` inside a form, drives it through a scripted
//! keyboard and mouse session, and prints a JSON report of what the element
//! rendered at each step together with the encoded form body.
//!
//! Exits non-zero if any expectation fails.

use std::rc::Rc;

use anyhow::{bail, Context};
use dropdown_common::{init_logging, LogConfig, LogFormat};
use dropdown_dom::{
    CustomElementRegistry, Document, DomEvent, FormMethod, FormState, KeyboardEventData, Node,
};
use dropdown_menu::{Dropdown, DropdownOption, TAG_NAME};
use serde_json::json;
use tracing::{error, info};

const DEFAULT_PAGE: &str = r#"<html><head><title>Dropdown Smoke</title></head><body>
<form id="search" action="/search" method="post">
<input name="q" value="smoke">
<dropdown-menu name="city" placeholder="Pick a city" maxitems="5" options="[{&quot;name&quot;:&quot;Amsterdam&quot;,&quot;value&quot;:&quot;A01&quot;},{&quot;name&quot;:&quot;Berlin&quot;,&quot;value&quot;:&quot;B02&quot;},{&quot;name&quot;:&quot;Copenhagen&quot;,&quot;value&quot;:&quot;C03&quot;},{&quot;name&quot;:&quot;Dublin&quot;,&quot;value&quot;:&quot;D04&quot;},{&quot;name&quot;:&quot;Lisbon&quot;,&quot;value&quot;:&quot;L05&quot;},{&quot;name&quot;:&quot;Madrid&quot;,&quot;value&quot;:&quot;M06&quot;},{&quot;name&quot;:&quot;Oslo&quot;,&quot;value&quot;:&quot;O07&quot;},{&quot;name&quot;:&quot;Prague&quot;,&quot;value&quot;:&quot;P08&quot;}]"></dropdown-menu>
</form>
</body></html>"#;

struct Args {
    log_format: LogFormat,
    verbose: bool,
    report_file: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut log_format = LogFormat::Compact;
        let mut verbose = false;
        let mut report_file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--log-format" => {
                    log_format = match args.next().as_deref() {
                        Some("json") => LogFormat::Json,
                        Some("pretty") => LogFormat::Pretty,
                        _ => LogFormat::Compact,
                    };
                }
                "--verbose" | "-v" => {
                    verbose = true;
                }
                "--report-file" => {
                    report_file = args.next();
                }
                _ => {}
            }
        }

        Self {
            log_format,
            verbose,
            report_file,
        }
    }
}

/// Observed element state after one scripted step.
struct Step {
    name: &'static str,
    failures: Vec<String>,
    observed: serde_json::Value,
}

struct Session {
    document: Rc<Document>,
    form: Rc<Node>,
    submission: FormState,
    dropdown: Rc<Dropdown>,
    steps: Vec<Step>,
}

impl Session {
    fn mount() -> anyhow::Result<Self> {
        let document = Rc::new(Document::parse_html(DEFAULT_PAGE).context("parsing smoke page")?);
        let registry = CustomElementRegistry::new();
        dropdown_menu::define(&registry).context("defining dropdown-menu")?;

        let upgraded = registry.upgrade(&document);
        info!(upgraded, "Upgraded custom elements");

        let Some(host) = document.get_elements_by_tag_name(TAG_NAME).into_iter().next() else {
            bail!("smoke page has no <{TAG_NAME}>");
        };
        let Some(dropdown) = Dropdown::from_registry(&registry, &host) else {
            bail!("<{TAG_NAME}> was not upgraded");
        };
        let Some(form) = document.get_element_by_id("search") else {
            bail!("smoke page has no form");
        };
        let submission = FormState::from_element(&form);

        Ok(Self {
            document,
            form,
            submission,
            dropdown,
            steps: Vec::new(),
        })
    }

    fn trigger(&self) -> anyhow::Result<Rc<Node>> {
        self.dropdown
            .shadow_root()
            .query_selector("input")?
            .context("dropdown has no trigger input")
    }

    fn key(&self, key: &str) -> anyhow::Result<bool> {
        let mut event = DomEvent::keyboard("keydown", KeyboardEventData::for_key(key));
        let not_prevented = self.document.dispatch_event(&self.trigger()?, &mut event);
        let mut event = DomEvent::keyboard("keyup", KeyboardEventData::for_key(key));
        self.document.dispatch_event(&self.trigger()?, &mut event);
        Ok(not_prevented)
    }

    fn click_trigger(&self) -> anyhow::Result<()> {
        self.document.dispatch_event(&self.trigger()?, &mut DomEvent::click());
        Ok(())
    }

    fn form_body(&self) -> anyhow::Result<String> {
        let entries = FormState::collect_entries(&self.form);
        let body = FormState::encode_form_data(&entries, self.submission.enctype());
        String::from_utf8(body).context("form body is not UTF-8")
    }

    fn snapshot(&self) -> serde_json::Value {
        let view = self.dropdown.view();
        let label = view.as_ref().map(|v| v.result_label()).unwrap_or_default();
        let root_classes = view
            .as_ref()
            .and_then(|v| v.root.as_ref().map(|root| root.classes()))
            .unwrap_or_default();
        json!({
            "value": self.dropdown.value(),
            "label": label,
            "expanded": self.dropdown.is_expanded(),
            "cursor": self.dropdown.cursor(),
            "selected": self.dropdown.selected_index(),
            "scroll_offset": self.dropdown.scroll_offset(),
            "root_classes": root_classes,
        })
    }

    /// Record a step; `checks` pairs a description with whether it held.
    fn record(&mut self, name: &'static str, checks: &[(&str, bool)]) {
        let failures: Vec<String> = checks
            .iter()
            .filter(|(_, held)| !held)
            .map(|(what, _)| what.to_string())
            .collect();
        if failures.is_empty() {
            info!(step = name, "Step passed");
        } else {
            error!(step = name, ?failures, "Step failed");
        }
        let observed = self.snapshot();
        self.steps.push(Step {
            name,
            failures,
            observed,
        });
    }
}

fn run(session: &mut Session) -> anyhow::Result<serde_json::Value> {
    let dropdown = session.dropdown.clone();

    let placeholder_shown = dropdown.value().is_empty()
        && dropdown.view().map(|v| v.result_label()).as_deref() == Some("Pick a city");
    session.record(
        "mount",
        &[
            ("eight options parsed", dropdown.options().len() == 8),
            ("placeholder shown", placeholder_shown),
            ("menu starts closed", !dropdown.is_expanded()),
            ("hidden input created", dropdown.hidden_input().is_some()),
            ("form posts to /search", session.submission.action() == "/search"),
            ("form method is post", session.submission.method() == FormMethod::Post),
        ],
    );

    let trigger = session.trigger()?;
    session.document.focus(&trigger);
    session.record(
        "focus opens",
        &[
            ("menu expanded", dropdown.is_expanded()),
            ("cursor on first option", dropdown.cursor() == Some(0)),
        ],
    );

    session.key("ArrowDown")?;
    session.key("ArrowDown")?;
    session.record(
        "arrow walk",
        &[("cursor on third option", dropdown.cursor() == Some(2))],
    );

    session.key("m")?;
    session.record(
        "type-ahead",
        &[
            ("cursor on Madrid", dropdown.cursor() == Some(5)),
            ("list scrolled to the end", dropdown.scroll_offset() == 3),
        ],
    );

    let enter_passed = session.key("Enter")?;
    let committed_body = session.form_body()?;
    session.record(
        "commit",
        &[
            ("enter consumed", !enter_passed),
            ("value committed", dropdown.value() == "M06"),
            ("menu closed", !dropdown.is_expanded()),
            ("form carries value", committed_body == "q=smoke&city=M06"),
        ],
    );

    session.click_trigger()?;
    let reopened_at_selection = dropdown.cursor() == Some(5);
    session.key("Escape")?;
    session.record(
        "escape",
        &[
            ("reopened at selection", reopened_at_selection),
            ("menu closed", !dropdown.is_expanded()),
            ("value unchanged", dropdown.value() == "M06"),
        ],
    );

    dropdown.set_options(vec![
        DropdownOption::new("Rome", "R01"),
        DropdownOption::new("Vienna", "V02"),
    ]);
    let replaced_body = session.form_body()?;
    session.record(
        "options replaced",
        &[
            ("two options", dropdown.options().len() == 2),
            ("value cleared", dropdown.value().is_empty()),
            ("no selection", dropdown.selected_index().is_none()),
            ("form carries empty value", replaced_body == "q=smoke&city="),
        ],
    );

    let steps: Vec<serde_json::Value> = session
        .steps
        .iter()
        .map(|step| {
            json!({
                "step": step.name,
                "passed": step.failures.is_empty(),
                "failures": step.failures,
                "observed": step.observed,
            })
        })
        .collect();

    Ok(json!({
        "element": TAG_NAME,
        "passed": session.steps.iter().all(|step| step.failures.is_empty()),
        "steps": steps,
        "form": {
            "committed_body": committed_body,
            "replaced_body": replaced_body,
            "action": session.submission.action(),
            "method": format!("{:?}", session.submission.method()),
            "content_type": session.submission.enctype().content_type(),
        },
    }))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = if args.verbose {
        LogConfig::trace()
    } else {
        LogConfig::default()
    };
    init_logging(config.with_format(args.log_format))?;

    info!(report_file = ?args.report_file, "Starting Dropdown Smoke Harness");

    let mut session = Session::mount()?;
    let report = run(&mut session)?;

    let rendered = serde_json::to_string_pretty(&report)?;
    if let Some(path) = &args.report_file {
        std::fs::write(path, &rendered).with_context(|| format!("writing report to {path}"))?;
        info!(path = %path, "Wrote report");
    }
    println!("{}", rendered);

    if report["passed"] != json!(true) {
        error!("Smoke session failed");
        std::process::exit(1);
    }
    Ok(())
}

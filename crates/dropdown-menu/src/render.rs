//! Shadow tree rendering.
//!
//! The template is static markup; everything taken from host attributes is
//! applied afterwards as attribute values or text nodes, so attribute content
//! is never parsed as HTML.

use std::rc::Rc;

use dropdown_common::{DropdownError, Result, ResultExt};
use dropdown_dom::{BoxMetrics, Document, Node};
use tracing::trace;

use crate::props::{DropdownOption, DropdownProps};
use crate::scroll::ScrollPolicy;

/// Marker on the highlighted option.
pub const HOVER_CLASS: &str = "hover";
/// Marker on the committed option.
pub const SELECTED_CLASS: &str = "select-selected";
/// Marker on `.custom-select` while open.
pub const EXPAND_CLASS: &str = "expand";
/// Marker on `.custom-select` while focused.
pub const FOCUSED_CLASS: &str = "focused";
/// Marker on the result text while no option is committed.
pub const PLACEHOLDER_CLASS: &str = "placeholder";
/// Marker on the options container while closed.
pub const HIDE_CLASS: &str = "select-hide";

const TEMPLATE: &str = concat!(
    r#"<div class="container" tabindex="0">"#,
    r#"<input type="text" class="custom replaced custom-select-input" readonly="readonly" style="z-index: 10">"#,
    r#"<div class="custom-select">"#,
    r#"<div class="select-result form-control">"#,
    r#"<span class="result-text placeholder"></span>"#,
    r#"<i class="chevron"></i>"#,
    r#"</div>"#,
    r#"<div id="optionsRef" class="shadow-sm select-items select-hide"></div>"#,
    r#"</div>"#,
    r#"</div>"#,
);

const STYLESHEET: &str = r#"
.container { position: relative; outline: none; }
.custom-select-input { position: absolute; inset: 0; opacity: 0; cursor: pointer; }
.custom-select { position: relative; }
.custom-select.focused .select-result { border-color: #80bdff; }
.select-result { display: flex; align-items: center; justify-content: space-between; }
.result-text.placeholder { color: #6c757d; }
.chevron { border: solid currentColor; border-width: 0 2px 2px 0; padding: 3px; transform: rotate(45deg); }
.custom-select.expand .chevron { transform: rotate(-135deg); }
.select-items { position: absolute; left: 0; right: 0; z-index: 99; background: #fff; overflow-y: auto; }
.select-hide { display: none; }
.select-option { height: 20px; padding: 6px 12px; border-bottom: 1px solid #f1f1f1; cursor: pointer; }
.select-option.hover { background: #e9ecef; }
.select-option.select-selected { font-weight: 600; }
"#;

/// Handles to the rendered shadow tree.
#[derive(Debug, Clone)]
pub struct DropdownView {
    /// `.container`, the focusable root.
    pub root: Option<Rc<Node>>,
    /// The readonly trigger input.
    pub trigger: Option<Rc<Node>>,
    /// `.custom-select`.
    pub menu: Option<Rc<Node>>,
    /// `.select-result`.
    pub result: Option<Rc<Node>>,
    /// `.select-result > .result-text`.
    pub result_text: Option<Rc<Node>>,
    /// `#optionsRef`, parent of the option rows.
    pub options_list: Option<Rc<Node>>,
}

impl DropdownView {
    /// Render the template into `shadow`.
    pub fn render(
        document: &Document,
        shadow: &Rc<Node>,
        props: &DropdownProps,
        inject_stylesheet: bool,
    ) -> Result<Self> {
        document
            .parse_fragment_into(shadow, TEMPLATE)
            .context("rendering dropdown template")?;

        let find = |selector: &str| -> Result<Option<Rc<Node>>> {
            shadow
                .query_selector(selector)
                .map_err(|e| DropdownError::dom_with_source(format!("querying `{selector}`"), e))
        };

        let view = Self {
            root: find(".container")?,
            trigger: find("input")?,
            menu: find(".custom-select")?,
            result: find(".select-result")?,
            result_text: find(".select-result > .result-text")?,
            options_list: find("#optionsRef")?,
        };
        if view.root.is_none() {
            return Err(DropdownError::render("template has no .container"));
        }

        if let Some(trigger) = &view.trigger {
            trigger.set_attribute("name", props.name.as_str());
            trigger.set_attribute("value", props.value.as_str());
            trigger.set_attribute("placeholder", props.placeholder.as_str());
        }
        view.show_placeholder(document, &props.placeholder);

        if inject_stylesheet {
            let style = document.create_element("style");
            style.append_child(document.create_text_node(STYLESHEET));
            shadow.append_child(style);
        }

        Ok(view)
    }

    /// Replace the option rows. Old rows are released together with their
    /// listeners.
    pub fn build_options(
        &self,
        document: &Document,
        options: &[DropdownOption],
        metrics: BoxMetrics,
    ) -> Vec<Rc<Node>> {
        let Some(list) = &self.options_list else {
            return Vec::new();
        };
        document.remove_children(list);
        list.set_scroll_top(0.0);

        let rows: Vec<Rc<Node>> = options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let label = document.create_element("span");
                label.set_attribute("data-index", index.to_string());
                document.set_text_content(&label, &option.name);

                let row = document.create_element("div");
                row.add_class("select-option");
                row.set_attribute("value", option.value.as_str());
                row.set_attribute("data-index", index.to_string());
                row.set_box_metrics(Some(metrics));
                row.append_child(label);
                list.append_child(row.clone());
                row
            })
            .collect();

        trace!(count = rows.len(), "Options rendered");
        rows
    }

    /// Option row at `index`.
    pub fn option(&self, index: usize) -> Option<Rc<Node>> {
        self.options_list
            .as_ref()?
            .query_selector(&format!(r#".select-option[data-index="{index}"]"#))
            .ok()
            .flatten()
    }

    /// Move `class` to the option at `index`, clearing it everywhere else.
    pub fn set_marker(&self, class: &str, index: Option<usize>) {
        let Some(list) = &self.options_list else {
            return;
        };
        if let Ok(marked) = list.query_selector_all(&format!(".select-option.{class}")) {
            for row in marked {
                row.remove_class(class);
            }
        }
        if let Some(row) = index.and_then(|i| self.option(i)) {
            row.add_class(class);
        }
    }

    pub fn show_placeholder(&self, document: &Document, placeholder: &str) {
        if let Some(text) = &self.result_text {
            document.set_text_content(text, placeholder);
            text.add_class(PLACEHOLDER_CLASS);
        }
    }

    pub fn show_selection(&self, document: &Document, option: &DropdownOption) {
        if let Some(trigger) = &self.trigger {
            trigger.set_attribute("value", option.value.as_str());
        }
        if let Some(text) = &self.result_text {
            text.remove_class(PLACEHOLDER_CLASS);
            document.set_text_content(text, &option.name);
        }
    }

    /// Text currently shown in the result area.
    pub fn result_label(&self) -> String {
        self.result_text
            .as_ref()
            .map(|t| t.text_content())
            .unwrap_or_default()
    }

    pub fn is_expanded(&self) -> bool {
        self.menu
            .as_ref()
            .is_some_and(|menu| menu.has_class(EXPAND_CLASS))
    }

    pub fn set_expanded(&self, expanded: bool) {
        if let Some(list) = &self.options_list {
            if expanded {
                list.remove_class(HIDE_CLASS);
            } else {
                list.add_class(HIDE_CLASS);
            }
        }
        if let Some(menu) = &self.menu {
            if expanded {
                menu.add_class(EXPAND_CLASS);
            } else {
                menu.remove_class(EXPAND_CLASS);
            }
        }
    }

    pub fn set_focused(&self, focused: bool) {
        if let Some(menu) = &self.menu {
            if focused {
                menu.add_class(FOCUSED_CLASS);
            } else {
                menu.remove_class(FOCUSED_CLASS);
            }
        }
    }

    /// Fix the viewport height when the list is scroll-constrained, otherwise
    /// let it size to its content without a scrollbar.
    pub fn apply_menu_height(&self, policy: ScrollPolicy, option_height: f32) {
        let Some(list) = &self.options_list else {
            return;
        };
        match policy.menu_height(option_height) {
            Some(height) => {
                list.set_style_property("height", format!("{height}px"));
                list.set_style_property("overflow-y", "auto");
            }
            None => {
                list.remove_style_property("height");
                list.set_style_property("overflow-y", "hidden");
            }
        }
    }

    pub fn apply_scroll(&self, offset: usize, option_height: f32) {
        if let Some(list) = &self.options_list {
            list.set_scroll_top(ScrollPolicy::scroll_top(offset, option_height));
        }
    }

    /// Border-box height of the first option row, `0` when none is rendered.
    pub fn single_option_height(&self) -> f32 {
        self.options_list
            .as_ref()
            .and_then(|list| list.query_selector(".select-option").ok().flatten())
            .and_then(|row| row.box_metrics())
            .map(|metrics| metrics.outer_height())
            .unwrap_or(0.0)
    }
}

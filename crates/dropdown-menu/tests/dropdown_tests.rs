//! End-to-end tests: pages are parsed, the element is defined and upgraded,
//! and interaction is driven through dispatched DOM events.

use std::rc::Rc;

use dropdown_dom::{
    CustomElement, CustomElementRegistry, Document, DomEvent, FormEnctype, FormState, KeyboardEventData,
    MouseEventData, Node,
};
use dropdown_menu::{define, Dropdown, DropdownOption, TAG_NAME};

struct Page {
    document: Rc<Document>,
    registry: CustomElementRegistry,
    host: Rc<Node>,
    dropdown: Rc<Dropdown>,
}

impl Page {
    fn shadow(&self, selector: &str) -> Rc<Node> {
        self.dropdown
            .shadow_root()
            .query_selector(selector)
            .unwrap()
            .unwrap_or_else(|| panic!("no `{selector}` in shadow tree"))
    }

    fn root(&self) -> Rc<Node> {
        self.shadow(".container")
    }

    fn trigger(&self) -> Rc<Node> {
        self.shadow("input")
    }

    fn menu(&self) -> Rc<Node> {
        self.shadow(".custom-select")
    }

    fn options_list(&self) -> Rc<Node> {
        self.shadow("#optionsRef")
    }

    fn result_text(&self) -> String {
        self.shadow(".select-result>.result-text").text_content()
    }

    /// Option row by 1-based position.
    fn nth_option(&self, n: usize) -> Rc<Node> {
        self.shadow(&format!(r#".select-option[data-index="{}"]"#, n - 1))
    }

    fn click(&self, target: &Rc<Node>) -> bool {
        self.document.dispatch_event(target, &mut DomEvent::click())
    }

    fn mouse_enter(&self, target: &Rc<Node>) {
        let mut event = DomEvent::mouse("mouseenter", false, MouseEventData::default());
        self.document.dispatch_event(target, &mut event);
    }

    /// Dispatch keydown at `target`; returns true if the default was not prevented.
    fn key_down(&self, target: &Rc<Node>, key: &str) -> bool {
        let mut event = DomEvent::keyboard("keydown", KeyboardEventData::for_key(key));
        self.document.dispatch_event(target, &mut event)
    }

    fn key_up(&self, target: &Rc<Node>, key: &str) -> bool {
        let mut event = DomEvent::keyboard("keyup", KeyboardEventData::for_key(key));
        self.document.dispatch_event(target, &mut event)
    }

    fn hover_index(&self) -> Vec<usize> {
        self.options_list()
            .query_selector_all(".select-option.hover")
            .unwrap()
            .iter()
            .filter_map(|n| n.get_attribute("data-index")?.parse().ok())
            .collect()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("dropdown_menu=trace,dropdown_dom=debug")
        .try_init();
}

fn numbered(count: usize) -> Vec<DropdownOption> {
    (1..=count)
        .map(|i| DropdownOption::new(format!("option {i}"), format!("A{i:02}")))
        .collect()
}

fn lettered(labels: &[&str]) -> Vec<DropdownOption> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| DropdownOption::new(*label, format!("A{:02}", i + 1)))
        .collect()
}

fn options_attr(options: &[DropdownOption]) -> String {
    serde_json::to_string(options).unwrap().replace('"', "&quot;")
}

fn mount_html(body: &str) -> Page {
    init_tracing();
    let document = Rc::new(
        Document::parse_html(&format!("<html><head></head><body>{body}</body></html>")).unwrap(),
    );
    let registry = CustomElementRegistry::new();
    define(&registry).unwrap();
    assert_eq!(registry.upgrade(&document), 1);

    let host = document.get_elements_by_tag_name(TAG_NAME).remove(0);
    let dropdown = Dropdown::from_registry(&registry, &host).unwrap();
    Page {
        document,
        registry,
        host,
        dropdown,
    }
}

fn mount(options: &[DropdownOption], maxitems: usize) -> Page {
    mount_html(&format!(
        r#"<dropdown-menu placeholder="this is placeholder" maxitems="{maxitems}" name="city" options="{}"></dropdown-menu>"#,
        options_attr(options)
    ))
}

#[test]
fn renders_placeholder() {
    let page = mount_html(r#"<dropdown-menu placeholder="this is placeholder"></dropdown-menu>"#);
    assert_eq!(page.shadow(".select-result").text_content(), "this is placeholder");
    assert!(page.shadow(".result-text").has_class("placeholder"));
    assert_eq!(page.dropdown.options().len(), 0);
}

#[test]
fn renders_one_row_per_option() {
    let page = mount(&numbered(4), 5);
    let rows = page
        .dropdown
        .shadow_root()
        .query_selector_all(".select-option")
        .unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].get_attribute("value").as_deref(), Some("A02"));
    assert_eq!(rows[1].text_content(), "option 2");
}

#[test]
fn malformed_options_render_nothing() {
    let page = mount_html(
        r#"<dropdown-menu placeholder="p" maxitems="x3" options="[{oops"></dropdown-menu>"#,
    );
    assert!(page.dropdown.options().is_empty());
    assert_eq!(page.dropdown.props().maxitems, 0);
    assert_eq!(page.result_text(), "p");
}

#[test]
fn click_expands_menu() {
    let page = mount(&numbered(8), 5);
    page.click(&page.trigger());

    assert!(page.menu().has_class("expand"));
    assert!(!page.options_list().has_class("select-hide"));
    assert!(page.dropdown.state().open);
}

#[test]
fn short_list_gets_no_fixed_height() {
    let page = mount(&numbered(4), 5);
    page.click(&page.trigger());

    let list = page.options_list();
    assert_eq!(list.style_property("overflow-y").as_deref(), Some("hidden"));
    assert_eq!(list.style_property("height"), None);
}

#[test]
fn long_list_is_height_constrained() {
    let page = mount(&numbered(8), 3);
    page.click(&page.trigger());

    let list = page.options_list();
    // 3 rows of 20px content + 12px padding + 1px border.
    assert_eq!(list.style_property("height").as_deref(), Some("99px"));
    assert_eq!(list.style_property("overflow-y").as_deref(), Some("auto"));
}

#[test]
fn clicking_options_commits_selection() {
    let page = mount(&numbered(8), 5);

    page.click(&page.nth_option(3));
    assert_eq!(page.result_text(), "option 3");
    assert_eq!(page.dropdown.value(), "A03");
    assert!(!page.shadow(".result-text").has_class("placeholder"));
    assert!(page.nth_option(3).has_class("select-selected"));
    assert_eq!(
        page.dropdown
            .hidden_input()
            .unwrap()
            .get_attribute("value")
            .as_deref(),
        Some("A03")
    );

    // Clicking the label span bubbles to its row.
    let label = page.nth_option(5).first_child().unwrap();
    page.click(&label);
    assert_eq!(page.result_text(), "option 5");
    assert_eq!(page.dropdown.value(), "A05");
    assert!(!page.nth_option(3).has_class("select-selected"));
    assert!(page.nth_option(5).has_class("select-selected"));
    assert!(!page.menu().has_class("expand"));
}

#[test]
fn click_toggles_open_menu_closed() {
    let page = mount(&numbered(8), 5);
    page.menu().add_class("expand");

    page.click(&page.trigger());
    assert!(!page.menu().has_class("expand"));
    assert!(page.options_list().has_class("select-hide"));
}

#[test]
fn arrow_down_walks_and_wraps() {
    let page = mount(&lettered(&["AA", "BB", "CC", "DD"]), 3);
    let root = page.root();

    for _ in 0..3 {
        assert!(!page.key_down(&root, "ArrowDown"));
    }
    assert!(page.nth_option(3).has_class("hover"));
    assert_eq!(page.hover_index(), vec![2]);

    page.key_down(&root, "ArrowDown");
    assert_eq!(page.dropdown.cursor(), Some(3));
    assert_eq!(page.dropdown.scroll_offset(), 1);
    assert_eq!(page.options_list().scroll_top(), 33.0);

    page.key_down(&root, "ArrowDown");
    assert_eq!(page.dropdown.cursor(), Some(0));
    assert_eq!(page.dropdown.scroll_offset(), 0);

    page.key_down(&root, "Enter");
    assert_eq!(page.result_text(), "AA");
    assert_eq!(page.dropdown.value(), "A01");
    assert!(!page.dropdown.is_expanded());
}

#[test]
fn arrow_up_walks_and_wraps() {
    let page = mount(&lettered(&["AA", "BB", "CC", "DD"]), 3);
    let root = page.root();

    page.key_down(&root, "ArrowUp");
    assert_eq!(page.dropdown.cursor(), Some(0));
    page.key_down(&root, "ArrowUp");
    assert_eq!(page.dropdown.cursor(), Some(3));
    page.key_down(&root, "ArrowUp");
    assert!(page.nth_option(3).has_class("hover"));
    assert_eq!(page.hover_index(), vec![2]);
}

#[test]
fn space_opens_and_commits() {
    let page = mount(&lettered(&["AA", "BB", "CC", "DD"]), 3);
    let root = page.root();

    assert!(!page.key_down(&root, " "));
    assert!(page.dropdown.is_expanded());
    assert_eq!(page.dropdown.cursor(), Some(0));

    page.key_down(&root, "ArrowDown");
    assert!(!page.key_down(&root, " "));
    assert!(!page.key_up(&root, " "));
    assert_eq!(page.dropdown.value(), "A02");
    assert_eq!(page.result_text(), "BB");
    assert!(page.nth_option(2).has_class("select-selected"));
    assert!(!page.dropdown.is_expanded());
}

#[test]
fn reopening_starts_at_selection() {
    let page = mount(&numbered(6), 3);
    page.click(&page.nth_option(5));

    page.key_down(&page.root(), "ArrowDown");
    assert!(page.dropdown.is_expanded());
    assert_eq!(page.dropdown.cursor(), Some(4));
    assert!(page.nth_option(5).has_class("hover"));
}

#[test]
fn escape_closes_without_changing_value() {
    let page = mount(&numbered(4), 3);
    page.click(&page.nth_option(2));
    page.menu().add_class("expand");

    page.key_down(&page.root(), "Escape");
    assert!(!page.menu().has_class("expand"));
    assert_eq!(page.dropdown.cursor(), None);
    assert_eq!(page.dropdown.value(), "A02");
    assert_eq!(page.result_text(), "option 2");
}

#[test]
fn hover_moves_cursor() {
    let page = mount(&numbered(4), 5);
    page.mouse_enter(&page.nth_option(3));

    assert!(page.nth_option(3).has_class("hover"));
    assert_eq!(page.dropdown.cursor(), Some(2));

    page.mouse_enter(&page.nth_option(1));
    assert_eq!(page.hover_index(), vec![0]);
}

#[test]
fn type_ahead_jumps_and_scrolls() {
    let page = mount(
        &lettered(&["AA", "BB", "CC", "DD", "EE", "FF", "GG", "HH"]),
        3,
    );
    page.click(&page.trigger());
    let root = page.root();

    assert!(!page.key_down(&root, "c"));
    assert_eq!(page.dropdown.cursor(), Some(2));
    assert_eq!(page.dropdown.scroll_offset(), 2);
    assert_eq!(page.options_list().scroll_top(), 66.0);

    page.key_down(&root, "H");
    assert_eq!(page.dropdown.cursor(), Some(7));
    assert_eq!(page.dropdown.scroll_offset(), 5);

    page.key_down(&root, "z");
    assert_eq!(page.dropdown.cursor(), Some(7));

    page.key_down(&root, "a");
    assert_eq!(page.dropdown.cursor(), Some(0));
    assert_eq!(page.dropdown.scroll_offset(), 0);
}

#[test]
fn type_ahead_is_ignored_while_closed() {
    let page = mount(&lettered(&["AA", "BB", "CC"]), 0);
    assert!(!page.key_down(&page.root(), "c"));
    assert_eq!(page.dropdown.cursor(), None);
    assert!(!page.dropdown.is_expanded());
}

#[test]
fn get_and_set_options() {
    let options = lettered(&["AA", "BB", "CC", "DD"]);
    let page = mount(&options, 3);
    assert_eq!(page.dropdown.options(), options);

    page.click(&page.nth_option(2));
    assert_eq!(page.dropdown.value(), "A02");
    let old_row = page.nth_option(1);

    let replacement = vec![
        DropdownOption::new("aa", "a"),
        DropdownOption::new("bb", "b"),
        DropdownOption::new("cc", "c"),
    ];
    page.dropdown.set_options(replacement.clone());

    assert_eq!(page.dropdown.options(), replacement);
    assert_eq!(page.dropdown.value(), "");
    assert_eq!(page.dropdown.selected_index(), None);
    assert_eq!(page.result_text(), "this is placeholder");
    assert!(page.shadow(".result-text").has_class("placeholder"));
    assert_eq!(page.nth_option(3).text_content(), "cc");
    assert!(old_row.parent().is_none());
    assert_eq!(old_row.event_target.listener_count(), 0);
}

#[test]
fn value_is_empty_before_any_choice() {
    let page = mount(&numbered(4), 3);
    assert_eq!(page.dropdown.value(), "");
}

#[test]
fn focus_and_blur() {
    let page = mount(&numbered(4), 3);

    page.document.focus(&page.trigger());
    assert!(page.menu().has_class("focused"));
    assert!(page.menu().has_class("expand"));
    assert_eq!(
        page.document.active_element().map(|n| n.id),
        Some(page.root().id)
    );

    page.document.blur(&page.root());
    assert!(!page.menu().has_class("focused"));
    assert!(!page.menu().has_class("expand"));
}

#[test]
fn click_after_focus_keeps_menu_open() {
    let page = mount(&numbered(4), 3);
    page.document.focus(&page.trigger());
    page.click(&page.trigger());
    assert!(page.dropdown.is_expanded());

    page.click(&page.trigger());
    assert!(!page.dropdown.is_expanded());
}

#[test]
fn focus_leaving_component_closes_menu() {
    let page = mount_html(&format!(
        r#"<dropdown-menu name="city" options="{}"></dropdown-menu><input id="other">"#,
        options_attr(&numbered(3))
    ));
    page.document.focus(&page.trigger());
    assert!(page.dropdown.is_expanded());

    let other = page.document.get_element_by_id("other").unwrap();
    page.document.focus(&other);
    assert!(!page.dropdown.is_expanded());
    assert!(!page.menu().has_class("focused"));
}

#[test]
fn enter_expands_and_keys_are_consumed() {
    let page = mount(&numbered(4), 3);
    let root = page.root();

    assert!(!page.key_down(&root, "Enter"));
    assert!(page.menu().has_class("expand"));
    assert!(!page.key_up(&root, "Enter"));

    // Tab keeps its default behaviour and closes the menu.
    assert!(page.key_down(&root, "Tab"));
    assert!(page.key_up(&root, "Tab"));
    assert!(!page.menu().has_class("expand"));
}

#[test]
fn keys_on_trigger_are_handled_once() {
    let page = mount(&numbered(4), 0);
    let trigger = page.trigger();
    page.key_down(&trigger, "ArrowDown");
    page.key_down(&trigger, "ArrowDown");
    assert_eq!(page.dropdown.cursor(), Some(1));
}

#[test]
fn form_submits_committed_value() {
    let page = mount_html(&format!(
        r#"<form action="/search" method="get"><input name="q" value="x"><dropdown-menu name="city" options="{}"></dropdown-menu></form>"#,
        options_attr(&numbered(8))
    ));
    let form = page.document.get_elements_by_tag_name("form").remove(0);

    let before = FormState::collect_entries(&form);
    assert_eq!(before.len(), 2);
    assert_eq!(before[1].name, "city");
    assert_eq!(before[1].value.as_str(), "");

    page.click(&page.nth_option(3));
    let entries = FormState::collect_entries(&form);
    let body = FormState::encode_form_data(&entries, FormEnctype::UrlEncoded);
    assert_eq!(String::from_utf8(body).unwrap(), "q=x&city=A03");
}

#[test]
fn disconnect_releases_listeners_and_hidden_input() {
    let page = mount(&numbered(4), 3);
    let root = page.root();
    let trigger = page.trigger();
    let row = page.nth_option(1);
    assert!(root.event_target.listener_count() > 0);

    assert!(page.registry.disconnect(&page.host));
    assert_eq!(root.event_target.listener_count(), 0);
    assert_eq!(trigger.event_target.listener_count(), 0);
    assert_eq!(row.event_target.listener_count(), 0);
    assert!(page.host.element_children().is_empty());

    page.click(&trigger);
    assert!(!page.dropdown.is_expanded());
}

#[test]
fn reconnect_renders_again_without_duplicate_field() {
    let page = mount(&numbered(4), 3);
    page.registry.disconnect(&page.host);

    page.dropdown.connected_callback();
    page.dropdown.connected_callback();

    let inputs: Vec<_> = page
        .host
        .element_children()
        .into_iter()
        .filter(|n| n.tag_name() == Some("input"))
        .collect();
    assert_eq!(inputs.len(), 1);

    page.click(&page.trigger());
    assert!(page.dropdown.is_expanded());
    assert_eq!(
        page.dropdown
            .shadow_root()
            .query_selector_all(".container")
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn registry_definition_is_idempotent() {
    let page = mount(&numbered(2), 0);
    assert!(!define(&page.registry).unwrap());
    assert_eq!(page.registry.upgrade(&page.document), 0);
    assert_eq!(page.registry.len(), 1);
}

//! # Form Submission
//!
//! Collects the successful controls of a `<form>` and encodes them for
//! submission. Only light-tree descendants take part: controls living inside a
//! shadow root are never submitted, so elements that want to participate must
//! place a control (typically `<input type="hidden">`) in their light DOM.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::Node;

/// Form data entry for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDataEntry {
    pub name: String,
    pub value: FormDataValue,
}

/// Value types for form data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormDataValue {
    String(String),
}

impl FormDataValue {
    pub fn as_str(&self) -> &str {
        match self {
            FormDataValue::String(v) => v,
        }
    }
}

/// Encoding types for form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormEnctype {
    #[default]
    UrlEncoded,
    TextPlain,
}

impl FormEnctype {
    /// Parse form enctype from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "text/plain" => FormEnctype::TextPlain,
            _ => FormEnctype::UrlEncoded,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FormEnctype::UrlEncoded => "application/x-www-form-urlencoded",
            FormEnctype::TextPlain => "text/plain",
        }
    }
}

/// Form submission method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Parse form method from string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "post" => FormMethod::Post,
            _ => FormMethod::Get,
        }
    }
}

/// Submission settings of a form element.
#[derive(Debug, Default)]
pub struct FormState {
    /// Form action URL.
    action: RefCell<String>,
    /// Submission method.
    method: Cell<FormMethod>,
    /// Encoding type.
    enctype: Cell<FormEnctype>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `action`, `method` and `enctype` from a `<form>` element.
    pub fn from_element(form: &Node) -> Self {
        let state = Self::new();
        if let Some(action) = form.get_attribute("action") {
            state.set_action(action);
        }
        if let Some(method) = form.get_attribute("method") {
            state.set_method(FormMethod::from_str(&method));
        }
        if let Some(enctype) = form.get_attribute("enctype") {
            state.set_enctype(FormEnctype::from_str(&enctype));
        }
        state
    }

    pub fn action(&self) -> String {
        self.action.borrow().clone()
    }

    pub fn set_action(&self, action: impl Into<String>) {
        *self.action.borrow_mut() = action.into();
    }

    pub fn method(&self) -> FormMethod {
        self.method.get()
    }

    pub fn set_method(&self, method: FormMethod) {
        self.method.set(method);
    }

    pub fn enctype(&self) -> FormEnctype {
        self.enctype.get()
    }

    pub fn set_enctype(&self, enctype: FormEnctype) {
        self.enctype.set(enctype);
    }

    /// Collect the successful controls under `form`, in tree order.
    ///
    /// A control is successful when it is a named, enabled `<input>`,
    /// `<textarea>` or `<select>`. Buttons and file inputs are skipped, and
    /// checkboxes and radios only count while `checked`.
    pub fn collect_entries(form: &Rc<Node>) -> Vec<FormDataEntry> {
        let mut entries = Vec::new();
        collect_controls(form, &mut entries);
        trace!(count = entries.len(), "Collected form entries");
        entries
    }

    /// Encode form data for submission.
    pub fn encode_form_data(entries: &[FormDataEntry], enctype: FormEnctype) -> Vec<u8> {
        match enctype {
            FormEnctype::UrlEncoded => Self::encode_url(entries),
            FormEnctype::TextPlain => Self::encode_text_plain(entries),
        }
    }

    fn encode_url(entries: &[FormDataEntry]) -> Vec<u8> {
        let parts: Vec<String> = entries
            .iter()
            .map(|e| {
                format!(
                    "{}={}",
                    urlencoding::encode(&e.name),
                    urlencoding::encode(e.value.as_str())
                )
            })
            .collect();
        parts.join("&").into_bytes()
    }

    fn encode_text_plain(entries: &[FormDataEntry]) -> Vec<u8> {
        let parts: Vec<String> = entries
            .iter()
            .map(|e| format!("{}={}", e.name, e.value.as_str()))
            .collect();
        parts.join("\r\n").into_bytes()
    }
}

fn collect_controls(node: &Rc<Node>, entries: &mut Vec<FormDataEntry>) {
    for child in node.children() {
        if let Some(entry) = successful_control(&child) {
            entries.push(entry);
        }
        collect_controls(&child, entries);
    }
}

fn successful_control(node: &Node) -> Option<FormDataEntry> {
    let tag = node.tag_name()?;
    if !matches!(tag, "input" | "textarea" | "select") {
        return None;
    }
    if node.has_attribute("disabled") {
        return None;
    }
    let name = node.get_attribute("name").filter(|n| !n.is_empty())?;

    let value = match tag {
        "input" => {
            let kind = node
                .get_attribute("type")
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| "text".to_string());
            match kind.as_str() {
                "submit" | "button" | "reset" | "image" | "file" => return None,
                "checkbox" | "radio" => {
                    if !node.has_attribute("checked") {
                        return None;
                    }
                    node.get_attribute("value")
                        .unwrap_or_else(|| "on".to_string())
                }
                _ => node.get_attribute("value").unwrap_or_default(),
            }
        }
        "textarea" => node.text_content(),
        _ => node
            .element_children()
            .into_iter()
            .find(|o| o.tag_name() == Some("option") && o.has_attribute("selected"))
            .map(|o| o.get_attribute("value").unwrap_or_else(|| o.text_content()))
            .unwrap_or_default(),
    };

    Some(FormDataEntry {
        name,
        value: FormDataValue::String(value),
    })
}

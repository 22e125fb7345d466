//! Host attribute parsing.
//!
//! Attributes are read once at mount. Malformed values fall back to safe
//! defaults and are reported through `tracing`, never to the host.

use dropdown_common::{DropdownError, Result};
use dropdown_dom::Node;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// A selectable (label, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Display label.
    pub name: String,
    /// Submitted value.
    pub value: String,
}

impl DropdownOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Configuration read from the host element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DropdownProps {
    /// Form field name of the hidden input.
    pub name: String,
    /// Display seed for the trigger input.
    pub value: String,
    /// Text shown until a selection is committed.
    pub placeholder: String,
    pub options: Vec<DropdownOption>,
    /// Parsed but not acted upon.
    pub startitem: usize,
    /// Maximum number of visible options; 0 shows all.
    pub maxitems: usize,
}

impl DropdownProps {
    /// Read every supported attribute from `host`.
    pub fn from_element(host: &Node) -> Self {
        Self {
            name: string_attribute(host, "name"),
            value: string_attribute(host, "value"),
            placeholder: string_attribute(host, "placeholder"),
            options: options_attribute(host, "options"),
            startitem: int_attribute(host, "startitem"),
            maxitems: int_attribute(host, "maxitems"),
        }
    }
}

/// String attribute, `""` when absent.
pub fn string_attribute(host: &Node, name: &str) -> String {
    host.get_attribute(name).unwrap_or_default()
}

/// Non-negative integer attribute, `0` when absent or malformed.
pub fn int_attribute(host: &Node, name: &str) -> usize {
    let Some(raw) = host.get_attribute(name) else {
        return 0;
    };
    match parse_leading_int(&raw) {
        Ok(n) => n,
        Err(e) => {
            warn!(attribute = name, value = %raw, error = %e, "Ignoring integer attribute");
            0
        }
    }
}

/// Option list attribute, `[]` when absent or malformed.
pub fn options_attribute(host: &Node, name: &str) -> Vec<DropdownOption> {
    let Some(raw) = host.get_attribute(name) else {
        return Vec::new();
    };
    match parse_options(&raw) {
        Ok(options) => options,
        Err(e) => {
            warn!(attribute = name, error = %e, "Ignoring options attribute");
            Vec::new()
        }
    }
}

/// Parse an integer the way `parseInt` reads a prefix: optional whitespace,
/// an optional sign, an optional `0x`/`0X` hex marker, then digits. Trailing
/// text is ignored and negative values clamp to zero. Values beyond `usize`
/// saturate.
pub fn parse_leading_int(raw: &str) -> Result<usize> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits_len = rest
        .bytes()
        .take_while(|b| (*b as char).is_digit(radix))
        .count();
    if digits_len == 0 {
        return Err(DropdownError::InvalidArgument(format!(
            "`{raw}` is not a number"
        )));
    }
    if negative {
        return Ok(0);
    }
    Ok(usize::from_str_radix(&rest[..digits_len], radix).unwrap_or(usize::MAX))
}

/// Parse a JSON option list. A value that is not an array is an error.
///
/// Each entry must be an object. Its `name` and `value` are taken as text:
/// numbers and booleans are stringified, and a missing or `null` field reads
/// as `""`. Entries that are not objects, or whose fields are arrays or
/// objects, are skipped.
pub fn parse_options(raw: &str) -> Result<Vec<DropdownOption>> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Array(entries) = value else {
        return Err(DropdownError::attribute("options", "expected a JSON array"));
    };

    let options = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match option_entry(entry) {
            Ok(option) => Some(option),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed option entry");
                None
            }
        })
        .collect();
    Ok(options)
}

fn option_entry(entry: &Value) -> Result<DropdownOption> {
    let Value::Object(fields) = entry else {
        return Err(DropdownError::attribute("options", "entry is not an object"));
    };
    Ok(DropdownOption {
        name: scalar_text(fields.get("name"), "name")?,
        value: scalar_text(fields.get("value"), "value")?,
    })
}

fn scalar_text(field: Option<&Value>, key: &str) -> Result<String> {
    match field {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(DropdownError::attribute(
            "options",
            format!("`{key}` is not a scalar"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropdown_dom::Document;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("5").unwrap(), 5);
        assert_eq!(parse_leading_int("  12px").unwrap(), 12);
        assert_eq!(parse_leading_int("+3").unwrap(), 3);
        assert_eq!(parse_leading_int("-4").unwrap(), 0);
        assert_eq!(
            parse_leading_int("99999999999999999999999999").unwrap(),
            usize::MAX
        );
        assert!(parse_leading_int("abc").is_err());
        assert!(parse_leading_int("").is_err());
        assert!(parse_leading_int("-").is_err());
    }

    #[test]
    fn test_parse_leading_int_hex_prefix() {
        assert_eq!(parse_leading_int("0x3").unwrap(), 3);
        assert_eq!(parse_leading_int("0X1Fpx").unwrap(), 31);
        assert_eq!(parse_leading_int("-0x3").unwrap(), 0);
        assert_eq!(parse_leading_int("07").unwrap(), 7);
        assert!(parse_leading_int("0x").is_err());
        assert!(parse_leading_int("0xg").is_err());
    }

    #[test]
    fn test_parse_options() {
        let options =
            parse_options(r#"[{"name":"option 1","value":"A01"},{"name":"option 2","value":"A02"}]"#)
                .unwrap();
        assert_eq!(options[1], DropdownOption::new("option 2", "A02"));

        let partial =
            parse_options(r#"[{"name":"a","value":"1"}, 7, {"name":["x"],"value":"2"}]"#).unwrap();
        assert_eq!(partial, vec![DropdownOption::new("a", "1")]);

        let coerced = parse_options(
            r#"[{"name":"a","value":1}, {"name":"b"}, {"name":true,"value":null}]"#,
        )
        .unwrap();
        assert_eq!(
            coerced,
            vec![
                DropdownOption::new("a", "1"),
                DropdownOption::new("b", ""),
                DropdownOption::new("true", ""),
            ]
        );

        assert!(matches!(
            parse_options(r#"{"name":"a"}"#),
            Err(DropdownError::Attribute { .. })
        ));
        assert!(matches!(parse_options("[{"), Err(DropdownError::Json(_))));
    }

    #[test]
    fn test_props_from_element() {
        let doc = Document::new();
        let host = doc.create_element("dropdown-menu");
        host.set_attribute("name", "city");
        host.set_attribute("placeholder", "Pick one");
        host.set_attribute("maxitems", "abc");
        host.set_attribute("startitem", "2");
        host.set_attribute("options", "not json");

        let props = DropdownProps::from_element(&host);
        assert_eq!(props.name, "city");
        assert_eq!(props.placeholder, "Pick one");
        assert_eq!(props.value, "");
        assert_eq!(props.maxitems, 0);
        assert_eq!(props.startitem, 2);
        assert!(props.options.is_empty());
    }
}

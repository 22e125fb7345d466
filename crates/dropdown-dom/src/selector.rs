//! Selector parsing and matching.
//!
//! Supports compound selectors built from `tag`, `*`, `#id`, `.class`,
//! `[attr]` and `[attr="value"]`, joined by descendant (whitespace) or child
//! (`>`) combinators.

use std::rc::Rc;

use crate::{DomError, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSelector {
    name: String,
    value: Option<String>,
}

/// A compound selector: every part must match the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeSelector>,
}

impl Compound {
    fn matches(&self, node: &Node) -> bool {
        let Some(tag_name) = node.tag_name() else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.get_attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|attr| match &attr.value {
            Some(expected) => node.get_attribute(&attr.name).as_deref() == Some(expected.as_str()),
            None => node.has_attribute(&attr.name),
        })
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Compounds left to right; each carries the combinator linking it to the
    /// previous compound (ignored for the first).
    parts: Vec<(Combinator, Compound)>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        let chars: Vec<char> = selector.trim().chars().collect();
        if chars.is_empty() {
            return Err(invalid("empty selector"));
        }

        let mut parts = Vec::new();
        let mut pending = Combinator::Descendant;
        let mut pos = 0;

        while pos < chars.len() {
            let ch = chars[pos];
            if ch.is_whitespace() {
                pos += 1;
                continue;
            }
            if ch == '>' {
                if parts.is_empty() || pending == Combinator::Child {
                    return Err(invalid("dangling `>`"));
                }
                pending = Combinator::Child;
                pos += 1;
                continue;
            }

            let (compound, next) = parse_compound(&chars, pos).map_err(|r| invalid(&r))?;
            parts.push((pending, compound));
            pending = Combinator::Descendant;
            pos = next;
        }

        if pending == Combinator::Child {
            return Err(invalid("selector ends with `>`"));
        }
        Ok(Self { parts })
    }

    /// Check whether `node` matches this selector.
    pub fn matches(&self, node: &Rc<Node>) -> bool {
        self.matches_at(node, self.parts.len() - 1)
    }

    fn matches_at(&self, node: &Rc<Node>, index: usize) -> bool {
        let (combinator, compound) = &self.parts[index];
        if !compound.matches(node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match combinator {
            Combinator::Child => node
                .parent()
                .map(|parent| self.matches_at(&parent, index - 1))
                .unwrap_or(false),
            Combinator::Descendant => {
                let mut current = node.parent();
                while let Some(ancestor) = current {
                    if self.matches_at(&ancestor, index - 1) {
                        return true;
                    }
                    current = ancestor.parent();
                }
                false
            }
        }
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

fn read_ident(chars: &[char], mut pos: usize) -> (String, usize) {
    let start = pos;
    while pos < chars.len() && is_ident_char(chars[pos]) {
        pos += 1;
    }
    (chars[start..pos].iter().collect(), pos)
}

fn parse_compound(chars: &[char], mut pos: usize) -> Result<(Compound, usize), String> {
    let mut compound = Compound::default();
    let start = pos;

    if chars[pos] == '*' {
        pos += 1;
    } else if is_ident_char(chars[pos]) {
        let (tag, next) = read_ident(chars, pos);
        compound.tag = Some(tag);
        pos = next;
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' | '.' => {
                let marker = chars[pos];
                let (ident, next) = read_ident(chars, pos + 1);
                if ident.is_empty() {
                    return Err(format!("expected a name after `{marker}`"));
                }
                if marker == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
                pos = next;
            }
            '[' => {
                let (attribute, next) = parse_attribute(chars, pos + 1)?;
                compound.attributes.push(attribute);
                pos = next;
            }
            ch if ch.is_whitespace() || ch == '>' => break,
            ch => return Err(format!("unexpected `{ch}`")),
        }
    }

    if pos == start {
        return Err("expected a selector".to_string());
    }
    Ok((compound, pos))
}

fn parse_attribute(chars: &[char], pos: usize) -> Result<(AttributeSelector, usize), String> {
    let (name, mut pos) = read_ident(chars, pos);
    if name.is_empty() {
        return Err("expected an attribute name".to_string());
    }

    let mut value = None;
    if chars.get(pos) == Some(&'=') {
        pos += 1;
        match chars.get(pos) {
            Some(&quote) if quote == '"' || quote == '\'' => {
                let start = pos + 1;
                let end = chars[start..]
                    .iter()
                    .position(|&c| c == quote)
                    .map(|offset| start + offset)
                    .ok_or_else(|| "unterminated attribute value".to_string())?;
                value = Some(chars[start..end].iter().collect());
                pos = end + 1;
            }
            _ => {
                let (ident, next) = read_ident(chars, pos);
                value = Some(ident);
                pos = next;
            }
        }
    }

    if chars.get(pos) != Some(&']') {
        return Err("unterminated attribute selector".to_string());
    }
    Ok((AttributeSelector { name, value }, pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn fixture() -> Document {
        Document::parse_html(
            r#"<html><body>
                <div class="custom-select expand">
                    <div class="select-result"><span class="result-text placeholder">pick</span></div>
                    <div id="optionsRef" class="select-items">
                        <div class="select-option" data-index="0"><span data-index="0">a</span></div>
                        <div class="select-option hover" data-index="1"><span data-index="1">b</span></div>
                    </div>
                </div>
            </body></html>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_compound_selectors() {
        let doc = fixture();
        let root = doc.root();

        let hovered = root.query_selector_all(".select-option.hover").unwrap();
        assert_eq!(hovered.len(), 1);
        assert_eq!(hovered[0].get_attribute("data-index").as_deref(), Some("1"));

        let by_attr = root
            .query_selector(r#".select-option[data-index="0"]"#)
            .unwrap()
            .unwrap();
        assert_eq!(by_attr.text_content(), "a");

        assert_eq!(root.query_selector_all("[data-index]").unwrap().len(), 4);
        assert!(root.query_selector("div#optionsRef.select-items").unwrap().is_some());
    }

    #[test]
    fn test_combinators() {
        let doc = fixture();
        let root = doc.root();

        let text = root.query_selector(".select-result>.result-text").unwrap();
        assert_eq!(text.map(|n| n.text_content()), Some("pick".to_string()));

        assert!(root
            .query_selector(".custom-select > .result-text")
            .unwrap()
            .is_none());
        assert!(root
            .query_selector(".custom-select .result-text")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", ">", ".a >", ".", "[x", "[x=\"y]", "a > > b", "a!"] {
            assert!(Selector::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}

//! Exclusion selectors.
//!
//! A small subset of CSS simple selectors, enough for exclusion lists:
//! `tag`, `.class`, `#id`, `[attr]`, `[attr=value]` and compounds such
//! as `div.note` or `span[data-x]`.

use super::dom::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Class(String),
    Id(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

/// One compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

impl Selector {
    /// Parse a selector, `None` when it uses unsupported syntax
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || input.contains(|c: char| c.is_whitespace() || ">+~,:*".contains(c)) {
            return None;
        }

        let tag_len = input.find(['.', '#', '[']).unwrap_or(input.len());
        let tag = (tag_len > 0).then(|| input[..tag_len].to_ascii_lowercase());

        let mut conditions = Vec::new();
        let mut rest = &input[tag_len..];
        while let Some(first) = rest.chars().next() {
            match first {
                '.' | '#' => {
                    let body = &rest[1..];
                    let end = body.find(['.', '#', '[']).unwrap_or(body.len());
                    if end == 0 {
                        return None;
                    }
                    let name = body[..end].to_string();
                    conditions.push(if first == '.' {
                        Condition::Class(name)
                    } else {
                        Condition::Id(name)
                    });
                    rest = &body[end..];
                }
                '[' => {
                    let end = rest.find(']')?;
                    let inner = &rest[1..end];
                    let condition = match inner.split_once('=') {
                        Some((name, value)) => Condition::AttributeEquals(
                            name.trim().to_ascii_lowercase(),
                            value.trim().trim_matches(['"', '\'']).to_string(),
                        ),
                        None => Condition::HasAttribute(inner.trim().to_ascii_lowercase()),
                    };
                    conditions.push(condition);
                    rest = &rest[end + 1..];
                }
                _ => return None,
            }
        }

        Some(Self { tag, conditions })
    }

    /// Whether an element matches (text nodes never do)
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }

        self.conditions.iter().all(|condition| match condition {
            Condition::Class(class) => doc.has_class(node, class),
            Condition::Id(id) => doc.attribute(node, "id") == Some(id.as_str()),
            Condition::HasAttribute(name) => doc.attribute(node, name).is_some(),
            Condition::AttributeEquals(name, value) => {
                doc.attribute(node, name) == Some(value.as_str())
            }
        })
    }
}

/// Parse a selector list, logging and dropping unsupported entries
pub fn parse_selectors(selectors: &[String]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|raw| {
            let parsed = Selector::parse(raw);
            if parsed.is_none() {
                tracing::warn!(selector = %raw, "Ignoring unsupported exclusion selector");
            }
            parsed
        })
        .collect()
}

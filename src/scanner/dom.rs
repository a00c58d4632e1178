//! Arena document tree.
//!
//! A deliberately small model of a rendered page: element and text
//! nodes addressed by `NodeId`, with parent links so the scanner can
//! check exclusion ancestors and whether a node is still attached to
//! the root. Removed nodes stay in the arena; their ids remain valid
//! but report `is_attached() == false`.

use crate::core::search::escape_html;
use std::fmt;

/// Handle to a node in a `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the closing tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea"];

/// A tree of element and text nodes under a single root element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `<body>` root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    tag: "body".to_string(),
                    attributes: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// Parse an HTML fragment into the body of a new document
    pub fn parse_html(html: &str) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        HtmlParser::new(html).parse_into(&mut doc, root);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// New detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        })
    }

    /// New detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, moving it if attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Remove a node (and its subtree) from the tree
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != node);
        }
    }

    /// Replace `node` by `replacements`, in order, at the same position
    pub fn replace_with(&mut self, node: NodeId, replacements: &[NodeId]) {
        let Some(parent) = self.node(node).parent else {
            return;
        };
        for &r in replacements {
            self.detach(r);
        }

        let Some(position) = self.node(parent).children.iter().position(|c| *c == node) else {
            return;
        };
        self.node_mut(node).parent = None;
        self.node_mut(parent)
            .children
            .splice(position..=position, replacements.iter().copied())
            .for_each(drop);
        for &r in replacements {
            self.node_mut(r).parent = Some(parent);
        }
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// Whether the node is connected to the document root
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node).kind, NodeKind::Text(_))
    }

    /// Tag name for elements
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    /// Content of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node).kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(node).kind {
            match attributes.iter_mut().find(|(key, _)| key == name) {
                Some(existing) => existing.1 = value.to_string(),
                None => attributes.push((name.to_ascii_lowercase(), value.to_string())),
            }
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Concatenated text of a subtree
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &self.node(node).children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Serialise the children of a node
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.node(node).children {
            self.write_html(child, &mut out);
        }
        out
    }

    /// Serialise a node and its subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        match &self.node(node).kind {
            NodeKind::Text(text) => {
                let raw_parent = self
                    .node(node)
                    .parent
                    .and_then(|p| self.tag(p))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw_parent {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape_html(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for &child in &self.node(node).children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Tolerant HTML fragment parser
///
/// Handles start/end tags with quoted or bare attributes, void and
/// self-closing elements, comments, doctypes, raw-text elements and
/// character references. Unmatched end tags are ignored; unclosed
/// elements are closed at the end of input.
struct HtmlParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> HtmlParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn parse_into(&mut self, doc: &mut Document, root: NodeId) {
        let mut stack: Vec<NodeId> = vec![root];

        while self.pos < self.input.len() {
            let current = stack.last().copied().unwrap_or(root);
            let rest = self.rest();

            if let Some(comment) = rest.strip_prefix("<!--") {
                self.pos += 4 + comment.find("-->").map(|i| i + 3).unwrap_or(comment.len());
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos += rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
            } else if let Some(closing) = rest.strip_prefix("</") {
                let end = closing.find('>').unwrap_or(closing.len());
                let name = closing[..end].trim().to_ascii_lowercase();
                self.pos += 2 + (end + 1).min(closing.len());
                if let Some(depth) = stack.iter().rposition(|n| doc.tag(*n) == Some(name.as_str())) {
                    if depth > 0 {
                        stack.truncate(depth);
                    }
                }
            } else if rest.starts_with('<')
                && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                let (element, self_closing) = self.parse_start_tag(doc);
                doc.append_child(current, element);
                let tag = doc.tag(element).unwrap_or("").to_string();

                if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
                    let close = format!("</{tag}");
                    let rest = self.rest();
                    let end = rest.to_ascii_lowercase().find(&close).unwrap_or(rest.len());
                    if end > 0 {
                        let text = if tag == "textarea" {
                            decode_entities(&rest[..end])
                        } else {
                            rest[..end].to_string()
                        };
                        let node = doc.create_text(&text);
                        doc.append_child(element, node);
                    }
                    self.pos += end;
                    let rest = self.rest();
                    self.pos += rest.find('>').map(|i| i + 1).unwrap_or(rest.len());
                } else if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
                    stack.push(element);
                }
            } else {
                let first = rest.chars().next().map(char::len_utf8).unwrap_or(1);
                let end = rest[first..].find('<').map(|i| i + first).unwrap_or(rest.len());
                let node = doc.create_text(&decode_entities(&rest[..end]));
                doc.append_child(current, node);
                self.pos += end;
            }
        }
    }

    /// Parse `<tag attr=...>` starting at `<`; returns the element and
    /// whether it was self-closing
    fn parse_start_tag(&mut self, doc: &mut Document) -> (NodeId, bool) {
        self.pos += 1;
        let name_len = self
            .rest()
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(self.rest().len());
        let element = doc.create_element(&self.rest()[..name_len]);
        self.pos += name_len;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return (element, false);
            }
            if let Some(after) = rest.strip_prefix("/>") {
                self.pos = self.input.len() - after.len();
                return (element, true);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return (element, false);
            }
            if rest.starts_with('/') {
                self.pos += 1;
                continue;
            }

            let name_len = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(rest.len())
                .max(1);
            let name = rest[..name_len].to_ascii_lowercase();
            self.pos += name_len;
            self.skip_whitespace();

            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.parse_attribute_value()
            } else {
                String::new()
            };
            doc.set_attribute(element, &name, &value);
        }
    }

    fn parse_attribute_value(&mut self) -> String {
        let rest = self.rest();
        let raw = match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &rest[1..];
                let end = body.find(quote).unwrap_or(body.len());
                self.pos += 1 + end + usize::from(end < body.len());
                &body[..end]
            }
            _ => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                &rest[..end]
            }
        };
        decode_entities(raw)
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }
}

pub type NodeId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(pub NodeId);

impl Id {
    /// Placeholder for nodes that have not been numbered yet.
    pub const UNASSIGNED: Id = Id(0);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Doctype(String),
    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    },
    EndTag(String),
    Comment(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document {
        id: Id,
        doctype: Option<String>,
        children: Vec<Node>,
    },
    Element {
        id: Id,
        name: String,
        attributes: Vec<(String, Option<String>)>,
        children: Vec<Node>,
    },
    Text {
        id: Id,
        text: String,
    },
    Comment {
        id: Id,
        text: String,
    },
}

impl Node {
    pub fn element(name: impl Into<String>) -> Self {
        Node::Element {
            id: Id::UNASSIGNED,
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text {
            id: Id::UNASSIGNED,
            text: text.into(),
        }
    }

    pub fn id(&self) -> Id {
        match self {
            Node::Document { id, .. } => *id,
            Node::Element { id, .. } => *id,
            Node::Text { id, .. } => *id,
            Node::Comment { id, .. } => *id,
        }
    }

    pub fn set_id(&mut self, new_id: Id) {
        match self {
            Node::Document { id, .. } => *id = new_id,
            Node::Element { id, .. } => *id = new_id,
            Node::Text { id, .. } => *id = new_id,
            Node::Comment { id, .. } => *id = new_id,
        }
    }

    /// Tag name for elements, `None` for every other node kind.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_element_named(&self, target: &str) -> bool {
        self.name().is_some_and(|name| name.eq_ignore_ascii_case(target))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. } | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document { children, .. } => Some(children),
            Node::Element { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn attributes(&self) -> &[(String, Option<String>)] {
        match self {
            Node::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Value of attribute `key`; valueless attributes read as `""`.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes()
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(key))
    }

    /// True if the whitespace-separated attribute value contains `token`.
    pub fn attr_has_token(&self, key: &str, token: &str) -> bool {
        self.attr(key).is_some_and(|value| {
            value
                .split_ascii_whitespace()
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }

    /// Sets an attribute, replacing an existing value in place or appending a new entry.
    /// No-op on non-element nodes.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let Node::Element { attributes, .. } = self else {
            return;
        };
        let value = value.into();
        match attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, slot)) => *slot = Some(value),
            None => attributes.push((key.to_ascii_lowercase(), Some(value))),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<Option<String>> {
        let Node::Element { attributes, .. } = self else {
            return None;
        };
        let index = attributes
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(key))?;
        Some(attributes.remove(index).1)
    }

    /// Removes every attribute from the element and returns them in their original order.
    pub fn take_attributes(&mut self) -> Vec<(String, Option<String>)> {
        match self {
            Node::Element { attributes, .. } => std::mem::take(attributes),
            _ => Vec::new(),
        }
    }

    pub fn take_children(&mut self) -> Vec<Node> {
        self.children_mut().map(std::mem::take).unwrap_or_default()
    }
}

// Drop glue would recurse once per nesting level; flatten the subtree first.
impl Drop for Node {
    fn drop(&mut self) {
        let Some(children) = self.children_mut() else {
            return;
        };
        if children.is_empty() {
            return;
        }
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let Some(grandchildren) = node.children_mut() {
                pending.append(grandchildren);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> Node {
        let mut node = Node::element("link");
        node.set_attr("rel", "preload stylesheet");
        node.set_attr("href", "a.css");
        node
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut node = link();
        node.set_attr("REL", "icon");
        assert_eq!(
            node.attributes(),
            &[
                ("rel".to_string(), Some("icon".to_string())),
                ("href".to_string(), Some("a.css".to_string())),
            ]
        );
    }

    #[test]
    fn attr_has_token_splits_on_whitespace() {
        let node = link();
        assert!(node.attr_has_token("rel", "stylesheet"));
        assert!(!node.attr_has_token("rel", "style"));
    }

    #[test]
    fn take_attributes_leaves_element_empty() {
        let mut node = link();
        let taken = node.take_attributes();
        assert_eq!(taken.len(), 2);
        assert!(node.attributes().is_empty());
        assert_eq!(node.remove_attr("href"), None);
    }

    #[test]
    fn valueless_attribute_reads_as_empty() {
        let mut node = Node::element("script");
        if let Node::Element { attributes, .. } = &mut node {
            attributes.push(("async".to_string(), None));
        }
        assert_eq!(node.attr("async"), Some(""));
        assert!(node.has_attr("ASYNC"));
    }
}

//! Validation exemptions ("PX-verified" nodes and attributes).
//!
//! A sanitizer that has judged a node safe marks it here so the downstream validator skips
//! it. Marks are never cleared.

use html::dom_utils::visit_elements_mut;
use html::{Id, Node};
use std::collections::{BTreeMap, BTreeSet};

/// Attribute carrying the exemption of the element itself.
pub const PX_VERIFIED_TAG_ATTRIBUTE: &str = "data-px-verified-tag";
/// Attribute listing exempted attribute names, space separated.
pub const PX_VERIFIED_ATTRS_ATTRIBUTE: &str = "data-px-verified-attrs";

/// Sink for exemption marks, implemented by whatever validator consumes them.
pub trait ValidationExemption {
    fn mark_node_as_px_verified(&mut self, node: Id);

    fn mark_attribute_as_px_verified(&mut self, node: Id, attribute: &str);
}

/// In-memory exemption record keyed by node id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExemptionSet {
    nodes: BTreeSet<Id>,
    attributes: BTreeMap<Id, Vec<String>>,
}

impl ExemptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_node_px_verified(&self, node: Id) -> bool {
        self.nodes.contains(&node)
    }

    pub fn is_attribute_px_verified(&self, node: Id, attribute: &str) -> bool {
        self.attributes
            .get(&node)
            .is_some_and(|names| names.iter().any(|n| n.eq_ignore_ascii_case(attribute)))
    }

    pub fn nodes(&self) -> impl Iterator<Item = Id> + '_ {
        self.nodes.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.attributes.is_empty()
    }

    /// Write the marks onto the tree as `data-px-verified-*` attributes, the form the
    /// validator reads when it only sees serialized markup.
    pub fn annotate(&self, root: &mut Node) {
        if self.is_empty() {
            return;
        }
        visit_elements_mut(root, &mut |element: &mut Node| {
            let id = element.id();
            if self.nodes.contains(&id) && !element.has_attr(PX_VERIFIED_TAG_ATTRIBUTE) {
                if let Node::Element { attributes, .. } = &mut *element {
                    attributes.push((PX_VERIFIED_TAG_ATTRIBUTE.to_string(), None));
                }
            }
            if let Some(names) = self.attributes.get(&id) {
                element.set_attr(PX_VERIFIED_ATTRS_ATTRIBUTE, names.join(" "));
            }
        });
    }
}

impl ValidationExemption for ExemptionSet {
    fn mark_node_as_px_verified(&mut self, node: Id) {
        self.nodes.insert(node);
    }

    fn mark_attribute_as_px_verified(&mut self, node: Id, attribute: &str) {
        let names = self.attributes.entry(node).or_default();
        if !names.iter().any(|n| n.eq_ignore_ascii_case(attribute)) {
            names.push(attribute.to_ascii_lowercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::dom_utils::find_element;
    use html::{parse_document, to_html};

    #[test]
    fn records_nodes_and_attributes() {
        let mut set = ExemptionSet::new();
        set.mark_node_as_px_verified(Id(3));
        set.mark_attribute_as_px_verified(Id(3), "HREF");
        set.mark_attribute_as_px_verified(Id(3), "href");
        assert!(set.is_node_px_verified(Id(3)));
        assert!(!set.is_node_px_verified(Id(4)));
        assert!(set.is_attribute_px_verified(Id(3), "href"));
        assert!(!set.is_attribute_px_verified(Id(3), "rel"));
        assert_eq!(set.nodes().collect::<Vec<_>>(), vec![Id(3)]);
    }

    #[test]
    fn annotate_writes_data_attributes() {
        let mut dom = parse_document(r#"<link rel="stylesheet" href="a.css"><p>x</p>"#);
        let link_id = find_element(&dom, "link").expect("link").id();
        let mut set = ExemptionSet::new();
        set.mark_node_as_px_verified(link_id);
        set.mark_attribute_as_px_verified(link_id, "href");
        set.annotate(&mut dom);
        assert_eq!(
            to_html(&dom),
            r#"<link rel="stylesheet" href="a.css" data-px-verified-tag data-px-verified-attrs="href"><p>x</p>"#
        );
    }

    #[test]
    fn annotate_without_marks_is_noop() {
        let mut dom = parse_document("<p>x</p>");
        let before = dom.clone();
        ExemptionSet::new().annotate(&mut dom);
        assert_eq!(dom, before);
    }
}

//! HTML document model, tokenizer, tree builder and serializer.
//!
//! The tree is value-owned: every node owns its children, and node identity is carried by
//! [`Id`], assigned in document order by [`dom_utils::assign_node_ids`].

#[cfg(any(test, feature = "dom-snapshot"))]
pub mod dom_snapshot;
pub mod dom_utils;
pub mod serialize;

mod dom_builder;
mod entities;
mod tokenizer;
mod types;

pub use crate::dom_builder::build_dom;
pub use crate::serialize::to_html;
pub use crate::tokenizer::{is_rawtext_element, is_void_element, tokenize};
pub use crate::types::{Id, Node, NodeId, Token};

/// Tokenize, build and number a document in one step.
pub fn parse_document(input: &str) -> Node {
    let mut dom = build_dom(tokenize(input));
    dom_utils::assign_node_ids(&mut dom);
    dom
}

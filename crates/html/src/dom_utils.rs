use crate::{Id, Node};

// Every walk here keeps its own stack: parsed documents can nest deeper than the
// thread stack allows.

/// Number every node whose id is still [`Id::UNASSIGNED`], in document order, starting
/// after the largest id already present. Nodes that already have an id keep it.
pub fn assign_node_ids(root: &mut Node) {
    let mut next = max_node_id(root).0.wrapping_add(1).max(1);
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.id() == Id::UNASSIGNED {
            node.set_id(Id(next));
            next = next.wrapping_add(1);
        }
        if let Some(children) = node.children_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
}

/// Largest id present in the tree, `Id(0)` for a fully unnumbered tree.
pub fn max_node_id(node: &Node) -> Id {
    let mut max = node.id();
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        max = max.max(node.id());
        stack.extend(node.children());
    }
    max
}

/// First node in document order matching `pred`.
fn find_first<'a>(root: &'a Node, pred: impl Fn(&Node) -> bool) -> Option<&'a Node> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if pred(node) {
            return Some(node);
        }
        stack.extend(node.children().iter().rev());
    }
    None
}

pub fn find_node_by_id(node: &Node, id: Id) -> Option<&Node> {
    find_first(node, |n| n.id() == id)
}

/// First element named `name` in document order (case-insensitive).
pub fn find_element<'a>(node: &'a Node, name: &str) -> Option<&'a Node> {
    find_first(node, |n| n.is_element_named(name))
}

pub fn find_element_mut<'a>(node: &'a mut Node, name: &str) -> Option<&'a mut Node> {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if node.is_element_named(name) {
            return Some(node);
        }
        if let Some(children) = node.children_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
    None
}

/// Collect every element matching `pred`, in document order.
pub fn collect_elements<'a>(node: &'a Node, pred: &impl Fn(&Node) -> bool, out: &mut Vec<&'a Node>) {
    let mut stack = vec![node];
    while let Some(node) = stack.pop() {
        if matches!(node, Node::Element { .. }) && pred(node) {
            out.push(node);
        }
        stack.extend(node.children().iter().rev());
    }
}

/// Visit every element below `root` in document order.
///
/// `visit` may replace the element it is handed; traversal then continues into the
/// children of the replacement, so elements moved into it are still seen in order.
pub fn visit_elements_mut(root: &mut Node, visit: &mut impl FnMut(&mut Node)) {
    let Some(children) = root.children_mut() else {
        return;
    };
    let mut stack: Vec<&mut Node> = children.iter_mut().rev().collect();
    while let Some(node) = stack.pop() {
        if matches!(node, Node::Element { .. }) {
            visit(&mut *node);
        }
        if let Some(children) = node.children_mut() {
            stack.extend(children.iter_mut().rev());
        }
    }
}

/// What `retain_elements` should do with an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Retain {
    Keep,
    Remove,
}

/// Drop every element below `root` for which `decide` returns `Retain::Remove`, together
/// with its subtree. Removed subtrees are not visited.
///
/// A parent's children are all decided before any of their descendants; siblings are
/// decided in document order.
pub fn retain_elements(root: &mut Node, decide: &mut impl FnMut(&mut Node) -> Retain) {
    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        let Some(children) = parent.children_mut() else {
            continue;
        };
        children.retain_mut(|child| {
            !matches!(child, Node::Element { .. }) || decide(child) == Retain::Keep
        });
        stack.extend(children.iter_mut().rev());
    }
}

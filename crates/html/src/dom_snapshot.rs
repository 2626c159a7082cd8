use crate::Node;
use std::fmt::{self, Write};

/// Deterministic, line-oriented DOM rendering for fixture comparisons.
/// Not a stable format.
///
/// One node per line, two spaces of indent per depth level. Attribute order is
/// significant. Ids are omitted unless `ignore_ids` is off.
#[derive(Clone, Copy, Debug)]
pub struct DomSnapshotOptions {
    pub ignore_ids: bool,
}

impl Default for DomSnapshotOptions {
    fn default() -> Self {
        Self { ignore_ids: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSnapshot {
    lines: Vec<String>,
}

impl DomSnapshot {
    pub fn new(root: &Node, options: DomSnapshotOptions) -> Self {
        let mut lines = Vec::new();
        walk_snapshot(root, &options, &mut lines);
        Self { lines }
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for DomSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Panics with both renderings and the first differing line when the trees differ.
pub fn assert_dom_eq(expected: &Node, actual: &Node, options: DomSnapshotOptions) {
    let expected = DomSnapshot::new(expected, options);
    let actual = DomSnapshot::new(actual, options);
    if expected == actual {
        return;
    }
    let first_diff = expected
        .as_lines()
        .iter()
        .zip(actual.as_lines())
        .position(|(e, a)| e != a)
        .unwrap_or(expected.as_lines().len().min(actual.as_lines().len()));
    panic!(
        "DOM mismatch at line {}\nexpected:\n{}\nactual:\n{}",
        first_diff + 1,
        expected,
        actual
    );
}

fn walk_snapshot(root: &Node, options: &DomSnapshotOptions, out: &mut Vec<String>) {
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let mut line = " ".repeat(depth * 2);
        write_node_line(&mut line, node, options);
        out.push(line);
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
}

fn write_node_line(out: &mut String, node: &Node, options: &DomSnapshotOptions) {
    match node {
        Node::Document { doctype, .. } => {
            out.push_str("#document");
            if let Some(dt) = doctype {
                out.push_str(" doctype=\"");
                write_escaped(out, dt);
                out.push('"');
            }
        }
        Node::Element {
            name, attributes, ..
        } => {
            out.push('<');
            out.push_str(name);
            for (attr, value) in attributes {
                out.push(' ');
                out.push_str(attr);
                if let Some(value) = value {
                    out.push_str("=\"");
                    write_escaped(out, value);
                    out.push('"');
                }
            }
            out.push('>');
        }
        Node::Text { text, .. } => {
            out.push('"');
            write_escaped(out, text);
            out.push('"');
        }
        Node::Comment { text, .. } => {
            out.push_str("<!-- ");
            write_escaped(out, text);
            out.push_str(" -->");
        }
    }
    if !options.ignore_ids {
        let _ = write!(out, " #{}", node.id().0);
    }
}

fn write_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ if ch.is_ascii() => out.push(ch),
            _ => {
                let _ = write!(out, "\\u{{{:X}}}", ch as u32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DomSnapshot, DomSnapshotOptions, assert_dom_eq};
    use crate::parse_document;

    #[test]
    fn snapshot_lines_are_indented() {
        let dom = parse_document(r#"<div id="main"><p>hi</p></div>"#);
        let snapshot = DomSnapshot::new(&dom, DomSnapshotOptions::default());
        assert_eq!(
            snapshot.as_lines(),
            &[
                "#document".to_string(),
                "  <div id=\"main\">".to_string(),
                "    <p>".to_string(),
                "      \"hi\"".to_string(),
            ]
        );
    }

    #[test]
    fn ids_can_be_included() {
        let dom = parse_document("<p></p>");
        let snapshot = DomSnapshot::new(&dom, DomSnapshotOptions { ignore_ids: false });
        assert_eq!(snapshot.render(), "#document #1\n  <p> #2");
    }

    #[test]
    fn dom_eq_ignores_ids_by_default() {
        let expected = parse_document("<div>hi</div>");
        let mut actual = parse_document("<span></span><div>hi</div>");
        if let Some(children) = actual.children_mut() {
            children.remove(0);
        }
        assert_dom_eq(&expected, &actual, DomSnapshotOptions::default());
    }

    #[test]
    #[should_panic(expected = "DOM mismatch at line 3")]
    fn dom_mismatch_points_to_text() {
        let expected = parse_document("<p>a</p>");
        let actual = parse_document("<p>b</p>");
        assert_dom_eq(&expected, &actual, DomSnapshotOptions::default());
    }
}

use crate::Node;
use crate::tokenizer::{is_rawtext_element, is_void_element};

/// Serialize a tree back to HTML markup.
///
/// Attribute values are always double-quoted; valueless attributes are written bare.
/// Text inside `<script>`/`<style>` is emitted verbatim, all other text is escaped.
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open { node, raw_text: false }];
    while let Some(step) = stack.pop() {
        match step {
            Step::Open { node, raw_text } => write_open(&mut out, &mut stack, node, raw_text),
            Step::Close(name) => {
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }
    out
}

enum Step<'a> {
    Open { node: &'a Node, raw_text: bool },
    Close(&'a str),
}

// Writes everything up to the node's children and schedules them, then its end tag.
fn write_open<'a>(out: &mut String, stack: &mut Vec<Step<'a>>, node: &'a Node, raw_text: bool) {
    match node {
        Node::Document {
            doctype, children, ..
        } => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            schedule_children(stack, children, false);
        }
        Node::Element {
            name,
            attributes,
            children,
            ..
        } => {
            out.push('<');
            out.push_str(name);
            for (key, value) in attributes {
                out.push(' ');
                out.push_str(key);
                if let Some(value) = value {
                    out.push_str("=\"");
                    escape_into(out, value, true);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            stack.push(Step::Close(name));
            schedule_children(stack, children, is_rawtext_element(name));
        }
        Node::Text { text, .. } => {
            if raw_text {
                out.push_str(text);
            } else {
                escape_into(out, text, false);
            }
        }
        Node::Comment { text, .. } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
    }
}

fn schedule_children<'a>(stack: &mut Vec<Step<'a>>, children: &'a [Node], raw_text: bool) {
    stack.extend(
        children
            .iter()
            .rev()
            .map(|node| Step::Open { node, raw_text }),
    );
}

fn escape_into(out: &mut String, value: &str, attribute: bool) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute => out.push_str("&quot;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

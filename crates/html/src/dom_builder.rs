use crate::types::{Id, Node, Token};

/// Build a document tree from a token stream.
///
/// Open elements live on an explicit stack, so nesting depth is bounded by memory rather
/// than by the call stack. End tags close the nearest open element with the same name and
/// everything opened after it; end tags with no matching open element are dropped.
/// Elements still open at the end of input are closed implicitly.
pub fn build_dom(tokens: impl IntoIterator<Item = Token>) -> Node {
    let mut document = Node::Document {
        id: Id::UNASSIGNED,
        doctype: None,
        children: Vec::new(),
    };
    let mut open_elements: Vec<Node> = Vec::new();

    for token in tokens {
        match token {
            Token::Doctype(value) => {
                if let Node::Document { doctype, .. } = &mut document {
                    doctype.get_or_insert(value);
                }
            }
            Token::Comment(text) => append(
                &mut document,
                &mut open_elements,
                Node::Comment {
                    id: Id::UNASSIGNED,
                    text,
                },
            ),
            Token::Text(text) => {
                if !text.is_empty() {
                    append(&mut document, &mut open_elements, Node::text(text));
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let element = Node::Element {
                    id: Id::UNASSIGNED,
                    name,
                    attributes,
                    children: Vec::new(),
                };
                if self_closing {
                    append(&mut document, &mut open_elements, element);
                } else {
                    open_elements.push(element);
                }
            }
            Token::EndTag(name) => {
                let Some(target) = open_elements
                    .iter()
                    .rposition(|open| open.is_element_named(&name))
                else {
                    log::trace!(target: "html.dom_builder", "dropping unmatched end tag </{name}>");
                    continue;
                };
                while open_elements.len() > target {
                    close_current(&mut document, &mut open_elements);
                }
            }
        }
    }

    while !open_elements.is_empty() {
        close_current(&mut document, &mut open_elements);
    }
    document
}

fn append(document: &mut Node, open_elements: &mut [Node], node: Node) {
    let parent = open_elements.last_mut().unwrap_or(document);
    if let Some(children) = parent.children_mut() {
        children.push(node);
    }
}

fn close_current(document: &mut Node, open_elements: &mut Vec<Node>) {
    if let Some(done) = open_elements.pop() {
        append(document, open_elements, done);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;

    #[test]
    fn build_dom_stress_deep_nesting() {
        let depth: usize = 10_000;
        let mut tokens = Vec::with_capacity(depth * 2);
        for _ in 0..depth {
            tokens.push(Token::StartTag {
                name: "div".to_string(),
                attributes: Vec::new(),
                self_closing: false,
            });
        }
        for _ in 0..depth {
            tokens.push(Token::EndTag("div".to_string()));
        }

        let dom = build_dom(tokens);

        let mut current = &dom;
        let mut seen = 0usize;
        loop {
            match current {
                Node::Document { children, .. } => {
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                Node::Element { name, children, .. } => {
                    assert_eq!(name, "div");
                    seen += 1;
                    if seen == depth {
                        assert!(children.is_empty());
                        break;
                    }
                    assert_eq!(children.len(), 1);
                    current = &children[0];
                }
                Node::Text { .. } | Node::Comment { .. } => {
                    panic!("unexpected leaf node before reaching depth");
                }
            }
        }
    }

    #[test]
    fn unmatched_end_tag_is_ignored() {
        let dom = build_dom(tokenize("<div>a</span>b</div>"));
        let div = &dom.children()[0];
        assert_eq!(div.children(), &[Node::text("a"), Node::text("b")]);
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let dom = build_dom(tokenize("<section><p><b>x</section><footer></footer>"));
        let names: Vec<_> = dom.children().iter().filter_map(Node::name).collect();
        assert_eq!(names, vec!["section", "footer"]);
        let p = &dom.children()[0].children()[0];
        assert!(p.is_element_named("p"));
        assert!(p.children()[0].is_element_named("b"));
    }

    #[test]
    fn unclosed_elements_are_closed_at_eof() {
        let dom = build_dom(tokenize("<body><bento-accordion><h2>A"));
        let body = &dom.children()[0];
        let accordion = &body.children()[0];
        assert_eq!(accordion.name(), Some("bento-accordion"));
        assert_eq!(accordion.children()[0].children(), &[Node::text("A")]);
    }
}

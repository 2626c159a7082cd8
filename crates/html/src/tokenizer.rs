//! Practical HTML tokenizer.
//!
//! Tag and attribute names use the ASCII character class `[A-Za-z0-9:_-]` and are
//! lowercased. This is not the HTML5 tokenizer state machine: there is no parse-error
//! recovery beyond skipping bytes that cannot start a token. Custom elements such as
//! `bento-accordion` and `amp-base-carousel` tokenize like any other tag.
//!
//! Known limitations:
//! - Rawtext close-tag scanning (`</script`, `</style`) accepts only ASCII whitespace
//!   before `>`.
//! - Unquoted attribute values end at whitespace, `>` or `/>`.
use crate::entities::decode_entities;
use crate::types::Token;
use memchr::memchr;

const COMMENT_START: &str = "<!--";
const COMMENT_END: &str = "-->";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Elements whose content is raw text up to the matching close tag.
pub fn is_rawtext_element(name: &str) -> bool {
    name.eq_ignore_ascii_case("script") || name.eq_ignore_ascii_case("style")
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn starts_with_ignore_ascii_case_at(haystack: &[u8], start: usize, needle: &[u8]) -> bool {
    haystack
        .get(start..start + needle.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(needle))
}

/// Find `</name` followed by optional ASCII whitespace and `>`.
/// Returns (start of close tag, end after `>`), relative to `haystack`.
fn find_rawtext_close_tag(haystack: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = haystack.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        i += memchr(b'<', &bytes[i..])?;
        if bytes.get(i + 1) == Some(&b'/')
            && starts_with_ignore_ascii_case_at(bytes, i + 2, name.as_bytes())
        {
            let mut k = i + 2 + name.len();
            while k < bytes.len() && bytes[k].is_ascii_whitespace() {
                k += 1;
            }
            if bytes.get(k) == Some(&b'>') {
                return Some((i, k + 1));
            }
        }
        i += 1;
    }
    None
}

struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_char(&mut self) {
        self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    // Slice endpoints only ever land on ASCII bytes, so they stay on UTF-8 boundaries.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }
}

/// Tokenize `input` into a flat token list. Never fails.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut out = Vec::new();
    let mut cur = Cursor::new(input);

    while !cur.at_end() {
        if cur.peek() != Some(b'<') {
            let text = cur.take_while(|b| b != b'<');
            out.push(Token::Text(decode_entities(text)));
            continue;
        }

        let rest = cur.rest();
        if let Some(body) = rest.strip_prefix(COMMENT_START) {
            match body.find(COMMENT_END) {
                Some(end) => {
                    out.push(Token::Comment(body[..end].to_string()));
                    cur.pos += COMMENT_START.len() + end + COMMENT_END.len();
                }
                None => {
                    out.push(Token::Comment(body.to_string()));
                    cur.pos = input.len();
                }
            }
            continue;
        }

        if starts_with_ignore_ascii_case_at(cur.bytes, cur.pos, b"<!doctype") {
            let Some(end) = rest.find('>') else {
                break;
            };
            out.push(Token::Doctype(rest[2..end].trim().to_string()));
            cur.pos += end + 1;
            continue;
        }

        if rest.starts_with("</") {
            cur.pos += 2;
            let name = cur.take_while(is_name_byte).to_ascii_lowercase();
            cur.take_while(|b| b != b'>');
            if !cur.at_end() {
                cur.pos += 1;
            }
            if !name.is_empty() {
                out.push(Token::EndTag(name));
            }
            continue;
        }

        cur.pos += 1;
        let name = cur.take_while(is_name_byte).to_ascii_lowercase();
        if name.is_empty() {
            // A bare `<` that does not open a tag is text.
            out.push(Token::Text("<".to_string()));
            continue;
        }

        let (attributes, explicit_self_closing) = read_attributes(&mut cur);
        let self_closing = explicit_self_closing || is_void_element(&name);
        let rawtext = is_rawtext_element(&name) && !self_closing;
        out.push(Token::StartTag {
            name: name.clone(),
            attributes,
            self_closing,
        });

        if rawtext {
            let rest = cur.rest();
            match find_rawtext_close_tag(rest, &name) {
                Some((start, end)) => {
                    if start > 0 {
                        out.push(Token::Text(rest[..start].to_string()));
                    }
                    out.push(Token::EndTag(name));
                    cur.pos += end;
                }
                None => {
                    // Missing close tag: the remainder is rawtext, closed implicitly.
                    if !rest.is_empty() {
                        out.push(Token::Text(rest.to_string()));
                    }
                    out.push(Token::EndTag(name));
                    cur.pos = input.len();
                }
            }
        }
    }

    log::trace!(target: "html.tokenizer", "tokenized {} bytes into {} tokens", input.len(), out.len());
    merge_adjacent_text(out)
}

fn read_attributes(cur: &mut Cursor<'_>) -> (Vec<(String, Option<String>)>, bool) {
    let mut attributes: Vec<(String, Option<String>)> = Vec::new();
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => return (attributes, false),
            Some(b'>') => {
                cur.pos += 1;
                return (attributes, false);
            }
            Some(b'/') => {
                cur.pos += 1;
                if cur.peek() == Some(b'>') {
                    cur.pos += 1;
                    return (attributes, true);
                }
                continue;
            }
            Some(_) => {}
        }

        let name = cur.take_while(is_name_byte).to_ascii_lowercase();
        if name.is_empty() {
            cur.skip_char();
            continue;
        }

        cur.skip_whitespace();
        let value = if cur.peek() == Some(b'=') {
            cur.pos += 1;
            cur.skip_whitespace();
            Some(read_attribute_value(cur))
        } else {
            None
        };

        // First occurrence wins, matching how browsers treat duplicate attributes.
        if !attributes.iter().any(|(k, _)| *k == name) {
            attributes.push((name, value));
        }
    }
}

fn read_attribute_value(cur: &mut Cursor<'_>) -> String {
    match cur.peek() {
        Some(quote @ (b'"' | b'\'')) => {
            cur.pos += 1;
            let raw = cur.take_while(|b| b != quote);
            if !cur.at_end() {
                cur.pos += 1;
            }
            decode_entities(raw)
        }
        _ => {
            let start = cur.pos;
            while let Some(b) = cur.peek() {
                if b.is_ascii_whitespace() || b == b'>' {
                    break;
                }
                if b == b'/' && cur.bytes.get(cur.pos + 1) == Some(&b'>') {
                    break;
                }
                cur.pos += 1;
            }
            decode_entities(&cur.input[start..cur.pos])
        }
    }
}

fn merge_adjacent_text(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match (out.last_mut(), token) {
            (Some(Token::Text(prev)), Token::Text(next)) => prev.push_str(&next),
            (_, Token::Text(text)) if text.is_empty() => {}
            (_, token) => out.push(token),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str, attributes: &[(&str, Option<&str>)], self_closing: bool) -> Token {
        Token::StartTag {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            self_closing,
        }
    }

    #[test]
    fn tokenizes_custom_elements_with_attributes() {
        let tokens = tokenize(r#"<BENTO-Accordion id=acc expand-single-section><h2>A</h2></bento-accordion>"#);
        assert_eq!(
            tokens,
            vec![
                start(
                    "bento-accordion",
                    &[("id", Some("acc")), ("expand-single-section", None)],
                    false
                ),
                start("h2", &[], false),
                Token::Text("A".to_string()),
                Token::EndTag("h2".to_string()),
                Token::EndTag("bento-accordion".to_string()),
            ]
        );
    }

    #[test]
    fn void_elements_are_self_closing() {
        let tokens = tokenize(r#"<link rel="stylesheet" href='x.css'>"#);
        assert_eq!(
            tokens,
            vec![start(
                "link",
                &[("rel", Some("stylesheet")), ("href", Some("x.css"))],
                true
            )]
        );
    }

    #[test]
    fn script_body_is_rawtext() {
        let tokens = tokenize("<script>if (a < b) { x = '<p>'; }</SCRIPT >after");
        assert_eq!(
            tokens,
            vec![
                start("script", &[], false),
                Token::Text("if (a < b) { x = '<p>'; }".to_string()),
                Token::EndTag("script".to_string()),
                Token::Text("after".to_string()),
            ]
        );
    }

    #[test]
    fn unterminated_script_is_closed_implicitly() {
        let tokens = tokenize("<script>let x = 1;");
        assert_eq!(tokens.last(), Some(&Token::EndTag("script".to_string())));
    }

    #[test]
    fn doctype_and_comments() {
        let tokens = tokenize("<!DOCTYPE html><!-- note --><p>x</p>");
        assert_eq!(tokens[0], Token::Doctype("DOCTYPE html".to_string()));
        assert_eq!(tokens[1], Token::Comment(" note ".to_string()));
    }

    #[test]
    fn decodes_entities_in_attribute_values() {
        let tokens = tokenize(r#"<a href="?a=1&amp;b=2">x</a>"#);
        assert_eq!(
            tokens[0],
            start("a", &[("href", Some("?a=1&b=2"))], false)
        );
    }

    #[test]
    fn stray_less_than_is_text() {
        let tokens = tokenize("a < b");
        assert_eq!(tokens, vec![Token::Text("a < b".to_string())]);
    }

    #[test]
    fn non_ascii_junk_in_tag_is_skipped() {
        let tokens = tokenize("<div é=1 data-x=ü>ok</div>");
        assert_eq!(
            tokens[0],
            start("div", &[("1", None), ("data-x", Some("ü"))], false)
        );
        assert_eq!(tokens[1], Token::Text("ok".to_string()));
    }

    #[test]
    fn duplicate_attributes_keep_first() {
        let tokens = tokenize(r#"<div id="a" id="b">"#);
        assert_eq!(tokens[0], start("div", &[("id", Some("a"))], false));
    }
}

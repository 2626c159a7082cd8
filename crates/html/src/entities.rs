use memchr::memchr;

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp;", '&'),
    ("lt;", '<'),
    ("gt;", '>'),
    ("quot;", '"'),
    ("apos;", '\''),
    ("nbsp;", '\u{00A0}'),
];

// 0x10FFFF / 1114111
const MAX_HEX_DIGITS: usize = 6;
const MAX_DEC_DIGITS: usize = 7;

/// Decode the small entity subset that shows up in real attribute values and text.
///
/// Named: `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;`. Numeric: `&#123;` and
/// `&#x1F4A9;`, only when semicolon-terminated and naming a Unicode scalar value.
/// Everything else is copied through unchanged.
pub(crate) fn decode_entities(s: &str) -> String {
    let bytes = s.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return s.to_string();
    };

    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut i = first;

    while i < bytes.len() {
        let Some(rel) = memchr(b'&', &bytes[i..]) else {
            out.push_str(&s[i..]);
            break;
        };
        out.push_str(&s[i..i + rel]);
        i += rel;

        match decode_one(&s[i + 1..]) {
            Some((ch, consumed)) => {
                out.push(ch);
                i += 1 + consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }
    out
}

/// Decode one entity body (the text after `&`), returning the char and the bytes consumed.
fn decode_one(rest: &str) -> Option<(char, usize)> {
    if let Some(numeric) = rest.strip_prefix('#') {
        let (digits, radix, prefix_len, max_digits) =
            match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => (hex, 16, 2, MAX_HEX_DIGITS),
                None => (numeric, 10, 1, MAX_DEC_DIGITS),
            };
        let end = digits.find(';')?;
        let body = &digits[..end];
        if body.is_empty()
            || body.len() > max_digits
            || !body.chars().all(|c| c.is_digit(radix))
        {
            return None;
        }
        let scalar = u32::from_str_radix(body, radix).ok()?;
        let ch = char::from_u32(scalar)?;
        return Some((ch, prefix_len + end + 1));
    }

    NAMED_ENTITIES
        .iter()
        .find(|(name, _)| rest.starts_with(name))
        .map(|(name, ch)| (*ch, name.len()))
}

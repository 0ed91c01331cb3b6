//! Character reference decoding for text fields
//!
//! Text bodies pulled out of a level document may still carry the five
//! standard named entities and numeric character references (`&#65;`,
//! `&#x42;`). Decoding runs in two passes: named entities first, then numeric
//! references over the text that came from the document itself. An ampersand
//! produced by `&amp;` is never read as the start of a numeric reference.
//!
//! A malformed numeric reference poisons the whole field: [`decode`] returns
//! `None`, which callers treat as "field absent" rather than "field empty".

/// Named entities and the characters they stand for
const NAMED_ENTITIES: [(&str, char); 5] = [
    ("&quot;", '"'),
    ("&amp;", '&'),
    ("&apos;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

/// Output of the named-entity pass
#[derive(Debug, PartialEq)]
enum Piece<'a> {
    /// Text copied from the document, numeric references still unresolved
    Raw(&'a str),
    /// Character produced by a named entity
    Literal(char),
}

/// Decode a raw text field
///
/// # Returns
/// The decoded text, or `None` if a numeric reference is missing its digits,
/// contains a non-digit, has no closing `;`, or names an invalid code point.
pub fn decode(raw: &str) -> Option<String> {
    let mut decoded = String::with_capacity(raw.len());

    for piece in resolve_named(raw) {
        match piece {
            Piece::Literal(c) => decoded.push(c),
            Piece::Raw(text) => resolve_numeric(text, &mut decoded)?,
        }
    }

    Some(decoded)
}

/// Decode a raw text field, mapping a decoding failure to an empty string
pub fn decode_or_empty(raw: &str) -> String {
    decode(raw).unwrap_or_default()
}

/// First pass: split the text at named entities
fn resolve_named(raw: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut segment_start = 0;
    let mut cursor = 0;

    while let Some(offset) = raw[cursor..].find('&') {
        let at = cursor + offset;
        let tail = &raw[at..];

        match NAMED_ENTITIES.iter().find(|(name, _)| tail.starts_with(name)) {
            Some(&(name, ch)) => {
                if at > segment_start {
                    pieces.push(Piece::Raw(&raw[segment_start..at]));
                }
                pieces.push(Piece::Literal(ch));
                segment_start = at + name.len();
                cursor = segment_start;
            }
            None => cursor = at + 1,
        }
    }

    if segment_start < raw.len() {
        pieces.push(Piece::Raw(&raw[segment_start..]));
    }

    pieces
}

/// Second pass: resolve `&#NNN;` / `&#xHH;` inside a raw segment
fn resolve_numeric(text: &str, out: &mut String) -> Option<()> {
    let mut rest = text;

    while let Some(at) = rest.find("&#") {
        out.push_str(&rest[..at]);

        let body = &rest[at + 2..];
        let end = body.find(';')?;
        let reference = &body[..end];

        let (digits, radix) = match reference.strip_prefix('x') {
            Some(hex) => (hex, 16),
            None => (reference, 10),
        };

        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }

        let code_point = u32::from_str_radix(digits, radix).ok()?;
        out.push(char::from_u32(code_point)?);

        rest = &body[end + 1..];
    }

    out.push_str(rest);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode("&#65;&#x42;").as_deref(), Some("AB"));
        assert_eq!(decode("caf&#233;").as_deref(), Some("café"));
        assert_eq!(decode("&#x1F600;").as_deref(), Some("\u{1F600}"));
    }

    #[test]
    fn test_named_entities() {
        assert_eq!(decode("Tom &amp; Jerry").as_deref(), Some("Tom & Jerry"));
        assert_eq!(
            decode("&lt;b&gt;&quot;hi&quot;&apos;").as_deref(),
            Some("<b>\"hi\"'")
        );
    }

    #[test]
    fn test_escaped_ampersand_is_not_a_reference() {
        assert_eq!(decode("&amp;#65;").as_deref(), Some("&#65;"));
        assert_eq!(decode("&amp;#xZZ;").as_deref(), Some("&#xZZ;"));
    }

    #[test]
    fn test_malformed_references() {
        assert_eq!(decode("&#xZZ;"), None);
        assert_eq!(decode("abc&#65"), None);
        assert_eq!(decode("&#;"), None);
        assert_eq!(decode("&#x;"), None);
        assert_eq!(decode("&#"), None);
        assert_eq!(decode("&#12a;"), None);
        assert_eq!(decode("&#xD800;"), None);
        assert_eq!(decode_or_empty("ok &#xZZ;"), "");
    }

    #[test]
    fn test_plain_and_unknown_text() {
        assert_eq!(decode("").as_deref(), Some(""));
        assert_eq!(decode("no refs here").as_deref(), Some("no refs here"));
        assert_eq!(decode("&foo; & bar").as_deref(), Some("&foo; & bar"));
    }

    #[test]
    fn test_named_pass_pieces() {
        assert_eq!(
            resolve_named("a&amp;b"),
            vec![Piece::Raw("a"), Piece::Literal('&'), Piece::Raw("b")]
        );
        assert_eq!(resolve_named("&lt;"), vec![Piece::Literal('<')]);
    }
}

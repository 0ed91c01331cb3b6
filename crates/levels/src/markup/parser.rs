//! Markup parser
//!
//! Parses the subset of XML that level files use: a declaration, comments,
//! an optional doctype, elements with quoted attributes, text and CDATA.
//! Entity references are left untouched.
//!
//! Line endings are normalized to `\n` first, so `\r\n` and a lone `\r` read
//! the same as `\n` everywhere, text bodies included.
//!
//! Whitespace-only text between child elements is formatting and is dropped.
//! Text in an element with no child elements is kept byte for byte, since
//! older writers left meaningful trailing whitespace there.

use super::{Document, Element, Node};
use crate::{LevelError, Result};
use std::borrow::Cow;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, recognize},
    error::{Error, ErrorKind},
    multi::many0,
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    IResult,
};

/// Parsed opening tag
struct StartTag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, &'a str)>,
    self_closing: bool,
}

/// Parse a complete document
///
/// # Errors
/// Returns [`LevelError::ParseError`] with the 1-based line of the failure
/// when the input is not well-formed or has no root element.
pub fn parse_document(source: &str) -> Result<Document> {
    let normalized = normalize_newlines(source);
    let body: &str = &normalized;
    let body = body.strip_prefix('\u{feff}').unwrap_or(body);
    let mut input = body;
    let mut document = Document::new();

    loop {
        let (rest, _) = multispace0::<&str, Error<&str>>(input)
            .map_err(|e| to_parse_error(body, e))?;
        input = rest;

        if input.is_empty() {
            break;
        }

        let (rest, node) = top_level_node(input).map_err(|e| to_parse_error(body, e))?;
        if let Some(node) = node {
            document.nodes.push(node);
        }
        input = rest;
    }

    if document.root().is_none() {
        return Err(LevelError::ParseError {
            line: line_of(body, body.len()),
            message: "document has no root element".into(),
        });
    }

    Ok(document)
}

/// Parse a single element, e.g. a fragment in a test
pub fn parse_element(source: &str) -> Result<Element> {
    let normalized = normalize_newlines(source);
    let body = normalized.trim();
    element(body)
        .map(|(_, element)| element)
        .map_err(|e| to_parse_error(body, e))
}

/// Replace `\r\n` and lone `\r` with `\n`
fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if !source.contains('\r') {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
}

fn top_level_node(input: &str) -> IResult<&str, Option<Node>> {
    alt((
        map(declaration, |d| Some(Node::Declaration(d.to_string()))),
        map(comment, |c| Some(Node::Comment(c.to_string()))),
        map(doctype, |_| None),
        map(element, |e| Some(Node::Element(e))),
    ))(input)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.')
}

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char)))(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(
        multispace1,
        separated_pair(name, tuple((multispace0, char('='), multispace0)), quoted),
    )(input)
}

fn declaration(input: &str) -> IResult<&str, &str> {
    delimited(tag("<?"), take_until("?>"), tag("?>"))(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!--"), take_until("-->"), tag("-->"))(input)
}

fn doctype(input: &str) -> IResult<&str, &str> {
    delimited(tag("<!DOCTYPE"), take_until(">"), char('>'))(input)
}

fn cdata(input: &str) -> IResult<&str, &str> {
    delimited(tag("<![CDATA["), take_until("]]>"), tag("]]>"))(input)
}

fn text(input: &str) -> IResult<&str, &str> {
    take_while1(|c| c != '<')(input)
}

fn start_tag(input: &str) -> IResult<&str, StartTag<'_>> {
    let (input, (_, name, attributes, _, close)) = tuple((
        char('<'),
        name,
        many0(attribute),
        multispace0,
        alt((tag("/>"), tag(">"))),
    ))(input)?;

    Ok((
        input,
        StartTag {
            name,
            attributes,
            self_closing: close == "/>",
        },
    ))
}

fn end_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("</"), name, pair(multispace0, char('>')))(input)
}

fn content_node(input: &str) -> IResult<&str, Node> {
    alt((
        map(comment, |c| Node::Comment(c.to_string())),
        // CDATA is literal text; store it escaped like any other text body
        map(cdata, |c| Node::Text(super::escape(c))),
        map(element, Node::Element),
        map(text, |t| Node::Text(t.to_string())),
    ))(input)
}

fn element(input: &str) -> IResult<&str, Element> {
    let (mut input, start) = start_tag(input)?;

    let mut element = Element::new(start.name);
    element.attributes = start
        .attributes
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    if start.self_closing {
        return Ok((input, element));
    }

    loop {
        if let Ok((rest, closing)) = end_tag(input) {
            if closing != start.name {
                return Err(nom::Err::Failure(Error::new(input, ErrorKind::Tag)));
            }
            input = rest;
            break;
        }

        let (rest, node) = match content_node(input) {
            Ok(parsed) => parsed,
            Err(nom::Err::Error(_)) => {
                return Err(nom::Err::Failure(Error::new(input, ErrorKind::Eof)));
            }
            Err(failure) => return Err(failure),
        };
        push_content(&mut element.children, node);
        input = rest;
    }

    if element.children.iter().any(|n| matches!(n, Node::Element(_))) {
        element
            .children
            .retain(|n| !matches!(n, Node::Text(t) if t.trim().is_empty()));
    }

    Ok((input, element))
}

/// Append a content node, joining it onto a preceding text run
fn push_content(children: &mut Vec<Node>, node: Node) {
    if let Node::Text(more) = &node {
        if let Some(Node::Text(last)) = children.last_mut() {
            last.push_str(more);
            return;
        }
    }
    children.push(node);
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())].matches('\n').count() + 1
}

fn to_parse_error(source: &str, err: nom::Err<Error<&str>>) -> LevelError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = source.len() - e.input.len();
            let snippet: String = e.input.chars().take(24).collect();
            let message = match e.code {
                ErrorKind::Tag => format!("mismatched closing tag near {:?}", snippet),
                ErrorKind::Eof => format!("unterminated element near {:?}", snippet),
                kind => format!("unexpected input ({:?}) near {:?}", kind, snippet),
            };
            LevelError::ParseError {
                line: line_of(source, offset),
                message,
            }
        }
        nom::Err::Incomplete(_) => LevelError::ParseError {
            line: line_of(source, source.len()),
            message: "unexpected end of document".into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let source = r#"<?xml version="1.0" encoding="UTF-8" standalone="no" ?>
<MapData version="2">
    <!-- Save file -->
    <Data>
        <mapwidth>5</mapwidth>
        <Empty />
    </Data>
</MapData>
"#;

        let doc = parse_document(source).unwrap();
        assert!(matches!(doc.nodes[0], Node::Declaration(_)));

        let root = doc.root().unwrap();
        assert_eq!(root.name, "MapData");
        assert_eq!(root.attr_int("version"), Some(2));
        assert!(matches!(root.children[0], Node::Comment(_)));

        let data = root.child("Data").unwrap();
        assert_eq!(data.elements().count(), 2);
        assert_eq!(data.child("mapwidth").unwrap().raw_text(), Some("5"));
        assert_eq!(data.child("Empty").unwrap().raw_text(), None);
    }

    #[test]
    fn test_text_whitespace_preserved() {
        let element = parse_element("<edentity x=\"1\">intro\n            </edentity>").unwrap();
        assert_eq!(element.raw_text(), Some("intro\n            "));

        let element = parse_element("<edLevelClass tileset='0'> </edLevelClass>").unwrap();
        assert_eq!(element.raw_text(), Some(" "));
    }

    #[test]
    fn test_line_endings_normalized() {
        let element = parse_element("<edentity x=\"1\">terminal1\r\n            </edentity>").unwrap();
        assert_eq!(element.raw_text(), Some("terminal1\n            "));

        let element = parse_element("<Desc1>a\rb\r\n</Desc1>").unwrap();
        assert_eq!(element.raw_text(), Some("a\nb\n"));

        let err = parse_document("<MapData>\r\n<Data>\r\n</Dta>\r\n</MapData>").unwrap_err();
        assert!(matches!(err, LevelError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_entities_left_raw() {
        let element = parse_element("<Title>A &amp; B &#65;</Title>").unwrap();
        assert_eq!(element.raw_text(), Some("A &amp; B &#65;"));
    }

    #[test]
    fn test_cdata_becomes_escaped_text() {
        let element = parse_element("<script><![CDATA[a<b&c]]></script>").unwrap();
        assert_eq!(element.raw_text(), Some("a&lt;b&amp;c"));
    }

    #[test]
    fn test_text_runs_joined() {
        let element = parse_element("<Title>a<![CDATA[&]]>b</Title>").unwrap();
        assert_eq!(element.children.len(), 1);
        assert_eq!(element.raw_text(), Some("a&amp;b"));

        let element = parse_element("<Title>a<!-- note -->b</Title>").unwrap();
        assert_eq!(element.children.len(), 3);
        assert_eq!(element.raw_text(), Some("a"));
    }

    #[test]
    fn test_mismatched_tag() {
        let err = parse_document("<MapData>\n<Data>\n</Dta>\n</MapData>").unwrap_err();
        match err {
            LevelError::ParseError { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unterminated_and_empty() {
        assert!(parse_document("<MapData><Data>").is_err());
        assert!(parse_document("").is_err());
        assert!(parse_document("just text").is_err());
        assert!(parse_document("<?xml version=\"1.0\"?>").is_err());
    }
}

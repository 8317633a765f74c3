//! Reader for `pdftohtml -xml` output.
//!
//! Every `<text>` element becomes one [`Token`]. Inline `<b>`, `<i>` and
//! `<a>` markup is flattened into the element text.

use std::borrow::Cow;

use encoding_rs::WINDOWS_1252;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::Token;

const TEXT_TAG: &[u8] = b"text";

/// Decode converter output, falling back to windows-1252 for non-UTF-8 input.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            log::debug!("Converter output is not UTF-8, decoding as windows-1252");
            WINDOWS_1252.decode(bytes).0
        }
    }
}

/// Read tokens from converter XML.
pub fn read_tokens(bytes: &[u8]) -> Result<Vec<Token>> {
    let xml = decode(bytes);
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().check_end_names = false;

    let mut tokens = Vec::new();
    let mut current: Option<Token> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == TEXT_TAG => {
                current = Some(token_from_element(&e)?);
            }
            Event::End(e) if e.name().as_ref() == TEXT_TAG => {
                if let Some(token) = current.take().filter(|t| !t.text.is_empty()) {
                    tokens.push(token);
                }
            }
            Event::Text(t) => {
                if let Some(token) = current.as_mut() {
                    match t.unescape() {
                        Ok(text) => token.text.push_str(&text),
                        Err(_) => token.text.push_str(&String::from_utf8_lossy(&t)),
                    }
                }
            }
            Event::CData(c) => {
                if let Some(token) = current.as_mut() {
                    token.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(tokens)
}

fn token_from_element(element: &BytesStart<'_>) -> Result<Token> {
    let mut token = Token::default();

    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"top" => token.top = parse_coordinate("top", &value)?,
            b"left" => token.left = parse_coordinate("left", &value)?,
            b"width" => token.width = parse_coordinate("width", &value)?,
            b"height" => token.height = parse_coordinate("height", &value)?,
            b"font" => token.font = value.into_owned(),
            _ => {}
        }
    }

    Ok(token)
}

fn parse_coordinate(name: &str, value: &str) -> Result<i32> {
    value
        .trim()
        .parse::<f64>()
        .map(|v| v.round() as i32)
        .map_err(|_| Error::Conversion(format!("invalid {} attribute: {:?}", name, value)))
}

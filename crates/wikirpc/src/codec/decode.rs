//! XML-RPC decoder.
//!
//! The document is first flattened into open/close/text tokens by
//! `quick-xml`, then walked by a small recursive-descent parser. Whitespace
//! between structural elements is ignored; text inside `<string>` and
//! untyped `<value>` elements is kept verbatim.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{DecodeError, ProtocolError};
use crate::value::{Value, parse_datetime};

use super::{MethodCall, MethodResponse};

pub(super) fn method_response(xml: &str) -> Result<MethodResponse, DecodeError> {
    let mut parser = Parser::new(xml)?;
    parser.open("methodResponse")?;

    let response = match parser.peek_open() {
        Some("params") => {
            parser.open("params")?;
            // A missing <param> is tolerated for void methods
            let value = if parser.peek_open() == Some("param") {
                parser.open("param")?;
                let value = parser.value()?;
                parser.close("param")?;
                value
            } else {
                Value::Nil
            };
            parser.close("params")?;
            MethodResponse::Success(value)
        }
        Some("fault") => {
            parser.open("fault")?;
            let value = parser.value()?;
            parser.close("fault")?;
            MethodResponse::Fault(fault_from_value(value)?)
        }
        _ => return Err(parser.unexpected("<params> or <fault>")),
    };

    parser.close("methodResponse")?;
    parser.finish()?;
    Ok(response)
}

pub(super) fn method_call(xml: &str) -> Result<MethodCall, DecodeError> {
    let mut parser = Parser::new(xml)?;
    parser.open("methodCall")?;
    parser.open("methodName")?;
    let name = parser.text().trim().to_string();
    parser.close("methodName")?;

    let mut params = Vec::new();
    if parser.peek_open() == Some("params") {
        parser.open("params")?;
        while parser.peek_open() == Some("param") {
            parser.open("param")?;
            params.push(parser.value()?);
            parser.close("param")?;
        }
        parser.close("params")?;
    }

    parser.close("methodCall")?;
    parser.finish()?;
    Ok(MethodCall { name, params })
}

fn fault_from_value(value: Value) -> Result<ProtocolError, DecodeError> {
    let mut members = match value {
        Value::Struct(members) => members,
        other => {
            return Err(DecodeError::Unexpected {
                expected: "fault struct".to_string(),
                found: other.type_name().to_string(),
            });
        }
    };

    let code = match members.remove("faultCode") {
        Some(Value::Int(code)) => code,
        Some(Value::Long(code)) => i32::try_from(code).map_err(|_| DecodeError::Scalar {
            kind: "faultCode".to_string(),
            value: code.to_string(),
        })?,
        // some PHP servers send the code as a string
        Some(Value::String(code)) => code.trim().parse().map_err(|_| DecodeError::Scalar {
            kind: "faultCode".to_string(),
            value: code,
        })?,
        _ => {
            return Err(DecodeError::Unexpected {
                expected: "faultCode member".to_string(),
                found: "fault without code".to_string(),
            });
        }
    };

    let message = match members.remove("faultString") {
        Some(Value::String(message)) => message,
        Some(Value::Nil) | None => String::new(),
        Some(other) => other.into_json().to_string(),
    };

    Ok(ProtocolError { code, message })
}

#[derive(Debug, PartialEq)]
enum Token {
    Open(String),
    Close(String),
    Text(String),
}

fn tokenize(xml: &str) -> Result<Vec<Token>, DecodeError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().expand_empty_elements = true;

    let mut tokens = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => tokens.push(Token::Open(element_name(e.local_name().as_ref())?)),
            Event::End(e) => tokens.push(Token::Close(element_name(e.local_name().as_ref())?)),
            Event::Text(e) => push_text(&mut tokens, &e.unescape()?),
            Event::CData(e) => {
                let text = std::str::from_utf8(&e).map_err(|err| DecodeError::Xml {
                    message: err.to_string(),
                })?;
                push_text(&mut tokens, text);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(tokens)
}

fn element_name(raw: &[u8]) -> Result<String, DecodeError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| DecodeError::Xml {
            message: err.to_string(),
        })
}

// Text split by CDATA sections is merged back into one token
fn push_text(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Text(previous)) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push(Token::Text(text.to_string()));
    }
}

/// Deepest array/struct nesting accepted in a document.
pub(crate) const MAX_DEPTH: usize = 128;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(xml: &str) -> Result<Self, DecodeError> {
        Ok(Self {
            tokens: tokenize(xml)?,
            pos: 0,
            depth: 0,
        })
    }

    fn skip_whitespace(&mut self) {
        while let Some(Token::Text(text)) = self.tokens.get(self.pos) {
            if !text.trim().is_empty() {
                break;
            }
            self.pos += 1;
        }
    }

    fn peek_open(&mut self) -> Option<&str> {
        self.skip_whitespace();
        match self.tokens.get(self.pos) {
            Some(Token::Open(name)) => Some(name.as_str()),
            _ => None,
        }
    }

    fn open(&mut self, name: &str) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.tokens.get(self.pos) {
            Some(Token::Open(found)) if found == name => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&format!("<{name}>"))),
        }
    }

    fn close(&mut self, name: &str) -> Result<(), DecodeError> {
        self.skip_whitespace();
        match self.tokens.get(self.pos) {
            Some(Token::Close(found)) if found == name => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.unexpected(&format!("</{name}>"))),
        }
    }

    /// Consume a text token if one is next, without trimming.
    fn text(&mut self) -> String {
        match self.tokens.get(self.pos) {
            Some(Token::Text(text)) => {
                let text = text.clone();
                self.pos += 1;
                text
            }
            _ => String::new(),
        }
    }

    fn finish(&mut self) -> Result<(), DecodeError> {
        self.skip_whitespace();
        if self.pos < self.tokens.len() {
            return Err(self.unexpected("end of document"));
        }
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> DecodeError {
        let found = match self.tokens.get(self.pos) {
            Some(Token::Open(name)) => format!("<{name}>"),
            Some(Token::Close(name)) => format!("</{name}>"),
            Some(Token::Text(text)) => format!("text '{}'", text.trim()),
            None => "end of document".to_string(),
        };
        DecodeError::Unexpected {
            expected: expected.to_string(),
            found,
        }
    }

    fn value(&mut self) -> Result<Value, DecodeError> {
        self.open("value")?;

        // Untyped content is a string
        let raw = self.text();
        if matches!(self.tokens.get(self.pos), Some(Token::Close(name)) if name == "value") {
            self.pos += 1;
            return Ok(Value::String(raw));
        }

        let kind = match self.peek_open() {
            Some(kind) => kind.to_string(),
            None => return Err(self.unexpected("typed value")),
        };
        self.open(&kind)?;
        let value = match kind.as_str() {
            "int" | "i4" => Value::Int(self.scalar(&kind)?),
            "i8" => Value::Long(self.scalar(&kind)?),
            "double" => Value::Double(self.scalar(&kind)?),
            "boolean" => {
                let text = self.text();
                match text.trim() {
                    "1" | "true" => Value::Bool(true),
                    "0" | "false" => Value::Bool(false),
                    _ => return Err(scalar_error(&kind, &text)),
                }
            }
            "string" => Value::String(self.text()),
            "dateTime.iso8601" => {
                let text = self.text();
                Value::DateTime(parse_datetime(&text).ok_or_else(|| scalar_error(&kind, &text))?)
            }
            "base64" => {
                let text = self.text();
                let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                Value::Base64(
                    STANDARD
                        .decode(compact.as_bytes())
                        .map_err(|_| scalar_error(&kind, &text))?,
                )
            }
            "nil" => Value::Nil,
            "array" => self.array()?,
            "struct" => self.structure()?,
            _ => {
                self.pos -= 1;
                return Err(self.unexpected("XML-RPC type"));
            }
        };
        self.close(&kind)?;
        self.close("value")?;
        Ok(value)
    }

    fn scalar<T: std::str::FromStr>(&mut self, kind: &str) -> Result<T, DecodeError> {
        let text = self.text();
        text.trim().parse().map_err(|_| scalar_error(kind, &text))
    }

    fn descend(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(DecodeError::Unexpected {
                expected: format!("nesting depth <= {MAX_DEPTH}"),
                found: format!("depth {}", self.depth),
            });
        }
        Ok(())
    }

    fn array(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut items = Vec::new();
        self.open("data")?;
        while self.peek_open() == Some("value") {
            items.push(self.value()?);
        }
        self.close("data")?;
        self.depth -= 1;
        Ok(Value::Array(items))
    }

    fn structure(&mut self) -> Result<Value, DecodeError> {
        self.descend()?;
        let mut members = BTreeMap::new();
        while self.peek_open() == Some("member") {
            self.open("member")?;
            self.open("name")?;
            let name = self.text();
            self.close("name")?;
            let value = self.value()?;
            self.close("member")?;
            members.insert(name, value);
        }
        self.depth -= 1;
        Ok(Value::Struct(members))
    }
}

fn scalar_error(kind: &str, text: &str) -> DecodeError {
    DecodeError::Scalar {
        kind: kind.to_string(),
        value: text.trim().to_string(),
    }
}

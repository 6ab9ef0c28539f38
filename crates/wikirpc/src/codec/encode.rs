//! XML-RPC encoder.

use std::fmt::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::escape::escape;

use crate::error::ProtocolError;
use crate::value::{DATETIME_WIRE_FORMAT, Value};

const PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub(super) fn method_call(name: &str, params: &[Value]) -> String {
    let mut out = String::with_capacity(128);
    out.push_str(PROLOG);
    out.push_str("<methodCall><methodName>");
    out.push_str(&escape(name));
    out.push_str("</methodName><params>");
    for param in params {
        out.push_str("<param>");
        write_value(&mut out, param);
        out.push_str("</param>");
    }
    out.push_str("</params></methodCall>");
    out
}

pub(super) fn method_response(value: &Value) -> String {
    let mut out = String::with_capacity(128);
    out.push_str(PROLOG);
    out.push_str("<methodResponse><params><param>");
    write_value(&mut out, value);
    out.push_str("</param></params></methodResponse>");
    out
}

pub(super) fn fault_response(fault: &ProtocolError) -> String {
    let body = Value::structure([
        ("faultCode", Value::Int(fault.code)),
        ("faultString", Value::String(fault.message.clone())),
    ]);
    let mut out = String::with_capacity(128);
    out.push_str(PROLOG);
    out.push_str("<methodResponse><fault>");
    write_value(&mut out, &body);
    out.push_str("</fault></methodResponse>");
    out
}

fn write_value(out: &mut String, value: &Value) {
    out.push_str("<value>");
    match value {
        Value::Int(i) => {
            let _ = write!(out, "<int>{i}</int>");
        }
        Value::Long(i) => {
            let _ = write!(out, "<i8>{i}</i8>");
        }
        Value::Bool(b) => {
            let _ = write!(out, "<boolean>{}</boolean>", u8::from(*b));
        }
        Value::String(s) => {
            out.push_str("<string>");
            out.push_str(&escape(s.as_str()));
            out.push_str("</string>");
        }
        Value::Double(f) => {
            let _ = write!(out, "<double>{f}</double>");
        }
        Value::DateTime(dt) => {
            let _ = write!(
                out,
                "<dateTime.iso8601>{}</dateTime.iso8601>",
                dt.format(DATETIME_WIRE_FORMAT)
            );
        }
        Value::Base64(bytes) => {
            out.push_str("<base64>");
            out.push_str(&STANDARD.encode(bytes));
            out.push_str("</base64>");
        }
        Value::Array(items) => {
            out.push_str("<array><data>");
            for item in items {
                write_value(out, item);
            }
            out.push_str("</data></array>");
        }
        Value::Struct(members) => {
            out.push_str("<struct>");
            for (name, member) in members {
                out.push_str("<member><name>");
                out.push_str(&escape(name.as_str()));
                out.push_str("</name>");
                write_value(out, member);
                out.push_str("</member>");
            }
            out.push_str("</struct>");
        }
        Value::Nil => out.push_str("<nil/>"),
    }
    out.push_str("</value>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_with_scalars() {
        let xml = method_call("wiki.getPage", &[Value::from("Start"), Value::Int(0)]);
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><methodCall>\
             <methodName>wiki.getPage</methodName><params>\
             <param><value><string>Start</string></value></param>\
             <param><value><int>0</int></value></param>\
             </params></methodCall>"
        );
    }

    #[test]
    fn call_without_params_keeps_params_element() {
        let xml = method_call("dokuwiki.getVersion", &[]);
        assert!(xml.ends_with("<params></params></methodCall>"));
    }

    #[test]
    fn strings_are_escaped() {
        let xml = method_response(&Value::from("a < b & \"c\""));
        assert!(xml.contains("<string>a &lt; b &amp; &quot;c&quot;</string>"));
    }

    #[test]
    fn fault_document() {
        let xml = fault_response(&ProtocolError::new(401, "nope"));
        assert!(xml.contains("<fault><value><struct>"));
        assert!(xml.contains("<name>faultCode</name><value><int>401</int></value>"));
        assert!(xml.contains("<name>faultString</name><value><string>nope</string></value>"));
    }
}

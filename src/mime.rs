//! Narrow interface onto the external MIME parser (§6).
//!
//! The pipeline never parses RFC 5322 / MIME itself. Everything downstream
//! consumes an [`Email`]: a case-insensitive, order-preserving header map
//! plus a flat, document-order sequence of leaf attachments. The only
//! adapter shipped here wraps the `mail-parser` crate; swap it for a test
//! double by constructing `Email` directly.

use crate::error::DriverError;
use bytes::Bytes;

/// A case-insensitive, order-preserving header multimap.
///
/// `Received` headers keep their source order (oldest-last, as written by
/// successive relays) because the Header Examiner (§4.2) needs to walk them
/// from oldest to newest.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap(Vec<(String, String)>);

impl HeaderMap {
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn getall(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A MIME leaf carrying an optional filename, an optional declared
/// content-type, and the complete bytes of the part.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A parsed email: header map, attachment leaves, and plain-text body parts
/// (the latter feeds the Tokenizer, §4.3 — they are not attachments).
#[derive(Debug, Clone, Default)]
pub struct Email {
    pub headers: HeaderMap,
    pub attachments: Vec<Attachment>,
    pub text_parts: Vec<String>,
}

/// Parse raw RFC 5322 / MIME bytes into an [`Email`] via `mail-parser`.
///
/// Returns [`DriverError::MalformedEnvelope`] only when the envelope itself
/// cannot be parsed at all — per §7 this is the one failure mode that
/// aborts the whole email rather than being isolated to a component.
pub fn parse(raw: &[u8]) -> Result<Email, DriverError> {
    let message = mail_parser::MessageParser::default()
        .parse(raw)
        .ok_or_else(|| DriverError::MalformedEnvelope("unable to parse MIME structure".into()))?;

    let mut headers = HeaderMap::default();
    for header in message.headers() {
        let name = header.name().to_string();
        let value = header
            .value()
            .as_text()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("{:?}", header.value()));
        headers.push(name, value);
    }

    let attachments = message
        .attachments()
        .map(|part| Attachment {
            filename: part.attachment_name().map(|s| s.to_string()),
            content_type: part.content_type().map(content_type_string),
            bytes: Bytes::copy_from_slice(part.contents()),
        })
        .collect();

    let mut text_parts = Vec::new();
    for idx in 0..message.text_body.len() {
        if let Some(body) = message.body_text(idx) {
            text_parts.push(body.into_owned());
        }
    }
    for idx in 0..message.html_body.len() {
        if let Some(body) = message.body_html(idx) {
            text_parts.push(body.into_owned());
        }
    }

    Ok(Email {
        headers,
        attachments,
        text_parts,
    })
}

fn content_type_string(ct: &mail_parser::ContentType) -> String {
    match ct.subtype() {
        Some(sub) => format!("{}/{}", ct.ctype(), sub),
        None => ct.ctype().to_string(),
    }
}

//! OOXML inspector (§4.5): walks the XML looking for `binData` elements
//! that smuggle an ActiveMime-wrapped OLE document.

use std::io::Read;

use base64::Engine;
use flate2::read::ZlibDecoder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use serde::Serialize;

use super::ole::{self, OleReport};

const EDITDATA_MARKER: &str = "editdata.mso";
const ACTIVE_MIME_OFFSET: usize = 0x32;

#[derive(Debug, Clone, Default, Serialize)]
pub struct OoxmlReport {
    pub is_suspicious: bool,
    pub reason: Option<String>,
    pub indicators: u32,
    pub embedded_ole: Option<OleReport>,
}

pub fn inspect(bytes: &[u8]) -> OoxmlReport {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut want_text_for_bin_data = false;
    let mut report = OoxmlReport::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Err(_) => {
                return OoxmlReport {
                    is_suspicious: false,
                    reason: Some("Unable to open the (OO)XML document".to_string()),
                    indicators: 0,
                    embedded_ole: None,
                };
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let local = String::from_utf8_lossy(name.as_ref());
                if !local.contains("binData") {
                    continue;
                }
                let has_editdata = e.attributes().flatten().any(|attr| {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    key.ends_with("name")
                        && attr
                            .unescape_value()
                            .map(|v| v.contains(EDITDATA_MARKER))
                            .unwrap_or(false)
                });
                if has_editdata {
                    want_text_for_bin_data = true;
                }
            }
            Ok(Event::Text(text)) if want_text_for_bin_data => {
                want_text_for_bin_data = false;
                let raw_text = text.unescape().unwrap_or_default().to_string();
                match process_bin_data(raw_text.trim()) {
                    BinDataOutcome::NotActiveMime => {}
                    BinDataOutcome::DecodeFailed => {
                        report.is_suspicious = true;
                        report.reason = Some("pretends to be XML embedded binary, but decoding failed".to_string());
                        report.indicators += 1;
                        return report;
                    }
                    BinDataOutcome::DecompressFailed => {
                        report.is_suspicious = true;
                        report.reason = Some("pretends to be ActiveMime, but decompression failed".to_string());
                        report.indicators += 1;
                        return report;
                    }
                    BinDataOutcome::Decompressed(ole_bytes) => {
                        let ole_report = ole::inspect(&ole_bytes);
                        report.indicators += ole_report.indicators;
                        report.embedded_ole = Some(ole_report);
                        return report;
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    report
}

enum BinDataOutcome {
    NotActiveMime,
    DecodeFailed,
    DecompressFailed,
    Decompressed(Vec<u8>),
}

fn process_bin_data(base64_text: &str) -> BinDataOutcome {
    let decoded = match base64::engine::general_purpose::STANDARD.decode(base64_text) {
        Ok(bytes) => bytes,
        Err(_) => return BinDataOutcome::DecodeFailed,
    };

    if decoded.len() < 10 || !decoded[..10].windows(b"ActiveMime".len()).any(|w| w == b"ActiveMime") {
        return BinDataOutcome::NotActiveMime;
    }

    if decoded.len() <= ACTIVE_MIME_OFFSET {
        return BinDataOutcome::DecompressFailed;
    }

    let mut decoder = ZlibDecoder::new(&decoded[ACTIVE_MIME_OFFSET..]);
    let mut out = Vec::new();
    match decoder.read_to_end(&mut out) {
        Ok(_) => BinDataOutcome::Decompressed(out),
        Err(_) => BinDataOutcome::DecompressFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_xml_reports_unable_to_open() {
        let report = inspect(b"<unterminated");
        assert_eq!(report.reason.as_deref(), Some("Unable to open the (OO)XML document"));
    }

    #[test]
    fn element_without_editdata_attribute_is_skipped() {
        let xml = br#"<root><w:binData w:name="plain.bin">aGVsbG8=</w:binData></root>"#;
        let report = inspect(xml);
        assert!(!report.is_suspicious);
        assert!(report.embedded_ole.is_none());
    }

    #[test]
    fn invalid_base64_in_editdata_is_flagged() {
        let xml = br#"<root><w:binData w:name="editdata.mso">not-valid-base64!!!</w:binData></root>"#;
        let report = inspect(xml);
        assert!(report.is_suspicious);
        assert_eq!(report.reason.as_deref(), Some("pretends to be XML embedded binary, but decoding failed"));
        assert_eq!(report.indicators, 1);
    }
}

//! OLE compound-document inspector (§4.5).
//!
//! `cfb` opens strictly where the source's `olefile` (with
//! `raise_defects=DEFECT_INCORRECT`) is lenient. We approximate the
//! source's "non-fatal parsing issue" branch: when `cfb` rejects the
//! header outright we still sniff the OLE magic so a document that is
//! *recognizably* OLE but not strictly well-formed is reported as
//! non-fatally broken rather than simply "not OLE".

use std::io::Cursor;

use serde::Serialize;

const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

const MACRO_STREAMS: [&str; 4] = ["macros/vba", "Macros", "_VBA_PROJECT_CUR", "VBA"];

#[derive(Debug, Clone, Default, Serialize)]
pub struct OleReport {
    pub is_ole: bool,
    pub is_suspicious: bool,
    pub reason: Option<String>,
    pub indicators: u32,
}

pub fn inspect(bytes: &[u8]) -> OleReport {
    let cursor = Cursor::new(bytes);
    match cfb::CompoundFile::open(cursor) {
        Ok(mut cf) => {
            let mut paths = Vec::new();
            for entry in cf.walk() {
                let path = entry.path().to_string_lossy().replace('\\', "/");
                paths.push(path.trim_start_matches('/').to_string());
            }
            let has_macros = paths.iter().any(|path| MACRO_STREAMS.iter().any(|m| path == m));
            if has_macros {
                OleReport {
                    is_ole: true,
                    is_suspicious: true,
                    reason: Some("contains Macros".to_string()),
                    indicators: 3,
                }
            } else {
                OleReport {
                    is_ole: true,
                    is_suspicious: false,
                    reason: None,
                    indicators: 0,
                }
            }
        }
        Err(_) if bytes.starts_with(&OLE_MAGIC) => OleReport {
            is_ole: true,
            is_suspicious: true,
            reason: Some("Non-fatal parsing issue: header recognized but structure invalid".to_string()),
            indicators: 1,
        },
        Err(_) => OleReport {
            is_ole: false,
            is_suspicious: false,
            reason: Some("Unable to open the OLE document".to_string()),
            indicators: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_ole_bytes_report_unable_to_open() {
        let report = inspect(b"not an ole document at all");
        assert!(!report.is_ole);
        assert_eq!(report.reason.as_deref(), Some("Unable to open the OLE document"));
        assert_eq!(report.indicators, 0);
    }

    #[test]
    fn truncated_ole_header_is_non_fatal() {
        let mut bytes = OLE_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 16]);
        let report = inspect(&bytes);
        assert!(report.is_ole);
        assert!(report.is_suspicious);
        assert_eq!(report.indicators, 1);
    }

    #[test]
    fn nested_macros_vba_stream_is_matched_by_full_path() {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut cf = cfb::CompoundFile::create(&mut cursor).unwrap();
            cf.create_storage("macros").unwrap();
            let mut stream = cf.create_stream("macros/vba").unwrap();
            std::io::Write::write_all(&mut stream, b"Sub AutoOpen()\nEnd Sub\n").unwrap();
        }
        let bytes = cursor.into_inner();
        let report = inspect(&bytes);
        assert!(report.is_suspicious);
        assert_eq!(report.reason.as_deref(), Some("contains Macros"));
        assert_eq!(report.indicators, 3);
    }
}

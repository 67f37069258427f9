//! MIME sniffer (§6): content-type detection for leaf payloads whose
//! declared content-type can't be trusted, via the `infer` crate's
//! magic-byte matchers.

pub trait MimeSniffer: Send + Sync {
    /// Best-guess MIME type for a byte buffer. Always returns something —
    /// falls back to `application/octet-stream`.
    fn sniff(&self, bytes: &[u8]) -> String;
}

const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

#[derive(Debug, Default, Clone, Copy)]
pub struct MagicSniffer;

impl MimeSniffer for MagicSniffer {
    fn sniff(&self, bytes: &[u8]) -> String {
        if let Some(kind) = infer::get(bytes) {
            return kind.mime_type().to_string();
        }
        if bytes.starts_with(&OLE_MAGIC) {
            return "application/x-ole-storage".to_string();
        }
        if std::str::from_utf8(bytes.get(..bytes.len().min(512)).unwrap_or(b"")).is_ok() {
            return "text/plain".to_string();
        }
        "application/octet-stream".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_known_magics() {
        let sniffer = MagicSniffer;
        assert_eq!(sniffer.sniff(b"%PDF-1.4 ..."), "application/pdf");
        assert_eq!(sniffer.sniff(b"PK\x03\x04rest"), "application/zip");
        assert_eq!(sniffer.sniff(b"Rar!\x1a\x07\x00"), "application/vnd.rar");
        assert_eq!(sniffer.sniff(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C, 0]), "application/x-7z-compressed");
    }

    #[test]
    fn falls_back_to_ole_storage_then_octet_stream() {
        let sniffer = MagicSniffer;
        let mut ole = OLE_MAGIC.to_vec();
        ole.extend_from_slice(&[0u8; 16]);
        assert_eq!(sniffer.sniff(&ole), "application/x-ole-storage");

        let junk = [0xFFu8, 0xFE, 0x00, 0x01, 0x02, 0x80, 0x81];
        assert_eq!(sniffer.sniff(&junk), "application/octet-stream");
    }
}

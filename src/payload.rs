//! Payload Processor (C7): runs every independent check over one leaf
//! byte-stream. Each step's failure is isolated from the others (§4.1) —
//! none of this can abort the enclosing email.

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use sha1::{Digest, Sha1};

use crate::config::TriageConfig;
use crate::inspectors::{ole, ooxml, pdf, run_isolated};
use crate::sniff::MimeSniffer;
use crate::urldecode::UrlDecoder;
use crate::virustotal::VirusTotalClient;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum InspectorResult {
    Ole(ole::OleReport),
    Pdf(pdf::PdfReport),
    Ooxml(ooxml::OoxmlReport),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PayloadReport {
    pub filename: Option<String>,
    pub is_suspicious: bool,
    pub reason: Option<String>,
    pub sha1: String,
    pub mime_type: String,
    pub urls: Vec<String>,
    pub virustotal: crate::virustotal::VirusTotalReport,
    pub parser_results: Vec<InspectorResult>,
    pub indicators: u32,
}

pub struct PayloadContext<'a> {
    pub config: &'a TriageConfig,
    pub sniffer: &'a dyn MimeSniffer,
    pub decoder: &'a dyn UrlDecoder,
    pub vt: &'a dyn VirusTotalClient,
    pub network_timeout: Duration,
    pub inspector_timeout: Duration,
}

pub async fn process_payload(
    filename: Option<&str>,
    bytes: &Bytes,
    origin_domain: Option<&str>,
    ctx: &PayloadContext<'_>,
) -> PayloadReport {
    let mut report = PayloadReport {
        filename: filename.map(str::to_string),
        sha1: sha1_hex(bytes),
        ..Default::default()
    };

    // 1. extension check
    if let Some(name) = filename {
        let lower = name.to_ascii_lowercase();
        if let Some((_, ext)) = lower.rsplit_once('.') {
            if ctx.config.danger_extensions.contains(ext) {
                report.is_suspicious = true;
                report.reason = Some(format!("is a potentially dangerous file ({name})"));
                report.indicators += 3;
            }
        }
    }

    // 3. mime sniff
    report.mime_type = ctx.sniffer.sniff(bytes);

    // 4. url extraction
    let extraction = crate::urlextract::extract(bytes, origin_domain, &ctx.config.allow_domains, ctx.decoder);
    report.urls = extraction.urls;
    report.indicators += extraction.indicators;

    // 5. virustotal
    match tokio::time::timeout(ctx.network_timeout, ctx.vt.lookup_hash(&report.sha1)).await {
        Ok(Ok(vt_report)) => {
            if vt_report.positives > 0 {
                report.indicators += 3;
            }
            report.virustotal = vt_report;
        }
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "payload-processor: virustotal lookup failed");
            report.virustotal = crate::virustotal::VirusTotalReport::unknown();
        }
        Err(_) => {
            tracing::debug!("payload-processor: virustotal lookup timed out");
            report.virustotal = crate::virustotal::VirusTotalReport::unknown();
        }
    }

    // 6. format inspectors, sequential, fixed order: OLE -> PDF -> OOXML
    let owned = bytes.clone();
    let ole_report = run_isolated(ctx.inspector_timeout, move || ole::inspect(&owned)).await;
    report.indicators += ole_report.indicators;
    report.parser_results.push(InspectorResult::Ole(ole_report));

    let owned = bytes.clone();
    let pdf_report = run_isolated(ctx.inspector_timeout, move || pdf::inspect(&owned)).await;
    report.indicators += pdf_report.indicators;
    report.parser_results.push(InspectorResult::Pdf(pdf_report));

    let owned = bytes.clone();
    let ooxml_report = run_isolated(ctx.inspector_timeout, move || ooxml::inspect(&owned)).await;
    report.indicators += ooxml_report.indicators;
    report.parser_results.push(InspectorResult::Ooxml(ooxml_report));

    report
}

fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_hex_matches_known_vector() {
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }
}

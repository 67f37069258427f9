//! Pipeline Driver (C8): the per-email state machine. Recursion through
//! nested archives is modeled as an explicit, depth-tagged work queue
//! (§9 Design Notes) rather than a recursive async function, so the
//! driver never needs a boxed self-referential future.

use std::collections::{HashSet, VecDeque};

use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::archives::all_unpackers;
use crate::config::TriageConfig;
use crate::error::DriverError;
use crate::headers::examine_headers;
use crate::mime::{self, Attachment};
use crate::payload::{process_payload, PayloadContext};
use crate::rbl::RblClient;
use crate::report::TriageReport;
use crate::sniff::MimeSniffer;
use crate::tokenizer::tokenize;
use crate::urldecode::UrlDecoder;
use crate::virustotal::VirusTotalClient;

struct PendingPayload {
    filename: Option<String>,
    bytes: Bytes,
    depth: u32,
}

/// Orchestrates one email end to end. Owns no per-email mutable state
/// beyond what's local to `process`; safe to share across concurrently
/// processed emails (§5: "nothing is shared between [workers]").
pub struct EmailPipeline {
    config: TriageConfig,
    rbl: Box<dyn RblClient>,
    vt: Box<dyn VirusTotalClient>,
    sniffer: Box<dyn MimeSniffer>,
    decoder: Box<dyn UrlDecoder>,
}

impl EmailPipeline {
    pub fn new(
        config: TriageConfig,
        rbl: Box<dyn RblClient>,
        vt: Box<dyn VirusTotalClient>,
        sniffer: Box<dyn MimeSniffer>,
        decoder: Box<dyn UrlDecoder>,
    ) -> Self {
        Self {
            config,
            rbl,
            vt,
            sniffer,
            decoder,
        }
    }

    pub async fn process(&self, raw_email: &[u8], cancel: Option<&CancellationToken>) -> Result<TriageReport, DriverError> {
        let email = mime::parse(raw_email)?;

        let mut report = TriageReport::default();

        if is_cancelled(cancel) {
            return Ok(report);
        }
        report.headers = examine_headers(&email, self.rbl.as_ref(), self.decoder.as_ref(), self.config.network_timeout).await;
        report.indicators += report.headers.indicators;

        let mut passwords: HashSet<String> = HashSet::new();
        for text in &email.text_parts {
            passwords.extend(tokenize(text));
        }

        if is_cancelled(cancel) {
            return Ok(report);
        }

        let mut queue: VecDeque<PendingPayload> = email
            .attachments
            .into_iter()
            .map(|a: Attachment| PendingPayload {
                filename: a.filename,
                bytes: a.bytes,
                depth: 0,
            })
            .collect();

        let ctx = PayloadContext {
            config: &self.config,
            sniffer: self.sniffer.as_ref(),
            decoder: self.decoder.as_ref(),
            vt: self.vt.as_ref(),
            network_timeout: self.config.network_timeout,
            inspector_timeout: self.config.inspector_timeout,
        };

        let unpackers = all_unpackers();
        let origin_domain = report.headers.origin_domain.clone();

        while let Some(pending) = queue.pop_front() {
            if is_cancelled(cancel) {
                break;
            }

            let mut payload_report = process_payload(pending.filename.as_deref(), &pending.bytes, origin_domain.as_deref(), &ctx).await;

            if pending.depth >= self.config.max_unpack_depth {
                payload_report.indicators += 1;
                report.indicators += payload_report.indicators;
                report.attachments.push(payload_report);
                continue;
            }

            let matching_unpacker = unpackers.iter().find(|u| u.probe(&pending.bytes));

            if let Some(unpacker) = matching_unpacker {
                match unpacker.unpack(&pending.bytes, &passwords) {
                    Ok(archive_report) => {
                        if let Some(found) = &archive_report.password_found {
                            passwords.insert(found.clone());
                        }
                        for (name, content) in archive_report.members {
                            if let Some(bytes) = content {
                                queue.push_back(PendingPayload {
                                    filename: Some(name),
                                    bytes,
                                    depth: pending.depth + 1,
                                });
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "pipeline: archive unpack failed");
                    }
                }
            }

            report.indicators += payload_report.indicators;
            report.attachments.push(payload_report);
        }

        Ok(report)
    }
}

fn is_cancelled(cancel: Option<&CancellationToken>) -> bool {
    cancel.map(|c| c.is_cancelled()).unwrap_or(false)
}

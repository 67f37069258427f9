//! Recursive attachment-triage pipeline for hostile email.
//!
//! ```text
//!   raw email
//!       │
//!       ▼
//!  [mime]  parse envelope + MIME tree
//!       │
//!       ▼
//!  [headers]  Received-chain walk, RBL lookup, From/To, origin domain
//!       │
//!       ▼
//!  [tokenizer]  body text -> candidate archive passwords
//!       │
//!       ▼
//!  [pipeline]  depth-tagged work queue over attachments
//!       │              │
//!       │              ├─▶ [archives::{zip,sevenz,rar}]  unpack, recurse
//!       │              │
//!       └─▶ [payload]  extension check, sha1, sniff, urlextract, virustotal,
//!                      [inspectors::{ole,pdf,ooxml}]
//!       │
//!       ▼
//!  [report]  TriageReport { headers, attachments, indicators }
//! ```
//!
//! Every external system this pipeline touches — MIME parsing, DNS
//! blacklists, VirusTotal, MIME sniffing, registered-domain resolution —
//! sits behind a narrow trait so a caller can substitute a test double
//! without reaching into the pipeline's internals.

pub mod archives;
pub mod config;
pub mod error;
pub mod headers;
pub mod inspectors;
pub mod mime;
pub mod payload;
pub mod pipeline;
pub mod rbl;
pub mod report;
pub mod sniff;
pub mod tokenizer;
pub mod urldecode;
pub mod urlextract;
pub mod virustotal;

pub use config::TriageConfig;
pub use error::DriverError;
pub use pipeline::EmailPipeline;
pub use report::TriageReport;

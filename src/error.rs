//! Error kinds used at the pipeline's two propagation boundaries: driver
//! failures that abort a single email, and component failures that are
//! caught and folded into a default/partial report (see `inspectors::run_isolated`
//! and the per-attachment loop in `pipeline`).

/// Fatal for one email: the envelope itself could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("malformed email envelope: {0}")]
    MalformedEnvelope(String),
}

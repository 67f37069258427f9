//! Archive Unpackers (C6): ZIP, 7z, and RAR behind one `Unpacker` trait
//! and one password-trial contract (§4.6).

pub mod rar;
pub mod sevenz;
pub mod zip;

use std::collections::HashSet;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    SevenZip,
    Rar,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArchiveReport {
    pub password_protected: bool,
    pub password_found: Option<String>,
    #[serde(skip)]
    pub members: Vec<(String, Option<Bytes>)>,
}

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("not a recognizable archive of this kind")]
    NotThisFormat,
    #[error("archive member extraction failed: {0}")]
    Extraction(String),
}

/// One archive format backend. `probe` is a cheap, infallible guess used
/// by the Payload Processor to decide which unpacker to try; `unpack`
/// does the real work and owns the password-trial contract.
pub trait Unpacker: Send + Sync {
    fn kind(&self) -> ArchiveKind;
    fn probe(&self, bytes: &[u8]) -> bool;
    fn unpack(&self, bytes: &[u8], passwords: &HashSet<String>) -> Result<ArchiveReport, ArchiveError>;
}

pub fn all_unpackers() -> Vec<Box<dyn Unpacker>> {
    vec![Box::new(zip::ZipUnpacker), Box::new(sevenz::SevenZipUnpacker), Box::new(rar::RarUnpacker)]
}

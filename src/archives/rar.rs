//! RAR unpacker. `unrar` wraps libunrar, a filesystem-oriented C library,
//! so incoming bytes are spooled to a scoped temp file first and the temp
//! directory is released on every exit path via `tempfile`'s RAII guards.
//!
//! Per §9's resolution of the source's RAR FIXME, per-member reads are
//! implemented for real rather than left as a known gap: each bad-password
//! attempt re-opens the archive with the next candidate, honoring the
//! shared password-trial contract.

use std::collections::HashSet;
use std::io::Write;

use bytes::Bytes;
use tempfile::{tempdir, NamedTempFile};
use unrar::Archive;

use super::{ArchiveError, ArchiveKind, ArchiveReport, Unpacker};

const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";

pub struct RarUnpacker;

impl Unpacker for RarUnpacker {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Rar
    }

    fn probe(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(RAR_MAGIC)
    }

    fn unpack(&self, bytes: &[u8], passwords: &HashSet<String>) -> Result<ArchiveReport, ArchiveError> {
        let mut spool = NamedTempFile::new().map_err(|e| ArchiveError::Extraction(e.to_string()))?;
        spool.write_all(bytes).map_err(|e| ArchiveError::Extraction(e.to_string()))?;
        let archive_path = spool.path();

        let listing = Archive::new(archive_path).open_for_listing().map_err(|_| ArchiveError::NotThisFormat)?;
        let needs_password = listing.into_iter().filter_map(Result::ok).any(|entry| entry.is_encrypted());

        let mut report = ArchiveReport::default();

        if !needs_password {
            report.members = extract_all(archive_path, None)?;
            return Ok(report);
        }

        report.password_protected = true;
        if let Ok(members) = extract_all(archive_path, Some("")) {
            report.members = members;
            return Ok(report);
        }

        for candidate in passwords {
            if let Ok(members) = extract_all(archive_path, Some(candidate)) {
                report.password_found = Some(candidate.clone());
                report.members = members;
                return Ok(report);
            }
        }

        Ok(report)
    }
}

fn extract_all(archive_path: &std::path::Path, password: Option<&str>) -> Result<Vec<(String, Option<Bytes>)>, ArchiveError> {
    let out_dir = tempdir().map_err(|e| ArchiveError::Extraction(e.to_string()))?;

    let opener = match password {
        Some(p) => Archive::with_password(archive_path, p),
        None => Archive::new(archive_path),
    };
    let mut archive = opener.open_for_processing().map_err(|e| ArchiveError::Extraction(e.to_string()))?;

    let mut members = Vec::new();
    while let Some(header) = archive.read_header().map_err(|e| ArchiveError::Extraction(e.to_string()))? {
        let entry_name = header.entry().filename.to_string_lossy().to_string();
        archive = if header.entry().is_file() {
            let (_, next) = header.extract_with_base(out_dir.path()).map_err(|e| ArchiveError::Extraction(e.to_string()))?;
            let extracted_path = out_dir.path().join(&entry_name);
            let content = std::fs::read(&extracted_path).ok().map(Bytes::from);
            members.push((entry_name, content));
            next
        } else {
            header.skip().map_err(|e| ArchiveError::Extraction(e.to_string()))?
        };
    }

    Ok(members)
}

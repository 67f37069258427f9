use std::collections::HashSet;
use std::io::{Cursor, Read};

use bytes::Bytes;

use super::{ArchiveError, ArchiveKind, ArchiveReport, Unpacker};

pub struct ZipUnpacker;

impl Unpacker for ZipUnpacker {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Zip
    }

    fn probe(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(b"PK\x05\x06")
    }

    fn unpack(&self, bytes: &[u8], passwords: &HashSet<String>) -> Result<ArchiveReport, ArchiveError> {
        let cursor = Cursor::new(bytes);
        let mut archive = zip::ZipArchive::new(cursor).map_err(|_| ArchiveError::NotThisFormat)?;

        let mut report = ArchiveReport::default();
        let mut working_password: Option<String> = None;

        for index in 0..archive.len() {
            let name = {
                let entry = archive.by_index_raw(index).map_err(|e| ArchiveError::Extraction(e.to_string()))?;
                entry.name().to_string()
            };

            if report.password_protected && working_password.is_none() {
                report.members.push((name, None));
                continue;
            }

            let content = if let Some(password) = &working_password {
                read_with_password(&mut archive, index, password.as_bytes())
            } else {
                match archive.by_index(index) {
                    Ok(mut entry) => {
                        let mut buf = Vec::new();
                        entry.read_to_end(&mut buf).map_err(|e| ArchiveError::Extraction(e.to_string()))?;
                        Some(buf)
                    }
                    Err(zip::result::ZipError::UnsupportedArchive(msg)) if msg.to_ascii_lowercase().contains("password") => {
                        report.password_protected = true;
                        let mut found = None;
                        for candidate in passwords {
                            if let Some(buf) = read_with_password(&mut archive, index, candidate.as_bytes()) {
                                found = Some((candidate.clone(), buf));
                                break;
                            }
                        }
                        match found {
                            Some((password, buf)) => {
                                report.password_found = Some(password.clone());
                                working_password = Some(password);
                                Some(buf)
                            }
                            None => None,
                        }
                    }
                    Err(e) => return Err(ArchiveError::Extraction(e.to_string())),
                }
            };

            report.members.push((name, content.map(Bytes::from)));
        }

        Ok(report)
    }
}

fn read_with_password(archive: &mut zip::ZipArchive<Cursor<&[u8]>>, index: usize, password: &[u8]) -> Option<Vec<u8>> {
    let mut entry = archive.by_index_decrypt(index, password).ok()?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf).ok()?;
    Some(buf)
}

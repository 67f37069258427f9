use std::collections::HashSet;
use std::io::{Cursor, Read};

use bytes::Bytes;
use sevenz_rust2::Password;

use super::{ArchiveError, ArchiveKind, ArchiveReport, Unpacker};

pub struct SevenZipUnpacker;

const SEVENZ_MAGIC: [u8; 6] = [0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C];

impl Unpacker for SevenZipUnpacker {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::SevenZip
    }

    fn probe(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(&SEVENZ_MAGIC)
    }

    fn unpack(&self, bytes: &[u8], passwords: &HashSet<String>) -> Result<ArchiveReport, ArchiveError> {
        let mut report = ArchiveReport::default();

        match try_open(bytes, Password::empty()) {
            Ok(members) => {
                report.members = members;
                return Ok(report);
            }
            Err(ArchiveError::NotThisFormat) => return Err(ArchiveError::NotThisFormat),
            Err(_) => {}
        }

        report.password_protected = true;
        for candidate in passwords {
            match try_open(bytes, Password::from(candidate.as_str())) {
                Ok(members) => {
                    report.password_found = Some(candidate.clone());
                    report.members = members;
                    return Ok(report);
                }
                Err(_) => continue,
            }
        }

        Ok(report)
    }
}

fn try_open(bytes: &[u8], password: Password) -> Result<Vec<(String, Option<Bytes>)>, ArchiveError> {
    let cursor = Cursor::new(bytes);
    let len = bytes.len() as u64;
    let mut reader = sevenz_rust2::SevenZReader::new(cursor, len, password).map_err(|e| ArchiveError::Extraction(e.to_string()))?;

    let mut members = Vec::new();
    reader
        .for_each_entries(|entry, reader| {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            members.push((entry.name().to_string(), Some(Bytes::from(buf))));
            Ok(true)
        })
        .map_err(|e| ArchiveError::Extraction(e.to_string()))?;

    Ok(members)
}

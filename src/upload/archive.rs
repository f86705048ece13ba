//! ZIP archive walker.
//!
//! Enumerates the entries of an archive and turns each one into an annotated
//! text block. Failures are isolated per entry: a corrupt or undecodable
//! member becomes an error line in the listing and the walk moves on to the
//! next entry.

use super::text::decode_utf8;
use crate::types::{AppError, AppResult};
use std::fmt;
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};
use zip::ZipArchive;

/// Extensions decoded as text without guessing
pub const TEXT_ENTRY_EXTENSIONS: &[&str] = &[
    "txt", "csv", "py", "html", "js", "css", "php", "json", "xml", "c", "cpp", "java", "cs", "rb",
    "go", "ts", "swift", "kt", "rs", "sh", "sql",
];

const LISTING_HEADER: &str = "ZIP Contents:\n";

/// What was recovered from a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Allow-listed extension, decoded as UTF-8
    Text(String),
    /// Unrecognized extension that still decoded as UTF-8
    UnknownExtension(String),
    /// Unrecognized extension with non-UTF-8 content
    Binary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBlock {
    pub name: String,
    pub kind: EntryKind,
}

impl fmt::Display for EntryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EntryKind::Text(content) => write!(f, "\n📄 {}:\n{}\n", self.name, content),
            EntryKind::UnknownExtension(content) => {
                write!(f, "\n📄 {} (unknown extension):\n{}\n", self.name, content)
            }
            EntryKind::Binary => write!(f, "\n⚠️ Binary file skipped: {}\n", self.name),
        }
    }
}

/// Failure confined to one archive entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error reading {name}: {reason}")]
pub struct EntryError {
    pub name: String,
    pub reason: String,
}

impl EntryError {
    fn new(name: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type EntryOutcome = Result<EntryBlock, EntryError>;

/// Per-entry outcomes in archive order (directories excluded)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveListing {
    pub entries: Vec<EntryOutcome>,
}

impl ArchiveListing {
    pub fn errors(&self) -> impl Iterator<Item = &EntryError> {
        self.entries.iter().filter_map(|e| e.as_ref().err())
    }

    pub fn blocks(&self) -> impl Iterator<Item = &EntryBlock> {
        self.entries.iter().filter_map(|e| e.as_ref().ok())
    }

    /// Concatenate all blocks into the text payload
    pub fn render(&self) -> String {
        let mut out = String::from(LISTING_HEADER);
        for entry in &self.entries {
            match entry {
                Ok(block) => out.push_str(&block.to_string()),
                Err(err) => out.push_str(&format!("\n❌ {}\n", err)),
            }
        }
        out
    }
}

/// Walk every entry of a ZIP archive.
///
/// Only an archive that cannot be opened at all is an error; everything
/// after that is recorded per entry.
pub fn walk(bytes: &[u8]) -> AppResult<ArchiveListing> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AppError::Decode(format!("Failed to open zip archive: {e}")))?;

    let mut listing = ArchiveListing {
        entries: Vec::with_capacity(archive.len()),
    };

    for index in 0..archive.len() {
        match read_entry(&mut archive, index) {
            Ok(Some(block)) => listing.entries.push(Ok(block)),
            Ok(None) => {}
            Err(err) => {
                warn!(entry = %err.name, reason = %err.reason, "Skipping unreadable archive entry");
                listing.entries.push(Err(err));
            }
        }
    }

    debug!(
        entries = listing.entries.len(),
        errors = listing.errors().count(),
        "Walked zip archive"
    );
    Ok(listing)
}

/// Read one entry; `None` for directories
fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
) -> Result<Option<EntryBlock>, EntryError> {
    // Raw access skips decompression, so the name survives unsupported methods.
    let (name, is_dir) = {
        let entry = archive
            .by_index_raw(index)
            .map_err(|e| EntryError::new(format!("entry #{index}"), e))?;
        (entry.name().to_string(), entry.is_dir())
    };

    if is_dir {
        return Ok(None);
    }

    let mut file = archive
        .by_index(index)
        .map_err(|e| EntryError::new(&name, e))?;
    let mut raw = Vec::new();
    file.read_to_end(&mut raw)
        .map_err(|e| EntryError::new(&name, e))?;

    decode_entry(name, raw).map(Some)
}

fn decode_entry(name: String, raw: Vec<u8>) -> Result<EntryBlock, EntryError> {
    if is_known_text(&name) {
        let content = decode_utf8(&raw).map_err(|e| EntryError::new(&name, e))?;
        return Ok(EntryBlock {
            name,
            kind: EntryKind::Text(content),
        });
    }

    let kind = match String::from_utf8(raw) {
        Ok(content) => EntryKind::UnknownExtension(content),
        Err(_) => EntryKind::Binary,
    };
    Ok(EntryBlock { name, kind })
}

fn is_known_text(name: &str) -> bool {
    let lower = name.to_lowercase();
    TEXT_ENTRY_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{ext}")))
}

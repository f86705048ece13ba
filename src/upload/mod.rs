//! Upload Normalization
//!
//! Converts an uploaded file into a single [`NormalizedPayload`] that can be
//! attached to the next chat turn.
//!
//! ```text
//! UploadedFile ──► classify() ──► UploadKind
//!                                    │
//!        ┌─────────┬────────┬────────┼────────┬─────────────┐
//!        ▼         ▼        ▼        ▼        ▼             ▼
//!      image     text    tabular    pdf    archive     Unsupported
//!        │         │        │        │        │             │
//!        ▼         └────────┴────┬───┴────────┘             ▼
//!   Image{pixels}           Text{content}        Error{"Unsupported file format"}
//! ```

pub mod archive;
pub mod image;
pub mod pdf;
pub mod tabular;
pub mod text;

pub use archive::{ArchiveListing, EntryBlock, EntryError, EntryKind};

use crate::types::{AppError, AppResult};
use ::image::RgbImage;
use std::path::Path;
use tracing::{debug, info};

/// Image extensions handled by the image extractor
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Plain text plus the source-code allow-list
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "html", "css", "php", "js", "py", "java", "c", "cpp"];

/// Spreadsheet formats rendered as a text table
pub const TABULAR_EXTENSIONS: &[&str] = &["csv", "xlsx"];

pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

pub const ARCHIVE_EXTENSIONS: &[&str] = &["zip"];

/// A file handed over by the UI: raw bytes plus the declared filename
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk fully into memory
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        debug!(name = %name, size = bytes.len(), "Read upload from disk");
        Ok(Self { name, bytes })
    }
}

/// Extractor category selected for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Text,
    Tabular,
    Pdf,
    Archive,
    Unsupported,
}

impl UploadKind {
    /// Extensions routed to this kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => IMAGE_EXTENSIONS,
            UploadKind::Text => TEXT_EXTENSIONS,
            UploadKind::Tabular => TABULAR_EXTENSIONS,
            UploadKind::Pdf => PDF_EXTENSIONS,
            UploadKind::Archive => ARCHIVE_EXTENSIONS,
            UploadKind::Unsupported => &[],
        }
    }

    pub const SUPPORTED: [UploadKind; 5] = [
        UploadKind::Image,
        UploadKind::Text,
        UploadKind::Tabular,
        UploadKind::Pdf,
        UploadKind::Archive,
    ];
}

impl std::fmt::Display for UploadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadKind::Image => write!(f, "image"),
            UploadKind::Text => write!(f, "text"),
            UploadKind::Tabular => write!(f, "tabular"),
            UploadKind::Pdf => write!(f, "pdf"),
            UploadKind::Archive => write!(f, "archive"),
            UploadKind::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Lowercased text after the last `.`; a name without a dot is its own extension
pub fn file_extension(filename: &str) -> String {
    filename
        .rsplit('.')
        .next()
        .unwrap_or(filename)
        .to_lowercase()
}

/// Route a filename to exactly one extractor category
pub fn classify(filename: &str) -> UploadKind {
    let extension = file_extension(filename);
    UploadKind::SUPPORTED
        .into_iter()
        .find(|kind| kind.extensions().contains(&extension.as_str()))
        .unwrap_or(UploadKind::Unsupported)
}

/// Result of processing one upload
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedPayload {
    Image { pixels: RgbImage },
    Text { content: String },
    Error { message: String },
}

impl NormalizedPayload {
    pub fn is_image(&self) -> bool {
        matches!(self, NormalizedPayload::Image { .. })
    }

    /// Short description for status lines and logs
    pub fn summary(&self) -> String {
        match self {
            NormalizedPayload::Image { pixels } => {
                format!("image {}x{}", pixels.width(), pixels.height())
            }
            NormalizedPayload::Text { content } => {
                format!("text, {} chars", content.chars().count())
            }
            NormalizedPayload::Error { message } => format!("error: {}", message),
        }
    }
}

impl From<AppError> for NormalizedPayload {
    fn from(err: AppError) -> Self {
        NormalizedPayload::Error {
            message: err.to_string(),
        }
    }
}

/// Classify the upload and run the matching extractor.
///
/// Unknown extensions are not an error: they produce an `Error` payload.
/// Decode failures abort this upload and are returned to the caller.
pub fn process_upload(file: &UploadedFile) -> AppResult<NormalizedPayload> {
    let kind = classify(&file.name);
    info!(name = %file.name, kind = %kind, size = file.bytes.len(), "Processing upload");

    let payload = match kind {
        UploadKind::Image => NormalizedPayload::Image {
            pixels: image::extract(&file.bytes)?,
        },
        UploadKind::Text => NormalizedPayload::Text {
            content: text::extract(&file.bytes)?,
        },
        UploadKind::Tabular => NormalizedPayload::Text {
            content: tabular::extract(&file.bytes, &file_extension(&file.name))?,
        },
        UploadKind::Pdf => NormalizedPayload::Text {
            content: pdf::extract(&file.bytes)?,
        },
        UploadKind::Archive => NormalizedPayload::Text {
            content: archive::walk(&file.bytes)?.render(),
        },
        UploadKind::Unsupported => NormalizedPayload::from(AppError::UnsupportedFormat),
    };

    debug!(summary = %payload.summary(), "Upload normalized");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_routes_every_declared_extension() {
        for kind in UploadKind::SUPPORTED {
            for ext in kind.extensions() {
                assert_eq!(classify(&format!("file.{}", ext)), kind, "extension {}", ext);
            }
        }
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("Photo.JPG"), UploadKind::Image);
        assert_eq!(classify("report.PDF"), UploadKind::Pdf);
        assert_eq!(classify("data.Xlsx"), UploadKind::Tabular);
    }

    #[test]
    fn test_classify_uses_last_extension() {
        assert_eq!(classify("backup.tar.zip"), UploadKind::Archive);
        assert_eq!(classify("notes.txt.exe"), UploadKind::Unsupported);
    }

    #[test]
    fn test_classify_unknown_extensions() {
        assert_eq!(classify("movie.mp4"), UploadKind::Unsupported);
        assert_eq!(classify("lib.rs"), UploadKind::Unsupported);
        assert_eq!(classify("Makefile"), UploadKind::Unsupported);
    }

    #[test]
    fn test_classify_is_idempotent() {
        for name in ["a.png", "b.csv", "c.unknown", "d.zip"] {
            assert_eq!(classify(name), classify(name));
        }
    }

    #[test]
    fn test_unsupported_upload_yields_error_payload() {
        let file = UploadedFile::new("clip.mp4", vec![0, 1, 2]);
        let payload = process_upload(&file).unwrap();
        assert_eq!(
            payload,
            NormalizedPayload::Error {
                message: "Unsupported file format".to_string()
            }
        );
    }

    #[test]
    fn test_text_upload() {
        let file = UploadedFile::new("main.py", b"print('hi')\n".to_vec());
        let payload = process_upload(&file).unwrap();
        assert_eq!(
            payload,
            NormalizedPayload::Text {
                content: "print('hi')\n".to_string()
            }
        );
    }

    #[test]
    fn test_decode_failure_is_returned() {
        let file = UploadedFile::new("notes.txt", vec![0xC3, 0x28]);
        let err = process_upload(&file).unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[tokio::test]
    async fn test_from_path_reads_name_and_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("table.csv");
        tokio::fs::write(&path, "a,b\n1,2\n").await.unwrap();

        let file = UploadedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "table.csv");
        assert_eq!(file.bytes, b"a,b\n1,2\n");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = UploadedFile::from_path(&dir.path().join("missing.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}

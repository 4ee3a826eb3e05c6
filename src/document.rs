//! Source documents and loading.
//!
//! Two formats are accepted, chosen by extension:
//!
//! - `.txt`: decoded as UTF-8, falling back to Latin-1 when the bytes are not
//!   valid UTF-8. Latin-1 maps every byte to a char, so decoding never fails.
//! - `.pdf`: text extracted with `pdf-extract` (requires the `pdf` feature).
//!   Pages come back separated by form feeds; blank pages are dropped and the
//!   rest joined with a blank line.

use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Portable Document Format.
    Pdf,
    /// Plain text.
    PlainText,
}

impl Format {
    /// Pick the format from a path's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything but `.pdf` and `.txt`.
    ///
    /// ```rust
    /// use paperslab::Format;
    ///
    /// assert_eq!(Format::from_path("paper.PDF").unwrap(), Format::Pdf);
    /// assert_eq!(Format::from_path("notes.txt").unwrap(), Format::PlainText);
    /// assert!(Format::from_path("slides.pptx").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "txt" => Ok(Self::PlainText),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }
}

/// Raw extracted text and the format it came from.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    format: Format,
}

impl Document {
    /// Wrap text that was extracted elsewhere.
    #[must_use]
    pub fn from_text(text: impl Into<String>, format: Format) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }

    /// Read and extract a document from disk.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported extension, an unreadable file, or a PDF that
    /// can't be extracted. The extension is checked before the file is read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = match format {
            Format::PlainText => decode_text(&bytes),
            Format::Pdf => extract_pdf(&bytes)?,
        };
        debug!(path = %path.display(), ?format, chars = text.len(), "loaded document");

        Ok(Self { text, format })
    }

    /// The extracted text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The source format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }
}

/// Decode bytes as UTF-8, or as Latin-1 when they aren't valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}

#[cfg(feature = "pdf")]
fn extract_pdf(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| Error::Pdf(e.to_string()))?;
    Ok(join_pages(&text))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_bytes: &[u8]) -> Result<String> {
    Err(Error::PdfFeatureRequired)
}

/// Drop blank pages and join the rest with a blank line.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn join_pages(text: &str) -> String {
    text.split('\u{c}')
        .filter(|page| !page.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("naïve".as_bytes()), "naïve");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // "café" in Latin-1: 0xE9 is not valid UTF-8 on its own
        assert_eq!(decode_text(&[0x63, 0x61, 0x66, 0xE9]), "café");
    }

    #[test]
    fn test_unsupported_extension() {
        match Format::from_path("paper.docx") {
            Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, "docx"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            Format::from_path("README"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Document::open("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_open_unsupported_before_read() {
        let err = Document::open("/definitely/not/here.doc").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_open_text_file() {
        let path = std::env::temp_dir().join(format!("paperslab-open-{}.txt", std::process::id()));
        std::fs::write(&path, b"Abstract\nSome text.").unwrap();
        let doc = Document::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(doc.text(), "Abstract\nSome text.");
        assert_eq!(doc.format(), Format::PlainText);
    }

    #[test]
    fn test_join_pages() {
        assert_eq!(join_pages("one\u{c}  \n\u{c}two\u{c}"), "one\n\ntwo");
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_pdf_requires_feature() {
        assert!(matches!(extract_pdf(b"%PDF-1.4"), Err(Error::PdfFeatureRequired)));
    }
}

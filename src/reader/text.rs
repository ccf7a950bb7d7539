//! Reader for pre-extracted text dumps

use super::{DocumentReader, ExtractedDocument, ReadError, read_source};
use std::path::Path;

/// Reads UTF-8 text files where pages are separated by form feeds (`\x0C`).
///
/// Useful for re-running analysis over text that was already extracted by another
/// tool, and as a stand-in for PDF parsing in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl PlainTextReader {
    /// Create a new reader
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for PlainTextReader {
    fn read(&self, path: &Path) -> Result<ExtractedDocument, ReadError> {
        let (mut source, bytes) = read_source(path)?;
        let text = String::from_utf8(bytes).map_err(|e| ReadError::extraction(path, e))?;

        source.page_count = text.split('\x0C').count() as u32;
        let text = text.replace('\x0C', "\n");

        Ok(ExtractedDocument { source, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pages_split_on_form_feed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.pdf");
        std::fs::write(&path, "one\x0Ctwo\x0Cthree").unwrap();

        let doc = PlainTextReader::new().read(&path).unwrap();
        assert_eq!(doc.source.page_count, 3);
        assert_eq!(doc.text, "one\ntwo\nthree");
    }

    #[test]
    fn test_invalid_utf8_is_extraction_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.pdf");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = PlainTextReader::new().read(&path).unwrap_err();
        assert!(matches!(err, ReadError::Extraction { .. }));
    }
}

//! PDF reading backed by `lopdf`

use super::{DocumentReader, ExtractedDocument, ReadError, read_source};
use lopdf::Document;
use std::path::Path;
use tracing::{debug, instrument};

/// Reads PDF files with `lopdf`, extracting text page by page
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfReader;

impl LopdfReader {
    /// Create a new reader
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for LopdfReader {
    #[instrument(skip(self))]
    fn read(&self, path: &Path) -> Result<ExtractedDocument, ReadError> {
        let (mut source, bytes) = read_source(path)?;

        let doc = Document::load_mem(&bytes).map_err(|e| ReadError::extraction(path, e))?;

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let mut pages = Vec::with_capacity(page_numbers.len());
        for page_number in &page_numbers {
            let content = doc
                .extract_text(&[*page_number])
                .map_err(|e| ReadError::extraction(path, format!("page {page_number}: {e}")))?;
            pages.push(content);
        }

        source.page_count = page_numbers.len() as u32;
        let text = pages.join("\n");

        debug!(
            "Extracted {} characters from {} pages of {}",
            text.len(),
            source.page_count,
            source.filename
        );

        Ok(ExtractedDocument { source, text })
    }
}

/// Write a minimal PDF with one text line per page
#[cfg(test)]
pub(crate) fn write_sample_pdf(path: &Path, pages: &[&str]) {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_tree = dictionary! {
        "Type" => "Pages",
        "Count" => pages.len() as i64,
        "Kids" => kids,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_reads_page_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("three.pdf");
        let pages = ["First page", "Second page", "Third page"];
        write_sample_pdf(&path, &pages);

        let doc = LopdfReader::new().read(&path).unwrap();
        assert_eq!(doc.source.page_count, 3);
        assert_eq!(doc.source.filename, "three.pdf");
        assert!(doc.source.file_size > 0);
        for page in pages {
            assert!(doc.text.contains(page), "{page:?} missing from {:?}", doc.text);
        }
    }

    #[test]
    fn test_extracts_text_of_every_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("two.pdf");
        write_sample_pdf(&path, &["First page sentence here.", "Second page"]);

        let doc = LopdfReader::new().read(&path).unwrap();
        assert!(doc.text.contains("First page sentence here."), "{:?}", doc.text);
        assert!(doc.text.contains("Second page"), "{:?}", doc.text);
        let first = doc.text.find("First page").unwrap();
        let second = doc.text.find("Second page").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_malformed_pdf_is_extraction_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf at all").unwrap();

        let err = LopdfReader::new().read(&path).unwrap_err();
        assert!(matches!(err, ReadError::Extraction { .. }));
    }

    #[test]
    fn test_empty_pdf_is_file_access_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();

        let err = LopdfReader::new().read(&path).unwrap_err();
        assert!(matches!(err, ReadError::FileAccess { .. }));
    }
}

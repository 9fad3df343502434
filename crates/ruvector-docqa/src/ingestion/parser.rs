//! Document processor: file → ordered text chunks
//!
//! A PDF page, a CSV row, or a whole text file is the unit of retrieval.
//! No size limiting, overlap or normalisation is applied.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FileType;

/// Extracted chunks of one document
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Detected file type
    pub file_type: FileType,
    /// Chunks in source order
    pub chunks: Vec<String>,
}

/// Format dispatcher for PDF, plain text and CSV
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Process a file on disk, dispatching on its extension
    pub fn process_document(path: impl AsRef<Path>) -> Result<ProcessedDocument> {
        let path = path.as_ref();
        let filename = path.to_string_lossy();

        // Reject before touching the filesystem
        Self::supported_type(&filename)?;

        let data = std::fs::read(path)?;
        Self::process_bytes(&filename, &data)
    }

    /// Process an in-memory file; `filename` only selects the format
    pub fn process_bytes(filename: &str, data: &[u8]) -> Result<ProcessedDocument> {
        let file_type = Self::supported_type(filename)?;

        let chunks = match file_type {
            FileType::Pdf => Self::process_pdf(filename, data)?,
            FileType::Txt => Self::process_txt(filename, data)?,
            FileType::Csv => Self::process_csv(filename, data)?,
            FileType::Unknown => return Err(Self::unsupported(filename)),
        };

        tracing::debug!(
            "Extracted {} chunk(s) from '{}' ({})",
            chunks.len(),
            filename,
            file_type.display_name()
        );

        Ok(ProcessedDocument { file_type, chunks })
    }

    /// File type selected by `filename`'s extension, if it can be processed
    pub fn supported_type(filename: &str) -> Result<FileType> {
        let file_type = FileType::from_filename(filename);
        if file_type.is_supported() {
            Ok(file_type)
        } else {
            Err(Self::unsupported(filename))
        }
    }

    fn unsupported(filename: &str) -> Error {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext.is_empty() {
            Error::UnsupportedFileType(format!("'{}' has no extension", filename))
        } else {
            Error::UnsupportedFileType(ext)
        }
    }

    /// One string per page; pages without text yield ""
    fn process_pdf(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        match Self::pdf_pages(data) {
            Ok(pages) => Ok(pages),
            Err(page_err) => {
                tracing::warn!(
                    "Per-page extraction failed for '{}' ({}), extracting whole document",
                    filename,
                    page_err
                );
                let text = pdf_extract::extract_text_from_mem(data)
                    .map_err(|e| Error::file_parse(filename, e.to_string()))?;
                Ok(vec![text])
            }
        }
    }

    fn pdf_pages(data: &[u8]) -> std::result::Result<Vec<String>, lopdf::Error> {
        let doc = lopdf::Document::load_mem(data)?;
        let pages = doc.get_pages();

        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            texts.push(doc.extract_text(&[*page_number])?);
        }
        Ok(texts)
    }

    /// Whole file as a single UTF-8 string
    fn process_txt(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        let content = std::str::from_utf8(data)
            .map_err(|e| Error::file_parse(filename, format!("invalid UTF-8: {}", e)))?;
        Ok(vec![content.to_string()])
    }

    /// One string per row, fields joined by a single space
    fn process_csv(filename: &str, data: &[u8]) -> Result<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            rows.push(record.iter().collect::<Vec<_>>().join(" "));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_txt_is_single_chunk() {
        let doc = DocumentProcessor::process_bytes(
            "notes.txt",
            "Paris is the capital of France.\nBerlin is in Germany.".as_bytes(),
        )
        .unwrap();
        assert_eq!(doc.file_type, FileType::Txt);
        assert_eq!(
            doc.chunks,
            vec!["Paris is the capital of France.\nBerlin is in Germany.".to_string()]
        );
    }

    #[test]
    fn test_txt_rejects_invalid_utf8() {
        let err = DocumentProcessor::process_bytes("bad.txt", &[0x66, 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }

    #[test]
    fn test_csv_rows_joined_by_space() {
        let data = "city,country\nParis,France\n\"New York\",USA,extra\n";
        let doc = DocumentProcessor::process_bytes("cities.CSV", data.as_bytes()).unwrap();
        assert_eq!(doc.file_type, FileType::Csv);
        assert_eq!(
            doc.chunks,
            vec![
                "city country".to_string(),
                "Paris France".to_string(),
                "New York USA extra".to_string(),
            ]
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = DocumentProcessor::process_bytes("slides.pptx", b"whatever").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(ref ext) if ext == "pptx"));

        let err = DocumentProcessor::process_bytes("Makefile", b"all:").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn test_unsupported_path_is_rejected_before_reading() {
        let err = DocumentProcessor::process_document("/definitely/missing/file.docx").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFileType(_)));
    }

    #[test]
    fn test_process_document_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capital.txt");
        std::fs::write(&path, "Paris is the capital of France.").unwrap();

        let doc = DocumentProcessor::process_document(&path).unwrap();
        assert_eq!(doc.chunks, vec!["Paris is the capital of France.".to_string()]);
    }

    #[test]
    fn test_pdf_one_chunk_per_page_in_order() {
        let pdf = build_pdf(&["First page text", "Second page text"]);
        let doc = DocumentProcessor::process_bytes("two.pdf", &pdf).unwrap();

        assert_eq!(doc.file_type, FileType::Pdf);
        assert_eq!(doc.chunks.len(), 2);
        assert!(doc.chunks[0].contains("First"));
        assert!(doc.chunks[1].contains("Second"));
    }

    #[test]
    fn test_corrupt_pdf_is_parse_error() {
        let err = DocumentProcessor::process_bytes("broken.pdf", b"not a pdf at all").unwrap_err();
        assert!(matches!(err, Error::FileParse { .. }));
    }
}

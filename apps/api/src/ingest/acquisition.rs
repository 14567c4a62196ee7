//! Text acquisition: turns an uploaded résumé into plain text.
//!
//! Supported: `.pdf` (via pdf-extract), `.docx` (body paragraphs, then table
//! cells) and `.txt` (lossy UTF-8). Everything else is rejected up front. The
//! scoring code only ever sees the returned string, never the file.

use std::io::{Cursor, Read};
use std::path::Path;

use roxmltree::{Document, Node};
use thiserror::Error;
use tracing::{debug, warn};

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("Unsupported file format '{0}'. Supported: PDF, DOCX, TXT")]
    UnsupportedFormat(String),

    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("No text could be extracted from the document")]
    EmptyText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Detects the format from the file extension, case-insensitively.
    pub fn from_file_name(file_name: &str) -> Result<Self, AcquisitionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::PlainText),
            _ => Err(AcquisitionError::UnsupportedFormat(if extension.is_empty() {
                file_name.to_string()
            } else {
                format!(".{extension}")
            })),
        }
    }
}

/// Extracts plain text from an in-memory document named `file_name`.
pub fn acquire_text(file_name: &str, bytes: &[u8]) -> Result<String, AcquisitionError> {
    let format = DocumentFormat::from_file_name(file_name)?;

    let extracted = match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
    };
    let text = extracted.map_err(|e| {
        warn!("{format:?} extraction failed for {file_name}: {e}");
        AcquisitionError::ExtractionFailed(e)
    })?;

    if text.trim().is_empty() {
        return Err(AcquisitionError::EmptyText);
    }

    debug!(
        "Acquired {} chars of text from {file_name} ({format:?})",
        text.len()
    );
    Ok(text)
}

/// pdf-extract panics on some malformed documents; treat that as a failed extraction.
fn extract_pdf(bytes: &[u8]) -> Result<String, String> {
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
        .map_err(|_| "PDF parser aborted on a malformed document".to_string())?
        .map_err(|e| e.to_string())
}

/// Top-level paragraphs one per line, then every table cell on its own line.
fn extract_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| format!("{DOCX_BODY_PART}: {e}"))?
        .read_to_string(&mut xml)
        .map_err(|e| format!("{DOCX_BODY_PART}: {e}"))?;

    let document = Document::parse(&xml).map_err(|e| e.to_string())?;
    let body = document
        .root_element()
        .children()
        .find(|n| is_word(*n, "body"))
        .ok_or_else(|| "document has no body".to_string())?;

    let mut text = word_children(body, "p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n");

    for table in word_children(body, "tbl") {
        for row in word_children(table, "tr") {
            for cell in word_children(row, "tc") {
                text.push('\n');
                text.push_str(&cell_text(cell));
            }
        }
    }

    Ok(text)
}

fn is_word(node: Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORD_NS)
}

fn word_children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |n| is_word(*n, name))
}

/// Run text, including runs nested in hyperlinks. Tab stops in paragraph
/// properties are not runs and contribute nothing.
fn paragraph_text(paragraph: Node<'_, '_>) -> String {
    let mut out = String::new();
    for run in paragraph.descendants().filter(|n| is_word(*n, "r")) {
        for piece in run.children().filter(|n| n.is_element()) {
            if is_word(piece, "t") {
                out.push_str(piece.text().unwrap_or_default());
            } else if is_word(piece, "tab") {
                out.push('\t');
            } else if is_word(piece, "br") || is_word(piece, "cr") {
                out.push('\n');
            }
        }
    }
    out
}

fn cell_text(cell: Node<'_, '_>) -> String {
    word_children(cell, "p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

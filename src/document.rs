//! PDF text extraction.

use crate::error::{Result, ScoutError};
use lopdf::Document;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, instrument};

/// A parsed PDF whose pages can be read in order.
pub struct PdfDocument {
    inner: Document,
}

impl PdfDocument {
    /// Open and parse a PDF. The file handle is released once parsing ends.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let inner = Document::load_from(BufReader::new(file))
            .map_err(|e| ScoutError::Pdf(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn page_count(&self) -> usize {
        self.inner.get_pages().len()
    }

    /// Text of every page, concatenated in page order with no separator.
    pub fn text(&self) -> Result<String> {
        let mut text = String::new();
        // get_pages is keyed by page number, so iteration is in page order.
        for page in self.inner.get_pages().keys() {
            text.push_str(&self.page_text(*page)?);
        }
        Ok(text)
    }

    /// Text of one page, numbered from 1.
    pub fn page_text(&self, page: u32) -> Result<String> {
        self.inner
            .extract_text(&[page])
            .map_err(|e| ScoutError::PdfPage {
                page,
                message: e.to_string(),
            })
    }
}

/// Extract the text of a PDF file.
#[instrument]
pub fn extract_text(path: &Path) -> Result<String> {
    let document = PdfDocument::open(path)?;
    let text = document.text()?;
    debug!(
        "Extracted {} chars from {} page(s)",
        text.len(),
        document.page_count()
    );
    Ok(text)
}

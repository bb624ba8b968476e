// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect serialized PDF documents using the `lopdf`
// crate. Used to check assembled output (page count, page geometry).

use std::path::Path;

use lopdf::{Document, Object};
use pagewerk_core::error::PagewerkError;
use tracing::{debug, info, instrument};

/// PostScript points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Read-only view over an existing PDF file.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PagewerkError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            PagewerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PagewerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            PagewerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Width and height of a page (1-indexed) in millimetres, from its
    /// `/MediaBox`.
    pub fn page_size_mm(&self, page_number: u32) -> Result<(f32, f32), PagewerkError> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            PagewerkError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let media_box = self
            .document
            .get_dictionary(page_id)
            .and_then(|page| page.get(b"MediaBox"))
            .and_then(|object| object.as_array())
            .map_err(|err| {
                PagewerkError::PdfError(format!("page {} has no MediaBox: {}", page_number, err))
            })?;

        let coords: Vec<f32> = media_box.iter().filter_map(number).collect();
        match coords.as_slice() {
            [x0, y0, x1, y1] => Ok(((x1 - x0) / PT_PER_MM, (y1 - y0) / PT_PER_MM)),
            _ => Err(PagewerkError::PdfError(format!(
                "page {} has a malformed MediaBox",
                page_number
            ))),
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_rejects_non_pdf_data() {
        let err = PdfReader::from_bytes(b"this is not a pdf").err().unwrap();
        assert!(matches!(err, PagewerkError::PdfError(_)));
    }

    #[test]
    fn open_missing_file_is_pdf_error() {
        let err = PdfReader::open("/nonexistent/document.pdf").err().unwrap();
        assert!(matches!(err, PagewerkError::PdfError(_)));
    }
}

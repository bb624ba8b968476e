// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagewerk-document — Image and document processing for Pagewerk.
//
// Provides image sources, base64 data URLs, single and batch image resizing
// (fill/cover onto a target surface, JPEG/PNG/WebP output), and assembly of
// image sequences into multi-page PDFs.

pub mod data_url;
pub mod image;
pub mod pdf;
pub mod source;

// Re-export the primary entry points so callers can use
// `pagewerk_document::resize_image` etc.
pub use data_url::DataUrl;
pub use crate::image::processor::ImageProcessor;
pub use crate::image::resize::{ResizedImage, resize_image, resize_multiple, target_dimensions};
pub use pdf::reader::PdfReader;
pub use pdf::writer::{ImageDocument, PageLayout, PlacedImage, images_to_pdf};
pub use source::{ImageFile, ImageSource, PathSource};

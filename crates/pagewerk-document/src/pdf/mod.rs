// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — images-to-PDF assembly and inspection of serialized output.

pub mod reader;
pub mod writer;

pub use reader::PdfReader;
pub use writer::{ImageDocument, PageLayout, PlacedImage, images_to_pdf};

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode/render/encode processor and the resize pipeline.

pub mod processor;
pub mod resize;

pub use processor::ImageProcessor;
pub use resize::{ResizedImage, resize_image, resize_multiple, target_dimensions};

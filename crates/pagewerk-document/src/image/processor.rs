// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, stretch or cover-crop onto a target surface, and
// encode to JPEG/PNG/WebP. Operates on in-memory images using the `image`
// crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use pagewerk_core::OutputFormat;
use pagewerk_core::error::PagewerkError;
use tracing::{debug, instrument};

/// Resampling filter used for every scaling operation.
const FILTER: FilterType = FilterType::Lanczos3;

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`
/// wrapping the result, so calls chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&bytes)?
///     .cover(320, 240)
///     .encode(OutputFormat::Jpeg, 80)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    ///
    /// The format is sniffed from the content, not taken from any name or
    /// declared MIME type.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PagewerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            PagewerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Stretch the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        if (width, height) == (self.width(), self.height()) {
            return self;
        }
        let resized = self.image.resize_exact(width, height, FILTER);
        Self { image: resized }
    }

    /// Scale uniformly by `max(width / w, height / h)` so the whole
    /// `width` x `height` surface is covered, then crop the overflow evenly
    /// from both sides.
    #[instrument(skip(self), fields(width, height))]
    pub fn cover(self, width: u32, height: u32) -> Self {
        let scale = f64::max(
            f64::from(width) / f64::from(self.width()),
            f64::from(height) / f64::from(self.height()),
        );
        debug!(
            from_w = self.width(),
            from_h = self.height(),
            scale,
            "Cover-scaling image"
        );
        let covered = self.image.resize_to_fill(width, height, FILTER);
        Self { image: covered }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image in `format`. `quality` (1-100) only affects
    /// JPEG; PNG and WebP are lossless.
    pub fn encode(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>, PagewerkError> {
        match format {
            OutputFormat::Jpeg => self.to_jpeg_bytes(quality),
            OutputFormat::Png => self.to_png_bytes(),
            OutputFormat::WebP => self.to_webp_bytes(),
        }
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PagewerkError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    /// Any alpha channel is dropped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, PagewerkError> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder).map_err(|err| {
            PagewerkError::ImageError(format!("JPEG encoding failed: {}", err))
        })?;
        Ok(buffer)
    }

    /// Encode the current image as lossless WebP bytes.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>, PagewerkError> {
        // The WebP encoder only accepts 8-bit RGB(A) buffers.
        let rgba = DynamicImage::ImageRgba8(self.image.to_rgba8());
        encode_to_format(&rgba, ImageFormat::WebP)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(
    image: &DynamicImage,
    format: ImageFormat,
) -> Result<Vec<u8>, PagewerkError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image.write_to(&mut cursor, format).map_err(|err| {
        PagewerkError::ImageError(format!("image encoding failed: {}", err))
    })?;
    Ok(buffer)
}

// -- Tests --------------------------------------------------------------------

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resize pipeline — single-image resize and concurrent batch resize.
//
// Reading a source is async; decode, render, and encode are CPU-bound and run
// on tokio's blocking pool so a batch makes progress on all inputs at once.

use futures_util::future::try_join_all;
use pagewerk_core::error::{PagewerkError, Result};
use pagewerk_core::{FitMode, OutputFormat, ResizeOptions};
use tracing::{debug, info, instrument};

use crate::data_url::DataUrl;
use crate::image::processor::ImageProcessor;
use crate::source::ImageSource;

/// An encoded image produced by [`resize_image`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizedImage {
    bytes: Vec<u8>,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl ResizedImage {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Output width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Output height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_data_url(&self) -> DataUrl {
        DataUrl::from_bytes(self.mime_type(), self.bytes.clone())
    }
}

/// Compute the output surface size for a `width` x `height` source.
///
/// Precedence: `percent` scales both sides; otherwise a lone width or height
/// derives the other side from the source aspect ratio when
/// `keep_aspect_ratio` is set; otherwise given sides are used as-is and unset
/// sides keep the source value. Results are rounded to whole pixels, at least 1.
pub fn target_dimensions(width: u32, height: u32, options: &ResizeOptions) -> (u32, u32) {
    let (w, h) = (f64::from(width), f64::from(height));

    let (target_w, target_h) = if let Some(percent) = options.effective_percent() {
        (w * percent / 100.0, h * percent / 100.0)
    } else {
        match (
            options.effective_width(),
            options.effective_height(),
            options.keep_aspect_ratio,
        ) {
            (Some(tw), None, true) => (f64::from(tw), f64::from(tw) * h / w),
            (None, Some(th), true) => (f64::from(th) * w / h, f64::from(th)),
            (tw, th, _) => (tw.map_or(w, f64::from), th.map_or(h, f64::from)),
        }
    };

    (to_pixels(target_w), to_pixels(target_h))
}

fn to_pixels(value: f64) -> u32 {
    if !value.is_finite() {
        return 1;
    }
    value.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

/// Decode, render, and encode already-read bytes. Blocking.
pub fn resize_bytes(data: &[u8], options: &ResizeOptions) -> Result<ResizedImage> {
    let processor = ImageProcessor::from_bytes(data)?;
    let (width, height) = target_dimensions(processor.width(), processor.height(), options);

    debug!(
        from_w = processor.width(),
        from_h = processor.height(),
        width,
        height,
        mode = ?options.mode,
        "Target surface computed"
    );

    // Only cover differs; contain and fill both stretch onto the surface.
    let rendered = match options.mode {
        FitMode::Cover => processor.cover(width, height),
        FitMode::Contain | FitMode::Fill => processor.resize_exact(width, height),
    };

    let bytes = rendered.encode(options.format, options.jpeg_quality())?;
    Ok(ResizedImage {
        bytes,
        format: options.format,
        width,
        height,
    })
}

/// Resize one image source.
///
/// Fails with the read or decode error of the source; nothing is retried.
#[instrument(skip_all, fields(source = source.name()))]
pub async fn resize_image<S>(source: &S, options: &ResizeOptions) -> Result<ResizedImage>
where
    S: ImageSource + ?Sized,
{
    let data = source.read().await?;
    let opts = options.clone();

    let resized = tokio::task::spawn_blocking(move || resize_bytes(&data, &opts))
        .await
        .map_err(|err| {
            PagewerkError::Task(format!("resize of {} did not complete: {}", source.name(), err))
        })??;

    info!(
        width = resized.width(),
        height = resized.height(),
        bytes = resized.len(),
        format = resized.mime_type(),
        "Image resized"
    );
    Ok(resized)
}

/// Resize every source with the same options.
///
/// All resizes start immediately and run concurrently. Results come back in
/// input order regardless of completion order. The first failure fails the
/// whole batch; the remaining in-flight resizes are dropped.
#[instrument(skip_all)]
pub async fn resize_multiple<'a, S, I>(
    sources: I,
    options: &ResizeOptions,
) -> Result<Vec<ResizedImage>>
where
    S: ImageSource + ?Sized + 'a,
    I: IntoIterator<Item = &'a S>,
{
    let pending: Vec<_> = sources
        .into_iter()
        .map(|source| resize_image(source, options))
        .collect();

    info!(count = pending.len(), "Starting batch resize");
    let results = try_join_all(pending).await?;
    info!(count = results.len(), "Batch resize complete");
    Ok(results)
}

// -- Tests --------------------------------------------------------------------

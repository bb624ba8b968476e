// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Pagewerk: resize options, PDF layout options, paper
// sizes, and the enums that select between output formats and fit modes.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PagewerkError;

/// Encoded format of a resized image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "image/jpeg", alias = "jpeg", alias = "jpg")]
    Jpeg,
    #[serde(rename = "image/png", alias = "png")]
    Png,
    /// Lossless WebP. The quality setting is ignored.
    #[serde(rename = "image/webp", alias = "webp")]
    WebP,
}

impl OutputFormat {
    /// MIME type string, as used in data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Preferred file extension (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = PagewerkError;

    /// Accepts short names (`jpeg`, `png`, `webp`) and MIME types.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "webp" | "image/webp" => Ok(Self::WebP),
            other => Err(PagewerkError::UnknownOption(format!(
                "output format '{other}'"
            ))),
        }
    }
}

/// How a source image is reconciled with a differently-shaped target surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Accepted for compatibility; renders exactly like [`FitMode::Fill`].
    #[default]
    Contain,
    /// Scale uniformly until the surface is covered, centre, crop the excess.
    Cover,
    /// Stretch to the target dimensions.
    Fill,
}

impl FromStr for FitMode {
    type Err = PagewerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contain" => Ok(Self::Contain),
            "cover" => Ok(Self::Cover),
            "fill" => Ok(Self::Fill),
            other => Err(PagewerkError::UnknownOption(format!("fit mode '{other}'"))),
        }
    }
}

/// Options for a single resize (and for every member of a batch).
///
/// Sizing precedence: `percent`, then `width`/`height`, then the original
/// dimensions. Zero values count as unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Uniform scale in percent (50.0 halves both sides).
    pub percent: Option<f64>,
    /// Encoder quality in 0.0..=1.0. Only JPEG honours it.
    pub quality: f32,
    pub format: OutputFormat,
    pub keep_aspect_ratio: bool,
    pub mode: FitMode,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            percent: None,
            quality: 0.8,
            format: OutputFormat::Jpeg,
            keep_aspect_ratio: true,
            mode: FitMode::Contain,
        }
    }
}

impl ResizeOptions {
    /// Scale by `percent`, keeping every other default.
    pub fn percent(percent: f64) -> Self {
        Self {
            percent: Some(percent),
            ..Self::default()
        }
    }

    /// Effective percent, if set to a positive value.
    pub fn effective_percent(&self) -> Option<f64> {
        self.percent.filter(|p| *p > 0.0 && p.is_finite())
    }

    /// Effective target width, if set to a non-zero value.
    pub fn effective_width(&self) -> Option<u32> {
        self.width.filter(|w| *w > 0)
    }

    /// Effective target height, if set to a non-zero value.
    pub fn effective_height(&self) -> Option<u32> {
        self.height.filter(|h| *h > 0)
    }

    /// JPEG encoder quality on the 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        let q = if self.quality.is_finite() {
            self.quality.clamp(0.0, 1.0)
        } else {
            0.8
        };
        ((q * 100.0).round() as u8).max(1)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A3,
    A4,
    A5,
    A6,
    B5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Portrait dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::A6 => (105.0, 148.0),
            Self::B5 => (176.0, 250.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Tabloid => (279.4, 431.8),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}

impl Default for PaperSize {
    fn default() -> Self {
        Self::A4
    }
}

impl FromStr for PaperSize {
    type Err = PagewerkError;

    /// Parses a size name (`a4`, `letter`, ...) or `<width>x<height>` in mm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "a3" => Ok(Self::A3),
            "a4" => Ok(Self::A4),
            "a5" => Ok(Self::A5),
            "a6" => Ok(Self::A6),
            "b5" => Ok(Self::B5),
            "letter" => Ok(Self::Letter),
            "legal" => Ok(Self::Legal),
            "tabloid" | "ledger" => Ok(Self::Tabloid),
            other => {
                let custom = other.split_once('x').and_then(|(w, h)| {
                    let width_mm = w.trim().parse::<f32>().ok()?;
                    let height_mm = h.trim().parse::<f32>().ok()?;
                    (width_mm > 0.0 && height_mm > 0.0).then_some(Self::Custom {
                        width_mm,
                        height_mm,
                    })
                });
                custom.ok_or_else(|| PagewerkError::UnknownOption(format!("page size '{other}'")))
            }
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = PagewerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Self::Portrait),
            "landscape" | "l" => Ok(Self::Landscape),
            other => Err(PagewerkError::UnknownOption(format!(
                "orientation '{other}'"
            ))),
        }
    }
}

/// Layout options for images-to-PDF assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfOptions {
    pub page_size: PaperSize,
    /// Uniform page margin in millimetres.
    pub margin: f32,
    pub orientation: Orientation,
    /// Title written to the document metadata.
    pub title: Option<String>,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PaperSize::A4,
            margin: 10.0,
            orientation: Orientation::Portrait,
            title: None,
        }
    }
}

impl PdfOptions {
    /// Page dimensions in millimetres with the orientation applied.
    ///
    /// Landscape puts the longer edge horizontally.
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.page_size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (w.min(h), w.max(h)),
            Orientation::Landscape => (w.max(h), w.min(h)),
        }
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments. Flags given on the command line override the
// defaults loaded from `--config`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pagewerk_core::{FitMode, Orientation, OutputFormat, PaperSize, PdfOptions, ResizeOptions};

#[derive(Debug, Parser)]
#[command(name = "pagewerk", version, about = "Resize images and assemble them into PDFs")]
pub struct Cli {
    /// JSON file with default resize and PDF settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resize a single image.
    Resize {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        resize: ResizeArgs,
    },
    /// Resize several images concurrently into a directory.
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        out_dir: PathBuf,
        #[command(flatten)]
        resize: ResizeArgs,
    },
    /// Assemble images into a PDF, one page per image.
    Pdf {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        layout: PdfArgs,
    },
}

#[derive(Debug, Default, Args)]
pub struct ResizeArgs {
    /// Target width in pixels.
    #[arg(long)]
    pub width: Option<u32>,
    /// Target height in pixels.
    #[arg(long)]
    pub height: Option<u32>,
    /// Uniform scale in percent; wins over width and height.
    #[arg(long)]
    pub percent: Option<f64>,
    /// Encoder quality, 0.0 to 1.0 (JPEG only).
    #[arg(long)]
    pub quality: Option<f32>,
    /// Output format: jpeg, png, webp, or a MIME type.
    #[arg(long)]
    pub format: Option<OutputFormat>,
    /// Use width and height as given instead of deriving one from the other.
    #[arg(long)]
    pub no_keep_aspect_ratio: bool,
    /// Fit mode: contain, cover, or fill.
    #[arg(long)]
    pub mode: Option<FitMode>,
}

impl ResizeArgs {
    pub fn apply(&self, base: ResizeOptions) -> ResizeOptions {
        ResizeOptions {
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            percent: self.percent.or(base.percent),
            quality: self.quality.unwrap_or(base.quality),
            format: self.format.unwrap_or(base.format),
            keep_aspect_ratio: base.keep_aspect_ratio && !self.no_keep_aspect_ratio,
            mode: self.mode.unwrap_or(base.mode),
        }
    }
}

#[derive(Debug, Default, Args)]
pub struct PdfArgs {
    /// Page size name (a4, letter, ...) or WIDTHxHEIGHT in millimetres.
    #[arg(long)]
    pub page_size: Option<PaperSize>,
    /// Uniform page margin in millimetres.
    #[arg(long)]
    pub margin: Option<f32>,
    /// portrait or landscape.
    #[arg(long)]
    pub orientation: Option<Orientation>,
    /// Document title.
    #[arg(long)]
    pub title: Option<String>,
}

impl PdfArgs {
    pub fn apply(&self, base: PdfOptions) -> PdfOptions {
        PdfOptions {
            page_size: self.page_size.unwrap_or(base.page_size),
            margin: self.margin.unwrap_or(base.margin),
            orientation: self.orientation.unwrap_or(base.orientation),
            title: self.title.clone().or(base.title),
        }
    }
}

/// Output file for each batch input: `<out_dir>/<stem>.<ext>`. Repeated stems
/// get a `-2`, `-3`, ... suffix so no output overwrites another.
pub fn batch_output_paths(inputs: &[PathBuf], out_dir: &Path, format: OutputFormat) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let mut candidate = format!("{stem}.{}", format.extension());
            let mut n = 1;
            while !taken.insert(candidate.clone()) {
                n += 1;
                candidate = format!("{stem}-{n}.{}", format.extension());
            }
            out_dir.join(candidate)
        })
        .collect()
}

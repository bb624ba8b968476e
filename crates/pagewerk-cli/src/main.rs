// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagewerk — image resizing and images-to-PDF assembly.
//
// Entry point. Initialises logging, loads configuration, and dispatches the
// selected subcommand.

mod args;

use std::process::ExitCode;

use clap::Parser;
use pagewerk_core::AppConfig;
use pagewerk_core::error::Result;
use pagewerk_document::{PathSource, images_to_pdf, resize_image, resize_multiple};
use tracing::{error, info};

use args::{Cli, Command, batch_output_paths};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Pagewerk failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Resize {
            input,
            output,
            resize,
        } => {
            let options = resize.apply(config.resize);
            let source = PathSource::new(input);
            let resized = resize_image(&source, &options).await?;
            tokio::fs::write(&output, resized.bytes()).await?;
            info!(output = %output.display(), "Wrote resized image");
        }
        Command::Batch {
            inputs,
            out_dir,
            resize,
        } => {
            let options = resize.apply(config.resize);
            let outputs = batch_output_paths(&inputs, &out_dir, options.format);
            let sources: Vec<PathSource> = inputs.into_iter().map(PathSource::new).collect();

            let results = resize_multiple(&sources, &options).await?;

            tokio::fs::create_dir_all(&out_dir).await?;
            for (resized, output) in results.iter().zip(&outputs) {
                tokio::fs::write(output, resized.bytes()).await?;
            }
            info!(
                count = results.len(),
                out_dir = %out_dir.display(),
                "Wrote resized images"
            );
        }
        Command::Pdf {
            inputs,
            output,
            layout,
        } => {
            let options = layout.apply(config.pdf);
            let sources: Vec<PathSource> = inputs.into_iter().map(PathSource::new).collect();

            let document = images_to_pdf(&sources, &options).await?;
            let pages = document.page_count();
            tokio::fs::write(&output, document.into_bytes()).await?;
            info!(pages, output = %output.display(), "Wrote PDF");
        }
    }

    Ok(())
}

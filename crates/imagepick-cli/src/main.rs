//! Imagepick CLI: drive pick flows and the compression ladder from the
//! command line. Selected files stand in for a gallery picker.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use imagepick::{
    CenterCropProvider, FileSelectionProvider, PickFlow, PickOutcome, PickRequest,
};
use imagepick_cli::{init_tracing, parse_aspect};
use imagepick_processing::codec::{self, ImageKind};
use imagepick_processing::{CompressionConstraints, Compressor};

#[derive(Parser)]
#[command(name = "imagepick", about = "Pick, crop and compress images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full pick flow over selected files
    Pick {
        /// Files standing in for the gallery selection
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Center-crop to an aspect ratio, e.g. 1:1 or 16:9
        #[arg(long)]
        aspect: Option<String>,
        /// Max width of the final image (requires --max-height)
        #[arg(long)]
        max_width: Option<u32>,
        /// Max height of the final image (requires --max-width)
        #[arg(long)]
        max_height: Option<u32>,
        /// Max output size in KiB
        #[arg(long)]
        max_size_kb: Option<u64>,
        /// Directory for intermediate and final artifacts
        #[arg(long)]
        save_dir: Option<PathBuf>,
        /// Keep every selected file instead of only the first
        #[arg(long)]
        multiple: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the compression ladder directly on one file
    Compress {
        file: PathBuf,
        /// Max width of the output (requires --max-height)
        #[arg(long)]
        max_width: Option<u32>,
        /// Max height of the output (requires --max-width)
        #[arg(long)]
        max_height: Option<u32>,
        /// Max output size in KiB
        #[arg(long)]
        max_size_kb: Option<u64>,
        /// Directory for the output file
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
    /// Print format, dimensions and byte size of an image
    Probe { file: PathBuf },
}

fn resolution_pair(
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> anyhow::Result<Option<(u32, u32)>> {
    match (max_width, max_height) {
        (Some(width), Some(height)) => Ok(Some((width, height))),
        (None, None) => Ok(None),
        _ => anyhow::bail!("--max-width and --max-height must be given together"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pick {
            files,
            aspect,
            max_width,
            max_height,
            max_size_kb,
            save_dir,
            multiple,
            json,
        } => {
            let mut builder = PickRequest::builder().gallery_only();
            if multiple {
                builder = builder.multiple();
            }
            if let Some(aspect) = aspect {
                let (x, y) = parse_aspect(&aspect)?;
                builder = builder.crop_ratio(x, y);
            }
            if let Some((width, height)) = resolution_pair(max_width, max_height)? {
                builder = builder.max_result_size(width, height);
            }
            if let Some(kb) = max_size_kb {
                builder = builder.compress(kb);
            }
            if let Some(dir) = save_dir {
                builder = builder.save_dir(dir);
            }
            let request = builder.build()?;

            let outcome = PickFlow::new(request, Arc::new(FileSelectionProvider::new(files)))
                .with_crop_provider(Arc::new(CenterCropProvider))
                .run()
                .await?;

            match outcome {
                PickOutcome::Cancelled => println!("Pick cancelled"),
                PickOutcome::Picked(artifacts) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&artifacts)?);
                    } else {
                        for artifact in &artifacts {
                            println!("{}", artifact.path().display());
                        }
                    }
                }
            }
        }
        Commands::Compress {
            file,
            max_width,
            max_height,
            max_size_kb,
            save_dir,
        } => {
            let constraints = CompressionConstraints {
                max_resolution: resolution_pair(max_width, max_height)?,
                max_file_size: max_size_kb.map(|kb| kb * 1024),
            };
            anyhow::ensure!(
                !constraints.is_empty(),
                "set at least one of --max-width/--max-height or --max-size-kb"
            );

            let save_dir = save_dir.unwrap_or_else(std::env::temp_dir);
            let compressor = Compressor::new(constraints, &save_dir);
            if !compressor.is_compression_required(&file)? {
                println!("{} already satisfies the constraints", file.display());
                return Ok(());
            }
            let output = compressor.compress(file).await?;
            println!("{}", output.display());
        }
        Commands::Probe { file } => {
            let (width, height) = codec::probe_dimensions(&file)
                .with_context(|| format!("cannot probe {}", file.display()))?;
            let size = std::fs::metadata(&file)?.len();
            let kind = ImageKind::from_path(&file);
            println!("format: {}", kind.to_mime_type());
            println!("dimensions: {}x{}", width, height);
            println!("size: {} bytes", size);
        }
    }

    Ok(())
}

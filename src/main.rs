use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kurbo::Size;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use folio::config::ViewerConfig;
use folio::doc::loader;
use folio::text::HeuristicTextMeasure;
use folio::view::{Alignment, Viewer};

/// Image/document viewer core driver: opens the given sources, lays them
/// out, and reports the resulting canvas.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Args {
    /// Image files or directories to open as documents
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Layout alignment strategy
    #[arg(long, value_enum)]
    alignment: Option<Alignment>,

    /// Page margin override
    #[arg(long)]
    margin: Option<f64>,

    /// Inter-page spacing override
    #[arg(long)]
    spacing: Option<f64>,

    /// Render target width
    #[arg(long, default_value_t = 600.0)]
    width: f64,

    /// Render target height
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Log file path
    #[arg(long, default_value = "folio.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    WriteLogger::init(
        LevelFilter::Debug,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("failed to create {}", args.log_file.display()))?,
    )?;

    let mut config = ViewerConfig::load_or_default();
    if let Some(alignment) = args.alignment {
        config.alignment = alignment;
    }
    if let Some(margin) = args.margin {
        config.margin = margin;
    }
    if let Some(spacing) = args.spacing {
        config.spacing = spacing;
    }

    let mut viewer = Viewer::new(&config, Box::new(HeuristicTextMeasure));
    viewer.set_render_target_size(Size::new(args.width, args.height));

    for input in &args.inputs {
        let document = if input.is_dir() {
            loader::document_from_dir(input)
        } else {
            loader::document_from_file(input)
        }
        .with_context(|| format!("failed to open {}", input.display()))?;
        info!(
            "opened {:?} ({} pages)",
            document.name(),
            document.page_count()
        );
        viewer.add_document(document);
    }

    let layout = viewer.layout();
    for slot in &layout.slots {
        debug!("page {} -> {:?}", slot.page_index, slot.page_rect);
    }
    println!(
        "{} pages on a {:.0}x{:.0} canvas ({:?})",
        layout.slots.len(),
        layout.canvas.width,
        layout.canvas.height,
        config.alignment,
    );
    Ok(())
}

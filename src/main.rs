//! Board Tags CLI
//!
//! Usage:
//!   board-tags [OPTIONS] --config <FILE> <BOARD>
//!
//! Options:
//!   -c, --config <FILE>        Calibration config (TOML)
//!   -i, --image-size <HxW>     Clamp regions to a frame of this size
//!   -t, --tagged-only          Only list slots that expect a tag
//!       --no-header            Omit the header line
//!   -v, --verbose              Debug logging (overridden by RUST_LOG)
//!   -h, --help                 Print help

use std::path::PathBuf;

use clap::Parser;

use board_tags::{
    extract, render_report, BoardConfig, BoardDescription, FrameExtent, ReportConfig,
};

#[derive(Parser)]
#[command(name = "board-tags")]
#[command(about = "List tag slots of a board layout with their pixel regions and expected labels")]
struct Cli {
    /// Board description (TOML)
    board: PathBuf,

    /// Calibration config (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Frame size as HEIGHTxWIDTH; defaults to the frame the geometry spans
    #[arg(short, long, value_parser = parse_image_size)]
    image_size: Option<FrameExtent>,

    /// Only list slots that expect a tag
    #[arg(short, long)]
    tagged_only: bool,

    /// Omit the header line
    #[arg(long)]
    no_header: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_image_size(value: &str) -> Result<FrameExtent, String> {
    let (height, width) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected HEIGHTxWIDTH, got '{value}'"))?;
    let height: usize = height
        .trim()
        .parse()
        .map_err(|e| format!("invalid height '{height}': {e}"))?;
    let width: usize = width
        .trim()
        .parse()
        .map_err(|e| format!("invalid width '{width}': {e}"))?;
    Ok(FrameExtent::new(height, width))
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match BoardConfig::from_file(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config '{}': {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    let board = match BoardDescription::from_file(&cli.board) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error loading board '{}': {}", cli.board.display(), e);
            std::process::exit(1);
        }
    };

    let image = cli.image_size.unwrap_or_else(|| {
        let (height, width) = config.geometry.frame_size(config.grid);
        FrameExtent::new(height, width)
    });

    let report_config = ReportConfig::new()
        .with_tagged_only(cli.tagged_only)
        .with_no_header(cli.no_header);
    match extract(&image, &board, &config) {
        Ok(cells) => {
            print!("{}", render_report(&cells, &report_config));
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

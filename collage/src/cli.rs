use std::path::PathBuf;

use clap::Parser;

/// Clip weapon, summon and character cards out of screenshots and lay them
/// out as one image.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Screenshots to classify, in collage order.
    #[arg(required_unless_present = "init_config")]
    pub files: Vec<PathBuf>,
    /// Config file (defaults to `collage.json` in the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output PNG. Defaults to `<unix-millis>.png` in the configured output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Write a debug overlay per input (detected rects and divider mask) into this directory.
    #[arg(long)]
    pub overlay_dir: Option<PathBuf>,
    /// Write the effective config to the config path before running.
    #[arg(long)]
    pub init_config: bool,
}

use std::path::PathBuf;

use clap::Parser;

/// Runs a cartridge image with the CPU, timer and display in lock-step.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Cartridge image to run (.gb or .gbc).
    #[arg(long)]
    pub load_rom: PathBuf,

    /// Optional 256-byte bootstrap image. Without one, execution starts
    /// at 0x0100 in the post-boot state.
    #[arg(long)]
    pub boot_rom: Option<PathBuf>,

    // Optional log path, if none given, logs go to stderr.
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Skip terminal rendering and frame pacing.
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
}

pub mod chart;
pub mod completions;
pub mod palette;
pub mod prep;

use clap::{Parser, Subcommand};

/// xstitch - Cross-stitch pattern generator
#[derive(Parser, Debug)]
#[command(name = "xstitch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress progress output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pre-process an image: posterise, trim a gutter, resize
    Prep(prep::PrepArgs),

    /// Render the real-colour key and grid charts for an image
    Chart(chart::ChartArgs),

    /// Inspect, sample or generate palette files
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

//! Chart command implementation.
//!
//! Pixelates an image, quantizes it to a palette and writes the
//! real-colour key, the grid chart and optionally a JSON legend.

use std::path::{Path, PathBuf};

use clap::Args;
use image::DynamicImage;

use crate::config::Config;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{open_image, write_images, BitmapFont, GlyphSource, TrueTypeFont};
use crate::resample::{Filter, FilterKind};
use crate::stitch::CrossStitch;
use crate::types::Palette;

/// Render cross-stitch charts
#[derive(Args, Debug, Default)]
pub struct ChartArgs {
    /// Image to turn into a pattern
    #[arg(required = true)]
    pub image: PathBuf,

    /// Palette file of available thread colours
    #[arg(long, short, required = true)]
    pub palette: PathBuf,

    /// Stitches along the shorter side
    #[arg(long, short = 'm', value_name = "STITCHES")]
    pub min_size: Option<u32>,

    /// Chart pixels per stitch
    #[arg(long, short = 'c', value_name = "PIXELS")]
    pub cell_size: Option<u32>,

    /// Grid line width in pixels (0 for none)
    #[arg(long, value_name = "PIXELS")]
    pub grid_width: Option<u32>,

    /// Dither when matching colours
    #[arg(long)]
    pub dither: bool,

    /// Match colours without dithering, even if the config asks for it
    #[arg(long, conflicts_with = "dither")]
    pub no_dither: bool,

    /// Resampling kernel for every resize
    #[arg(long, value_enum)]
    pub filter: Option<FilterKind>,

    /// TrueType font for symbols (default: builtin bitmap font)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Output path for the real-colour key
    #[arg(long)]
    pub real_color: Option<PathBuf>,

    /// Output path for the grid chart
    #[arg(long)]
    pub grid: Option<PathBuf>,

    /// Also write a JSON legend with stitch counts
    #[arg(long)]
    pub legend: Option<PathBuf>,

    /// Config file (default: ./xstitch.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ChartArgs {
    /// Overlay command-line flags on a config.
    pub fn apply_to(&self, mut config: Config) -> Config {
        if let Some(min_size) = self.min_size {
            config.minimum_size = min_size;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(grid_width) = self.grid_width {
            config.grid_width = grid_width;
        }
        if self.dither {
            config.dither = true;
        }
        if self.no_dither {
            config.dither = false;
        }
        if let Some(font) = &self.font {
            config.font = Some(font.clone());
        }
        if let Some(path) = &self.real_color {
            config.output.real_color = path.clone();
        }
        if let Some(path) = &self.grid {
            config.output.grid = path.clone();
        }
        if let Some(path) = &self.legend {
            config.output.legend = Some(path.clone());
        }
        config
    }
}

pub fn run(args: ChartArgs, printer: &Printer) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => {
            let (config, found) = Config::discover(".")?;
            if let Some(path) = found {
                printer.info("Config", &display_path(&path));
            }
            config
        }
    };
    let config = args.apply_to(config);

    let mut options = config.chart_options();
    if let Some(kind) = args.filter {
        options.filter = Filter::Fixed(kind);
    }

    let glyphs = load_glyphs(config.font.as_deref())?;
    let palette = Palette::load(&args.palette)?;
    printer.status(
        "Loaded",
        &format!(
            "{} from {}",
            plural(palette.len(), "colour", "colours"),
            display_path(&args.palette)
        ),
    );

    let image = open_image(&args.image)?;
    let stitch = CrossStitch::new(&image, palette, &options)?;
    let (width, height) = stitch.grid().size();
    printer.status(
        "Quantized",
        &format!(
            "{} to {}x{} stitches{}",
            display_path(&args.image),
            width,
            height,
            if options.dither { " (dithered)" } else { "" }
        ),
    );

    let charts = stitch.charts(glyphs.as_ref())?;
    let (chart_width, chart_height) = charts.real_color.dimensions();
    let real_color = DynamicImage::ImageRgb8(charts.real_color);
    let grid = DynamicImage::ImageLuma8(charts.grid);
    write_images(&[
        (&real_color, config.output.real_color.as_path()),
        (&grid, config.output.grid.as_path()),
    ])?;
    for path in [&config.output.real_color, &config.output.grid] {
        printer.success(
            "Wrote",
            &format!("{} ({}x{})", display_path(path), chart_width, chart_height),
        );
    }

    let legend = stitch.legend()?;
    if let Some(path) = &config.output.legend {
        legend.write(path)?;
        printer.success(
            "Wrote",
            &format!(
                "{} ({} used)",
                display_path(path),
                plural(legend.entries.len(), "colour", "colours")
            ),
        );
    }

    let unused = stitch.palette().len() - legend.entries.len();
    if unused > 0 {
        printer.info("Unused", &plural(unused, "palette colour", "palette colours"));
    }

    Ok(())
}

fn load_glyphs(font: Option<&Path>) -> Result<Box<dyn GlyphSource>> {
    match font {
        Some(path) => Ok(Box::new(TrueTypeFont::load(path)?)),
        None => Ok(Box::new(BitmapFont)),
    }
}

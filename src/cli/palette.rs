use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use image::RgbImage;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::open_image;
use crate::types::{Colour, Palette};

/// Inspect, sample or generate palette files
#[derive(Args, Debug)]
pub struct PaletteArgs {
    #[command(subcommand)]
    pub command: PaletteCommand,
}

#[derive(Subcommand, Debug)]
pub enum PaletteCommand {
    /// Check a palette file and print it in canonical form
    Show {
        /// Palette file
        file: PathBuf,
    },

    /// Extract a palette from the colours of an image
    Sample {
        /// Image to sample
        file: PathBuf,

        /// Maximum number of colours to output
        #[arg(long)]
        max: Option<usize>,
    },

    /// Generate an evenly stepped RGB palette
    Stepped {
        /// Channel step; must divide 255 (e.g. 0x55, 85, 0xff)
        #[arg(value_parser = parse_step)]
        step: u8,
    },
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let palette = match &args.command {
        PaletteCommand::Show { file } => {
            let palette = Palette::load(file)?;
            printer.status(
                "Checked",
                &format!(
                    "{} ({})",
                    display_path(file),
                    plural(palette.len(), "colour", "colours")
                ),
            );
            palette
        }
        PaletteCommand::Sample { file, max } => {
            let image = open_image(file)?;
            let palette = sample(&image, *max)?;
            printer.status(
                "Sampled",
                &format!(
                    "{} from {}",
                    plural(palette.len(), "colour", "colours"),
                    display_path(file)
                ),
            );
            palette
        }
        PaletteCommand::Stepped { step } => {
            let palette = Palette::stepped(*step)?;
            printer.status(
                "Generated",
                &format!("{} at step {:#04x}", plural(palette.len(), "colour", "colours"), step),
            );
            palette
        }
    };

    // Palette text goes to stdout
    print!("{}", palette);
    Ok(())
}

/// Build a palette from an image's colours, most frequent first.
///
/// Equally frequent colours are ordered by value so the output is stable.
pub fn sample(image: &RgbImage, max: Option<usize>) -> Result<Palette> {
    let mut counts: HashMap<Colour, usize> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(Colour::from(*pixel)).or_insert(0) += 1;
    }

    let mut colours: Vec<(Colour, usize)> = counts.into_iter().collect();
    colours.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.to_array().cmp(&b.0.to_array())));

    if let Some(max) = max {
        colours.truncate(max);
    }

    Palette::from_colours(colours.into_iter().map(|(colour, _)| colour))
}

fn parse_step(s: &str) -> std::result::Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    let step = parsed.map_err(|e| format!("invalid step '{}': {}", s, e))?;

    if step == 0 || 255 % step != 0 {
        return Err(format!("255 does not divide by {}", step));
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_sample_orders_by_frequency() {
        let image = RgbImage::from_fn(4, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            _ => Rgb([0, 0, 255]),
        });

        let palette = sample(&image, None).unwrap();
        insta::assert_snapshot!(palette.to_string(), @r###"
        ! #0000ff
        " #ff0000
        "###);
    }

    #[test]
    fn test_sample_max_and_ties() {
        let image = RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8 * 100, 0, 0]));

        let palette = sample(&image, Some(2)).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(0).unwrap().colour(), Colour::rgb(0, 0, 0));
        assert_eq!(palette.get(1).unwrap().colour(), Colour::rgb(100, 0, 0));
    }

    #[test]
    fn test_sample_output_parses_back() {
        let image = RgbImage::from_fn(5, 5, |x, y| Rgb([x as u8 * 50, y as u8 * 50, 7]));
        let palette = sample(&image, None).unwrap();
        let reparsed = crate::parser::parse_palette(&palette.to_string()).unwrap();
        assert_eq!(palette, reparsed);
    }

    #[test]
    fn test_sample_beyond_symbol_alphabet() {
        // 100 distinct colours, more than there are default symbols
        let image = RgbImage::from_fn(10, 10, |x, y| Rgb([x as u8 * 20, y as u8 * 20, 0]));

        assert!(matches!(
            sample(&image, None),
            Err(crate::error::XsError::InvalidParameter { .. })
        ));
        assert_eq!(sample(&image, Some(93)).unwrap().len(), 93);
    }

    #[test]
    fn test_parse_step() {
        assert_eq!(parse_step("0x33"), Ok(0x33));
        assert_eq!(parse_step("85"), Ok(85));
        assert_eq!(parse_step("0XFF"), Ok(255));
        assert!(parse_step("0x10").is_err());
        assert!(parse_step("0").is_err());
        assert!(parse_step("300").is_err());
        assert!(parse_step("three").is_err());
    }
}

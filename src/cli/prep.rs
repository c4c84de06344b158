//! Prep command implementation.
//!
//! Pre-processes an image in a fixed order: palette, then gutter, then
//! size. The result is always written to `out.png`.

use std::path::{Path, PathBuf};

use clap::Args;
use image::{DynamicImage, RgbImage};

use crate::error::Result;
use crate::output::{display_path, Printer};
use crate::quantize::quantize;
use crate::render::{open_image, write_image};
use crate::resample::{remove_gutter, resize_aspect, Filter, FilterKind};
use crate::types::Palette;

/// Where prep writes its result.
pub const OUTPUT_FILE: &str = "out.png";

/// Pre-process an image
#[derive(Args, Debug, Default)]
pub struct PrepArgs {
    /// Image to process
    #[arg(required = true)]
    pub image: PathBuf,

    /// Posterise to the colours of a palette file
    #[arg(long, short)]
    pub palette: Option<PathBuf>,

    /// Trim this percentage of the shorter side from every edge
    #[arg(long, short, value_name = "PERCENT")]
    pub gutter: Option<f64>,

    /// Resize to N x N (same as --size N N)
    #[arg(long, short = 'S', value_name = "N")]
    pub square: Option<u32>,

    /// Resize to W x H, cropping evenly to keep the aspect ratio
    #[arg(long, short, num_args = 2, value_names = ["W", "H"])]
    pub size: Option<Vec<u32>>,

    /// Posterise without Floyd-Steinberg dithering
    #[arg(long)]
    pub no_dither: bool,

    /// Resampling kernel for the resize (default: smooth shrink, sharp enlarge)
    #[arg(long, value_enum)]
    pub filter: Option<FilterKind>,
}

impl PrepArgs {
    /// Requested output size, `--square` taking precedence.
    pub fn target_size(&self) -> Option<(u32, u32)> {
        match (self.square, self.size.as_deref()) {
            (Some(n), _) => Some((n, n)),
            (None, Some([w, h])) => Some((*w, *h)),
            _ => None,
        }
    }
}

pub fn run(args: PrepArgs, printer: &Printer) -> Result<()> {
    run_to(&args, Path::new(OUTPUT_FILE), printer)
}

/// Process `args.image` and write the result to `output`.
pub fn run_to(args: &PrepArgs, output: &Path, printer: &Printer) -> Result<()> {
    let mut image = open_image(&args.image)?;
    printer.status(
        "Opened",
        &format!(
            "{} ({}x{})",
            display_path(&args.image),
            image.width(),
            image.height()
        ),
    );

    let palette = args.palette.as_deref().map(Palette::load).transpose()?;
    if let Some(palette) = &palette {
        image = posterise(&image, palette, !args.no_dither)?;
        printer.status("Posterised", &format!("to {} colours", palette.len()));
    }

    if let Some(percent) = args.gutter {
        image = remove_gutter(&image, percent)?;
        printer.status(
            "Trimmed",
            &format!("{}% gutter ({}x{})", percent, image.width(), image.height()),
        );
    }

    if let Some((width, height)) = args.target_size() {
        let filter = args.filter.map(Filter::Fixed).unwrap_or_default();
        image = resize_aspect(&image, width, height, filter)?;
        printer.status("Resized", &format!("to {}x{}", width, height));
    }

    write_image(&DynamicImage::ImageRgb8(image), output)?;
    printer.success("Wrote", &display_path(output));

    Ok(())
}

/// Replace every pixel with its palette colour.
pub fn posterise(image: &RgbImage, palette: &Palette, dither: bool) -> Result<RgbImage> {
    quantize(image, palette, dither)?.to_image(palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use image::Rgb;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        prep: PrepArgs,
    }

    fn parse(args: &[&str]) -> PrepArgs {
        TestCli::try_parse_from(std::iter::once("prep").chain(args.iter().copied()))
            .unwrap()
            .prep
    }

    fn write_photo(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("photo.png");
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 90])
        });
        write_image(&DynamicImage::ImageRgb8(img), &path).unwrap();
        path
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&["photo.jpg", "-p", "dmc.txt", "-g", "5", "-s", "64", "48"]);
        assert_eq!(args.palette, Some(PathBuf::from("dmc.txt")));
        assert_eq!(args.gutter, Some(5.0));
        assert_eq!(args.target_size(), Some((64, 48)));
        assert!(!args.no_dither);
        assert_eq!(args.filter, None);

        let args = parse(&["photo.jpg", "-S", "16", "--filter", "lanczos3"]);
        assert_eq!(args.filter, Some(FilterKind::Lanczos3));
    }

    #[test]
    fn test_square_expands_and_wins() {
        assert_eq!(parse(&["a.png", "-S", "32"]).target_size(), Some((32, 32)));
        assert_eq!(
            parse(&["a.png", "-S", "32", "--size", "10", "20"]).target_size(),
            Some((32, 32))
        );
        assert_eq!(parse(&["a.png"]).target_size(), None);
    }

    #[test]
    fn test_gutter_then_resize() {
        let dir = tempdir().unwrap();
        let output = dir.path().join(OUTPUT_FILE);
        let args = PrepArgs {
            image: write_photo(dir.path(), 200, 100),
            gutter: Some(10.0),
            square: Some(40),
            ..Default::default()
        };

        run_to(&args, &output, &Printer::quiet()).unwrap();

        let img = open_image(&output).unwrap();
        assert_eq!(img.dimensions(), (40, 40));
    }

    #[test]
    fn test_filter_chooses_resize_kernel() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("stripes.png");
        let stripes = RgbImage::from_fn(4, 2, |x, _| {
            if x % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        write_image(&DynamicImage::ImageRgb8(stripes), &image).unwrap();

        let shrink = |filter| {
            let output = dir.path().join(OUTPUT_FILE);
            let args = PrepArgs {
                image: image.clone(),
                size: Some(vec![2, 1]),
                filter,
                ..Default::default()
            };
            run_to(&args, &output, &Printer::quiet()).unwrap();
            open_image(&output).unwrap()
        };

        let pure = |img: &RgbImage| img.pixels().all(|p| p[0] == 0 || p[0] == 255);
        assert!(pure(&shrink(Some(FilterKind::Nearest))));
        // The default smooths stripes into grey when shrinking
        assert!(!pure(&shrink(None)));
    }

    #[test]
    fn test_posterise_uses_only_palette_colours() {
        let dir = tempdir().unwrap();
        let palette_path = dir.path().join("palette.txt");
        fs::write(&palette_path, "k #000000 Black\nw #ffffff White\nr #ff0000 Red\n").unwrap();

        let output = dir.path().join(OUTPUT_FILE);
        let args = PrepArgs {
            image: write_photo(dir.path(), 30, 20),
            palette: Some(palette_path.clone()),
            ..Default::default()
        };
        run_to(&args, &output, &Printer::quiet()).unwrap();

        let palette = Palette::load(&palette_path).unwrap();
        let img = open_image(&output).unwrap();
        assert_eq!(img.dimensions(), (30, 20));
        for px in img.pixels() {
            assert!(palette.lookup_by_colour((*px).into()).is_ok());
        }
    }

    #[test]
    fn test_oversized_gutter_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join(OUTPUT_FILE);
        let args = PrepArgs {
            image: write_photo(dir.path(), 50, 50),
            gutter: Some(50.0),
            ..Default::default()
        };

        assert!(run_to(&args, &output, &Printer::quiet()).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_image() {
        let dir = tempdir().unwrap();
        let args = PrepArgs {
            image: dir.path().join("nope.png"),
            ..Default::default()
        };
        assert!(run_to(&args, &dir.path().join(OUTPUT_FILE), &Printer::quiet()).is_err());
    }
}

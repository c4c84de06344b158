//! Palette quantization.
//!
//! Maps every pixel onto the nearest palette colour by squared Euclidean
//! RGB distance, with optional Floyd-Steinberg error diffusion.

use image::RgbImage;

use crate::error::{XsError, Result};
use crate::types::{Colour, Palette, QuantizedGrid};

/// Floyd-Steinberg neighbours as `(dx, dy, weight)`.
///
/// ```text
///        *   7/16
///  3/16 5/16 1/16
/// ```
const FLOYD_STEINBERG: [(i64, i64, f32); 4] = [
    (1, 0, 7.0 / 16.0),
    (-1, 1, 3.0 / 16.0),
    (0, 1, 5.0 / 16.0),
    (1, 1, 1.0 / 16.0),
];

/// Index of the palette colour nearest to `colour`.
///
/// Ties go to the lowest index. `colours` must not be empty.
pub fn nearest(colour: Colour, colours: &[Colour]) -> usize {
    let mut best_index = 0;
    let mut best_dist = u32::MAX;

    for (i, pc) in colours.iter().enumerate() {
        let dist = colour.distance_squared(*pc);
        if dist < best_dist {
            best_dist = dist;
            best_index = i;
        }
    }

    best_index
}

/// Quantize an image to palette indices.
pub fn quantize(image: &RgbImage, palette: &Palette, dither: bool) -> Result<QuantizedGrid> {
    if palette.is_empty() {
        return Err(XsError::InvalidParameter {
            message: "Cannot quantize to an empty palette".to_string(),
            help: Some("Add at least one `SYMBOL HEXCOLOR NAME` line".to_string()),
        });
    }

    let colours: Vec<Colour> = palette.colours().collect();
    let indices = if dither {
        dither_floyd_steinberg(image, &colours)
    } else {
        image
            .pixels()
            .map(|px| nearest(Colour::from(*px), &colours))
            .collect()
    };

    QuantizedGrid::new(image.width(), image.height(), indices)
}

/// Floyd-Steinberg error diffusion.
///
/// Processes pixels left-to-right, top-to-bottom. Each pixel's value plus
/// the error it has received is matched to the palette, and the remaining
/// error is pushed forward to the unvisited neighbours.
fn dither_floyd_steinberg(image: &RgbImage, colours: &[Colour]) -> Vec<usize> {
    let (width, height) = (image.width() as i64, image.height() as i64);

    // Working buffer with f32 channels for error accumulation
    let mut buf: Vec<[f32; 3]> = image
        .pixels()
        .map(|px| [px[0] as f32, px[1] as f32, px[2] as f32])
        .collect();

    let mut result = Vec::with_capacity(buf.len());

    for y in 0..height {
        for x in 0..width {
            let old = buf[(y * width + x) as usize];
            let clamped = Colour::rgb(
                old[0].round().clamp(0.0, 255.0) as u8,
                old[1].round().clamp(0.0, 255.0) as u8,
                old[2].round().clamp(0.0, 255.0) as u8,
            );

            let idx = nearest(clamped, colours);
            result.push(idx);

            let new = colours[idx];
            let err = [
                old[0] - new.r as f32,
                old[1] - new.g as f32,
                old[2] - new.b as f32,
            ];

            for (dx, dy, weight) in FLOYD_STEINBERG {
                let nx = x + dx;
                let ny = y + dy;

                if nx >= 0 && nx < width && ny < height {
                    let cell = &mut buf[(ny * width + nx) as usize];
                    cell[0] += err[0] * weight;
                    cell[1] += err[1] * weight;
                    cell[2] += err[2] * weight;
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_palette;
    use crate::types::PaletteEntry;
    use image::Rgb;

    fn red_green() -> Palette {
        parse_palette("r #ff0000 Red\ng 00ff00 Green\n").unwrap()
    }

    fn grey_ramp() -> Palette {
        Palette::new(vec![
            PaletteEntry::new('k', Colour::BLACK, None),
            PaletteEntry::new('w', Colour::WHITE, None),
        ])
        .unwrap()
    }

    #[test]
    fn test_nearest_exact_match() {
        let colours = [Colour::BLACK, Colour::rgb(255, 0, 0), Colour::WHITE];
        assert_eq!(nearest(Colour::rgb(255, 0, 0), &colours), 1);
    }

    #[test]
    fn test_nearest_closest() {
        let colours = [Colour::BLACK, Colour::WHITE];
        assert_eq!(nearest(Colour::rgb(20, 30, 10), &colours), 0);
        assert_eq!(nearest(Colour::rgb(200, 230, 210), &colours), 1);
    }

    #[test]
    fn test_nearest_tie_goes_to_lowest_index() {
        let colours = [Colour::rgb(0, 0, 0), Colour::rgb(2, 0, 0)];
        assert_eq!(nearest(Colour::rgb(1, 0, 0), &colours), 0);

        let reversed = [Colour::rgb(2, 0, 0), Colour::rgb(0, 0, 0)];
        assert_eq!(nearest(Colour::rgb(1, 0, 0), &reversed), 0);
    }

    #[test]
    fn test_uniform_image_near_red() {
        let img = RgbImage::from_pixel(4, 4, Rgb([250, 5, 5]));
        let grid = quantize(&img, &red_green(), false).unwrap();

        assert_eq!(grid.size(), (4, 4));
        assert!(grid.indices().iter().all(|&i| i == 0));
    }

    #[test]
    fn test_palette_colours_are_fixed_points() {
        let palette = parse_palette("r #ff0000\ng #00ff00\nb #0000ff\nk #101010\n").unwrap();
        let colours: Vec<Colour> = palette.colours().collect();
        let img = RgbImage::from_fn(5, 3, |x, y| colours[((x + y) % 4) as usize].into());

        let grid = quantize(&img, &palette, false).unwrap();
        assert_eq!(grid.to_image(&palette).unwrap(), img);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let img = RgbImage::new(2, 2);
        assert!(matches!(
            quantize(&img, &Palette::default(), false),
            Err(XsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_dither_produces_valid_indices() {
        let palette = red_green();
        let img = RgbImage::from_fn(9, 7, |x, y| Rgb([(x * 28) as u8, (y * 36) as u8, 77]));

        let grid = quantize(&img, &palette, true).unwrap();
        assert_eq!(grid.size(), (9, 7));
        assert!(grid.indices().iter().all(|&i| i < palette.len()));
    }

    #[test]
    fn test_dither_mixes_mid_grey() {
        // Mid grey against black and white should come out roughly half and half
        let img = RgbImage::from_pixel(16, 16, Rgb([128, 128, 128]));
        let dithered = quantize(&img, &grey_ramp(), true).unwrap();
        let whites = dithered.indices().iter().filter(|&&i| i == 1).count();
        assert!((96..=160).contains(&whites), "{} white cells", whites);

        let flat = quantize(&img, &grey_ramp(), false).unwrap();
        assert!(flat.indices().iter().all(|&i| i == 1));
    }

    #[test]
    fn test_dither_first_pixel_undisturbed() {
        // Nothing has diffused into the top-left pixel yet
        let img = RgbImage::from_fn(3, 3, |x, _| {
            if x == 0 {
                Rgb([100, 100, 100])
            } else {
                Rgb([200, 200, 200])
            }
        });
        let grid = quantize(&img, &grey_ramp(), true).unwrap();
        assert_eq!(grid.get(0, 0), Some(0));
    }

    #[test]
    fn test_dither_error_flows_right() {
        // 100 -> black leaves +100 error; 7/16 of it lifts the next pixel
        // to ~144, which goes white. Its -111 error then pulls the third
        // pixel from 120 down to ~71, back to black.
        let img = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([100, 100, 100]),
            1 => Rgb([100, 100, 100]),
            _ => Rgb([120, 120, 120]),
        });
        let grid = quantize(&img, &grey_ramp(), true).unwrap();
        assert_eq!(grid.indices(), &[0, 1, 0]);

        let flat = quantize(&img, &grey_ramp(), false).unwrap();
        assert_eq!(flat.indices(), &[0, 0, 0]);
    }

    #[test]
    fn test_dither_error_weights() {
        // Black plus every grey from 100 up, so any grey from 100 on is
        // matched exactly and its index reads back the value it received
        let mut entries = vec![PaletteEntry::new('k', Colour::BLACK, None)];
        for v in 100..=255u32 {
            let symbol = char::from_u32(0x100 + v).unwrap();
            entries.push(PaletteEntry::new(symbol, Colour::rgb(v as u8, v as u8, v as u8), None));
        }
        let palette = Palette::new(entries).unwrap();
        let index = |grey: usize| grey - 99;

        // Only the 48 in the middle of the top row misses its colour.
        // Going black sends 21, 9, 15 and 3 to its four neighbours.
        let img = RgbImage::from_fn(3, 2, |x, y| match (x, y) {
            (1, 0) => Rgb([48, 48, 48]),
            _ => Rgb([150, 150, 150]),
        });
        let grid = quantize(&img, &palette, true).unwrap();

        assert_eq!(
            grid.indices(),
            &[
                index(150),
                0,
                index(150 + 21),
                index(150 + 9),
                index(150 + 15),
                index(150 + 3),
            ]
        );
    }
}

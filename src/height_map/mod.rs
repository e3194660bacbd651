//! Height map generators.
//!
//! Every generator fills a row-major map of `width * height` values and normalizes it to
//! `0..=MAX_HEIGHT` with [`adjust_int_map`].

use std::path::Path;

use image::ImageResult;

use crate::{grid::SquareGrid, random::MapRng};

pub mod fractal;
pub mod fracture;
pub mod random;

pub use fractal::FractalHeightMap;
pub use fracture::FractureHeightMap;
pub use random::RandomHeightMap;

/// The highest elevation of the working range.
pub const MAX_HEIGHT: u32 = 1000;

/// A strategy producing the initial elevation of every tile.
pub trait HeightGenerator {
    /// Fills the height map, drawing every random number from `random_number_generator`.
    fn generate(&mut self, random_number_generator: &mut MapRng);

    /// Returns the generated heights, row by row. Values are in `0..=MAX_HEIGHT`.
    ///
    /// Before [`HeightGenerator::generate`] is called every value is `0`.
    fn height_map(&self) -> &[u32];
}

/// Equalizes the histogram of `values` onto `0..=max`.
///
/// Each value is replaced by `max * (number of values <= it) / total`, so the output keeps the
/// order of the input while spreading it evenly over the range. A map where every value is
/// equal becomes a map of `max`.
pub fn adjust_int_map(values: &[i32], max: u32) -> Vec<u32> {
    let Some(&min_value) = values.iter().min() else {
        return Vec::new();
    };
    let max_value = values.iter().copied().max().unwrap_or(min_value);

    let size = (max_value - min_value) as usize + 1;
    let mut frequencies = vec![0u64; size];
    for &value in values {
        frequencies[(value - min_value) as usize] += 1;
    }

    let total = values.len() as u64;
    let mut count = 0;
    for frequency in frequencies.iter_mut() {
        count += *frequency;
        *frequency = count * max as u64 / total;
    }

    values
        .iter()
        .map(|&value| frequencies[(value - min_value) as usize] as u32)
        .collect()
}

/// Replaces every cell by a weighted average of its neighbourhood, first along `x` then along `y`.
///
/// Cells outside the grid count as `0`, which lowers the edges of the map.
pub fn smooth_int_map(values: &mut [i32], grid: SquareGrid) {
    const WEIGHTS: [f32; 5] = [0.13, 0.19, 0.37, 0.19, 0.13];

    let width = grid.width() as i32;
    let height = grid.height() as i32;
    let mut buffer = vec![0; values.len()];

    for along_x in [true, false] {
        for y in 0..height {
            for x in 0..width {
                let sum: f32 = (-2..=2)
                    .filter_map(|offset| {
                        let (nx, ny) = if along_x { (x + offset, y) } else { (x, y + offset) };
                        (0 <= nx && nx < width && 0 <= ny && ny < height).then(|| {
                            WEIGHTS[(offset + 2) as usize] * values[(ny * width + nx) as usize] as f32
                        })
                    })
                    .sum();
                buffer[(y * width + x) as usize] = sum as i32;
            }
        }
        values.copy_from_slice(&buffer);
    }
}

/// Saves a height map as a grayscale PNG, with `0` black and `MAX_HEIGHT` white.
pub fn write_to_file(height_map: &[u32], grid: SquareGrid, path: &Path) -> ImageResult<()> {
    let pixels: Vec<u8> = height_map
        .iter()
        .map(|&height| (height.min(MAX_HEIGHT) * 255 / MAX_HEIGHT) as u8)
        .collect();

    image::save_buffer(
        path,
        &pixels,
        grid.width(),
        grid.height(),
        image::ColorType::L8,
    )
}

/// High-pass filtering by subtracting a Gaussian-blurred copy
use crate::constants::{GAUSSIAN_RADIUS_SIGMAS, MAX_HIGH_PASS_SIGMA, NEUTRAL_GREY};
use crate::heightmap::HeightMapImage;
use rayon::prelude::*;

/// Normalised 1D Gaussian taps, centre at index `radius`. Sigma is capped at
/// [`MAX_HIGH_PASS_SIGMA`].
pub fn gaussian_kernel(sigma: f64) -> Vec<f32> {
    let sigma = sigma.min(MAX_HIGH_PASS_SIGMA);
    let radius = (GAUSSIAN_RADIUS_SIGMAS * sigma).ceil().max(1.0) as usize;
    let denom = 2.0 * sigma * sigma;
    let mut taps: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps.into_iter().map(|t| t as f32).collect()
}

/// Separable Gaussian blur with replicated borders, returned as floats.
///
/// The kernel half-width is `ceil(6 * sigma)` taps. Rows are processed in
/// parallel; every output value depends only on the input.
pub fn gaussian_blur(image: &HeightMapImage, sigma: f64) -> Vec<f32> {
    let (rows, cols) = (image.rows(), image.cols());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;
    let src = image.as_slice();

    let mut horiz = vec![0.0f32; rows * cols];
    horiz
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, out_row)| {
            let in_row = &src[r * cols..(r + 1) * cols];
            for (c, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &w) in kernel.iter().enumerate() {
                    let cc = clamp_index(c as isize + k as isize - radius, cols);
                    acc += w * in_row[cc] as f32;
                }
                *out = acc;
            }
        });

    let mut blurred = vec![0.0f32; rows * cols];
    blurred
        .par_chunks_mut(cols)
        .enumerate()
        .for_each(|(r, out_row)| {
            for (k, &w) in kernel.iter().enumerate() {
                let rr = clamp_index(r as isize + k as isize - radius, rows);
                let in_row = &horiz[rr * cols..(rr + 1) * cols];
                for (out, &v) in out_row.iter_mut().zip(in_row) {
                    *out += w * v;
                }
            }
        });

    blurred
}

/// `out = clamp(round(image - blur(image, sigma) + 128), 0, 255)`.
///
/// `sigma <= 0` (or non-finite) returns the input unchanged; sigma above
/// [`MAX_HIGH_PASS_SIGMA`] is treated as the maximum.
pub fn high_pass(image: HeightMapImage, sigma: f64) -> HeightMapImage {
    if !(sigma.is_finite() && sigma > 0.0) {
        return image;
    }

    let blurred = gaussian_blur(&image, sigma);
    let offset = NEUTRAL_GREY as f32;
    let data = image
        .as_slice()
        .iter()
        .zip(&blurred)
        .map(|(&v, &b)| (v as f32 - b + offset).round().clamp(0.0, 255.0) as u8)
        .collect();

    HeightMapImage::from_vec(image.rows(), image.cols(), data).unwrap_or(image)
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, cols: usize, value: u8) -> HeightMapImage {
        HeightMapImage::from_vec(rows, cols, vec![value; rows * cols]).unwrap()
    }

    #[test]
    fn kernel_is_normalised_and_wide() {
        let k = gaussian_kernel(1.5);
        assert_eq!(k.len(), 2 * 9 + 1);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(k[9] > k[8] && k[8] > k[0]);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let mut img = filled(4, 5, 30);
        img.set(2, 3, 240);
        assert_eq!(high_pass(img.clone(), 0.0), img);
    }

    #[test]
    fn flat_image_becomes_neutral_grey_including_borders() {
        let out = high_pass(filled(6, 9, 200), 2.0);
        assert!(out.as_slice().iter().all(|&v| v == NEUTRAL_GREY));
    }

    #[test]
    fn isolated_peak_stands_out_above_grey() {
        let mut img = filled(21, 21, 50);
        img.set(10, 10, 250);
        let out = high_pass(img, 3.0);
        assert!(out.get(10, 10) > 250 - 50);
        assert!(out.get(0, 0) <= NEUTRAL_GREY);
    }

    #[test]
    fn oversized_sigma_is_capped() {
        assert_eq!(gaussian_kernel(1.0e12).len(), gaussian_kernel(MAX_HIGH_PASS_SIGMA).len());
        let mut img = filled(5, 5, 60);
        img.set(2, 2, 200);
        assert_eq!(
            high_pass(img.clone(), 1.0e12),
            high_pass(img, MAX_HIGH_PASS_SIGMA)
        );
    }

    #[test]
    fn output_saturates_instead_of_wrapping() {
        let mut img = filled(9, 9, 0);
        img.set(4, 4, 255);
        let out = high_pass(img, 1.0);
        assert_eq!(out.get(4, 4), 255);
    }
}

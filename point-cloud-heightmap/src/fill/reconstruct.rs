/// Grey-scale hole filling by reconstruction by erosion (Soille, 1999, 6.3.7)
use crate::constants::SENTINEL;
use crate::heightmap::HeightMapImage;

/// Raise enclosed empty pockets to the lowest level of their rim.
///
/// The marker starts at 255 everywhere except the image border, which keeps
/// the image values. Repeated geodesic erosion above the image lowers the
/// marker until it settles (two-pass sequential scan, 8-connectivity). Only
/// sentinel cells take the settled marker value; sampled cells keep their own
/// value even when they sit in an enclosed minimum.
pub fn fill_holes(image: &HeightMapImage) -> HeightMapImage {
    let (rows, cols) = (image.rows(), image.cols());
    let mask = image.as_slice();
    let mut marker: Vec<u8> = (0..rows * cols)
        .map(|idx| {
            let (r, c) = (idx / cols, idx % cols);
            if r == 0 || c == 0 || r + 1 == rows || c + 1 == cols {
                mask[idx]
            } else {
                u8::MAX
            }
        })
        .collect();

    let mut changed = true;
    while changed {
        changed = forward_pass(&mut marker, mask, rows, cols);
        changed |= backward_pass(&mut marker, mask, rows, cols);
    }

    let data = mask
        .iter()
        .zip(marker)
        .map(|(&sample, settled)| if sample == SENTINEL { settled } else { sample })
        .collect();
    HeightMapImage::from_vec(rows, cols, data).unwrap_or_else(|| image.clone())
}

fn forward_pass(marker: &mut [u8], mask: &[u8], rows: usize, cols: usize) -> bool {
    let mut changed = false;
    for r in 0..rows {
        for c in 0..cols {
            let idx = r * cols + c;
            let mut lowest = marker[idx];
            if c > 0 {
                lowest = lowest.min(marker[idx - 1]);
            }
            if r > 0 {
                let above = idx - cols;
                lowest = lowest.min(marker[above]);
                if c > 0 {
                    lowest = lowest.min(marker[above - 1]);
                }
                if c + 1 < cols {
                    lowest = lowest.min(marker[above + 1]);
                }
            }
            changed |= settle(marker, mask, idx, lowest);
        }
    }
    changed
}

fn backward_pass(marker: &mut [u8], mask: &[u8], rows: usize, cols: usize) -> bool {
    let mut changed = false;
    for r in (0..rows).rev() {
        for c in (0..cols).rev() {
            let idx = r * cols + c;
            let mut lowest = marker[idx];
            if c + 1 < cols {
                lowest = lowest.min(marker[idx + 1]);
            }
            if r + 1 < rows {
                let below = idx + cols;
                lowest = lowest.min(marker[below]);
                if c > 0 {
                    lowest = lowest.min(marker[below - 1]);
                }
                if c + 1 < cols {
                    lowest = lowest.min(marker[below + 1]);
                }
            }
            changed |= settle(marker, mask, idx, lowest);
        }
    }
    changed
}

#[inline]
fn settle(marker: &mut [u8], mask: &[u8], idx: usize, lowest: u8) -> bool {
    let value = lowest.max(mask[idx]);
    if value != marker[idx] {
        marker[idx] = value;
        true
    } else {
        false
    }
}

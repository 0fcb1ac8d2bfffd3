/// Fast-marching inpainting after Telea (2004)
use crate::constants::{INPAINT_MIN_DIRECTION, INPAINT_UNREACHED, MAX_FILL_RADIUS, SENTINEL};
use crate::heightmap::HeightMapImage;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Flag {
    Known,
    Band,
    Inside,
}

#[derive(Clone, Copy, Debug)]
struct BandCell {
    time: f64,
    seq: u64,
    idx: usize,
}

impl PartialEq for BandCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BandCell {}

impl PartialOrd for BandCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BandCell {
    // Reversed so the max-heap pops the earliest arrival first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Marcher {
    rows: usize,
    cols: usize,
    radius: usize,
    values: Vec<f64>,
    times: Vec<f64>,
    flags: Vec<Flag>,
    heap: BinaryHeap<BandCell>,
    seq: u64,
}

/// Inpaint every sentinel cell of `image` using neighbours within `radius`
/// (clamped to `1..=MAX_FILL_RADIUS`).
///
/// Known cells seed a narrow band; the band advances into the empty region in
/// order of arrival time `T` (solution of `|grad T| = 1`). Each newly reached
/// cell gets a weighted average of the first-order extrapolations
/// `I(k) + grad I(k) . (p - k)` over non-empty cells `k` within the radius.
/// Weights combine direction (alignment with `grad T`), inverse squared
/// distance and level-set proximity `1 / (1 + |T(k) - T(p)|)`. Ties in the
/// band are broken by insertion order.
pub fn inpaint(image: &HeightMapImage, radius: usize) -> HeightMapImage {
    let radius = radius.clamp(1, MAX_FILL_RADIUS as usize);
    let mut marcher = Marcher::new(image, radius);
    marcher.run();

    let data = marcher
        .values
        .iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    // Length is rows * cols by construction
    HeightMapImage::from_vec(image.rows(), image.cols(), data)
        .unwrap_or_else(|| image.clone())
}

impl Marcher {
    fn new(image: &HeightMapImage, radius: usize) -> Self {
        let (rows, cols) = (image.rows(), image.cols());
        let values: Vec<f64> = image.as_slice().iter().map(|&v| v as f64).collect();
        let flags: Vec<Flag> = image
            .as_slice()
            .iter()
            .map(|&v| if v == SENTINEL { Flag::Inside } else { Flag::Known })
            .collect();
        let times = flags
            .iter()
            .map(|f| if *f == Flag::Inside { INPAINT_UNREACHED } else { 0.0 })
            .collect();

        let mut marcher = Self {
            rows,
            cols,
            radius,
            values,
            times,
            flags,
            heap: BinaryHeap::new(),
            seq: 0,
        };

        // Known cells bordering the empty region form the initial band
        for idx in 0..rows * cols {
            if marcher.flags[idx] == Flag::Known
                && marcher
                    .neighbours4(idx)
                    .any(|n| marcher.flags[n] == Flag::Inside)
            {
                marcher.flags[idx] = Flag::Band;
                marcher.push(idx, 0.0);
            }
        }
        marcher
    }

    fn push(&mut self, idx: usize, time: f64) {
        self.heap.push(BandCell {
            time,
            seq: self.seq,
            idx,
        });
        self.seq += 1;
    }

    fn run(&mut self) {
        while let Some(BandCell { idx, .. }) = self.heap.pop() {
            self.flags[idx] = Flag::Known;

            let neighbours: Vec<usize> = self.neighbours4(idx).collect();
            for n in neighbours {
                if self.flags[n] != Flag::Inside {
                    continue;
                }
                let time = self.arrival_time(n);
                self.times[n] = time;
                self.values[n] = self.extrapolate(n);
                self.flags[n] = Flag::Band;
                self.push(n, time);
            }
        }
    }

    fn neighbours4(&self, idx: usize) -> impl Iterator<Item = usize> {
        let (r, c) = (idx / self.cols, idx % self.cols);
        let (rows, cols) = (self.rows, self.cols);
        [
            (r > 0).then(|| idx - cols),
            (r + 1 < rows).then(|| idx + cols),
            (c > 0).then(|| idx - 1),
            (c + 1 < cols).then(|| idx + 1),
        ]
        .into_iter()
        .flatten()
    }

    /// Arrival time of a settled or banded cell, `None` if out of range or unreached
    fn time_at(&self, r: isize, c: isize) -> Option<f64> {
        let idx = self.index(r, c)?;
        (self.flags[idx] != Flag::Inside).then(|| self.times[idx])
    }

    fn index(&self, r: isize, c: isize) -> Option<usize> {
        (r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols)
            .then(|| r as usize * self.cols + c as usize)
    }

    fn arrival_time(&self, idx: usize) -> f64 {
        let (r, c) = ((idx / self.cols) as isize, (idx % self.cols) as isize);
        let up = self.time_at(r - 1, c);
        let down = self.time_at(r + 1, c);
        let left = self.time_at(r, c - 1);
        let right = self.time_at(r, c + 1);

        [
            solve_eikonal(up, left),
            solve_eikonal(down, left),
            solve_eikonal(up, right),
            solve_eikonal(down, right),
        ]
        .into_iter()
        .fold(INPAINT_UNREACHED, f64::min)
    }

    /// One-sided or central difference of `field` at (r, c), using only
    /// cells that are not still inside the empty region.
    fn gradient(&self, field: &[f64], r: isize, c: isize) -> (f64, f64) {
        let available = |rr: isize, cc: isize| {
            self.index(rr, cc)
                .filter(|&i| self.flags[i] != Flag::Inside)
                .map(|i| field[i])
        };
        let centre = self.index(r, c).map(|i| field[i]).unwrap_or(0.0);
        let diff = |prev: Option<f64>, next: Option<f64>| match (prev, next) {
            (Some(p), Some(n)) => (n - p) * 0.5,
            (None, Some(n)) => n - centre,
            (Some(p), None) => centre - p,
            (None, None) => 0.0,
        };
        let d_row = diff(available(r - 1, c), available(r + 1, c));
        let d_col = diff(available(r, c - 1), available(r, c + 1));
        (d_row, d_col)
    }

    fn extrapolate(&self, idx: usize) -> f64 {
        let (r, c) = ((idx / self.cols) as isize, (idx % self.cols) as isize);
        let radius = self.radius as isize;
        let radius_sq = radius * radius;
        let time = self.times[idx];
        let grad_t = self.gradient(&self.times, r, c);

        let mut weighted = 0.0;
        let mut total = 0.0;
        for dr in -radius..=radius {
            for dc in -radius..=radius {
                let dist_sq = dr * dr + dc * dc;
                if dist_sq == 0 || dist_sq > radius_sq {
                    continue;
                }
                let (kr, kc) = (r + dr, c + dc);
                let Some(k) = self.index(kr, kc) else {
                    continue;
                };
                if self.flags[k] == Flag::Inside {
                    continue;
                }

                // Vector from neighbour to target
                let (vr, vc) = (-dr as f64, -dc as f64);
                let dist_sq = dist_sq as f64;
                let dist = dist_sq.sqrt();

                let mut direction = (vr * grad_t.0 + vc * grad_t.1) / dist;
                if direction.abs() <= INPAINT_MIN_DIRECTION {
                    direction = INPAINT_MIN_DIRECTION;
                }
                let level = 1.0 / (1.0 + (self.times[k] - time).abs());
                let weight = (direction * level / dist_sq).abs();

                let grad_i = self.gradient(&self.values, kr, kc);
                let estimate = self.values[k] + grad_i.0 * vr + grad_i.1 * vc;

                weighted += weight * estimate;
                total += weight;
            }
        }

        if total > 0.0 {
            (weighted / total).clamp(0.0, 255.0)
        } else {
            self.values[idx]
        }
    }
}

/// Upwind solution of `|grad T| = 1` from two perpendicular neighbours
fn solve_eikonal(a: Option<f64>, b: Option<f64>) -> f64 {
    match (a, b) {
        (Some(t1), Some(t2)) => {
            let disc = 2.0 - (t1 - t2) * (t1 - t2);
            if disc >= 0.0 {
                let s = (t1 + t2 + disc.sqrt()) * 0.5;
                if s >= t1 && s >= t2 {
                    return s;
                }
            }
            1.0 + t1.min(t2)
        }
        (Some(t), None) | (None, Some(t)) => 1.0 + t,
        (None, None) => INPAINT_UNREACHED,
    }
}

/// Depth normalisation: z values to 8-bit intensities
use crate::constants::{FLAT_DEPTH_TOLERANCE, NEUTRAL_GREY};
use crate::error::PipelineWarning;
use crate::point::Point3D;
use serde::Serialize;

/// Summary of the z values of one point cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DepthStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0 for fewer than two points
    pub std_dev: f64,
    /// Largest |z|, the scale rounding noise in `std_dev` is measured against
    pub max_abs_z: f64,
}

impl DepthStatistics {
    pub fn from_points(points: &[Point3D]) -> Self {
        let count = points.len();
        if count == 0 {
            return Self {
                count,
                mean: 0.0,
                std_dev: 0.0,
                max_abs_z: 0.0,
            };
        }

        let mean = points.iter().map(|p| p.z).sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let ss: f64 = points.iter().map(|p| (p.z - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        let max_abs_z = points.iter().map(|p| p.z.abs()).fold(0.0, f64::max);

        Self {
            count,
            mean,
            std_dev,
            max_abs_z,
        }
    }

    /// True when the spread is zero up to rounding noise relative to the
    /// magnitude of the z values
    pub fn is_flat(&self) -> bool {
        !self.std_dev.is_finite() || self.std_dev <= FLAT_DEPTH_TOLERANCE * self.max_abs_z
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizationParameters {
    pub mean: f64,
    pub std_dev: f64,
    pub lower_clamp_std: f64,
    pub upper_clamp_std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Scaled,
    NoSignal,
    MidGrey,
}

/// Maps z values to intensities for one pipeline run.
///
/// Each z is standardised against the mean and sample standard deviation,
/// clamped into the `[lower, upper]` window (in std-dev units) and rescaled
/// with `(z_norm / (upper - lower) + 0.5) * 255`, rounded half away from zero
/// and saturated to `[0, 255]`.
///
/// `lower >= upper` yields no intensity for any point (all-empty image), and
/// a flat surface maps every point to [`NEUTRAL_GREY`].
#[derive(Debug, Clone, Copy)]
pub struct DepthNormalizer {
    params: NormalizationParameters,
    mode: Mode,
}

impl DepthNormalizer {
    pub fn new(stats: &DepthStatistics, lower_clamp_std: f64, upper_clamp_std: f64) -> Self {
        let params = NormalizationParameters {
            mean: stats.mean,
            std_dev: stats.std_dev,
            lower_clamp_std,
            upper_clamp_std,
        };
        // NaN bounds fail the comparison and fall into NoSignal as well
        let mode = if !(lower_clamp_std < upper_clamp_std) {
            Mode::NoSignal
        } else if stats.is_flat() {
            Mode::MidGrey
        } else {
            Mode::Scaled
        };
        Self { params, mode }
    }

    pub fn parameters(&self) -> &NormalizationParameters {
        &self.params
    }

    /// The degenerate condition this normaliser fell back on, if any
    pub fn warning(&self) -> Option<PipelineWarning> {
        match self.mode {
            Mode::Scaled => None,
            Mode::NoSignal => Some(PipelineWarning::DegenerateClampWindow),
            Mode::MidGrey => Some(PipelineWarning::ZeroDepthVariance),
        }
    }

    /// Intensity for one z value; `None` is the no-signal marker.
    pub fn intensity(&self, z: f64) -> Option<u8> {
        match self.mode {
            Mode::NoSignal => None,
            Mode::MidGrey => Some(NEUTRAL_GREY),
            Mode::Scaled => {
                let p = &self.params;
                let z_norm = ((z - p.mean) / p.std_dev).clamp(p.lower_clamp_std, p.upper_clamp_std);
                let scaled = (z_norm / (p.upper_clamp_std - p.lower_clamp_std) + 0.5) * 255.0;
                Some(scaled.round().clamp(0.0, 255.0) as u8)
            }
        }
    }

    /// Intensities for every point, in input order
    pub fn normalize(&self, points: &[Point3D]) -> Vec<Option<u8>> {
        points.iter().map(|p| self.intensity(p.z)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn with_z(zs: &[f64]) -> Vec<Point3D> {
        zs.iter()
            .enumerate()
            .map(|(i, &z)| Point3D::new(i as f64, 0.0, z))
            .collect()
    }

    #[test]
    fn statistics_use_sample_std_dev() {
        let stats = DepthStatistics::from_points(&with_z(&[0.0, 0.0, 0.0, 10.0]));
        assert_relative_eq!(stats.mean, 2.5);
        assert_relative_eq!(stats.std_dev, 5.0);
    }

    #[test]
    fn symmetric_window_follows_rescale_formula() {
        let points = with_z(&[0.0, 0.0, 0.0, 10.0]);
        let stats = DepthStatistics::from_points(&points);
        let normalizer = DepthNormalizer::new(&stats, -2.0, 2.0);
        // z_norm = -0.5 -> 0.375 * 255 = 95.6; z_norm = 1.5 -> 0.875 * 255 = 223.1
        assert_eq!(
            normalizer.normalize(&points),
            vec![Some(96), Some(96), Some(96), Some(223)]
        );
        assert_eq!(normalizer.warning(), None);
    }

    #[test]
    fn outliers_are_clamped_to_window_edges() {
        let stats = DepthStatistics {
            count: 10,
            mean: 0.0,
            std_dev: 1.0,
            max_abs_z: 50.0,
        };
        let normalizer = DepthNormalizer::new(&stats, -1.0, 1.0);
        assert_eq!(normalizer.intensity(50.0), Some(255));
        assert_eq!(normalizer.intensity(-50.0), Some(0));
        assert_eq!(normalizer.intensity(0.0), Some(128));
    }

    #[test]
    fn asymmetric_window_saturates() {
        let stats = DepthStatistics {
            count: 10,
            mean: 0.0,
            std_dev: 1.0,
            max_abs_z: 50.0,
        };
        // Window [0.5, 3]: z_norm = 3 -> (1.2 + 0.5) * 255 saturates at 255
        let normalizer = DepthNormalizer::new(&stats, 0.5, 3.0);
        assert_eq!(normalizer.intensity(10.0), Some(255));
        assert_eq!(normalizer.intensity(-10.0), Some(179));
    }

    #[test]
    fn valid_windows_give_every_point_an_intensity() {
        let points = with_z(&[-1e6, -3.0, -0.1, 0.0, 0.2, 7.5, 1e6]);
        let stats = DepthStatistics::from_points(&points);
        for (lower, upper) in [(-5.0, 5.0), (-5.0, -4.9), (4.0, 5.0), (-0.1, 0.1)] {
            let normalizer = DepthNormalizer::new(&stats, lower, upper);
            for v in normalizer.normalize(&points) {
                assert!(v.is_some());
            }
        }
    }

    #[test]
    fn inverted_or_equal_window_has_no_signal() {
        let points = with_z(&[1.0, 2.0, 3.0]);
        let stats = DepthStatistics::from_points(&points);
        for (lower, upper) in [(1.0, 1.0), (2.0, -2.0), (f64::NAN, 1.0)] {
            let normalizer = DepthNormalizer::new(&stats, lower, upper);
            assert!(normalizer.normalize(&points).iter().all(Option::is_none));
            assert_eq!(normalizer.warning(), Some(PipelineWarning::DegenerateClampWindow));
        }
    }

    #[test]
    fn tiny_but_real_spread_is_not_flat() {
        let points = with_z(&[1.0e-17, 2.0e-17, 3.0e-17, 6.0e-17]);
        let stats = DepthStatistics::from_points(&points);
        assert!(!stats.is_flat());
        let normalizer = DepthNormalizer::new(&stats, -2.0, 2.0);
        assert_eq!(normalizer.warning(), None);
        let values = normalizer.normalize(&points);
        assert!(values[0] < values[3], "{values:?}");
    }

    #[test]
    fn constant_surface_is_mid_grey() {
        let points = with_z(&[4.2, 4.2, 4.2]);
        let stats = DepthStatistics::from_points(&points);
        let normalizer = DepthNormalizer::new(&stats, -2.0, 2.0);
        assert_eq!(normalizer.normalize(&points), vec![Some(NEUTRAL_GREY); 3]);
        assert_eq!(normalizer.warning(), Some(PipelineWarning::ZeroDepthVariance));
    }
}

/// Point cloud to height-map pipeline
use crate::bounds::PointCloudBounds;
use crate::constants::{MAX_FILL_RADIUS, MAX_HIGH_PASS_SIGMA};
use crate::error::{InvalidInput, PipelineError, PipelineWarning};
use crate::fill::{GapFillMethod, fill_gaps};
use crate::grid::{GridParameters, map_points};
use crate::heightmap::HeightMapImage;
use crate::highpass::high_pass;
use crate::normalize::{DepthNormalizer, DepthStatistics, NormalizationParameters};
use crate::point::Point3D;
use crate::raster::rasterize;
use constants::SliderPositions;
use constants::slider::{
    decode_clamp, decode_multiplier, decode_sigma, encode_clamp, encode_multiplier, encode_sigma,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Full tunable parameter set for one run, in physical units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineParameters {
    /// Scales the density-derived pixels-per-unit; must be positive
    pub multiplier: f64,
    pub lower_clamp_std: f64,
    pub upper_clamp_std: f64,
    pub fill_method: GapFillMethod,
    /// 0 disables gap filling
    pub fill_radius: u32,
    /// Gaussian sigma in pixels; 0 disables the high-pass filter
    pub high_pass_sigma: f64,
    /// Reserved: carried through but not applied
    pub contrast: u32,
    /// Reserved: carried through but not applied
    pub threshold: u32,
}

impl Default for PipelineParameters {
    fn default() -> Self {
        Self::from_sliders(&SliderPositions::default(), GapFillMethod::default())
    }
}

impl PipelineParameters {
    /// Decode raw trackbar positions
    pub fn from_sliders(sliders: &SliderPositions, fill_method: GapFillMethod) -> Self {
        Self {
            multiplier: decode_multiplier(sliders.multiplier),
            lower_clamp_std: decode_clamp(sliders.lower_clamp),
            upper_clamp_std: decode_clamp(sliders.upper_clamp),
            fill_method,
            fill_radius: sliders.fill_radius,
            high_pass_sigma: decode_sigma(sliders.high_pass),
            contrast: sliders.contrast,
            threshold: sliders.threshold,
        }
    }

    /// Nearest trackbar positions, capped at each slider's range
    pub fn to_sliders(&self) -> SliderPositions {
        let mut sliders = SliderPositions {
            multiplier: encode_multiplier(self.multiplier),
            lower_clamp: encode_clamp(self.lower_clamp_std),
            upper_clamp: encode_clamp(self.upper_clamp_std),
            high_pass: encode_sigma(self.high_pass_sigma),
            ..SliderPositions::default()
        };
        sliders.set("fill", self.fill_radius);
        sliders.set("contrast", self.contrast);
        sliders.set("threshold", self.threshold);
        sliders
    }

    /// True when every value survives a round trip through the trackbars,
    /// i.e. the slider surface can show these parameters without snapping.
    pub fn fits_sliders(&self) -> bool {
        Self::from_sliders(&self.to_sliders(), self.fill_method) == *self
    }

    /// Reject gap-fill radii and sigmas outside the supported ranges
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.fill_radius > MAX_FILL_RADIUS {
            return Err(InvalidInput::FillRadiusOutOfRange {
                radius: self.fill_radius,
                max: MAX_FILL_RADIUS,
            });
        }
        if !(0.0..=MAX_HIGH_PASS_SIGMA).contains(&self.high_pass_sigma) {
            return Err(InvalidInput::SigmaOutOfRange {
                sigma: self.high_pass_sigma,
                max: MAX_HIGH_PASS_SIGMA,
            });
        }
        Ok(())
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub image: HeightMapImage,
    pub grid: GridParameters,
    pub bounds: PointCloudBounds,
    pub depth: NormalizationParameters,
    /// Empty cells right after rasterisation
    pub empty_cells_rasterized: usize,
    /// Empty cells in the returned image
    pub empty_cells: usize,
    pub warnings: Vec<PipelineWarning>,
}

/// `GridMapper -> DepthNormalizer -> Rasterizer -> GapFiller -> HighPassFilter`
///
/// A pure function of the points and the parameter value passed in: nothing
/// is cached between calls and the same inputs always give the same image.
pub fn run_pipeline(
    points: &[Point3D],
    params: PipelineParameters,
) -> Result<PipelineOutput, PipelineError> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    params.validate()?;

    let mapping = map_points(points, params.multiplier)?;
    debug!(
        "grid {}x{} at {:.4} px/unit for {} points",
        mapping.grid.rows,
        mapping.grid.cols,
        mapping.grid.pixels_per_unit,
        points.len()
    );

    let stats = DepthStatistics::from_points(points);
    let normalizer = DepthNormalizer::new(&stats, params.lower_clamp_std, params.upper_clamp_std);
    if let Some(warning) = normalizer.warning() {
        warn!("{}", warning);
        warnings.push(warning);
    }
    let intensities = normalizer.normalize(points);

    let image = rasterize(&mapping.grid, &mapping.coordinates, &intensities);
    let empty_cells_rasterized = image.count_sentinel();

    let (image, fill_warning) = fill_gaps(image, params.fill_method, params.fill_radius);
    warnings.extend(fill_warning);

    // An image without samples stays all-empty rather than turning flat grey
    let image = if image.count_sentinel() == image.rows() * image.cols() {
        image
    } else {
        high_pass(image, params.high_pass_sigma)
    };

    if params.contrast != 0 || params.threshold != 0 {
        debug!(
            "contrast {} / threshold {} are reserved and not applied",
            params.contrast, params.threshold
        );
    }

    let empty_cells = image.count_sentinel();
    debug!(
        "pipeline finished in {:.3} ms ({} of {} cells empty)",
        start.elapsed().as_secs_f64() * 1000.0,
        empty_cells,
        mapping.grid.rows * mapping.grid.cols
    );

    Ok(PipelineOutput {
        image,
        grid: mapping.grid,
        bounds: mapping.bounds,
        depth: *normalizer.parameters(),
        empty_cells_rasterized,
        empty_cells,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 10.0),
        ]
    }

    fn plain(lower: f64, upper: f64) -> PipelineParameters {
        PipelineParameters {
            multiplier: 1.0,
            lower_clamp_std: lower,
            upper_clamp_std: upper,
            fill_method: GapFillMethod::Telea,
            fill_radius: 0,
            high_pass_sigma: 0.0,
            contrast: 0,
            threshold: 0,
        }
    }

    #[test]
    fn default_parameters_match_slider_defaults() {
        let p = PipelineParameters::default();
        assert_eq!(p.multiplier, 1.0);
        assert_eq!((p.lower_clamp_std, p.upper_clamp_std), (-2.5, 2.5));
        assert_eq!(p.fill_radius, 0);
        assert_eq!(p.high_pass_sigma, 1.0);
        assert_eq!(p.to_sliders(), SliderPositions::default());
    }

    #[test]
    fn unit_square_end_to_end() {
        let out = run_pipeline(&unit_square(), plain(-2.0, 2.0)).unwrap();
        assert_eq!((out.grid.rows, out.grid.cols), (3, 3));
        assert_eq!(out.image.get(0, 0), 96);
        assert_eq!(out.image.get(0, 2), 96);
        assert_eq!(out.image.get(2, 0), 96);
        assert_eq!(out.image.get(2, 2), 223);
        assert_eq!(out.empty_cells, 5);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn equal_clamps_give_all_empty_image_with_warning() {
        let out = run_pipeline(&unit_square(), plain(1.0, 1.0)).unwrap();
        assert_eq!(out.empty_cells, 9);
        assert_eq!(out.warnings, vec![PipelineWarning::DegenerateClampWindow]);
    }

    #[test]
    fn equal_clamps_stay_empty_with_high_pass_enabled() {
        let mut params = plain(0.5, 0.5);
        params.high_pass_sigma = 1.0;
        let out = run_pipeline(&unit_square(), params).unwrap();
        assert!(out.image.as_slice().iter().all(|&v| v == 0));
    }

    #[test]
    fn degenerate_window_with_fill_reports_both_warnings() {
        let mut params = plain(2.0, -2.0);
        params.fill_radius = 3;
        let out = run_pipeline(&unit_square(), params).unwrap();
        assert_eq!(
            out.warnings,
            vec![PipelineWarning::DegenerateClampWindow, PipelineWarning::EmptyImage]
        );
        assert_eq!(out.image.count_sentinel(), 9);
    }

    #[test]
    fn collinear_points_are_invalid_input() {
        let points = [Point3D::new(0.0, 0.0, 1.0), Point3D::new(2.0, 0.0, 3.0)];
        assert!(matches!(
            run_pipeline(&points, plain(-2.0, 2.0)),
            Err(PipelineError::InvalidInput(InvalidInput::ZeroExtent { .. }))
        ));
    }

    #[test]
    fn parameters_at_the_range_limits_run() {
        let mut params = plain(-2.0, 2.0);
        params.fill_radius = MAX_FILL_RADIUS;
        params.high_pass_sigma = MAX_HIGH_PASS_SIGMA;
        assert!(run_pipeline(&unit_square(), params).is_ok());
    }

    #[test]
    fn parameters_past_the_range_limits_are_rejected() {
        let mut params = plain(-2.0, 2.0);
        params.fill_radius = MAX_FILL_RADIUS + 1;
        assert_eq!(
            run_pipeline(&unit_square(), params).unwrap_err(),
            PipelineError::InvalidInput(InvalidInput::FillRadiusOutOfRange {
                radius: MAX_FILL_RADIUS + 1,
                max: MAX_FILL_RADIUS,
            })
        );

        for sigma in [10.1, 1.0e12, -0.5, f64::NAN] {
            let mut params = plain(-2.0, 2.0);
            params.high_pass_sigma = sigma;
            assert!(matches!(
                run_pipeline(&unit_square(), params),
                Err(PipelineError::InvalidInput(InvalidInput::SigmaOutOfRange { .. }))
            ));
        }
    }

    #[test]
    fn slider_fit_detects_values_the_trackbars_cannot_show() {
        assert!(PipelineParameters::default().fits_sliders());
        let tweaks: [fn(&mut PipelineParameters); 3] = [
            |p| p.multiplier = 5.0,
            |p| p.high_pass_sigma = 0.04,
            |p| p.lower_clamp_std = -1.234,
        ];
        for tweak in tweaks {
            let mut params = PipelineParameters::default();
            tweak(&mut params);
            assert!(!params.fits_sliders(), "{params:?}");
        }
    }

    #[test]
    fn zero_multiplier_is_invalid_input() {
        let mut params = plain(-2.0, 2.0);
        params.multiplier = 0.0;
        assert!(run_pipeline(&unit_square(), params).is_err());
    }
}

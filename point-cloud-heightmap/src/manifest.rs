/// Run manifest describing how a height map was produced.
use crate::bounds::PointCloudBounds;
use crate::error::{OutputError, PipelineWarning};
use crate::grid::GridParameters;
use crate::normalize::NormalizationParameters;
use crate::pipeline::{PipelineOutput, PipelineParameters};
use constants::SliderPositions;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything needed to reproduce or audit one output image.
#[derive(Serialize, Debug)]
pub struct RunManifest {
    /// Source point file.
    pub input: String,
    /// Written PNG.
    pub image: String,
    pub point_count: usize,
    pub bounds: PointCloudBounds,
    pub grid: GridParameters,
    /// Depth statistics and clamp window used for normalisation.
    pub depth: NormalizationParameters,
    pub parameters: PipelineParameters,
    /// Same parameters as trackbar positions.
    pub sliders: SliderPositions,
    pub empty_cells_rasterized: usize,
    pub empty_cells: usize,
    pub warnings: Vec<PipelineWarning>,
}

impl RunManifest {
    pub fn new(
        input: &Path,
        image: &Path,
        point_count: usize,
        parameters: PipelineParameters,
        output: &PipelineOutput,
    ) -> Self {
        Self {
            input: input.display().to_string(),
            image: image.display().to_string(),
            point_count,
            bounds: output.bounds,
            grid: output.grid,
            depth: output.depth,
            parameters,
            sliders: parameters.to_sliders(),
            empty_cells_rasterized: output.empty_cells_rasterized,
            empty_cells: output.empty_cells,
            warnings: output.warnings.clone(),
        }
    }
}

/// Writes run manifests next to the generated image.
pub struct ManifestGenerator {
    manifest_path: PathBuf,
}

impl ManifestGenerator {
    /// Manifest path for an image: `<image stem>.json` in the same directory.
    pub fn for_image(image_path: &Path) -> Self {
        Self {
            manifest_path: image_path.with_extension("json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.manifest_path
    }

    /// Serialise the manifest as pretty JSON.
    pub fn write(&self, manifest: &RunManifest) -> Result<(), OutputError> {
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(&self.manifest_path, manifest_json).map_err(|source| OutputError::Io {
            path: self.manifest_path.clone(),
            source,
        })?;

        info!("Generated run manifest: {}", self.manifest_path.display());
        self.log_summary(manifest);
        Ok(())
    }

    fn log_summary(&self, manifest: &RunManifest) {
        info!("Manifest summary:");
        info!("  Points: {}", manifest.point_count);
        info!(
            "  Bounds: ({:.3}, {:.3}) to ({:.3}, {:.3})",
            manifest.bounds.min_x, manifest.bounds.min_y, manifest.bounds.max_x, manifest.bounds.max_y
        );
        info!(
            "  Grid: {}x{} at {:.4} px/unit",
            manifest.grid.rows, manifest.grid.cols, manifest.grid.pixels_per_unit
        );
        info!(
            "  Empty cells: {} after rasterising, {} in output",
            manifest.empty_cells_rasterized, manifest.empty_cells
        );
        for warning in &manifest.warnings {
            info!("  Warning: {}", warning);
        }
    }
}

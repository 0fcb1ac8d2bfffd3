/// Point file to height-map converter orchestrating load, pipeline and output.
use crate::controller::{DisplaySink, InteractiveController, LastRun, ParameterSource};
use crate::error::{ConvertError, LoadError};
use crate::manifest::{ManifestGenerator, RunManifest};
use crate::pipeline::{PipelineOutput, PipelineParameters, run_pipeline};
use crate::point::Point3D;
use crate::reader::read_points;
use log::info;
use std::path::{Path, PathBuf};

/// Converts one point file into a greyscale height-map PNG.
pub struct HeightmapConverter {
    /// Source `x y z` point file.
    input_path: PathBuf,
    /// Destination PNG.
    output_path: PathBuf,
    /// Write `<output stem>.json` alongside the image.
    write_manifest: bool,
    show_progress: bool,
}

impl HeightmapConverter {
    /// Create a converter. Without an explicit output the image is written
    /// next to the input as `<input stem>_heightmap.png`.
    pub fn new(input_path: &Path, output_path: Option<&Path>) -> Self {
        let output_path = output_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| default_output_path(input_path));

        Self {
            input_path: input_path.to_path_buf(),
            output_path,
            write_manifest: false,
            show_progress: true,
        }
    }

    pub fn with_manifest(mut self, write_manifest: bool) -> Self {
        self.write_manifest = write_manifest;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn load(&self) -> Result<Vec<Point3D>, LoadError> {
        read_points(&self.input_path, self.show_progress)
    }

    /// Load, run the pipeline once and write the results.
    pub fn convert(&self, params: PipelineParameters) -> Result<PipelineOutput, ConvertError> {
        info!(
            "Converting {} to {}",
            self.input_path.display(),
            self.output_path.display()
        );

        let points = self.load()?;
        let output = run_pipeline(&points, params)?;
        self.save(&points, params, &output)?;

        info!("Conversion complete!");
        Ok(output)
    }

    /// Load once and hand the points to an interactive controller. The last
    /// image is written when the controller is cancelled.
    pub fn convert_interactive<S: ParameterSource, D: DisplaySink>(
        &self,
        controller: &mut InteractiveController<S, D>,
    ) -> Result<Option<LastRun>, ConvertError> {
        let points = self.load()?;
        let last = controller.run(&points);

        match &last {
            Some(run) => self.save(&points, run.parameters, &run.output)?,
            None => info!("No successful run, nothing written"),
        }
        Ok(last)
    }

    fn save(
        &self,
        points: &[Point3D],
        params: PipelineParameters,
        output: &PipelineOutput,
    ) -> Result<(), ConvertError> {
        output.image.save_png(&self.output_path)?;
        info!(
            "Saved {} ({}x{} greyscale)",
            self.output_path.display(),
            output.image.cols(),
            output.image.rows()
        );

        if self.write_manifest {
            let manifest = RunManifest::new(
                &self.input_path,
                &self.output_path,
                points.len(),
                params,
                output,
            );
            ManifestGenerator::for_image(&self.output_path).write(&manifest)?;
        }
        Ok(())
    }
}

fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    input_path.with_file_name(format!("{}_heightmap.png", stem))
}

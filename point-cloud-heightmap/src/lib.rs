//! Greyscale height maps from unordered 3-D surface samples.
//!
//! Points are projected onto a density-scaled pixel grid, their depths
//! normalised into 8-bit intensities, and the resulting sparse image is
//! optionally gap-filled and high-pass filtered. See [`pipeline::run_pipeline`].
pub mod bounds;
pub mod constants;
pub mod controller;
pub mod converter;
pub mod error;
pub mod fill;
pub mod grid;
pub mod heightmap;
pub mod highpass;
pub mod manifest;
pub mod normalize;
pub mod pipeline;
pub mod point;
pub mod raster;
pub mod reader;

pub use crate::controller::{ControlEvent, DisplaySink, InteractiveController, ParameterSource};
pub use crate::converter::HeightmapConverter;
pub use crate::error::{ConvertError, InvalidInput, LoadError, PipelineError, PipelineWarning};
pub use crate::fill::GapFillMethod;
pub use crate::heightmap::HeightMapImage;
pub use crate::pipeline::{PipelineOutput, PipelineParameters, run_pipeline};
pub use crate::point::Point3D;
pub use crate::reader::{parse_points, read_points};

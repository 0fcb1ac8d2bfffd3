/// Shared configuration for the height-map tools
pub mod render_settings;
pub mod slider;

pub use render_settings::*;
pub use slider::{SLIDERS, SliderPositions, SliderSpec};

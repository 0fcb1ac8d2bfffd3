/// Processing constants local to this crate
pub use constants::{
    GAUSSIAN_RADIUS_SIGMAS, MAX_FILL_RADIUS, MAX_GRID_CELLS, MAX_HIGH_PASS_SIGMA, NEUTRAL_GREY,
    SENTINEL,
};

/// Points per parallel chunk when computing bounds
pub const BOUNDS_CHUNK_SIZE: usize = 25_000;

/// Arrival time assigned to unknown cells before the fast-marching front reaches them
pub const INPAINT_UNREACHED: f64 = 1.0e6;

/// Lower bound on the directional weight term so axis-aligned neighbours still count
pub const INPAINT_MIN_DIRECTION: f64 = 1.0e-6;

/// Depth spread at or below this fraction of the largest |z| counts as flat
pub const FLAT_DEPTH_TOLERANCE: f64 = 64.0 * f64::EPSILON;

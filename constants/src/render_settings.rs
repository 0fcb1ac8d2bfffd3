/// Intensity written to cells that no sample landed on
pub const SENTINEL: u8 = 0;

/// Mid-grey offset added after high-pass filtering, and the intensity given
/// to every sample when the depth values have no spread.
pub const NEUTRAL_GREY: u8 = 128;

/// Gaussian kernel half-width in multiples of sigma
pub const GAUSSIAN_RADIUS_SIGMAS: f64 = 6.0;

/// Largest grid the mapper will allocate (rows * cols)
pub const MAX_GRID_CELLS: usize = 1 << 28;

/// Largest gap-fill radius in pixels (the `ImFill` trackbar maximum)
pub const MAX_FILL_RADIUS: u32 = 20;

/// Largest high-pass sigma in pixels (`HighPassFrequency` maximum / 10)
pub const MAX_HIGH_PASS_SIGMA: f64 = 10.0;

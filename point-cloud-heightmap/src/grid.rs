/// Pixel grid sizing and point-to-cell projection
use crate::bounds::PointCloudBounds;
use crate::constants::MAX_GRID_CELLS;
use crate::error::{Axis, InvalidInput};
use crate::point::Point3D;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridParameters {
    pub pixels_per_unit: f64,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelCoordinate {
    pub row: usize,
    pub col: usize,
}

/// Grid plus one coordinate per input point, index-aligned with the input
#[derive(Debug, Clone)]
pub struct GridMapping {
    pub grid: GridParameters,
    pub bounds: PointCloudBounds,
    pub coordinates: Vec<PixelCoordinate>,
}

/// Size the grid for `points` and project every point onto it.
///
/// Resolution follows sample density: `pixels_per_unit = sqrt(N / (span_x *
/// span_y)) * multiplier`, so a multiplier of 1 gives on average one sample
/// per cell. Rows follow x, columns follow y.
///
/// Cell indices are `round((coord - min) * pixels_per_unit)` with halves
/// rounded away from zero. Rounding the maximum coordinate can land one past
/// the `floor(span * ppu) + 1` grid, so indices are capped at the last
/// row/column.
pub fn map_points(points: &[Point3D], multiplier: f64) -> Result<GridMapping, InvalidInput> {
    if points.is_empty() {
        return Err(InvalidInput::NoPoints);
    }
    if !(multiplier.is_finite() && multiplier > 0.0) {
        return Err(InvalidInput::NonPositiveMultiplier(multiplier));
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(InvalidInput::NonFiniteCoordinate { index });
    }

    let bounds = PointCloudBounds::from_points(points);
    let (span_x, span_y, _) = bounds.spans();
    if span_x <= 0.0 {
        return Err(InvalidInput::ZeroExtent { axis: Axis::X });
    }
    if span_y <= 0.0 {
        return Err(InvalidInput::ZeroExtent { axis: Axis::Y });
    }

    let pixels_per_unit = (points.len() as f64 / (span_x * span_y)).sqrt() * multiplier;
    if !(pixels_per_unit.is_finite() && pixels_per_unit > 0.0) {
        return Err(InvalidInput::DegenerateResolution(pixels_per_unit));
    }

    let rows = grid_extent(span_x, pixels_per_unit)?;
    let cols = grid_extent(span_y, pixels_per_unit)?;
    if rows.checked_mul(cols).is_none_or(|cells| cells > MAX_GRID_CELLS) {
        return Err(InvalidInput::GridTooLarge { rows, cols });
    }

    let grid = GridParameters {
        pixels_per_unit,
        rows,
        cols,
    };
    let coordinates = points
        .iter()
        .map(|p| PixelCoordinate {
            row: cell_index(p.x, bounds.min_x, pixels_per_unit, rows),
            col: cell_index(p.y, bounds.min_y, pixels_per_unit, cols),
        })
        .collect();

    Ok(GridMapping {
        grid,
        bounds,
        coordinates,
    })
}

/// `floor(span * ppu) + 1`, rejecting extents that do not fit in `usize`
fn grid_extent(span: f64, pixels_per_unit: f64) -> Result<usize, InvalidInput> {
    let scaled = (span * pixels_per_unit).floor();
    if !scaled.is_finite() || scaled >= MAX_GRID_CELLS as f64 {
        return Err(InvalidInput::DegenerateResolution(pixels_per_unit));
    }
    Ok(scaled as usize + 1)
}

#[inline]
fn cell_index(coord: f64, min: f64, pixels_per_unit: f64, len: usize) -> usize {
    let scaled = ((coord - min) * pixels_per_unit).round();
    (scaled.max(0.0) as usize).min(len - 1)
}

/// Writes per-point intensities into a fresh height-map image
use crate::grid::{GridParameters, PixelCoordinate};
use crate::heightmap::HeightMapImage;

/// Build a `rows x cols` image from index-aligned coordinates and intensities.
///
/// Points are written in input order, so when several land on one cell the
/// last one wins. A `None` intensity leaves the cell untouched.
pub fn rasterize(
    grid: &GridParameters,
    coordinates: &[PixelCoordinate],
    intensities: &[Option<u8>],
) -> HeightMapImage {
    debug_assert_eq!(coordinates.len(), intensities.len());

    let mut image = HeightMapImage::empty(grid.rows, grid.cols);
    for (coord, intensity) in coordinates.iter().zip(intensities) {
        if let Some(value) = *intensity {
            image.set(coord.row, coord.col, value);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize) -> GridParameters {
        GridParameters {
            pixels_per_unit: 1.0,
            rows,
            cols,
        }
    }

    #[test]
    fn later_point_overrides_earlier_on_collision() {
        let at_origin = PixelCoordinate { row: 0, col: 0 };
        let image = rasterize(&grid(2, 2), &[at_origin, at_origin], &[Some(10), Some(90)]);
        assert_eq!(image.get(0, 0), 90);

        let image = rasterize(&grid(2, 2), &[at_origin, at_origin], &[Some(90), Some(10)]);
        assert_eq!(image.get(0, 0), 10);
    }

    #[test]
    fn unwritten_cells_stay_empty() {
        let coords = [
            PixelCoordinate { row: 0, col: 1 },
            PixelCoordinate { row: 2, col: 0 },
        ];
        let image = rasterize(&grid(3, 2), &coords, &[Some(7), Some(200)]);
        assert_eq!(image.as_slice(), &[0, 7, 0, 0, 200, 0]);
        assert_eq!(image.count_sentinel(), 4);
    }

    #[test]
    fn no_signal_marker_writes_nothing() {
        let coords = [PixelCoordinate { row: 1, col: 1 }];
        let image = rasterize(&grid(2, 2), &coords, &[None]);
        assert_eq!(image.count_sentinel(), 4);
    }
}

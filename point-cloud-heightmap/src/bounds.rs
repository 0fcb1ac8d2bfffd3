/// Point cloud coordinate bounds tracking
use crate::constants::BOUNDS_CHUNK_SIZE;
use crate::point::Point3D;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCloudBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for PointCloudBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCloudBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Bounds of a point slice, reduced over parallel chunks
    pub fn from_points(points: &[Point3D]) -> Self {
        points
            .par_chunks(BOUNDS_CHUNK_SIZE)
            .map(|chunk| {
                let mut local = Self::new();
                for p in chunk {
                    local.update(p);
                }
                local
            })
            .reduce(Self::new, |a, b| a.merge(&b))
    }

    /// Update bounds with a new point
    pub fn update(&mut self, p: &Point3D) {
        self.min_x = self.min_x.min(p.x);
        self.max_x = self.max_x.max(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_y = self.max_y.max(p.y);
        self.min_z = self.min_z.min(p.z);
        self.max_z = self.max_z.max(p.z);
    }

    pub fn merge(mut self, other: &Self) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_z = self.max_z.max(other.max_z);
        self
    }

    /// Extent along each axis (max - min)
    pub fn spans(&self) -> (f64, f64, f64) {
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_bounds_match_sequential_scan() {
        let points: Vec<Point3D> = (0..60_000)
            .map(|i| {
                let t = i as f64;
                Point3D::new((t * 0.37).sin() * 10.0, t * 0.001 - 3.0, (t * 0.11).cos())
            })
            .collect();

        let mut expected = PointCloudBounds::new();
        for p in &points {
            expected.update(p);
        }

        assert_eq!(PointCloudBounds::from_points(&points), expected);
    }

    #[test]
    fn spans_of_unit_square() {
        let points = [
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 4.0),
        ];
        assert_eq!(PointCloudBounds::from_points(&points).spans(), (1.0, 1.0, 4.0));
    }
}

use point_cloud_heightmap::Point3D;

/// Linear congruential generator for reproducible test clouds
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Jittered samples of a tilted, bumpy surface over a `width x height` patch.
pub fn bumpy_surface(samples: usize, width: f64, height: f64, seed: u64) -> Vec<Point3D> {
    assert!(samples > 1, "need at least two samples");
    let mut rng = Lcg::new(seed);
    (0..samples)
        .map(|_| {
            let x = rng.next_f64() * width;
            let y = rng.next_f64() * height;
            let z = 0.05 * x + (x * 0.8).sin() * (y * 0.5).cos() + 0.01 * rng.next_f64();
            Point3D::new(x, y, z)
        })
        .collect()
}

/// Regular lattice with one sample per unit cell, z from `f`.
pub fn lattice(side: usize, f: impl Fn(f64, f64) -> f64) -> Vec<Point3D> {
    let mut points = Vec::with_capacity(side * side);
    for i in 0..side {
        for j in 0..side {
            let (x, y) = (i as f64, j as f64);
            points.push(Point3D::new(x, y, f(x, y)));
        }
    }
    points
}

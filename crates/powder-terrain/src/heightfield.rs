use glam::{UVec2, Vec2, Vec3};
use powder_core::XorShift64;

/// Regular grid heightfield. Heights are in world units, relative to the course origin.
#[derive(Clone, Debug)]
pub struct HeightField {
    pub dims: UVec2,     // nx, nz (columns in x, rows in z)
    pub cell: Vec2,      // sx, sz (world units per cell)
    pub heights: Vec<f32>,
    pub min_y: f32,
    pub max_y: f32,
}

impl HeightField {
    pub fn from_heights(dims: UVec2, cell: Vec2, heights: Vec<f32>) -> Self {
        assert_eq!((dims.x as usize) * (dims.y as usize), heights.len());
        assert!(dims.x >= 2 && dims.y >= 2, "heightfield needs at least 2x2 samples");
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for &h in &heights { min_y = min_y.min(h); max_y = max_y.max(h); }
        Self { dims, cell, heights, min_y, max_y }
    }

    /// Flat plane tilted so that height drops by `drop_per_meter` along +Z.
    pub fn incline(dims: UVec2, cell: Vec2, drop_per_meter: f32) -> Self {
        Self::from_fn(dims, cell, |_, z| -z * drop_per_meter)
    }

    /// Incline with seeded bumps (amplitude `bump_h`) on top.
    pub fn bumpy_incline(dims: UVec2, cell: Vec2, drop_per_meter: f32, bump_h: f32, seed: u64) -> Self {
        let mut rng = XorShift64::new(seed);
        let mut hf = Self::incline(dims, cell, drop_per_meter);
        for h in hf.heights.iter_mut() { *h += rng.range_f32(-bump_h, bump_h); }
        let (mut min_y, mut max_y) = (f32::INFINITY, f32::NEG_INFINITY);
        for &h in &hf.heights { min_y = min_y.min(h); max_y = max_y.max(h); }
        hf.min_y = min_y; hf.max_y = max_y;
        hf
    }

    pub fn from_fn(dims: UVec2, cell: Vec2, f: impl Fn(f32, f32) -> f32) -> Self {
        let mut heights = Vec::with_capacity((dims.x * dims.y) as usize);
        for z in 0..dims.y {
            for x in 0..dims.x {
                heights.push(f(x as f32 * cell.x, z as f32 * cell.y));
            }
        }
        Self::from_heights(dims, cell, heights)
    }

    /// World-unit size covered by the samples.
    #[inline] pub fn extent(&self) -> Vec2 {
        Vec2::new((self.dims.x - 1) as f32 * self.cell.x, (self.dims.y - 1) as f32 * self.cell.y)
    }
    #[inline] pub fn contains(&self, x: f32, z: f32) -> bool {
        let e = self.extent();
        x >= 0.0 && z >= 0.0 && x <= e.x && z <= e.y
    }

    #[inline] fn idx(&self, x: i32, z: i32) -> usize {
        (x as usize) + (z as usize) * (self.dims.x as usize)
    }
    #[inline] fn h(&self, x: i32, z: i32) -> f32 { self.heights[self.idx(x, z)] }

    /// Bilinear height at local (x,z) in **meters** where origin is HF (0,0).
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let nx = self.dims.x as i32; let nz = self.dims.y as i32;
        let sx = self.cell.x;        let sz = self.cell.y;
        let fx = (x / sx).clamp(0.0, (nx - 1) as f32 - 1e-5);
        let fz = (z / sz).clamp(0.0, (nz - 1) as f32 - 1e-5);
        let x0 = fx.floor() as i32; let x1 = (x0 + 1).min(nx - 1);
        let z0 = fz.floor() as i32; let z1 = (z0 + 1).min(nz - 1);
        let tx = fx - x0 as f32;    let tz = fz - z0 as f32;

        let h00 = self.h(x0, z0);
        let h10 = self.h(x1, z0);
        let h01 = self.h(x0, z1);
        let h11 = self.h(x1, z1);
        let a = h00 * (1.0 - tx) + h10 * tx;
        let b = h01 * (1.0 - tx) + h11 * tx;
        a * (1.0 - tz) + b * tz
    }

    /// Central-diff normal (unit). Falls back to +Y if the gradient blows up.
    pub fn sample_normal(&self, x: f32, z: f32) -> Vec3 {
        let hx0 = self.sample_height((x - self.cell.x).max(0.0), z);
        let hx1 = self.sample_height(x + self.cell.x, z);
        let hz0 = self.sample_height(x, (z - self.cell.y).max(0.0));
        let hz1 = self.sample_height(x, z + self.cell.y);

        let ddx = (hx1 - hx0) / (2.0 * self.cell.x.max(1e-6));
        let ddz = (hz1 - hz0) / (2.0 * self.cell.y.max(1e-6));

        let n = Vec3::new(-ddx, 1.0, -ddz).normalize_or_zero();
        if n == Vec3::ZERO { Vec3::Y } else { n }
    }
}

//! Fundamental geometric and simulation types.
//!
//! Vectors are `glam::DVec3` in world space: x = East, y = Up, z = South.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / crate::constants::TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// Opaque handle to a rigid body owned by the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Opaque handle to a visual owned by the scene layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

/// 24-bit RGB color as used by the scene layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xffffff);
    pub const RED: Rgb = Rgb(0xff0000);
    pub const MAGENTA: Rgb = Rgb(0xff00ff);
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: DVec3, half: DVec3) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// World bounds of a box of full `size` rotated by `yaw` about +Y.
    pub fn from_yawed_box(center: DVec3, size: DVec3, yaw: f64) -> Self {
        let (sin, cos) = yaw.sin_cos();
        let hx = size.x * 0.5;
        let hz = size.z * 0.5;
        let half = DVec3::new(
            (hx * cos).abs() + (hz * sin).abs(),
            size.y * 0.5,
            (hx * sin).abs() + (hz * cos).abs(),
        );
        Self::from_center_half_extents(center, half)
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    pub fn contains(&self, point: DVec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Build a ray, normalizing the direction. A zero direction yields -Z.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(DVec3::NEG_Z),
        }
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the first hit on a box of full `size`
    /// centered at `center` and rotated by `yaw` about +Y (slab test in the
    /// box's local frame). `None` when the ray misses or the box is behind.
    pub fn cast_yawed_box(&self, center: DVec3, size: DVec3, yaw: f64) -> Option<f64> {
        let (sin, cos) = (-yaw).sin_cos();
        let rotate = |v: DVec3| DVec3::new(v.x * cos + v.z * sin, v.y, -v.x * sin + v.z * cos);
        let origin = rotate(self.origin - center);
        let direction = rotate(self.direction);
        let half = size * 0.5;

        let mut t_min = f64::NEG_INFINITY;
        let mut t_max = f64::INFINITY;
        for axis in 0..3 {
            let (o, d, h) = (origin[axis], direction[axis], half[axis]);
            if d.abs() < 1e-12 {
                if o.abs() > h {
                    return None;
                }
                continue;
            }
            let t1 = (-h - o) / d;
            let t2 = (h - o) / d;
            t_min = t_min.max(t1.min(t2));
            t_max = t_max.min(t1.max(t2));
            if t_min > t_max {
                return None;
            }
        }
        if t_max < 0.0 {
            return None;
        }
        Some(t_min.max(0.0))
    }
}

pub mod aabb;
pub mod shape;
pub mod sweep;

pub use aabb::Aabb;
pub use shape::Shape;
pub use shape::aabb_of;
pub use sweep::{SweepHit, sweep_sphere_vs_aabb, pick_better};

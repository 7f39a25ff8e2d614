//! Ground the rider slides on: a heightfield slope plus box colliders, behind the two query
//! traits the locomotion engine consumes.

pub mod heightfield;
pub mod probe;
pub mod course;

pub use heightfield::HeightField;
pub use probe::{GroundHit, GroundProbe, ObstacleContact, ObstacleQuery};
pub use course::{Category, Course, CourseCollider};

pub mod vec3;
pub mod mat3;
pub mod ray;
pub mod aabb;

pub use self::vec3::Vec3;
pub use self::mat3::Mat3;
pub use self::ray::Ray;
pub use self::aabb::AABB;
pub use std::f64::{INFINITY, NEG_INFINITY};
pub use std::f64::consts::*;

/// Below this magnitude a direction component is treated as parallel to its slab
pub const PARALLEL_EPSILON: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis { X, Y, Z }

impl Axis {
	pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

pub fn lerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
	(1.0 - t) * a + t * b
}

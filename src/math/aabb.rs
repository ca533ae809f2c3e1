use crate::math::*;

/// Axis-Aligned Bounding Box
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AABB {
	pub min: Vec3,
	pub max: Vec3,
}

impl AABB {
	pub fn new(min: Vec3, max: Vec3) -> AABB {
		debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z, "inverted AABB {:?} {:?}", min, max);
		AABB { min, max }
	}

	/// Cube centered on `center` with half edge `half_size`
	pub fn cube(center: Vec3, half_size: f64) -> AABB {
		AABB::new(center - Vec3::thrice(half_size), center + Vec3::thrice(half_size))
	}

	pub fn empty() -> AABB {
		AABB { min: Vec3::thrice(INFINITY), max: Vec3::thrice(NEG_INFINITY) }
	}

	pub fn union(&self, b: &AABB) -> AABB {
		AABB {
			min: Vec3::min(self.min, b.min),
			max: Vec3::max(self.max, b.max),
		}
	}

	/// Inclusive on every face
	pub fn contains(&self, p: Vec3) -> bool {
		Axis::ALL.iter().all(|&a| self.min[a] <= p[a] && p[a] <= self.max[a])
	}

	pub fn contains_box(&self, b: &AABB) -> bool {
		self.contains(b.min) && self.contains(b.max)
	}

	pub fn size(&self) -> Vec3 {
		self.max - self.min
	}

	pub fn center(&self) -> Vec3 {
		(self.min + self.max) * 0.5
	}
}

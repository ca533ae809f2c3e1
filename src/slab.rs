//! Ray / AABB slab tests.
//!
//! Two interchangeable implementations are provided: a scalar one working axis by axis
//! in double precision, and a 4-wide one computing the three axes at once in single
//! precision. They accept and reject the same rays and agree on the interval up to
//! single-precision rounding.

use wide::f32x4;

use crate::math::*;

/// Entry / exit ray parameters of an intersected region
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitInterval {
	pub t_min: f64,
	pub t_max: f64,
}

pub trait SlabIntersector: Sync {
	fn intersect(&self, aabb: &AABB, ray: Ray) -> Option<HitInterval>;
}

/// Axis by axis, rejecting as early as possible
#[derive(Copy, Clone, Debug, Default)]
pub struct ScalarSlab;

/// All three axes in one `f32x4`, lane 3 is padding
#[derive(Copy, Clone, Debug, Default)]
pub struct WideSlab;

impl SlabIntersector for ScalarSlab {
	#[inline]
	fn intersect(&self, aabb: &AABB, ray: Ray) -> Option<HitInterval> {
		let mut t_near = NEG_INFINITY;
		let mut t_far = INFINITY;

		for &axis in &Axis::ALL {
			let o = ray.origin[axis];
			let d = ray.direction[axis];

			if d.abs() < PARALLEL_EPSILON {
				// parallel to this slab: the origin has to be inside it already
				if o < aabb.min[axis] || o > aabb.max[axis] {
					return None;
				}
				continue;
			}

			let inv_dir = 1.0 / d;
			let mut t1 = (aabb.min[axis] - o) * inv_dir;
			let mut t2 = (aabb.max[axis] - o) * inv_dir;
			if t1 > t2 {
				std::mem::swap(&mut t1, &mut t2);
			}

			t_near = t_near.max(t1);
			t_far = t_far.min(t2);

			if t_near > t_far || t_far < 0.0 {
				return None;
			}
		}

		Some(HitInterval { t_min: t_near, t_max: t_far })
	}
}

/// Lane mask with every bit set where `flags` holds, the padding lane set to `pad`
#[inline]
fn lane_mask(flags: [bool; 3], pad: bool) -> f32x4 {
	let lane = |set: bool| if set { f32::from_bits(!0) } else { 0.0 };
	f32x4::new([lane(flags[0]), lane(flags[1]), lane(flags[2]), lane(pad)])
}

impl SlabIntersector for WideSlab {
	#[inline]
	fn intersect(&self, aabb: &AABB, ray: Ray) -> Option<HitInterval> {
		// the padding lane is a unit slab the origin sits in, with a parallel direction,
		// so it never narrows the interval
		let lo = f32x4::new([aabb.min.x as f32, aabb.min.y as f32, aabb.min.z as f32, -1.0]);
		let hi = f32x4::new([aabb.max.x as f32, aabb.max.y as f32, aabb.max.z as f32, 1.0]);
		let origin = f32x4::new([ray.origin.x as f32, ray.origin.y as f32, ray.origin.z as f32, 0.0]);
		let dir = f32x4::new([ray.direction.x as f32, ray.direction.y as f32, ray.direction.z as f32, 0.0]);

		let inv_dir = f32x4::splat(1.0) / dir;
		let t1 = (lo - origin) * inv_dir;
		let t2 = (hi - origin) * inv_dir;
		let near = t1.min(t2);
		let far = t1.max(t2);

		// parallel axes are picked on the f64 inputs, a component just under the threshold can round up to it in f32
		let mut parallel = [false; 3];
		let mut outside = [false; 3];
		for (i, &axis) in Axis::ALL.iter().enumerate() {
			parallel[i] = ray.direction[axis].abs() < PARALLEL_EPSILON;
			outside[i] = ray.origin[axis] < aabb.min[axis] || ray.origin[axis] > aabb.max[axis];
		}
		let parallel = lane_mask(parallel, true);
		let outside = lane_mask(outside, false);

		let inf = f32x4::splat(std::f32::INFINITY);
		let neg_inf = f32x4::splat(std::f32::NEG_INFINITY);
		// parallel lanes become (-inf, inf) when the origin is within the slab, (inf, -inf) otherwise
		let near = parallel.blend(outside.blend(inf, neg_inf), near);
		let far = parallel.blend(outside.blend(neg_inf, inf), far);

		let n = near.to_array();
		let f = far.to_array();
		let t_near = n[0].max(n[1]).max(n[2].max(n[3]));
		let t_far = f[0].min(f[1]).min(f[2].min(f[3]));

		if t_near > t_far || t_far < 0.0 {
			return None;
		}

		Some(HitInterval { t_min: t_near as f64, t_max: t_far as f64 })
	}
}

/// Runtime choice between the two implementations
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabKind {
	/// Resolved by `detect()` when the scene is created
	Auto,
	Scalar,
	Wide,
}

impl Default for SlabKind {
	fn default() -> SlabKind {
		SlabKind::Auto
	}
}

impl SlabKind {
	/// The vectorized test pays off only with native 128-bit lanes
	pub fn detect() -> SlabKind {
		if cfg!(any(target_feature = "sse2", target_feature = "neon", target_feature = "simd128")) {
			SlabKind::Wide
		} else {
			SlabKind::Scalar
		}
	}

	pub fn resolve(self) -> SlabKind {
		match self {
			SlabKind::Auto => SlabKind::detect(),
			k => k,
		}
	}
}

impl SlabIntersector for SlabKind {
	#[inline]
	fn intersect(&self, aabb: &AABB, ray: Ray) -> Option<HitInterval> {
		match *self {
			SlabKind::Scalar => ScalarSlab.intersect(aabb, ray),
			SlabKind::Wide => WideSlab.intersect(aabb, ray),
			SlabKind::Auto => SlabKind::detect().intersect(aabb, ray),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{Rng, SeedableRng, XorShiftRng};

	fn unit_cube() -> AABB {
		AABB::cube(Vec3::zero(), 1.0)
	}

	fn both() -> [&'static dyn SlabIntersector; 2] {
		[&ScalarSlab, &WideSlab]
	}

	#[test]
	fn front_face_entry() {
		let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
		for slab in &both() {
			let hit = slab.intersect(&unit_cube(), ray).expect("ray towards the cube");
			assert!((hit.t_min - 4.0).abs() < 1e-6);
			assert!((hit.t_max - 6.0).abs() < 1e-6);
		}
	}

	#[test]
	fn parallel_outside_is_rejected() {
		let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(1.0, 0.0, 0.0));
		for slab in &both() {
			assert_eq!(slab.intersect(&unit_cube(), ray), None);
		}
	}

	#[test]
	fn box_behind_is_rejected() {
		let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
		for slab in &both() {
			assert_eq!(slab.intersect(&unit_cube(), ray), None);
		}
	}

	#[test]
	fn origin_inside_has_negative_entry() {
		let ray = Ray::new(Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, 1.0, 0.0));
		for slab in &both() {
			let hit = slab.intersect(&unit_cube(), ray).unwrap();
			assert!(hit.t_min < 0.0);
			assert!((hit.t_max - 0.5).abs() < 1e-6);
		}
	}

	#[test]
	fn degenerate_direction() {
		let inside = Ray::new(Vec3::new(0.2, 0.3, -0.4), Vec3::zero());
		let outside = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::zero());
		for slab in &both() {
			let hit = slab.intersect(&unit_cube(), inside).unwrap();
			assert_eq!(hit.t_min, NEG_INFINITY);
			assert_eq!(hit.t_max, INFINITY);
			assert_eq!(slab.intersect(&unit_cube(), outside), None);
		}
	}

	#[test]
	fn parallel_threshold_matches_in_both_precisions() {
		// 9.99999999e-7 is parallel in f64 but rounds to exactly 1e-6 in f32
		let tall = AABB::new(Vec3::new(-1.0, -1.0, -1e7), Vec3::new(1.0, 1.0, 1e7));
		let dir = Vec3::new(9.99999999e-7, 0.0, 1.0);
		let outside = Ray::new(Vec3::new(-1.5, 0.0, 0.0), dir);
		let inside = Ray::new(Vec3::new(0.5, 0.0, 0.0), dir);
		for slab in &both() {
			assert_eq!(slab.intersect(&tall, outside), None);
			let hit = slab.intersect(&tall, inside).expect("origin within the x slab");
			assert!((hit.t_max - 1e7).abs() < 1.0);
		}
	}

	fn close(a: f64, b: f64) -> bool {
		a == b || (a - b).abs() <= 1e-4 * a.abs().max(b.abs()).max(1.0)
	}

	// inputs are drawn as f32 so both implementations see exactly the same numbers
	fn random_vec<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> Vec3 {
		Vec3::new(rng.gen_range(lo, hi) as f64, rng.gen_range(lo, hi) as f64, rng.gen_range(lo, hi) as f64)
	}

	#[test]
	fn scalar_and_wide_agree() {
		let mut rng = XorShiftRng::from_seed([0x193a_6754, 0xa8a7_d469, 0x9783_0e05, 0x113b_a7bb]);
		let mut accepted = 0;

		for _ in 0..10_000 {
			let a = random_vec(&mut rng, -4.0, 4.0);
			let b = random_vec(&mut rng, -4.0, 4.0);
			let aabb = AABB::new(Vec3::min(a, b), Vec3::max(a, b));
			let origin = random_vec(&mut rng, -8.0, 8.0);
			let target = random_vec(&mut rng, -4.0, 4.0);
			let d = (target - origin).normalized();
			let direction = Vec3::new(d.x as f32 as f64, d.y as f32 as f64, d.z as f32 as f64);
			let ray = Ray::new(origin, direction);

			let s = ScalarSlab.intersect(&aabb, ray);
			let w = WideSlab.intersect(&aabb, ray);
			match (s, w) {
				(None, None) => {}
				(Some(s), Some(w)) => {
					accepted += 1;
					assert!(close(s.t_min, w.t_min), "t_min {} vs {} for {:?} {:?}", s.t_min, w.t_min, aabb, ray);
					assert!(close(s.t_max, w.t_max), "t_max {} vs {} for {:?} {:?}", s.t_max, w.t_max, aabb, ray);
				}
				_ => panic!("scalar {:?} and wide {:?} disagree for {:?} {:?}", s, w, aabb, ray),
			}
		}

		assert!(accepted > 100, "only {} rays accepted", accepted);
	}

	#[test]
	fn auto_resolves_to_a_concrete_kind() {
		assert_ne!(SlabKind::Auto.resolve(), SlabKind::Auto);
		assert_eq!(SlabKind::Scalar.resolve(), SlabKind::Scalar);
	}
}

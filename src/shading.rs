use crate::math::*;
use crate::scene::Sponge;
use crate::slab::HitInterval;

/// Turns the outcome of a primary ray into a linear RGB color in `[0, 1]`
pub trait Shader: Sync {
	fn shade(&self, sponge: &Sponge, ray: Ray, hit: Option<HitInterval>) -> Vec3;
}

/// Pack a `[0, 1]` color as `0xRRGGBB`
pub fn pack_rgb(c: Vec3) -> u32 {
	let c = c.map(|v| (v.max(0.0).min(1.0) * 255.0 + 0.5).floor());
	((c.x as u32) << 16) | ((c.y as u32) << 8) | (c.z as u32)
}

pub fn unpack_rgb(p: u32) -> Vec3 {
	Vec3::new(((p >> 16) & 0xff) as f64, ((p >> 8) & 0xff) as f64, (p & 0xff) as f64) / 255.0
}

/// Sky gradient above the horizon, gray ground below
pub fn environment(dir: Vec3) -> Vec3 {
	if dir.y > 0.0 {
		let t = dir.y * 0.5 + 0.5;
		Vec3::new(135.0 + t * 120.0, 206.0 + t * 49.0, 235.0) / 255.0
	} else {
		Vec3::thrice(50.0 - dir.y * 75.0) / 255.0
	}
}

/// Flat-colored cubes lit by a directional light, with a faint reflection of the
/// environment or of the sponge itself
pub struct MengerShader {
	pub exterior: Vec3,
	pub interior: Vec3,
	pub background: Vec3,
	/// Direction the light travels in
	pub light_dir: Vec3,
	pub ambient: f64,
	/// Ambient term of the plain cube drawn at 0 iterations, which has no reflection
	pub cube_ambient: f64,
	pub diffuse: f64,
	pub exterior_reflectivity: f64,
	pub interior_reflectivity: f64,
	/// Seen in a reflection that hits the sponge again
	pub exterior_occluded: Vec3,
	pub interior_occluded: Vec3,
}

impl Default for MengerShader {
	fn default() -> MengerShader {
		MengerShader {
			exterior: unpack_rgb(0xaaccdd),
			interior: unpack_rgb(0xffa500),
			background: Vec3::zero(),
			light_dir: Vec3::new(0.5, 0.5, -1.0).normalized(),
			ambient: 0.3,
			cube_ambient: 0.2,
			diffuse: 0.7,
			exterior_reflectivity: 0.15,
			interior_reflectivity: 0.3,
			exterior_occluded: unpack_rgb(0x8899aa),
			interior_occluded: unpack_rgb(0x221100),
		}
	}
}

/// How close to a face a hit point must be to count as lying on it
const FACE_EPSILON: f64 = 1e-3;
/// Offset of secondary ray origins along the normal
const NORMAL_OFFSET: f64 = 1e-3;

/// Axis whose nearest grid plane is closest to `p`; the normal faces back towards the ray
fn estimate_normal(sponge: &Sponge, p: Vec3, dir: Vec3) -> Vec3 {
	let cell = sponge.cell_size();
	let origin = sponge.bounds().min;

	let mut best = (Axis::X, INFINITY);
	for &axis in &Axis::ALL {
		let u = (p[axis] - origin[axis]) / cell[axis];
		let dist = (u - u.round()).abs() * cell[axis];
		if dist < best.1 {
			best = (axis, dist);
		}
	}

	let axis = best.0;
	Vec3::unit(axis, if dir[axis] > 0.0 { -1.0 } else { 1.0 })
}

/// Whether `p` sits on the outer hull of the sponge rather than inside a tunnel
fn on_hull(sponge: &Sponge, p: Vec3) -> bool {
	let b = sponge.bounds();
	Axis::ALL.iter().any(|&a| (p[a] - b.min[a]).abs() < FACE_EPSILON || (p[a] - b.max[a]).abs() < FACE_EPSILON)
}

impl Shader for MengerShader {
	fn shade(&self, sponge: &Sponge, ray: Ray, hit: Option<HitInterval>) -> Vec3 {
		let hit = match hit {
			Some(hit) if hit.t_min > 0.0 => hit,
			_ => return self.background,
		};

		let p = ray.point_at(hit.t_min);
		let normal = estimate_normal(sponge, p, ray.direction);
		let lambert = -Vec3::dot(normal, self.light_dir);

		if sponge.iterations() == 0 {
			return self.exterior * (self.cube_ambient + lambert.max(0.0) * self.diffuse);
		}

		let interior = !on_hull(sponge, p);
		let base = if interior { self.interior } else { self.exterior };

		let reflected = ray.direction.reflect(normal).normalized();
		let bounce = Ray::new(p + normal * NORMAL_OFFSET, reflected);
		let reflection = if !sponge.occluded(bounce) {
			environment(reflected)
		} else if interior {
			self.interior_occluded
		} else {
			self.exterior_occluded
		};
		let reflectivity = if interior { self.interior_reflectivity } else { self.exterior_reflectivity };
		let color = lerp(base, reflection, reflectivity);

		let intensity = if lambert > 0.0 { self.ambient + lambert * self.diffuse } else { self.ambient };

		color * intensity
	}
}

/// Shows the BVH hit distance as a gray level, near is bright
pub struct DepthShader {
	pub far: f64,
}

impl Shader for DepthShader {
	fn shade(&self, _sponge: &Sponge, _ray: Ray, hit: Option<HitInterval>) -> Vec3 {
		match hit {
			Some(hit) if hit.t_min > 0.0 => Vec3::thrice(1.0 - (hit.t_min / self.far).min(1.0)),
			_ => Vec3::zero(),
		}
	}
}

use crate::math::*;

/// Pinhole camera looking down its local +Z axis
#[derive(Clone, Debug)]
pub struct Camera {
	pos: Vec3,
	transform: Mat3,

	resolution: (usize, usize),
	ratio: f64,

	fov_scale: f64,
}

impl Camera {
	/// `rotation` holds Euler angles in radians applied around X, then Y, then Z;
	/// `fov` is the vertical field of view in degrees
	pub fn new(pos: Vec3, rotation: Vec3, resolution: (usize, usize), fov: f64) -> Camera {
		Camera {
			pos,
			transform: Mat3::rot_xyz(rotation),
			resolution,
			ratio: resolution.0 as f64 / resolution.1 as f64,
			fov_scale: (fov * PI / 360.0).tan(),
		}
	}

	/// Primary ray through the center of `pixel`, counted from the top-left corner
	pub fn make_ray(&self, pixel: (usize, usize)) -> Ray {
		let (width, height) = self.resolution;
		let local_dir = Vec3 {
			x: (2.0 * (pixel.0 as f64 + 0.5) / width as f64 - 1.0) * self.fov_scale * self.ratio,
			y: (1.0 - 2.0 * (pixel.1 as f64 + 0.5) / height as f64) * self.fov_scale,
			z: 1.0,
		};

		Ray {
			origin: self.pos,
			direction: self.transform.transform_vector(local_dir).normalized(),
		}
	}

	pub fn resolution(&self) -> (usize, usize) {
		self.resolution
	}

	pub fn position(&self) -> Vec3 {
		self.pos
	}

	pub fn set_rotation(&mut self, rotation: Vec3) {
		self.transform = Mat3::rot_xyz(rotation);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn center_pixel_looks_forward() {
		let cam = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::zero(), (101, 101), 60.0);
		let ray = cam.make_ray((50, 50));
		assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -5.0));
		assert!((ray.direction - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
	}

	#[test]
	fn corners_span_the_field_of_view() {
		let cam = Camera::new(Vec3::zero(), Vec3::zero(), (200, 100), 90.0);
		let top_left = cam.make_ray((0, 0)).direction;
		let bottom_right = cam.make_ray((199, 99)).direction;
		assert!(top_left.x < 0.0 && top_left.y > 0.0);
		assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
		assert!((top_left.length() - 1.0).abs() < 1e-12);
		// the horizontal extent is twice the vertical one
		assert!((top_left.x / top_left.y + 199.0 / 99.0).abs() < 1e-9);
	}

	#[test]
	fn top_view_looks_down() {
		let mut cam = Camera::new(Vec3::new(0.0, 3.0, 0.0), Vec3::zero(), (64, 64), 80.0);
		cam.set_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
		let d = cam.make_ray((32, 32)).direction;
		assert!(d.y < -0.999);
	}
}

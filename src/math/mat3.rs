use std::ops::{Index, Mul};
use crate::math::Vec3;

/// row-major 3x3 matrix
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Mat3([f64; 9]);

impl Mat3 {
	pub fn identity() -> Mat3 {
		Mat3([
			1.0, 0.0, 0.0,
			0.0, 1.0, 0.0,
			0.0, 0.0, 1.0,
		])
	}

	pub fn rot_x(angle: f64) -> Mat3 {
		let (s, c) = angle.sin_cos();
		Mat3([
			1.0, 0.0, 0.0,
			0.0,   c,  -s,
			0.0,   s,   c,
		])
	}

	pub fn rot_y(angle: f64) -> Mat3 {
		let (s, c) = angle.sin_cos();
		Mat3([
			  c, 0.0,   s,
			0.0, 1.0, 0.0,
			 -s, 0.0,   c,
		])
	}

	pub fn rot_z(angle: f64) -> Mat3 {
		let (s, c) = angle.sin_cos();
		Mat3([
			  c,  -s, 0.0,
			  s,   c, 0.0,
			0.0, 0.0, 1.0,
		])
	}

	/// Rotation applying `r.x` around X first, then `r.y` around Y, then `r.z` around Z (radians)
	pub fn rot_xyz(r: Vec3) -> Mat3 {
		Mat3::rot_z(r.z) * Mat3::rot_y(r.y) * Mat3::rot_x(r.x)
	}

	pub fn transform_vector(&self, v: Vec3) -> Vec3 {
		let a = &self;
		Vec3 {
			x: a[(0,0)] * v.x + a[(0,1)] * v.y + a[(0,2)] * v.z,
			y: a[(1,0)] * v.x + a[(1,1)] * v.y + a[(1,2)] * v.z,
			z: a[(2,0)] * v.x + a[(2,1)] * v.y + a[(2,2)] * v.z,
		}
	}
}

impl Mul for Mat3 {
	type Output = Mat3;
	fn mul(self, rhs: Mat3) -> Mat3 {
		let a = &self.0;
		let b = &rhs.0;
		let mut result = [0.0; 9];

		for i in 0..3 {
			for t in 0..3 {
				result[i*3 + t] =
					a[i*3 + 0]*b[0*3 + t] +
					a[i*3 + 1]*b[1*3 + t] +
					a[i*3 + 2]*b[2*3 + t];
			}
		}

		Mat3(result)
	}
}

impl Index<(usize, usize)> for Mat3 {
	type Output = f64;

	fn index(&self, coord: (usize, usize)) -> &f64 {
		&self.0[3 * coord.0 + coord.1]
	}
}

#[test]
fn test_identity_rotation() {
	assert!(Mat3::rot_xyz(Vec3::zero()) == Mat3::identity());
}

#[test]
fn test_rotation_order() {
	use crate::math::FRAC_PI_2;
	// +Z turned a quarter around X lands on -Y, then a quarter around Z lands on +X
	let v = Mat3::rot_xyz(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2)).transform_vector(Vec3::new(0.0, 0.0, 1.0));
	assert!((v - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-12);
}

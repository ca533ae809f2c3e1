use std::ops::{Add, Sub, Mul, Div, Index, IndexMut};
use crate::math::Axis;

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Vec3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Vec3 {
	#[inline(always)]
	pub fn new(x: f64, y: f64, z: f64) -> Vec3 {
		Vec3 { x, y, z }
	}

	#[inline(always)]
	pub fn zero() -> Vec3 {
		Vec3 { x: 0.0, y: 0.0, z: 0.0 }
	}

	#[inline(always)]
	pub fn thrice(v: f64) -> Vec3 {
		Vec3 { x: v, y: v, z: v }
	}

	/// Unit vector along `axis`, scaled by `sign`
	#[inline(always)]
	pub fn unit(axis: Axis, sign: f64) -> Vec3 {
		let mut v = Vec3::zero();
		v[axis] = sign;
		v
	}

	#[inline(always)]
	pub fn dot(lhs: Vec3, rhs: Vec3) -> f64 {
		(lhs * rhs).sum()
	}

	#[inline(always)]
	pub fn length(self) -> f64 {
		Vec3::dot(self, self).sqrt()
	}

	#[inline(always)]
	pub fn normalized(self) -> Vec3 {
		self / self.length()
	}

	#[inline(always)]
	pub fn reflect(self, normal: Vec3) -> Vec3 {
		self - normal * (2.0 * Vec3::dot(self, normal))
	}

	#[inline(always)]
	pub fn min(lhs: Vec3, rhs: Vec3) -> Vec3 {
		Vec3 {
			x: lhs.x.min(rhs.x),
			y: lhs.y.min(rhs.y),
			z: lhs.z.min(rhs.z),
		}
	}

	#[inline(always)]
	pub fn max(lhs: Vec3, rhs: Vec3) -> Vec3 {
		Vec3 {
			x: lhs.x.max(rhs.x),
			y: lhs.y.max(rhs.y),
			z: lhs.z.max(rhs.z),
		}
	}

	#[inline(always)]
	pub fn sum(self) -> f64 {
		self.x + self.y + self.z
	}

	#[inline(always)]
	pub fn all_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
	}

	#[inline(always)]
	pub fn map<F>(self, f: F) -> Vec3
		where F : Fn(f64) -> f64
	{
		Vec3 {
			x: f(self.x),
			y: f(self.y),
			z: f(self.z),
		}
	}
}

impl Add for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn add(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
	}
}

impl Sub for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn sub(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
	}
}

impl Mul for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn mul(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self.x * rhs.x, y: self.y * rhs.y, z: self.z * rhs.z }
	}
}

impl Mul<f64> for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn mul(self, rhs: f64) -> Vec3 {
		Vec3 { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
	}
}

impl Mul<Vec3> for f64 {
	type Output = Vec3;
	#[inline(always)]
	fn mul(self, rhs: Vec3) -> Vec3 {
		Vec3 { x: self * rhs.x, y: self * rhs.y, z: self * rhs.z }
	}
}

impl Div<f64> for Vec3 {
	type Output = Vec3;
	#[inline(always)]
	fn div(self, rhs: f64) -> Vec3 {
		let s = 1.0 / rhs;
		self * s
	}
}

impl Index<Axis> for Vec3 {
	type Output = f64;
	#[inline(always)]
	fn index(&self, index: Axis) -> &f64 {
		match index {
			Axis::X => &self.x,
			Axis::Y => &self.y,
			Axis::Z => &self.z,
		}
	}
}

impl IndexMut<Axis> for Vec3 {
	#[inline(always)]
	fn index_mut(&mut self, index: Axis) -> &mut f64 {
		match index {
			Axis::X => &mut self.x,
			Axis::Y => &mut self.y,
			Axis::Z => &mut self.z,
		}
	}
}

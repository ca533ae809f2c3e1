use crate::math::*;

/// Sub-cubes kept per subdivision step: 27 minus the center and the 6 face centers
pub const SURVIVORS: usize = 20;

/// Grid cell `(i, j, k)` of a 3x3x3 split is removed when two of its indices are the middle one
#[inline]
pub fn is_hole(i: usize, j: usize, k: usize) -> bool {
	(i == 1 && j == 1) || (i == 1 && k == 1) || (j == 1 && k == 1)
}

/// The four plane positions splitting `[min, max]` in three, the outer two being exactly `min` and `max`
fn grid_planes(min: f64, max: f64) -> [f64; 4] {
	let third = (max - min) / 3.0;
	[min, min + third, min + 2.0 * third, max]
}

/// Sub-cubes of `bounds` that belong to the sponge at the next level.
/// Empty when `depth` is 0, meaning `bounds` is a leaf.
pub fn subdivide(bounds: &AABB, depth: u32) -> Vec<AABB> {
	if depth == 0 {
		return Vec::new();
	}

	let gx = grid_planes(bounds.min.x, bounds.max.x);
	let gy = grid_planes(bounds.min.y, bounds.max.y);
	let gz = grid_planes(bounds.min.z, bounds.max.z);

	let mut children = Vec::with_capacity(SURVIVORS);
	for i in 0..3 {
		for j in 0..3 {
			for k in 0..3 {
				if is_hole(i, j, k) {
					continue;
				}
				children.push(AABB::new(
					Vec3::new(gx[i], gy[j], gz[k]),
					Vec3::new(gx[i + 1], gy[j + 1], gz[k + 1]),
				));
			}
		}
	}
	children
}

/// Grid index of `v` along one axis, points on an inner plane going to the upper cell
fn cell_index(planes: &[f64; 4], v: f64) -> usize {
	if v < planes[1] {
		0
	} else if v < planes[2] {
		1
	} else {
		2
	}
}

/// Whether `p` lies in the solid part of the sponge built over `bounds` with `iterations` levels.
/// Points exactly on an inner grid plane are judged by the cell above it.
pub fn is_solid(bounds: &AABB, p: Vec3, iterations: u32) -> bool {
	if !bounds.contains(p) {
		return false;
	}

	let mut cell = *bounds;
	for _ in 0..iterations {
		let gx = grid_planes(cell.min.x, cell.max.x);
		let gy = grid_planes(cell.min.y, cell.max.y);
		let gz = grid_planes(cell.min.z, cell.max.z);
		let (i, j, k) = (cell_index(&gx, p.x), cell_index(&gy, p.y), cell_index(&gz, p.z));

		if is_hole(i, j, k) {
			return false;
		}

		cell = AABB::new(
			Vec3::new(gx[i], gy[j], gz[k]),
			Vec3::new(gx[i + 1], gy[j + 1], gz[k + 1]),
		);
	}
	true
}

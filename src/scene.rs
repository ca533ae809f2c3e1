use std::fmt;

use time::PreciseTime;

use crate::bvh::{self, BVH};
use crate::error::Result;
use crate::math::*;
use crate::slab::{HitInterval, SlabKind};

/// Iteration counts above this are clamped
pub const MAX_ITERATIONS: u32 = 10;

/// Default cap on the tree size, enough for 5 iterations
pub const DEFAULT_NODE_BUDGET: usize = 1 << 23;

/// Clamp a requested iteration count into `0..=MAX_ITERATIONS`
pub fn clamp_iterations(requested: i64) -> u32 {
	if requested < 0 {
		warn!("negative iteration count {} clamped to 0", requested);
		0
	} else if requested > MAX_ITERATIONS as i64 {
		warn!("iteration count {} clamped to {}", requested, MAX_ITERATIONS);
		MAX_ITERATIONS
	} else {
		requested as u32
	}
}

/// A Menger sponge and the BVH standing for it.
///
/// The tree is rebuilt from scratch whenever the iteration count changes. Rebuilding needs
/// `&mut self` while rendering borrows the sponge, so no render can be in flight at that point.
pub struct Sponge {
	bounds: AABB,
	iterations: u32,
	slab: SlabKind,
	node_budget: usize,
	bvh: BVH,
}

impl Sponge {
	pub fn new(bounds: AABB, iterations: i64, slab: SlabKind, node_budget: usize) -> Result<Sponge> {
		let iterations = clamp_iterations(iterations);
		let slab = slab.resolve();
		let bvh = build_timed(bounds, iterations, node_budget)?;
		debug!("using the {:?} slab test", slab);
		Ok(Sponge { bounds, iterations, slab, node_budget, bvh })
	}

	/// The classic sponge over the `[-1, 1]` cube
	pub fn unit(iterations: i64) -> Result<Sponge> {
		Sponge::new(AABB::cube(Vec3::zero(), 1.0), iterations, SlabKind::Auto, DEFAULT_NODE_BUDGET)
	}

	/// Rebuild the tree for a new iteration count.
	///
	/// On failure the previous tree and iteration count are kept.
	pub fn set_iterations(&mut self, iterations: i64) -> Result<()> {
		let iterations = clamp_iterations(iterations);
		if iterations == self.iterations {
			return Ok(());
		}
		let bvh = build_timed(self.bounds, iterations, self.node_budget)?;
		// the old tree is dropped here, after the new one exists
		self.bvh = bvh;
		self.iterations = iterations;
		Ok(())
	}

	pub fn iterations(&self) -> u32 {
		self.iterations
	}

	pub fn bounds(&self) -> AABB {
		self.bounds
	}

	pub fn slab(&self) -> SlabKind {
		self.slab
	}

	pub fn set_slab(&mut self, slab: SlabKind) {
		self.slab = slab.resolve();
	}

	pub fn bvh(&self) -> &BVH {
		&self.bvh
	}

	/// Edge length of the smallest cubes along each axis
	pub fn cell_size(&self) -> Vec3 {
		self.bounds.size() / 3f64.powi(self.iterations as i32)
	}

	pub fn intersect(&self, ray: Ray) -> Option<HitInterval> {
		self.bvh.intersect(&self.slab, ray)
	}

	/// Whether anything lies along `ray` in front of its origin
	pub fn occluded(&self, ray: Ray) -> bool {
		self.intersect(ray).is_some()
	}
}

impl fmt::Display for Sponge {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "3D Mode | Iterations: {}", self.iterations)
	}
}

fn build_timed(bounds: AABB, iterations: u32, node_budget: usize) -> Result<BVH> {
	info!("Building the sponge BVH with {} iterations...", iterations);
	let start = PreciseTime::now();
	let bvh = BVH::build(bounds, iterations, node_budget)?;
	let ms = start.to(PreciseTime::now()).num_milliseconds();
	info!("Built {} nodes ({} leaves, height {}) in {}ms",
		bvh::node_count(iterations).unwrap_or(0), bvh.leaf_count(), bvh.height(), ms);
	Ok(bvh)
}

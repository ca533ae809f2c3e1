use crate::error::{Error, Result};
use crate::math::*;
use crate::menger;
use crate::slab::{HitInterval, SlabIntersector};

/// Added to the entry distance of a leaf hit so rays leaving that surface do not hit it again
pub const LEAF_HIT_OFFSET: f64 = 1e-4;

/// Bounding volume hierarchy over the cubes of a Menger sponge.
///
/// Each level of the sponge gives 20 sub-cubes which are folded into a binary tree by
/// merging neighbours pairwise, so nodes always have zero or two children. The tree is
/// immutable once built; the whole of it is dropped when it is replaced.
#[derive(Debug)]
pub struct BVH {
	bbox: AABB,
	level: u32,
	node: Node,
}

#[derive(Debug)]
enum Node {
	Leaf,
	Split { children: [Box<BVH>; 2] },
}

/// Number of nodes of a tree built with `depth` levels: `20^depth` leaves and one fewer internal nodes
pub fn node_count(depth: u32) -> Option<usize> {
	menger::SURVIVORS.checked_pow(depth)
		.and_then(|leaves| leaves.checked_mul(2))
		.map(|n| n - 1)
}

impl BVH {
	/// Build the tree of `bounds` down to `depth` levels, refusing trees larger than `node_budget`.
	///
	/// A failed build never yields a partial tree.
	pub fn build(bounds: AABB, depth: u32, node_budget: usize) -> Result<BVH> {
		match node_count(depth) {
			Some(n) if n <= node_budget => build_rec(bounds, depth),
			_ => Err(Error::NodeBudget { iterations: depth, budget: node_budget }),
		}
	}

	pub fn leaf(bbox: AABB, level: u32) -> BVH {
		BVH { bbox, level, node: Node::Leaf }
	}

	/// Internal node over `left` and `right`, bounded by their union
	pub fn split(left: BVH, right: BVH, level: u32) -> BVH {
		BVH {
			bbox: left.bbox.union(&right.bbox),
			level,
			node: Node::Split { children: [Box::new(left), Box::new(right)] },
		}
	}

	pub fn bbox(&self) -> AABB {
		self.bbox
	}

	/// Recursion depth left when the node was created
	pub fn level(&self) -> u32 {
		self.level
	}

	pub fn is_leaf(&self) -> bool {
		match self.node {
			Node::Leaf => true,
			Node::Split { .. } => false,
		}
	}

	pub fn left(&self) -> Option<&BVH> {
		match self.node {
			Node::Leaf => None,
			Node::Split { ref children } => Some(&children[0]),
		}
	}

	pub fn right(&self) -> Option<&BVH> {
		match self.node {
			Node::Leaf => None,
			Node::Split { ref children } => Some(&children[1]),
		}
	}

	pub fn leaf_count(&self) -> usize {
		match self.node {
			Node::Leaf => 1,
			Node::Split { ref children } => children[0].leaf_count() + children[1].leaf_count(),
		}
	}

	pub fn node_count(&self) -> usize {
		match self.node {
			Node::Leaf => 1,
			Node::Split { ref children } => 1 + children[0].node_count() + children[1].node_count(),
		}
	}

	pub fn height(&self) -> usize {
		match self.node {
			Node::Leaf => 0,
			Node::Split { ref children } => 1 + children[0].height().max(children[1].height()),
		}
	}

	/// Nearest region of the tree hit by `ray`, if any
	pub fn intersect<S: SlabIntersector>(&self, slab: &S, ray: Ray) -> Option<HitInterval> {
		let hit = slab.intersect(&self.bbox, ray)?;
		intersect_rec(self, slab, ray, hit)
	}
}

fn build_rec(bounds: AABB, depth: u32) -> Result<BVH> {
	if depth == 0 {
		return Ok(BVH::leaf(bounds, depth));
	}

	let cubes = menger::subdivide(&bounds, depth);
	let mut nodes: Vec<BVH> = Vec::new();
	nodes.try_reserve_exact(cubes.len())?;
	for cube in cubes {
		nodes.push(build_rec(cube, depth - 1)?);
	}

	// merge neighbours pairwise until a single root remains; an odd one out moves up as is
	while nodes.len() > 1 {
		let mut merged = Vec::new();
		merged.try_reserve_exact((nodes.len() + 1) / 2)?;
		let mut iter = nodes.into_iter();
		while let Some(left) = iter.next() {
			match iter.next() {
				Some(right) => merged.push(BVH::split(left, right, depth)),
				None => merged.push(left),
			}
		}
		nodes = merged;
	}

	Ok(match nodes.pop() {
		Some(mut root) => {
			root.level = depth;
			root
		}
		None => BVH::leaf(bounds, depth),
	})
}

/// `hit` is the already computed intersection of `ray` with `bvh.bbox`
fn intersect_rec<S: SlabIntersector>(bvh: &BVH, slab: &S, ray: Ray, hit: HitInterval) -> Option<HitInterval> {
	let children = match bvh.node {
		Node::Leaf => return Some(HitInterval { t_min: hit.t_min + LEAF_HIT_OFFSET, t_max: hit.t_max }),
		Node::Split { ref children } => children,
	};

	let left = slab.intersect(&children[0].bbox, ray).map(|h| (&*children[0], h));
	let right = slab.intersect(&children[1].bbox, ray).map(|h| (&*children[1], h));

	// visit the child whose box is entered first
	let (near, far) = match (left, right) {
		(None, None) => return None,
		(Some(c), None) | (None, Some(c)) => (c, None),
		(Some(l), Some(r)) => {
			if l.1.t_min < r.1.t_min { (l, Some(r)) } else { (r, Some(l)) }
		}
	};

	match intersect_rec(near.0, slab, ray, near.1) {
		Some(its) => {
			// the far child can only do better if its box starts before the current hit
			if let Some((far_node, far_hit)) = far {
				if far_hit.t_min < its.t_min {
					if let Some(other) = intersect_rec(far_node, slab, ray, far_hit) {
						if other.t_min < its.t_min {
							return Some(other);
						}
					}
				}
			}
			Some(its)
		}
		None => far.and_then(|(far_node, far_hit)| intersect_rec(far_node, slab, ray, far_hit)),
	}
}

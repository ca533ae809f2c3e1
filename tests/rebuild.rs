//! Rebuilding the sponge must release every node of the previous tree.

extern crate menger;

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicIsize, Ordering};

use menger::scene::Sponge;

struct Counting;

static LIVE_BYTES: AtomicIsize = AtomicIsize::new(0);
static LIVE_BLOCKS: AtomicIsize = AtomicIsize::new(0);

thread_local! {
	// only the test thread is counted, the harness allocates on its own threads
	static TRACKING: Cell<bool> = const { Cell::new(false) };
}

fn tracking() -> bool {
	TRACKING.try_with(|t| t.get()).unwrap_or(false)
}

unsafe impl GlobalAlloc for Counting {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		let p = System.alloc(layout);
		if !p.is_null() && tracking() {
			LIVE_BYTES.fetch_add(layout.size() as isize, Ordering::SeqCst);
			LIVE_BLOCKS.fetch_add(1, Ordering::SeqCst);
		}
		p
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		if tracking() {
			LIVE_BYTES.fetch_sub(layout.size() as isize, Ordering::SeqCst);
			LIVE_BLOCKS.fetch_sub(1, Ordering::SeqCst);
		}
		System.dealloc(ptr, layout)
	}
}

#[global_allocator]
static ALLOCATOR: Counting = Counting;

fn live() -> (isize, isize) {
	(LIVE_BYTES.load(Ordering::SeqCst), LIVE_BLOCKS.load(Ordering::SeqCst))
}

#[test]
fn rebuild_and_drop_release_all_nodes() {
	TRACKING.with(|t| t.set(true));

	let mut sponge = Sponge::unit(2).unwrap();
	let (bytes_2, blocks_2) = live();
	assert!(bytes_2 > 0);
	// every node but the root is boxed
	assert!(blocks_2 as usize >= menger::bvh::node_count(2).unwrap() - 1);

	sponge.set_iterations(3).unwrap();
	let (bytes_3, _) = live();
	assert!(bytes_3 > bytes_2 * 10);

	sponge.set_iterations(1).unwrap();
	let (bytes_1, _) = live();
	assert!(bytes_1 < bytes_2);

	drop(sponge);
	TRACKING.with(|t| t.set(false));

	assert_eq!(live(), (0, 0));
}

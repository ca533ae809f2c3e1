//! Error types for building and rendering the sponge.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
	/// The tree for this many iterations would exceed the node budget
	#[error("a sponge of {iterations} iterations needs more than {budget} BVH nodes")]
	NodeBudget { iterations: u32, budget: usize },

	/// Reserving storage for a node list failed
	#[error("out of memory while building the BVH: {0}")]
	Alloc(#[from] TryReserveError),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("cannot start render workers: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	#[error("malformed configuration file: {0}")]
	Json(#[from] serde_json::Error),

	#[error("cannot write image: {0}")]
	Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;

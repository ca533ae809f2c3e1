use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::math::*;
use crate::scene::DEFAULT_NODE_BUDGET;
use crate::slab::SlabKind;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
	pub position: Vec3,
	/// Euler angles in radians, applied around X then Y then Z
	pub rotation: Vec3,
	/// Vertical field of view in degrees
	pub fov: f64,
}

impl Default for CameraConfig {
	// straight above the sponge, looking down
	fn default() -> CameraConfig {
		CameraConfig {
			position: Vec3::new(0.0, 3.0, 0.0),
			rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
			fov: 80.0,
		}
	}
}

/// Everything a render needs, read from a JSON file where every field is optional
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
	pub width: usize,
	pub height: usize,
	pub workers: usize,
	/// One ray per `resolution_factor`² pixels
	pub resolution_factor: usize,
	/// Render coarse to fine from `resolution_factor` down to full resolution
	pub progressive: bool,
	/// Clamped into `0..=MAX_ITERATIONS`
	pub iterations: i64,
	/// Extent of the level 0 cube
	pub bounds: AABB,
	pub slab: SlabKind,
	pub node_budget: usize,
	pub camera: CameraConfig,
	pub output: String,
}

impl Default for RenderConfig {
	fn default() -> RenderConfig {
		RenderConfig {
			width: 1280,
			height: 1024,
			workers: 8,
			resolution_factor: 2,
			progressive: false,
			iterations: 1,
			bounds: AABB::cube(Vec3::zero(), 1.0),
			slab: SlabKind::Auto,
			node_budget: DEFAULT_NODE_BUDGET,
			camera: CameraConfig::default(),
			output: "/tmp/menger.png".to_owned(),
		}
	}
}

impl RenderConfig {
	pub fn load<P: AsRef<Path>>(path: P) -> Result<RenderConfig> {
		let file = BufReader::new(File::open(path)?);
		let config: RenderConfig = serde_json::from_reader(file)?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_json(json: &str) -> Result<RenderConfig> {
		let config: RenderConfig = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn validate(&self) -> Result<()> {
		if self.width == 0 || self.height == 0 {
			return Err(Error::InvalidConfig(format!("empty frame {}x{}", self.width, self.height)));
		}
		if self.workers == 0 {
			return Err(Error::InvalidConfig("workers must be at least 1".into()));
		}
		if self.resolution_factor == 0 {
			return Err(Error::InvalidConfig("resolution_factor must be at least 1".into()));
		}
		let b = &self.bounds;
		if !(b.min.all_finite() && b.max.all_finite() && Axis::ALL.iter().all(|&a| b.min[a] <= b.max[a])) {
			return Err(Error::InvalidConfig(format!("bad sponge bounds {:?}", b)));
		}
		if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
			return Err(Error::InvalidConfig(format!("field of view {} out of (0, 180)", self.camera.fov)));
		}
		Ok(())
	}

	pub fn camera(&self) -> Camera {
		Camera::new(self.camera.position, self.camera.rotation, (self.width, self.height), self.camera.fov)
	}
}

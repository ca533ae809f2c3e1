extern crate image;
extern crate rayon;
extern crate serde;
extern crate serde_json;
extern crate time;
extern crate wide;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod bvh;
pub mod camera;
pub mod config;
pub mod error;
pub mod math;
pub mod menger;
pub mod render;
pub mod scene;
pub mod shading;
pub mod slab;

pub use crate::error::{Error, Result};

use std::path::Path;

use time::PreciseTime;

use crate::config::RenderConfig;
use crate::render::{FrameBuffer, Renderer};
use crate::scene::Sponge;
use crate::shading::MengerShader;

/// Status line shown for a frame, e.g. `3D Mode | Iterations: 2 | Resolution: 4`
pub fn status_line(sponge: &Sponge, resolution_factor: usize) -> String {
	format!("{} | Resolution: {}", sponge, resolution_factor)
}

pub fn save_png<P: AsRef<Path>>(path: P, frame: &FrameBuffer) -> Result<()> {
	image::save_buffer(path, &frame.to_rgb8(), frame.width() as u32, frame.height() as u32, image::ColorType::Rgb8)?;
	Ok(())
}

/// Build the sponge described by `config`, render it and write the image to `config.output`.
///
/// In progressive mode every pass overwrites the output file, so it always holds the
/// sharpest frame finished so far.
pub fn render_to_file(config: &RenderConfig) -> Result<FrameBuffer> {
	config.validate()?;

	let sponge = Sponge::new(config.bounds, config.iterations, config.slab, config.node_budget)?;
	let camera = config.camera();
	let shader = MengerShader::default();
	let renderer = Renderer::new(config.workers)?;
	let mut frame = FrameBuffer::new(config.width, config.height);

	println!("Start rendering...");
	let start = PreciseTime::now();

	if config.progressive {
		let mut saved = Ok(());
		renderer.render_progressive(&sponge, &camera, &shader, &mut frame, config.resolution_factor, |frame, factor| {
			info!("{}", status_line(&sponge, factor));
			if saved.is_ok() {
				saved = save_png(&config.output, frame);
			}
		});
		saved?;
	} else {
		renderer.render(&sponge, &camera, &shader, &mut frame, config.resolution_factor);
		info!("{}", status_line(&sponge, config.resolution_factor));
		save_png(&config.output, &frame)?;
	}

	let tot_s = start.to(PreciseTime::now()).num_milliseconds() as f32 / 1000.0;
	println!("Rendered {}x{} in {:.3}s, written to {}", config.width, config.height, tot_s, config.output);

	Ok(frame)
}

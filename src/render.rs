use std::ops::Range;

use rayon::{ThreadPool, ThreadPoolBuilder};
use time::PreciseTime;

use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::scene::Sponge;
use crate::shading::{pack_rgb, Shader};

/// Packed `0xRRGGBB` pixels, row-major from the top-left corner
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
	width: usize,
	height: usize,
	pixels: Vec<u32>,
}

impl FrameBuffer {
	pub fn new(width: usize, height: usize) -> FrameBuffer {
		FrameBuffer { width, height, pixels: vec![0; width * height] }
	}

	pub fn width(&self) -> usize {
		self.width
	}

	pub fn height(&self) -> usize {
		self.height
	}

	pub fn pixels(&self) -> &[u32] {
		&self.pixels
	}

	/// `None` outside the frame
	pub fn get(&self, x: usize, y: usize) -> Option<u32> {
		if x < self.width && y < self.height {
			Some(self.pixels[y * self.width + x])
		} else {
			None
		}
	}

	pub fn clear(&mut self, color: u32) {
		for p in &mut self.pixels {
			*p = color;
		}
	}

	/// Interleaved 8-bit RGB, as expected by image encoders
	pub fn to_rgb8(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(self.pixels.len() * 3);
		for &p in &self.pixels {
			out.push((p >> 16) as u8);
			out.push((p >> 8) as u8);
			out.push(p as u8);
		}
		out
	}
}

/// Split `0..height` into `bands` consecutive row ranges of equal height, the last one
/// taking the remainder. Empty ranges are left out.
pub fn row_bands(height: usize, bands: usize) -> Vec<Range<usize>> {
	let bands = bands.max(1);
	let rows = height / bands;
	(0..bands)
		.map(|i| {
			let end = if i == bands - 1 { height } else { (i + 1) * rows };
			i * rows..end
		})
		.filter(|r| !r.is_empty())
		.collect()
}

/// Renders frames with a fixed number of workers, one horizontal band of the frame each.
///
/// Bands never overlap so workers write to the frame without synchronization; a frame is
/// complete once every band task has joined.
pub struct Renderer {
	pool: ThreadPool,
	workers: usize,
}

impl Renderer {
	pub fn new(workers: usize) -> Result<Renderer> {
		if workers == 0 {
			return Err(Error::InvalidConfig("at least one render worker is needed".into()));
		}
		let pool = ThreadPoolBuilder::new()
			.num_threads(workers)
			.thread_name(|i| format!("render-{}", i))
			.build()?;
		Ok(Renderer { pool, workers })
	}

	pub fn workers(&self) -> usize {
		self.workers
	}

	/// Render one frame, tracing one ray per `resolution_factor`² block of pixels.
	///
	/// Returns once every worker is done with its band.
	pub fn render<S: Shader>(&self, sponge: &Sponge, camera: &Camera, shader: &S, frame: &mut FrameBuffer, resolution_factor: usize) {
		let width = frame.width;
		let step = resolution_factor.max(1);
		let bands = row_bands(frame.height, self.workers);

		let start = PreciseTime::now();
		self.pool.scope(|s| {
			let mut rest: &mut [u32] = &mut frame.pixels;
			for rows in bands {
				let (band, tail) = std::mem::take(&mut rest).split_at_mut(rows.len() * width);
				rest = tail;
				s.spawn(move |_| render_band(sponge, camera, shader, band, width, rows, step));
			}
		});
		let ms = start.to(PreciseTime::now()).num_milliseconds();
		debug!("Rendered {}x{} at 1/{} resolution with {} workers in {}ms", width, frame.height, step, self.workers, ms);
	}

	/// Render passes at `start_factor`, then half of it and so on down to full resolution,
	/// handing each finished pass to `present`.
	pub fn render_progressive<S, F>(&self, sponge: &Sponge, camera: &Camera, shader: &S, frame: &mut FrameBuffer, start_factor: usize, mut present: F)
		where S: Shader, F: FnMut(&FrameBuffer, usize)
	{
		let mut factor = start_factor.max(1);
		loop {
			self.render(sponge, camera, shader, frame, factor);
			present(frame, factor);
			if factor == 1 {
				break;
			}
			factor /= 2;
		}
	}
}

/// `band` holds the rows `rows` of a frame `width` pixels wide.
/// Each sample is copied over its `step`×`step` block, cut at the band and frame edges.
fn render_band<S: Shader>(sponge: &Sponge, camera: &Camera, shader: &S, band: &mut [u32], width: usize, rows: Range<usize>, step: usize) {
	let (cam_width, cam_height) = camera.resolution();

	for y in rows.clone().step_by(step) {
		for x in (0..width).step_by(step) {
			// pixels the camera does not cover stay untouched
			if x >= cam_width || y >= cam_height {
				continue;
			}

			let ray = camera.make_ray((x, y));
			let color = pack_rgb(shader.shade(sponge, ray, sponge.intersect(ray)));

			for by in y..(y + step).min(rows.end) {
				let row = (by - rows.start) * width;
				for bx in x..(x + step).min(width) {
					band[row + bx] = color;
				}
			}
		}
	}
}

extern crate image;
extern crate menger;

use menger::config::RenderConfig;
use menger::math::*;

#[test]
fn progressive_render_writes_the_final_frame() {
	let output = std::env::temp_dir().join(format!("menger-test-{}.png", std::process::id()));

	let mut config = RenderConfig::default();
	config.width = 48;
	config.height = 32;
	config.workers = 4;
	config.resolution_factor = 4;
	config.progressive = true;
	config.iterations = 2;
	config.camera.position = Vec3::new(0.4, 0.3, -4.0);
	config.camera.rotation = Vec3::zero();
	config.camera.fov = 50.0;
	config.output = output.to_string_lossy().into_owned();

	let frame = menger::render_to_file(&config).unwrap();
	let written = image::open(&output).unwrap().to_rgb8();
	std::fs::remove_file(&output).unwrap();

	assert_eq!(written.dimensions(), (48, 32));
	assert_eq!(written.into_raw(), frame.to_rgb8());
	assert!(frame.pixels().iter().any(|&p| p != 0));
}

#[test]
fn unwritable_output_is_an_error() {
	let mut config = RenderConfig::default();
	config.width = 8;
	config.height = 8;
	config.iterations = 0;
	config.output = "/nonexistent-dir/menger.png".to_owned();
	assert!(menger::render_to_file(&config).is_err());
}

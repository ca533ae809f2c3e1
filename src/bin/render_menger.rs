extern crate env_logger;
extern crate menger;

use menger::config::RenderConfig;

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = std::env::args().collect::<Vec<String>>();

	if args.len() > 2 {
		eprintln!("usage: {} [render_config.json]", args[0]);
		std::process::exit(1);
	}

	let config = match args.get(1) {
		Some(path) => RenderConfig::load(path),
		None => Ok(RenderConfig::default()),
	};

	if let Err(e) = config.and_then(|config| menger::render_to_file(&config)) {
		eprintln!("error: {}", e);
		std::process::exit(1);
	}
}

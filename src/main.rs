use std::env;
use std::fs::File;
use std::path::Path;

use simplelog::{Config, LevelFilter, WriteLogger};

use ownsh::global::State;
use ownsh::repl;

/// Children observe this as the active shell.
const SHELL_PATH: &str = "/bin/ownsh";

fn main() {
	init_logging();
	env::set_var("SHELL", SHELL_PATH);

	println!("************************");
	println!();
	println!("Welcome to ownsh!");
	println!("************************");
	println!();

	let mut state = State::new();
	if let Err(e) = repl::repl(&mut state) {
		eprintln!("ownsh: {}", e);
		std::process::exit(1);
	}
}

/// Best-effort file logger; the shell runs fine without one.
fn init_logging() {
	let Some(home) = env::var_os("HOME") else {
		return;
	};
	let path = Path::new(&home).join(".ownsh.log");
	if let Ok(file) = File::create(path) {
		let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
	}
}

//! Builtins run in the interpreter's own process: `cd` must move the
//! interpreter itself, `exit` must end the loop, and `help` is trivial.
//! Only a single-stage pipeline with no redirections qualifies; a builtin
//! name anywhere else falls through to the external command path and fails
//! there like any unknown program.

use std::env;
use std::path::Path;

use crate::types::{Pipeline, Redirection};

pub const BUILTINS: &[&str] = &["cd", "help", "exit"];

/// What a handled builtin asks of the read-parse-execute loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
	Done(i32),
	Exit,
}

pub fn dispatch(pipeline: &Pipeline) -> Option<BuiltinOutcome> {
	if pipeline.stages.len() != 1 {
		return None;
	}
	let stage = &pipeline.stages[0];
	if stage.stdin != Redirection::None || stage.stdout != Redirection::None {
		return None;
	}
	match stage.argv[0].as_str() {
		"cd" => Some(BuiltinOutcome::Done(cd(&stage.argv[1..]))),
		"help" => Some(BuiltinOutcome::Done(help())),
		"exit" => {
			println!("Bye-bye");
			Some(BuiltinOutcome::Exit)
		}
		_ => None,
	}
}

fn cd(args: &[String]) -> i32 {
	let Some(target) = args.first() else {
		eprintln!("ownsh: expected argument to \"cd\"");
		return 1;
	};
	match env::set_current_dir(Path::new(target)) {
		Ok(()) => 0,
		Err(e) => {
			eprintln!("ownsh: {}: {}", target, e);
			1
		}
	}
}

fn help() -> i32 {
	println!("Welcome to the help page");
	println!("The following commands are built in:");
	for name in BUILTINS {
		println!("  {}", name);
	}
	println!("Use the man command for information on other programs.");
	0
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser;

	fn pipeline(line: &str) -> Pipeline {
		parser::build(line).unwrap().unwrap()
	}

	#[test]
	fn external_commands_are_not_dispatched() {
		assert_eq!(dispatch(&pipeline("ls -l")), None);
	}

	#[test]
	fn exit_ends_the_loop() {
		assert_eq!(dispatch(&pipeline("exit")), Some(BuiltinOutcome::Exit));
	}

	#[test]
	fn help_succeeds() {
		assert_eq!(dispatch(&pipeline("help")), Some(BuiltinOutcome::Done(0)));
	}

	#[test]
	fn builtin_inside_a_pipeline_falls_through() {
		assert_eq!(dispatch(&pipeline("cd /tmp | wc")), None);
		assert_eq!(dispatch(&pipeline("echo a | exit")), None);
	}

	#[test]
	fn redirected_builtin_falls_through() {
		assert_eq!(dispatch(&pipeline("help > out.txt")), None);
	}

	#[test]
	fn cd_without_argument_is_a_usage_error() {
		assert_eq!(dispatch(&pipeline("cd")), Some(BuiltinOutcome::Done(1)));
	}

	#[test]
	fn cd_to_missing_directory_reports_and_stays_put() {
		let before = env::current_dir().unwrap();
		let outcome = dispatch(&pipeline("cd /no/such/ownsh-dir"));
		assert_eq!(outcome, Some(BuiltinOutcome::Done(1)));
		assert_eq!(env::current_dir().unwrap(), before);
	}
}

//! The read-parse-execute loop. Line editing belongs to rustyline; this
//! module only routes each returned line: peripheral commands first, then
//! alias resolution, then the parse / builtin / orchestrator path.

use std::env;
use std::io;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::builtin::{self, BuiltinOutcome};
use crate::eval;
use crate::global::State;
use crate::lexer;
use crate::listing;
use crate::parser;

enum LineResult {
	Continue,
	Exit,
}

pub fn repl(state: &mut State) -> rustyline::Result<()> {
	let mut rl = DefaultEditor::new()?;
	loop {
		state.jobs.reap();
		let prompt = match env::current_dir() {
			Ok(dir) => format!("{}~$ ", dir.display()),
			Err(_) => "ownsh~$ ".to_string(),
		};
		match rl.readline(&prompt) {
			Ok(line) => {
				let line = line.trim();
				if line.is_empty() {
					continue;
				}
				let _ = rl.add_history_entry(line);
				state.history.record(line);
				if let LineResult::Exit = run_line(state, line) {
					break;
				}
			}
			Err(ReadlineError::Interrupted) => continue,
			Err(ReadlineError::Eof) => break,
			Err(e) => {
				eprintln!("ownsh: {}", e);
				break;
			}
		}
	}
	Ok(())
}

fn run_line(state: &mut State, line: &str) -> LineResult {
	// Peripheral commands are matched before anything is tokenized.
	if line == "history" {
		state.history.print();
		return LineResult::Continue;
	}
	if line.starts_with("alias ") || line == "alias" {
		if let Err(e) = state.aliases.define(line) {
			eprintln!("ownsh: {}", e);
		}
		return LineResult::Continue;
	}
	if line == "ls -z" {
		report_io(listing::print_zero_size_files());
		return LineResult::Continue;
	}
	if line == "ls -itime" {
		report_io(listing::print_sorted_by_inode_time());
		return LineResult::Continue;
	}

	let line = match state.aliases.resolve(line) {
		Some(expansion) => expansion,
		None => line.to_string(),
	};

	// A plain command carrying a glob pattern goes to the glob-printer
	// instead of being executed.
	if lexer::shape(&line).is_plain() && line.contains('*') {
		if let Some(pattern) = line.split_whitespace().nth(1) {
			report_io(listing::print_glob_matches(pattern));
			return LineResult::Continue;
		}
	}

	let pipeline = match parser::build(&line) {
		Ok(Some(pipeline)) => pipeline,
		Ok(None) => return LineResult::Continue,
		Err(e) => {
			eprintln!("ownsh: syntax error: {}", e);
			state.history.note("syntax error");
			return LineResult::Continue;
		}
	};

	if let Some(outcome) = builtin::dispatch(&pipeline) {
		return match outcome {
			BuiltinOutcome::Exit => LineResult::Exit,
			BuiltinOutcome::Done(status) => {
				state.history.note(&format!("exit {}", status));
				LineResult::Continue
			}
		};
	}

	match eval::run(state, &pipeline) {
		Ok(outcome) => state.history.note(&outcome.to_string()),
		Err(e) => {
			eprintln!("ownsh: {}", e);
			state.history.note("spawn error");
		}
	}
	LineResult::Continue
}

fn report_io(result: io::Result<()>) {
	if let Err(e) = result {
		eprintln!("ownsh: {}", e);
	}
}

//! End-to-end orchestration tests: build a pipeline from text and run it
//! against real processes. Foreground runs reap their own pids only, so
//! the tests stay independent under the parallel test harness.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ownsh::eval::{self, ExitOutcome};
use ownsh::global::State;
use ownsh::parser;

fn scratch(name: &str) -> PathBuf {
	let dir = std::env::temp_dir().join(format!("ownsh-test-{}", std::process::id()));
	fs::create_dir_all(&dir).unwrap();
	dir.join(name)
}

fn run_line(line: &str) -> ExitOutcome {
	let mut state = State::new();
	let pipeline = parser::build(line).unwrap().unwrap();
	eval::run(&mut state, &pipeline).unwrap()
}

#[test]
fn pipe_round_trip_counts_echoed_bytes() {
	let out = scratch("wc.out");
	let outcome = run_line(&format!("echo hello | wc -c > {}", out.display()));
	assert_eq!(outcome, ExitOutcome::Exited(0));
	// "hello\n" through the pipe is exactly six bytes.
	assert_eq!(fs::read_to_string(&out).unwrap().trim(), "6");
}

#[test]
fn redirections_on_both_ends_of_one_stage() {
	let input = scratch("sort.in");
	let out = scratch("sort.out");
	fs::write(&input, "b\na\n").unwrap();
	let outcome = run_line(&format!("sort < {} > {}", input.display(), out.display()));
	assert_eq!(outcome, ExitOutcome::Exited(0));
	assert_eq!(fs::read_to_string(&out).unwrap(), "a\nb\n");
}

#[test]
fn three_stage_pipeline_flows_left_to_right() {
	let out = scratch("three.out");
	let outcome = run_line(&format!("seq 3 | sort -r | head -n 1 > {}", out.display()));
	assert_eq!(outcome, ExitOutcome::Exited(0));
	assert_eq!(fs::read_to_string(&out).unwrap().trim(), "3");
}

#[test]
fn missing_input_file_fails_only_that_stage() {
	let outcome = run_line("cat < /no/such/ownsh-file");
	assert_eq!(outcome, ExitOutcome::Exited(1));
}

#[test]
fn unknown_command_exits_127() {
	let outcome = run_line("definitely-not-a-command-ownsh");
	assert_eq!(outcome, ExitOutcome::Exited(127));
}

#[test]
fn failing_last_stage_sets_the_outcome() {
	let outcome = run_line("false");
	assert_eq!(outcome, ExitOutcome::Exited(1));
}

#[test]
fn background_pipeline_returns_before_completion() {
	let started = Instant::now();
	let outcome = run_line("sleep 2 &");
	assert!(matches!(outcome, ExitOutcome::Background(_)));
	assert!(started.elapsed() < Duration::from_secs(1));
}

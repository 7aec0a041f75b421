//! Process orchestrator. Realizes a pipeline as one child process per
//! stage: pipes are created before any fork, every stage is forked before
//! any wait, and each pipe end lives in an `OwnedFd` so it is closed
//! exactly once, by the drop in the one process that does not need it.

use std::convert::Infallible;
use std::ffi::{CString, NulError};
use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::{error, fmt};

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{dup2, execvp, fork, pipe, ForkResult};

use crate::global::State;
use crate::job::ProcessHandle;
use crate::redirect;
use crate::types::{Pipeline, Stage};

/// How a pipeline finished, as observed by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
	/// Foreground pipeline done; status of the last stage.
	Exited(i32),
	/// The last stage was killed by this signal.
	Signaled(i32),
	/// Background pipeline spawned and registered under this job id.
	Background(usize),
}

impl fmt::Display for ExitOutcome {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ExitOutcome::Exited(code) => write!(f, "exit {}", code),
			ExitOutcome::Signaled(signal) => write!(f, "signal {}", signal),
			ExitOutcome::Background(id) => write!(f, "background [{}]", id),
		}
	}
}

/// Failure to get the pipeline's processes off the ground at all. Aborts
/// the whole line; the interpreter itself carries on.
#[derive(Debug)]
pub enum SpawnError {
	Pipe(Errno),
	Fork(Errno),
}

impl fmt::Display for SpawnError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			SpawnError::Pipe(e) => write!(f, "cannot create pipe: {}", e),
			SpawnError::Fork(e) => write!(f, "cannot fork: {}", e),
		}
	}
}

impl error::Error for SpawnError {}

/// Child-side failure between fork and exec. Never crosses back into the
/// parent; it only picks the child's diagnostic and exit status.
#[derive(Debug)]
enum ExecError {
	Redirect(io::Error),
	Exec(Errno),
	BadArgv(NulError),
}

impl From<io::Error> for ExecError {
	fn from(e: io::Error) -> ExecError {
		ExecError::Redirect(e)
	}
}

impl From<Errno> for ExecError {
	fn from(e: Errno) -> ExecError {
		ExecError::Exec(e)
	}
}

impl From<NulError> for ExecError {
	fn from(e: NulError) -> ExecError {
		ExecError::BadArgv(e)
	}
}

impl fmt::Display for ExecError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ExecError::Redirect(e) => write!(f, "{}", e),
			ExecError::Exec(e) => write!(f, "exec failed: {}", e),
			ExecError::BadArgv(_) => write!(f, "argument contains a NUL byte"),
		}
	}
}

/// Runs a pipeline. Foreground pipelines are fully reaped before this
/// returns, so a hung child hangs the interpreter; that is the stated
/// behavior, there is no timeout. Background pipelines return immediately
/// after the last fork and are reaped later by the job set.
pub fn run(state: &mut State, pipeline: &Pipeline) -> Result<ExitOutcome, SpawnError> {
	let stages = &pipeline.stages;
	assert!(!stages.is_empty());

	let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(stages.len().saturating_sub(1));
	for _ in 1..stages.len() {
		pipes.push(pipe().map_err(SpawnError::Pipe)?);
	}

	let mut handles: Vec<ProcessHandle> = Vec::with_capacity(stages.len());
	for (i, stage) in stages.iter().enumerate() {
		match unsafe { fork() } {
			Ok(ForkResult::Child) => wire_and_exec(stage, i, pipes),
			Ok(ForkResult::Parent { child }) => {
				handles.push(ProcessHandle { pid: child, stage: i });
			}
			Err(e) => {
				// Closing every pipe end gives the already-forked stages
				// EOF; reap them before giving up on the line.
				drop(pipes);
				for handle in &handles {
					let _ = waitpid(handle.pid, None);
				}
				return Err(SpawnError::Fork(e));
			}
		}
	}
	// Both ends of every pipe now belong exclusively to the children.
	drop(pipes);

	if pipeline.background {
		let id = state.jobs.push(handles, pipeline.to_string());
		log::debug!("background job [{}] spawned", id);
		return Ok(ExitOutcome::Background(id));
	}

	// Reap every stage, not just the last one; the pipeline's outcome is
	// the last stage's status.
	let last = stages.len() - 1;
	let mut outcome = ExitOutcome::Exited(0);
	for handle in &handles {
		let status = wait_stage(handle);
		if handle.stage == last {
			outcome = status;
		}
	}
	Ok(outcome)
}

/// Child side: bind the pipe ends this stage uses onto its standard
/// streams, close everything else, and exec. Never returns to the caller.
fn wire_and_exec(stage: &Stage, index: usize, pipes: Vec<(OwnedFd, OwnedFd)>) -> ! {
	let wired = wire(index, &pipes);
	drop(pipes);
	if let Err(e) = wired {
		eprintln!("ownsh: cannot bind pipe: {}", e);
		unsafe { libc::_exit(126) }
	}
	exec_stage(stage)
}

fn wire(index: usize, pipes: &[(OwnedFd, OwnedFd)]) -> nix::Result<()> {
	if index > 0 {
		dup2(pipes[index - 1].0.as_raw_fd(), libc::STDIN_FILENO)?;
	}
	if index < pipes.len() {
		dup2(pipes[index].1.as_raw_fd(), libc::STDOUT_FILENO)?;
	}
	Ok(())
}

fn exec_stage(stage: &Stage) -> ! {
	let status = match do_exec(stage) {
		Ok(never) => match never {},
		Err(ExecError::Exec(Errno::ENOENT)) => {
			eprintln!("ownsh: command not found: {}", stage.argv[0]);
			127
		}
		Err(e @ ExecError::Redirect(_)) => {
			eprintln!("ownsh: {}", e);
			1
		}
		Err(e) => {
			eprintln!("ownsh: {}", e);
			126
		}
	};
	unsafe { libc::_exit(status) }
}

fn do_exec(stage: &Stage) -> Result<Infallible, ExecError> {
	// File redirections resolve here, after the pipe ends are in place, so
	// they take precedence at the stream end they name.
	redirect::bind(stage)?;
	let argv: Vec<CString> = stage
		.argv
		.iter()
		.map(|arg| CString::new(arg.as_str()))
		.collect::<Result<_, _>>()?;
	Ok(execvp(&argv[0], &argv)?)
}

/// Blocks until this stage exits or dies. A stop is reported once and the
/// wait resumes; suspending and resuming jobs is out of scope.
fn wait_stage(handle: &ProcessHandle) -> ExitOutcome {
	loop {
		match waitpid(handle.pid, Some(WaitPidFlag::WUNTRACED)) {
			Ok(WaitStatus::Exited(_, code)) => return ExitOutcome::Exited(code),
			Ok(WaitStatus::Signaled(_, signal, _)) => {
				return ExitOutcome::Signaled(signal as i32)
			}
			Ok(WaitStatus::Stopped(pid, signal)) => {
				eprintln!("ownsh: process {} stopped by {}", pid, signal);
			}
			Ok(_) => {}
			Err(Errno::EINTR) => {}
			Err(e) => {
				log::warn!("waitpid {}: {}", handle.pid, e);
				return ExitOutcome::Exited(126);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn outcome_display() {
		assert_eq!(ExitOutcome::Exited(0).to_string(), "exit 0");
		assert_eq!(ExitOutcome::Signaled(9).to_string(), "signal 9");
		assert_eq!(ExitOutcome::Background(3).to_string(), "background [3]");
	}
}

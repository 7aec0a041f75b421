//! Background job registry. The repl calls [`JobSet::reap`] once per
//! iteration: a non-blocking sweep that retires finished processes and
//! announces jobs whose stages have all exited, so background children
//! never pile up as zombies.

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// One spawned stage: its pid and the pipeline index it came from. Owned
/// by the orchestrator (foreground) or the job set (background) until the
/// exit status is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessHandle {
	pub pid: Pid,
	pub stage: usize,
}

#[derive(Debug)]
pub struct Job {
	pub id: usize,
	pub command: String,
	handles: Vec<ProcessHandle>,
}

#[derive(Debug)]
pub struct JobSet {
	jobs: Vec<Job>,
	next_id: usize,
}

impl JobSet {
	pub fn new() -> JobSet {
		JobSet { jobs: Vec::new(), next_id: 1 }
	}

	pub fn is_empty(&self) -> bool {
		self.jobs.is_empty()
	}

	pub fn push(&mut self, handles: Vec<ProcessHandle>, command: String) -> usize {
		let id = self.next_id;
		self.next_id += 1;
		self.jobs.push(Job { id, command, handles });
		id
	}

	/// Non-blocking sweep over background children. Safe to call with a
	/// clear conscience from the single control thread: foreground stages
	/// are always fully reaped before control returns to the loop.
	pub fn reap(&mut self) {
		if self.jobs.is_empty() {
			return;
		}
		loop {
			match waitpid(Pid::from_raw(-1), Some(WaitPidFlag::WNOHANG)) {
				Ok(WaitStatus::Exited(pid, _)) => self.retire(pid),
				Ok(WaitStatus::Signaled(pid, _, _)) => self.retire(pid),
				Ok(WaitStatus::StillAlive) => break,
				// A stopped or continued background child stays registered.
				Ok(_) => {}
				Err(Errno::ECHILD) => break,
				Err(e) => {
					log::warn!("background reap: {}", e);
					break;
				}
			}
		}
	}

	fn retire(&mut self, pid: Pid) {
		let Some(idx) = self
			.jobs
			.iter()
			.position(|job| job.handles.iter().any(|h| h.pid == pid))
		else {
			log::warn!("reaped unknown pid {}", pid);
			return;
		};
		let job = &mut self.jobs[idx];
		job.handles.retain(|h| h.pid != pid);
		if job.handles.is_empty() {
			println!("[{}]\tdone\t{}", job.id, job.command);
			self.jobs.remove(idx);
		}
	}
}

impl Default for JobSet {
	fn default() -> JobSet {
		JobSet::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn handle(pid: i32, stage: usize) -> ProcessHandle {
		ProcessHandle { pid: Pid::from_raw(pid), stage }
	}

	#[test]
	fn job_ids_count_up() {
		let mut jobs = JobSet::new();
		assert_eq!(jobs.push(vec![handle(100, 0)], "a".into()), 1);
		assert_eq!(jobs.push(vec![handle(101, 0)], "b".into()), 2);
	}

	#[test]
	fn job_is_retired_once_every_stage_is_gone() {
		let mut jobs = JobSet::new();
		jobs.push(vec![handle(200, 0), handle(201, 1)], "a | b".into());
		jobs.retire(Pid::from_raw(200));
		assert!(!jobs.is_empty());
		jobs.retire(Pid::from_raw(201));
		assert!(jobs.is_empty());
	}

	#[test]
	fn reap_with_no_registered_jobs_is_a_no_op() {
		let mut jobs = JobSet::new();
		jobs.reap();
		assert!(jobs.is_empty());
	}
}

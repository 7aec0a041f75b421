//! Bounded history log: the last 25 lines, each with a timestamp and,
//! once known, a note on how the line finished. Consumes what the parser
//! and orchestrator report; it never feeds back into execution.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

const CAPACITY: usize = 25;

#[derive(Debug, Clone)]
pub struct HistoryEntry {
	pub line: String,
	pub timestamp: String,
	pub outcome: Option<String>,
}

#[derive(Debug, Default)]
pub struct History {
	entries: VecDeque<HistoryEntry>,
}

impl History {
	pub fn new() -> History {
		History::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn record(&mut self, line: &str) {
		if self.entries.len() == CAPACITY {
			self.entries.pop_front();
		}
		self.entries.push_back(HistoryEntry {
			line: line.to_string(),
			timestamp: format_timestamp(epoch_now()),
			outcome: None,
		});
	}

	/// Attaches an outcome note to the most recently recorded line.
	pub fn note(&mut self, outcome: &str) {
		if let Some(entry) = self.entries.back_mut() {
			entry.outcome = Some(outcome.to_string());
		}
	}

	pub fn print(&self) {
		for entry in &self.entries {
			println!(
				"{}     {}      {}",
				entry.line,
				entry.timestamp,
				entry.outcome.as_deref().unwrap_or("")
			);
		}
	}

	pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
		self.entries.iter()
	}
}

fn epoch_now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default()
		.as_secs()
}

/// `dd.mm.yyyy HH:MM:SS`, UTC. Hand-rolled; the shell has no other use
/// for a date library.
pub(crate) fn format_timestamp(secs: u64) -> String {
	let (year, month, day) = civil_from_days(secs / 86400);
	let rem = secs % 86400;
	format!(
		"{:02}.{:02}.{:04} {:02}:{:02}:{:02}",
		day,
		month,
		year,
		rem / 3600,
		(rem % 3600) / 60,
		rem % 60
	)
}

/// Days since the Unix epoch to a civil (year, month, day).
fn civil_from_days(days: u64) -> (u64, u64, u64) {
	let z = days + 719468;
	let era = z / 146097;
	let doe = z - era * 146097;
	let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
	let y = yoe + era * 400;
	let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
	let mp = (5 * doy + 2) / 153;
	let d = doy - (153 * mp + 2) / 5 + 1;
	let m = if mp < 10 { mp + 3 } else { mp - 9 };
	let y = if m <= 2 { y + 1 } else { y };
	(y, m, d)
}

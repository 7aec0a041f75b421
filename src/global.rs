use crate::alias::AliasTable;
use crate::history::History;
use crate::job::JobSet;

/// Interpreter-wide state threaded through the read-parse-execute loop.
pub struct State {
	pub jobs: JobSet,
	pub aliases: AliasTable,
	pub history: History,
}

impl State {
	pub fn new() -> State {
		State {
			jobs: JobSet::new(),
			aliases: AliasTable::new(),
			history: History::new(),
		}
	}
}

impl Default for State {
	fn default() -> State {
		State::new()
	}
}

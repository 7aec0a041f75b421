//! Alias table. Definitions look like `alias ll="ls -l"`; resolution is
//! whole-line: a line that exactly matches an alias name is replaced by
//! its expansion before tokenizing. The core never mutates the table, it
//! only calls [`AliasTable::resolve`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
	pub name: String,
	pub expansion: String,
}

#[derive(Debug, Default)]
pub struct AliasTable {
	entries: Vec<AliasEntry>,
}

impl AliasTable {
	pub fn new() -> AliasTable {
		AliasTable::default()
	}

	/// Parses an `alias name="expansion"` definition line. Redefining a
	/// name replaces its expansion.
	pub fn define(&mut self, line: &str) -> Result<(), String> {
		let rest = line
			.strip_prefix("alias")
			.ok_or_else(|| "not an alias definition".to_string())?
			.trim_start();
		let (name, value) = rest
			.split_once('=')
			.ok_or_else(|| "expected alias name=\"expansion\"".to_string())?;
		let name = name.trim();
		let expansion = value.trim().trim_matches('"');
		if name.is_empty() || expansion.is_empty() {
			return Err("empty alias name or expansion".to_string());
		}
		if let Some(entry) = self.entries.iter_mut().find(|e| e.name == name) {
			entry.expansion = expansion.to_string();
		} else {
			self.entries.push(AliasEntry {
				name: name.to_string(),
				expansion: expansion.to_string(),
			});
		}
		Ok(())
	}

	/// Whole-line lookup; partial-word expansion is not supported.
	pub fn resolve(&self, line: &str) -> Option<String> {
		let line = line.trim();
		self.entries
			.iter()
			.find(|e| e.name == line)
			.map(|e| e.expansion.clone())
	}
}

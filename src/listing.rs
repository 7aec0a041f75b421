//! Ad-hoc listing commands: `ls -z` (zero-size regular files), `ls -itime`
//! (current directory sorted by inode change time) and the glob-printer a
//! plain command with a `*` pattern routes to.

use std::fs;
use std::io;
use std::os::unix::fs::MetadataExt;

use crate::history::format_timestamp;

pub fn print_zero_size_files() -> io::Result<()> {
	for entry in fs::read_dir(".")? {
		let entry = entry?;
		let metadata = entry.metadata()?;
		if metadata.is_file() && metadata.len() == 0 {
			println!("{}\t{}", entry.file_name().to_string_lossy(), metadata.len());
		}
	}
	Ok(())
}

pub fn print_sorted_by_inode_time() -> io::Result<()> {
	let mut rows: Vec<(String, i64)> = Vec::new();
	for entry in fs::read_dir(".")? {
		let entry = entry?;
		let metadata = entry.metadata()?;
		rows.push((entry.file_name().to_string_lossy().into_owned(), metadata.ctime()));
	}
	rows.sort_by_key(|&(_, ctime)| ctime);
	for (name, ctime) in rows {
		println!("{}\t{}", name, format_timestamp(ctime.max(0) as u64));
	}
	Ok(())
}

/// Prints current-directory entries matching `pattern`.
pub fn print_glob_matches(pattern: &str) -> io::Result<()> {
	for entry in fs::read_dir(".")? {
		let entry = entry?;
		let name = entry.file_name();
		let name = name.to_string_lossy();
		if glob_match(pattern, &name) {
			println!("{}", name);
		}
	}
	Ok(())
}

/// Minimal matcher: `*` matches any run of characters, `?` exactly one.
/// No character classes, no escaping; same ground the tokenizer stands on.
pub fn glob_match(pattern: &str, name: &str) -> bool {
	fn matches(pattern: &[char], name: &[char]) -> bool {
		match pattern.split_first() {
			None => name.is_empty(),
			Some((&'*', rest)) => {
				(0..=name.len()).any(|skip| matches(rest, &name[skip..]))
			}
			Some((&'?', rest)) => !name.is_empty() && matches(rest, &name[1..]),
			Some((c, rest)) => name.first() == Some(c) && matches(rest, &name[1..]),
		}
	}
	let pattern: Vec<char> = pattern.chars().collect();
	let name: Vec<char> = name.chars().collect();
	matches(&pattern, &name)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn literal_patterns_match_exactly() {
		assert!(glob_match("main.rs", "main.rs"));
		assert!(!glob_match("main.rs", "main.rc"));
	}

	#[test]
	fn star_matches_any_run() {
		assert!(glob_match("*.rs", "main.rs"));
		assert!(glob_match("*", ""));
		assert!(glob_match("a*b*c", "aXXbYYc"));
		assert!(!glob_match("*.rs", "main.rc"));
	}

	#[test]
	fn question_mark_matches_one_character() {
		assert!(glob_match("?.txt", "a.txt"));
		assert!(!glob_match("?.txt", ".txt"));
		assert!(!glob_match("?.txt", "ab.txt"));
	}
}

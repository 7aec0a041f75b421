//! Redirection resolver. Opens the files a stage names and binds them over
//! the standard descriptors. This runs in the child after the fork, so an
//! unreadable input file kills only that stage.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use nix::unistd::dup2;

use crate::types::{Redirection, Stage};

const CREATE_MODE: u32 = 0o644;

/// Opens the file a redirection names: read-only for input, create/truncate
/// with mode 0644 for output. `Redirection::None` resolves to nothing.
pub fn resolve(spec: &Redirection) -> io::Result<Option<File>> {
	match spec {
		Redirection::None => Ok(None),
		Redirection::FromFile(path) => {
			File::open(path).map(Some).map_err(|e| with_path(path, e))
		}
		Redirection::ToFile(path) => OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.mode(CREATE_MODE)
			.open(path)
			.map(Some)
			.map_err(|e| with_path(path, e)),
	}
}

/// Resolves both of a stage's redirections and dups them onto fds 0 and 1.
/// Replaces whatever was there before, including a pipe end.
pub fn bind(stage: &Stage) -> io::Result<()> {
	if let Some(file) = resolve(&stage.stdin)? {
		rebind(file, libc::STDIN_FILENO)?;
	}
	if let Some(file) = resolve(&stage.stdout)? {
		rebind(file, libc::STDOUT_FILENO)?;
	}
	Ok(())
}

fn rebind(file: File, target: RawFd) -> io::Result<()> {
	dup2(file.as_raw_fd(), target)
		.map_err(|e| io::Error::from_raw_os_error(e as i32))?;
	// `file` drops here: the source descriptor is closed exactly once and
	// only the dup on the standard stream survives.
	Ok(())
}

fn with_path(path: &Path, e: io::Error) -> io::Error {
	io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use std::io::ErrorKind;
	use std::path::PathBuf;

	fn scratch(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("ownsh-redirect-{}", std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		dir.join(name)
	}

	#[test]
	fn none_resolves_to_nothing() {
		assert!(resolve(&Redirection::None).unwrap().is_none());
	}

	#[test]
	fn missing_input_file_is_not_found() {
		let spec = Redirection::FromFile(PathBuf::from("/no/such/ownsh-input"));
		let err = resolve(&spec).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::NotFound);
		assert!(err.to_string().contains("ownsh-input"));
	}

	#[test]
	fn output_file_is_created_and_truncated() {
		let path = scratch("truncated.txt");
		fs::write(&path, "old contents").unwrap();
		let spec = Redirection::ToFile(path.clone());
		resolve(&spec).unwrap().unwrap();
		assert_eq!(fs::read_to_string(&path).unwrap(), "");
	}
}

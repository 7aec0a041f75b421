use std::fmt;
use std::path::PathBuf;

/// File binding for one end of a stage's standard streams. Output always
/// truncates; append is not part of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirection {
	None,
	FromFile(PathBuf),
	ToFile(PathBuf),
}

/// One external command of a pipeline. A stage never holds open file
/// descriptors; redirections are resolved in the child at launch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
	/// argv[0] is the program name. Never empty.
	pub argv: Vec<String>,
	pub stdin: Redirection,
	pub stdout: Redirection,
}

impl Stage {
	pub fn new(argv: Vec<String>) -> Stage {
		Stage { argv, stdin: Redirection::None, stdout: Redirection::None }
	}
}

/// One logical command line. Only the first stage may redirect stdin from a
/// file and only the last stage may redirect stdout to a file; interior
/// stages talk through pipes alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
	/// At least one stage; an empty line never builds a pipeline.
	pub stages: Vec<Stage>,
	pub background: bool,
}

impl fmt::Display for Pipeline {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, stage) in self.stages.iter().enumerate() {
			if i > 0 {
				write!(f, " | ")?;
			}
			write!(f, "{}", stage.argv.join(" "))?;
			if let Redirection::FromFile(path) = &stage.stdin {
				write!(f, " < {}", path.display())?;
			}
			if let Redirection::ToFile(path) = &stage.stdout {
				write!(f, " > {}", path.display())?;
			}
		}
		if self.background {
			write!(f, " &")?;
		}
		Ok(())
	}
}

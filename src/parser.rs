//! Pipeline builder. One token-driven pass covers every combination of
//! piping and redirection: stages split on `|`, each redirection operator
//! captures the single word that follows it, and a trailing `&` marks the
//! whole pipeline as background.

use std::mem;
use std::path::PathBuf;
use std::{error, fmt};

use crate::lexer::{self, Token, DELIMITERS};
use crate::types::{Pipeline, Redirection, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
	/// A `<` or `>` with no file name after it.
	MissingRedirectionTarget,
	/// A `|` with nothing on one of its sides.
	EmptyPipelineStage,
	/// `&` is only valid as the last token of a line.
	TokensAfterBackground,
}

impl fmt::Display for ParseError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			ParseError::MissingRedirectionTarget => {
				write!(f, "redirection operator with no target file")
			}
			ParseError::EmptyPipelineStage => write!(f, "empty pipeline stage"),
			ParseError::TokensAfterBackground => write!(f, "unexpected token after '&'"),
		}
	}
}

impl error::Error for ParseError {}

/// Builds the pipeline described by `line`. A blank line is not an error,
/// it is simply no pipeline at all.
///
/// If several words follow a redirection operator, the first one is the
/// file name and the rest rejoin the surrounding stage's argv. When the
/// same operator appears twice the later file wins. Redirections attach to
/// the first stage's stdin and the last stage's stdout only, wherever the
/// operator sat in the text.
pub fn build(line: &str) -> Result<Option<Pipeline>, ParseError> {
	let mut tokens = lexer::tokenize(line, DELIMITERS).peekable();
	if tokens.peek().is_none() {
		return Ok(None);
	}
	log::debug!("building {:?} from {:?}", lexer::shape(line), line);

	let mut stages: Vec<Stage> = Vec::new();
	let mut argv: Vec<String> = Vec::new();
	let mut input: Option<PathBuf> = None;
	let mut output: Option<PathBuf> = None;
	let mut background = false;

	while let Some(token) = tokens.next() {
		if background {
			return Err(ParseError::TokensAfterBackground);
		}
		match token {
			Token::Word(word) => argv.push(word.to_string()),
			Token::Pipe => {
				if argv.is_empty() {
					return Err(ParseError::EmptyPipelineStage);
				}
				stages.push(Stage::new(mem::take(&mut argv)));
			}
			Token::RedirectIn => match tokens.next() {
				Some(Token::Word(target)) => input = Some(PathBuf::from(target)),
				_ => return Err(ParseError::MissingRedirectionTarget),
			},
			Token::RedirectOut => match tokens.next() {
				Some(Token::Word(target)) => output = Some(PathBuf::from(target)),
				_ => return Err(ParseError::MissingRedirectionTarget),
			},
			Token::Background => background = true,
		}
	}
	if argv.is_empty() {
		// Trailing pipe, or a line that was nothing but operators.
		return Err(ParseError::EmptyPipelineStage);
	}
	stages.push(Stage::new(argv));

	if let Some(path) = input {
		if let Some(first) = stages.first_mut() {
			first.stdin = Redirection::FromFile(path);
		}
	}
	if let Some(path) = output {
		if let Some(last) = stages.last_mut() {
			last.stdout = Redirection::ToFile(path);
		}
	}

	Ok(Some(Pipeline { stages, background }))
}

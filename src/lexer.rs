//! Whitespace tokenizer. Splits a line on a delimiter set (runs of
//! delimiters collapse) and classifies the structural operators `|`, `<`,
//! `>` and `&`. Operators are recognized only as standalone tokens, so
//! `a|b` is a single word; there is no quoting or escaping.

/// Space, tab, CR, LF and BEL.
pub const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
	Word(&'a str),
	Pipe,
	RedirectIn,
	RedirectOut,
	Background,
}

/// Lazy token stream over one line.
pub struct Tokens<'a> {
	rest: &'a str,
	delimiters: &'a [char],
}

pub fn tokenize<'a>(line: &'a str, delimiters: &'a [char]) -> Tokens<'a> {
	Tokens { rest: line, delimiters }
}

impl<'a> Iterator for Tokens<'a> {
	type Item = Token<'a>;

	fn next(&mut self) -> Option<Token<'a>> {
		let delimiters = self.delimiters;
		let rest: &'a str = self.rest;
		let rest = rest.trim_start_matches(|c: char| delimiters.contains(&c));
		if rest.is_empty() {
			self.rest = rest;
			return None;
		}
		let end = rest
			.find(|c: char| delimiters.contains(&c))
			.unwrap_or(rest.len());
		let (word, tail) = rest.split_at(end);
		self.rest = tail;
		Some(classify(word))
	}
}

fn classify(word: &str) -> Token {
	match word {
		"|" => Token::Pipe,
		"<" => Token::RedirectIn,
		">" => Token::RedirectOut,
		"&" => Token::Background,
		_ => Token::Word(word),
	}
}

/// Structural summary of one line, computed in a single pass by a pure
/// function; no have-we-seen-an-operator state survives between lines.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineShape {
	pub pipe: bool,
	pub redirect_in: bool,
	pub redirect_out: bool,
	pub background: bool,
}

impl LineShape {
	pub fn is_plain(&self) -> bool {
		*self == LineShape::default()
	}
}

pub fn shape(line: &str) -> LineShape {
	let mut shape = LineShape::default();
	for token in tokenize(line, DELIMITERS) {
		match token {
			Token::Pipe => shape.pipe = true,
			Token::RedirectIn => shape.redirect_in = true,
			Token::RedirectOut => shape.redirect_out = true,
			Token::Background => shape.background = true,
			Token::Word(_) => {}
		}
	}
	shape
}

#[cfg(test)]
mod tests {
	use super::*;

	fn words(line: &str) -> Vec<Token> {
		tokenize(line, DELIMITERS).collect()
	}

	#[test]
	fn splits_on_delimiter_runs() {
		assert_eq!(
			words("  ls \t -l\r\n"),
			vec![Token::Word("ls"), Token::Word("-l")]
		);
	}

	#[test]
	fn classifies_structural_operators() {
		assert_eq!(
			words("cat < in | wc > out &"),
			vec![
				Token::Word("cat"),
				Token::RedirectIn,
				Token::Word("in"),
				Token::Pipe,
				Token::Word("wc"),
				Token::RedirectOut,
				Token::Word("out"),
				Token::Background,
			]
		);
	}

	#[test]
	fn operators_must_stand_alone() {
		assert_eq!(words("a|b"), vec![Token::Word("a|b")]);
	}

	#[test]
	fn empty_line_yields_no_tokens() {
		assert!(words("   \t ").is_empty());
	}

	#[test]
	fn shape_reports_structure() {
		assert!(shape("ls -l").is_plain());
		let s = shape("a | b > out");
		assert!(s.pipe && s.redirect_out);
		assert!(!s.redirect_in && !s.background);
	}

	#[test]
	fn tokenizer_is_restartable() {
		let mut tokens = tokenize("a b", DELIMITERS);
		assert_eq!(tokens.next(), Some(Token::Word("a")));
		assert_eq!(tokens.next(), Some(Token::Word("b")));
		assert_eq!(tokens.next(), None);
		assert_eq!(tokens.next(), None);
	}
}

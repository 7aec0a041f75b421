//! ownsh: an interactive command interpreter.
//!
//! A line of input is resolved through the alias table, tokenized by
//! whitespace, built into a [`types::Pipeline`] (stages connected by pipes,
//! optional file redirections, background flag) and realized as a set of OS
//! processes with their standard streams wired up. Words are split on
//! whitespace only; quoting, escaping and variable expansion are not
//! supported.

pub mod alias;
pub mod builtin;
pub mod eval;
pub mod global;
pub mod history;
pub mod job;
pub mod lexer;
pub mod listing;
pub mod parser;
pub mod redirect;
pub mod repl;
pub mod types;

pub use eval::{run, ExitOutcome, SpawnError};
pub use parser::{build, ParseError};
pub use types::{Pipeline, Redirection, Stage};

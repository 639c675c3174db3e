//! # CLI Layer
//!
//! This module is **one possible UI client** for greps. It is the only place
//! that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Commands
//!
//! - `find`: walks the scope with find-next and prints every match
//! - `replace-all`: one bulk pass over the scope
//! - `step`: the interactive dialog, one key per line on stdin
//! - `query`, `history`: saved queries and the two histories
//! - `normalize`, `tags`: what the tag normalizer does to a string
//! - `config`, `init`: the data directory
//!
//! Errors the user can fix by editing the pattern or replacement (bad regex,
//! unknown character name, replace without a match) are printed as warnings
//! and do not fail the process.
//!
//! ## Module Structure
//!
//! - `commands`: Dispatch and per-command handlers
//! - `print`: Output formatting (colors, previews, lists)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;

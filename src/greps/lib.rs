//! # Greps Architecture
//!
//! Greps is a **UI-agnostic search/replace library** for documents made of
//! several independent text bodies ("stories"). The `greps` binary is one client
//! of it; a dialog in a layout program would be another.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, owns the search session       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Normalizes raw input, applies the error policy,          │
//! │    records history, returns CmdResult                       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (engine/)                                           │
//! │  - Normalizer, compiler, templates, cursor, replace         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage (text/, store/, repository.rs)                     │
//! │  - TextStore: the document's stories                        │
//! │  - QueryBackend + QueryRepository: saved queries, history   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The search session
//!
//! Find-next is resumable. The session remembers the scope, the normalized
//! pattern, the ordered stories, the story being searched and the offset just
//! past the last match, plus a cache of every story's text as first read.
//! Offsets are only meaningful against that cache, which replaces keep in step
//! with the store. Edits made behind the session's back are not noticed.
//!
//! Changing the scope or the pattern, running out of stories, a bulk replace
//! or any normalization/compile failure puts the session back to idle.
//!
//! ## No I/O assumptions in the core
//!
//! From `api.rs` inward, code takes Rust arguments, returns `Result<CmdResult>`
//! and never writes to stdout/stderr or exits the process. Diagnostics go
//! through `tracing`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per user operation
//! - [`engine`]: Normalizer, pattern compiler, templates, search session, replace
//! - [`text`]: Text store abstraction and implementations
//! - [`store`]: Query document backends
//! - [`repository`]: Saved queries and histories
//! - [`model`]: Core data types (`Scope`, `ContainerId`, `Match`, `Query`)
//! - [`preview`]: Line previews of matches
//! - [`config`]: Configuration management
//! - [`init`]: Building the production context
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod init;
pub mod model;
pub mod preview;
pub mod repository;
pub mod store;
pub mod text;

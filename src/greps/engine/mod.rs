//! # Search/replace engine
//!
//! - [`normalize`]: symbolic tags and escapes to literal text
//! - [`pattern`]: compiling normalized patterns, with a single-slot cache
//! - [`template`]: `$1` / `${name}` replacement templates
//! - [`session`]: the resumable find-next cursor
//! - [`replace`]: replace-current, replace-and-find and replace-all
//!
//! Everything here works on already-normalized strings. Normalizing raw input
//! and recording history is the job of the command layer.

pub mod normalize;
pub mod pattern;
pub mod replace;
pub mod session;
pub mod template;

pub use normalize::{normalize, Mode};
pub use pattern::{CompiledPattern, PatternCompiler};
pub use replace::{replace_all, replace_and_find, replace_current, ReplaceAllSummary};
pub use session::{resolve_containers, CursorState, SearchSession};
pub use template::Template;

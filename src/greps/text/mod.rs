//! # Text Store
//!
//! The engine never owns document text. It reads and mutates story roots
//! through the [`TextStore`] trait, which abstracts the host document.
//!
//! ## Implementations
//!
//! - [`fs::FileTextStore`]: a directory is the document, each matching file a story
//!   root. Used by the CLI.
//! - [`memory::InMemoryTextStore`]: ordered in-memory stories with failure
//!   injection, used by tests.
//!
//! Offsets everywhere are UTF-8 byte offsets into the container's full text.
//! A host that addresses text by character index must convert at this
//! boundary.
//! Implementations must reject ranges that fall outside the text or split a
//! character with [`GrepsError::StoreIo`](crate::error::GrepsError::StoreIo).

use crate::error::{GrepsError, Result};
use crate::model::ContainerId;

pub mod fs;
pub mod memory;

/// Host document access. Every `start`/`len` is in UTF-8 bytes; hosts that
/// index by character convert before selecting or replacing.
pub trait TextStore {
    /// Every story root in the document, in document order.
    fn list_story_roots(&self) -> Result<Vec<ContainerId>>;

    /// Root of the story holding the current selection, if any.
    fn current_selection_root(&self) -> Result<Option<ContainerId>>;

    fn get_full_text(&self, container: &ContainerId) -> Result<String>;

    /// Overwrites the whole body of a story.
    fn set_full_text(&mut self, container: &ContainerId, text: &str) -> Result<()>;

    fn select_range(&mut self, container: &ContainerId, start: usize, len: usize) -> Result<()>;

    fn deselect_all(&mut self) -> Result<()>;

    /// Deletes `old_len` bytes at `start`, inserts `new_text` there and leaves
    /// the inserted range selected.
    fn replace_range(
        &mut self,
        container: &ContainerId,
        start: usize,
        old_len: usize,
        new_text: &str,
    ) -> Result<()>;
}

/// Checks that `[start, start + len)` is a valid slice of `text`.
pub(crate) fn check_range(text: &str, start: usize, len: usize) -> Result<()> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| GrepsError::StoreIo("range overflows".to_string()))?;
    if end > text.len() {
        return Err(GrepsError::StoreIo(format!(
            "range {}..{} is past the end of the text ({} bytes)",
            start,
            end,
            text.len()
        )));
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(GrepsError::StoreIo(format!(
            "range {}..{} does not fall on character boundaries",
            start, end
        )));
    }
    Ok(())
}

/// Splices `new_text` over `[start, start + old_len)`.
pub(crate) fn splice(text: &str, start: usize, old_len: usize, new_text: &str) -> Result<String> {
    check_range(text, start, old_len)?;
    let mut out = String::with_capacity(text.len() - old_len + new_text.len());
    out.push_str(&text[..start]);
    out.push_str(new_text);
    out.push_str(&text[start + old_len..]);
    Ok(out)
}

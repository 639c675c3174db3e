use super::CmdResult;
use crate::engine::normalize::catalogue;
use crate::engine::{normalize, Mode};
use crate::error::Result;

/// Shows what the normalizer makes of `text`.
pub fn normalize_text(text: &str, mode: Mode) -> Result<CmdResult> {
    Ok(CmdResult {
        normalized: Some(normalize(text, mode)?),
        ..Default::default()
    })
}

/// The tags offered for one side of the dialog.
pub fn tags(mode: Mode) -> Result<CmdResult> {
    Ok(CmdResult {
        tags: catalogue(mode),
        ..Default::default()
    })
}

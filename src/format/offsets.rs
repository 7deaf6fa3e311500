//! Segment metadata trailer.
//!
//! Written as the last line of a fragment file:
//! `//{"start":57,"fragment_lengths":[447,427]}`.

use serde::{Deserialize, Serialize};

/// Marks the start of the trailer line.
pub const COMMENT_START: &str = "\n//";

/// Byte layout of a fragment file's payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    /// Length of everything before the first fragment, opening `[` included.
    pub start: usize,
    /// Length of each fragment, its leading separator included.
    pub fragment_lengths: Vec<usize>,
}

impl Offset {
    /// Byte offset just past the last fragment.
    ///
    /// `None` if the lengths overflow `usize`.
    pub fn end(&self) -> Option<usize> {
        self.fragment_lengths
            .iter()
            .try_fold(self.start, |end, &len| end.checked_add(len))
    }
}

/// Split a file into its content and raw trailer JSON.
///
/// Returns `None` when the last line is not a `//` comment. A single
/// final newline after the trailer is allowed.
pub fn split_trailer(src: &str) -> Option<(&str, &str)> {
    let src = src.strip_suffix('\n').unwrap_or(src);
    let (content, trailer) = src.rsplit_once(COMMENT_START)?;
    if trailer.contains('\n') {
        return None;
    }
    Some((content, trailer))
}

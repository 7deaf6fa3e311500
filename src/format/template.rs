//! Segment-level view of a fragment file.
//!
//! A file is `before`, then the fragments joined by `,`, then `after`, then
//! the offset trailer. Fragments are kept sorted and unique, so appending
//! the same library twice from two runs of the generator is harmless.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::format::offsets::{split_trailer, Offset, COMMENT_START};

/// Closes `before`.
const OPEN: &str = "[";
/// Joins fragments.
const SEPARATOR: &str = ",";
/// Opens `after`.
const CLOSE: &str = "]";

/// Error splitting a file into segments.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("fragment file has no offset trailer")]
    MissingTrailer,

    #[error("invalid offset trailer: {0}")]
    InvalidTrailer(#[source] serde_json::Error),

    #[error("offset trailer does not match the payload: {0}")]
    Inconsistent(String),
}

/// A fragment file split into its fixed text and per-library fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTemplate {
    before: String,
    fragments: BTreeSet<String>,
    after: String,
}

impl FragmentTemplate {
    /// Create a template with no fragments.
    ///
    /// `before` should end with `[` and `after` should start with `]`.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        FragmentTemplate {
            before: before.into(),
            fragments: BTreeSet::new(),
            after: after.into(),
        }
    }

    /// Add a fragment. Returns false if an identical fragment was present.
    pub fn append(&mut self, fragment: String) -> bool {
        self.fragments.insert(fragment)
    }

    /// Keep only the fragments matching the predicate.
    pub fn retain(&mut self, f: impl FnMut(&String) -> bool) {
        self.fragments.retain(f);
    }

    /// Fragments in rendering order.
    pub fn fragments(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    /// Text before the first fragment.
    pub fn before(&self) -> &str {
        &self.before
    }

    /// Text after the last fragment, trailer excluded.
    pub fn after(&self) -> &str {
        &self.after
    }

    /// Render without the offset trailer.
    pub fn render_body(&self) -> String {
        self.render_parts().0
    }

    fn render_parts(&self) -> (String, Offset) {
        let mut body = String::with_capacity(
            self.before.len()
                + self.after.len()
                + self.fragments.iter().map(|f| f.len() + 1).sum::<usize>(),
        );
        body.push_str(&self.before);

        let mut fragment_lengths = Vec::with_capacity(self.fragments.len());
        for (i, fragment) in self.fragments.iter().enumerate() {
            let sep = if i == 0 { "" } else { SEPARATOR };
            body.push_str(sep);
            body.push_str(fragment);
            fragment_lengths.push(sep.len() + fragment.len());
        }

        body.push_str(&self.after);
        let offset = Offset {
            start: self.before.len(),
            fragment_lengths,
        };
        (body, offset)
    }
}

impl fmt::Display for FragmentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (body, offset) = self.render_parts();
        let offset = serde_json::to_string(&offset).map_err(|_| fmt::Error)?;
        write!(f, "{}{}{}", body, COMMENT_START, offset)
    }
}

impl FromStr for FragmentTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (content, trailer) = split_trailer(s).ok_or(TemplateError::MissingTrailer)?;
        let offset: Offset = serde_json::from_str(trailer).map_err(TemplateError::InvalidTrailer)?;

        let inconsistent = |what: &str| TemplateError::Inconsistent(what.to_string());

        let before = content
            .get(..offset.start)
            .ok_or_else(|| inconsistent("start is past the end of the file"))?;
        if !before.ends_with(OPEN) {
            return Err(inconsistent("start does not follow the opening `[`"));
        }

        let end = offset
            .end()
            .ok_or_else(|| inconsistent("fragment lengths overflow"))?;
        if end > content.len() {
            return Err(inconsistent("fragment lengths run past the payload"));
        }

        let mut fragments = BTreeSet::new();
        let mut pos = offset.start;
        for (i, &len) in offset.fragment_lengths.iter().enumerate() {
            let next = pos + len;
            let segment = content
                .get(pos..next)
                .ok_or_else(|| inconsistent("fragment lengths run past the payload"))?;
            let fragment = if i == 0 {
                segment
            } else {
                segment
                    .strip_prefix(SEPARATOR)
                    .ok_or_else(|| inconsistent("fragment is missing its `,` separator"))?
            };
            fragments.insert(fragment.to_string());
            pos = next;
        }

        let after = content
            .get(pos..)
            .ok_or_else(|| inconsistent("fragment ends inside a character"))?;
        if !after.starts_with(CLOSE) {
            return Err(inconsistent("last fragment is not followed by `]`"));
        }

        Ok(FragmentTemplate {
            before: before.to_string(),
            fragments,
            after: after.to_string(),
        })
    }
}

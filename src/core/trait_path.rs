//! Trait paths and where their fragments live.
//!
//! The generator writes one fragment file per trait at
//! `trait.impl/<module path>/trait.<Name>.js`, e.g. `core::convert::From`
//! lives at `trait.impl/core/convert/trait.From.js`.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Directory, relative to the documentation root, holding fragment files.
pub const TRAIT_IMPL_DIR: &str = "trait.impl";

/// Error parsing a trait path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraitPathError {
    #[error("trait path `{0}` must contain at least one `::`")]
    NotQualified(String),

    #[error("trait path `{path}` has an invalid segment `{segment}`")]
    InvalidSegment { path: String, segment: String },

    #[error("`{0}` is not a trait implementor fragment path")]
    NotFragmentPath(PathBuf),
}

/// Fully qualified path of a trait, e.g. `core::convert::From`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraitPath {
    module: Vec<String>,
    name: String,
}

impl TraitPath {
    /// Module segments, e.g. `["core", "convert"]`.
    pub fn module(&self) -> &[String] {
        &self.module
    }

    /// Trait name, e.g. `From`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fragment file location relative to the documentation root.
    pub fn fragment_path(&self) -> PathBuf {
        let mut path = PathBuf::from(TRAIT_IMPL_DIR);
        for segment in &self.module {
            path.push(segment);
        }
        path.push(format!("trait.{}.js", self.name));
        path
    }

    /// Recover a trait path from a fragment file location.
    ///
    /// Accepts paths relative to the documentation root, with or without the
    /// leading `trait.impl` directory.
    pub fn from_fragment_path(path: &Path) -> Result<Self, TraitPathError> {
        let not_fragment = || TraitPathError::NotFragmentPath(path.to_path_buf());

        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_str().ok_or_else(not_fragment)?),
                Component::CurDir => {}
                _ => return Err(not_fragment()),
            }
        }
        if segments.first() == Some(&TRAIT_IMPL_DIR) {
            segments.remove(0);
        }

        let file = segments.pop().ok_or_else(not_fragment)?;
        let name = file
            .strip_prefix("trait.")
            .and_then(|f| f.strip_suffix(".js"))
            .ok_or_else(not_fragment)?;

        let mut joined = segments.join("::");
        joined.push_str("::");
        joined.push_str(name);
        joined.parse().map_err(|_| not_fragment())
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

impl FromStr for TraitPath {
    type Err = TraitPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments: Vec<String> = s.split("::").map(str::to_string).collect();
        if segments.len() < 2 {
            return Err(TraitPathError::NotQualified(s.to_string()));
        }
        if let Some(bad) = segments.iter().find(|seg| !is_identifier(seg)) {
            return Err(TraitPathError::InvalidSegment {
                path: s.to_string(),
                segment: bad.clone(),
            });
        }

        let name = segments.pop().unwrap_or_default();
        Ok(TraitPath {
            module: segments,
            name,
        })
    }
}

impl fmt::Display for TraitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.module {
            write!(f, "{}::", segment)?;
        }
        write!(f, "{}", self.name)
    }
}

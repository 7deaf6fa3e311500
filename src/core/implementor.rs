//! A single rendered implementor.
//!
//! The documentation generator writes each implementor as a short JSON
//! array: the rendered markup first, then (for synthetic implementations
//! only) a `1` flag and the list of type paths the implementation covers.

use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One realization of a trait, as rendered markup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Implementor {
    /// Rendered markup, e.g. `impl From<Error> for MoeqiError`.
    pub text: String,
    /// Whether the implementation is synthetic (auto trait or blanket impl).
    pub synthetic: bool,
    /// Type paths a synthetic implementation applies to.
    pub types: Vec<String>,
}

impl Implementor {
    /// Create a plain (non-synthetic) implementor.
    pub fn new(text: impl Into<String>) -> Self {
        Implementor {
            text: text.into(),
            synthetic: false,
            types: Vec::new(),
        }
    }

    /// Create a synthetic implementor covering the given types.
    pub fn synthetic<I, S>(text: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Implementor {
            text: text.into(),
            synthetic: true,
            types: types.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for Implementor {
    fn from(text: &str) -> Self {
        Implementor::new(text)
    }
}

impl Serialize for Implementor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.synthetic { 3 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.text)?;
        if self.synthetic {
            seq.serialize_element(&1)?;
            seq.serialize_element(&self.types)?;
        }
        seq.end()
    }
}

/// Accepts `1`/`0` as written by the generator, or a JSON bool.
#[derive(Deserialize)]
#[serde(untagged)]
enum SyntheticFlag {
    Bool(bool),
    Int(u8),
}

impl SyntheticFlag {
    fn into_bool<E: de::Error>(self) -> Result<bool, E> {
        match self {
            SyntheticFlag::Bool(b) => Ok(b),
            SyntheticFlag::Int(0) => Ok(false),
            SyntheticFlag::Int(1) => Ok(true),
            SyntheticFlag::Int(n) => Err(E::custom(format!(
                "synthetic flag must be 0 or 1, found {}",
                n
            ))),
        }
    }
}

struct ImplementorVisitor;

impl<'de> Visitor<'de> for ImplementorVisitor {
    type Value = Implementor;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an implementor record `[text]` or `[text, flag, [types]]`")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Implementor, A::Error> {
        let text: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;

        let synthetic = match seq.next_element::<SyntheticFlag>()? {
            Some(flag) => flag.into_bool()?,
            None => {
                return Ok(Implementor::new(text));
            }
        };

        let types: Option<Vec<String>> = seq.next_element()?;

        if seq.next_element::<de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(4, &self));
        }

        // Only `[text]` and `[text, 1, [types]]` re-serialize unchanged, so a
        // record is read as one of those two shapes or rejected.
        let types = match (synthetic, types) {
            (true, Some(types)) => types,
            (true, None) => {
                return Err(de::Error::custom("synthetic implementor is missing its types"))
            }
            (false, Some(types)) if !types.is_empty() => {
                return Err(de::Error::custom("types listed for a non-synthetic implementor"))
            }
            (false, _) => Vec::new(),
        };

        Ok(Implementor {
            text,
            synthetic,
            types,
        })
    }
}

impl<'de> Deserialize<'de> for Implementor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(ImplementorVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_implementor_is_single_element() {
        let imp = Implementor::new("impl From<u8> for Foo");
        let json = serde_json::to_string(&imp).unwrap();
        assert_eq!(json, r#"["impl From<u8> for Foo"]"#);
    }

    #[test]
    fn test_synthetic_implementor_carries_types() {
        let imp = Implementor::synthetic("impl<T> From<T> for T", ["core::option::Option"]);
        let json = serde_json::to_string(&imp).unwrap();
        assert_eq!(json, r#"["impl<T> From<T> for T",1,["core::option::Option"]]"#);

        let back: Implementor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, imp);
    }

    #[test]
    fn test_accepts_bool_flag() {
        let imp: Implementor = serde_json::from_str(r#"["x", false]"#).unwrap();
        assert!(!imp.synthetic);
        assert!(imp.types.is_empty());
    }

    #[test]
    fn test_rejects_malformed_records() {
        assert!(serde_json::from_str::<Implementor>("[]").is_err());
        assert!(serde_json::from_str::<Implementor>("[42]").is_err());
        assert!(serde_json::from_str::<Implementor>(r#""x""#).is_err());
        assert!(serde_json::from_str::<Implementor>(r#"["x", 2]"#).is_err());
        assert!(serde_json::from_str::<Implementor>(r#"["x", 1, [], "extra"]"#).is_err());
    }

    #[test]
    fn test_reserializes_unchanged() {
        for json in [r#"["x"]"#, r#"["x",1,[]]"#, r#"["x",1,["a::B"]]"#] {
            let imp: Implementor = serde_json::from_str(json).unwrap();
            assert_eq!(serde_json::to_string(&imp).unwrap(), json);
        }

        let imp: Implementor = serde_json::from_str(r#"["x", 0, []]"#).unwrap();
        assert_eq!(serde_json::to_string(&imp).unwrap(), r#"["x"]"#);
    }

    #[test]
    fn test_rejects_lossy_records() {
        let err = serde_json::from_str::<Implementor>(r#"["x", 0, ["a::B"]]"#).unwrap_err();
        assert!(err.to_string().contains("non-synthetic"));

        let err = serde_json::from_str::<Implementor>(r#"["x", true]"#).unwrap_err();
        assert!(err.to_string().contains("missing its types"));
    }
}

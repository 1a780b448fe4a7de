//! Identifiers and player-owned components.
//!
//! Every catalog has its own identifier namespace. A node, an item and a
//! mission may share the same string without colliding.

mod inventory;
mod stats;

pub use inventory::*;
pub use stats::*;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! content_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

content_id! {
    /// Identifier of a dialogue node.
    NodeId
}

content_id! {
    /// Identifier of an option inside a dialogue node.
    OptionId
}

content_id! {
    /// Identifier of an item definition.
    ItemId
}

content_id! {
    /// Identifier of a mission definition.
    MissionId
}

content_id! {
    /// Identifier of a character in the cast.
    CharacterId
}

content_id! {
    /// Identifier of an interactive scene object.
    ObjectId
}

/// Identifier of an objective, unique within its mission.
///
/// Objective ids are canonicalised to lowercase kebab-case on construction,
/// so `identify_orientation` and `identify-orientation` name the same
/// objective regardless of which spelling the content used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ObjectiveId(String);

impl ObjectiveId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Self::canonicalize(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical spelling of an objective id.
    pub fn canonicalize(raw: &str) -> String {
        raw.trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect()
    }
}

impl fmt::Display for ObjectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectiveId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ObjectiveId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<ObjectiveId> for String {
    fn from(id: ObjectiveId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_objective_id_canonical_spelling() {
        let hyphen = ObjectiveId::new("identify-orientation");
        let underscore = ObjectiveId::new("identify_orientation");
        let shouting = ObjectiveId::new(" Identify_Orientation ");

        assert_eq!(hyphen, underscore);
        assert_eq!(hyphen, shouting);
        assert_eq!(underscore.as_str(), "identify-orientation");
    }

    #[test]
    fn test_objective_id_deserialize_canonicalizes() {
        #[derive(Deserialize)]
        struct Wrapper {
            id: ObjectiveId,
        }

        let parsed: Wrapper = toml::from_str(r#"id = "prepare_report""#).unwrap();
        assert_eq!(parsed.id.as_str(), "prepare-report");
    }

    #[test]
    fn test_content_id_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(ItemId::new("coffee"), 1);

        assert_eq!(map.get("coffee"), Some(&1));
        assert_eq!(ItemId::from("coffee").to_string(), "coffee");
    }
}

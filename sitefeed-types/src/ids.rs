use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity of a feed post.
///
/// Real posts carry the opaque id assigned by the backend. Demo posts are
/// seeded locally for onboarding/empty-feed states and have no remote
/// counterpart; the two id spaces are disjoint and the distinction is
/// decided once, at construction. Mutation code branches on `is_demo()`
/// before deciding whether to touch the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostId {
    Real(String),
    Demo(u32),
}

impl PostId {
    pub fn is_demo(&self) -> bool {
        matches!(self, PostId::Demo(_))
    }

    /// The id as a REST path segment. Demo posts have none.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            PostId::Real(id) => Some(id),
            PostId::Demo(_) => None,
        }
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Real(id) => write!(f, "{}", id),
            PostId::Demo(n) => write!(f, "demo-{}", n),
        }
    }
}

impl Serialize for PostId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Demo ids only show up in local serialization (logs, fixtures);
        // they are never part of a request body.
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Backends disagree on whether ids are strings or numbers; accept
        // both and normalize to the opaque string form.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Num(i64),
            Text(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Num(n) => Ok(PostId::Real(n.to_string())),
            Wire::Text(s) => match s.strip_prefix("demo-").and_then(|n| n.parse().ok()) {
                Some(n) => Ok(PostId::Demo(n)),
                None => Ok(PostId::Real(s)),
            },
        }
    }
}

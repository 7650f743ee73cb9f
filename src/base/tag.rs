//! Stable annotation identity.
//!
//! Conversions planned in phase 1 are bound to the annotated node by a [`Tag`],
//! never by a byte span or a node id. Spans go stale after the first edit and
//! node ids go stale after any replacement; the tag survives both because the
//! tree re-indexes tags on every edit.

use std::fmt;

use uuid::Uuid;

/// Opaque identity attached to a tree node and recorded in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(Uuid);

impl Tag {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough for trace output
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let a = Tag::new();
        let b = Tag::new();
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_short() {
        assert_eq!(Tag::new().to_string().len(), 8);
    }
}

//! Traversal path tracking
//!
//! The checker pushes one token per edge it follows. A frame is popped when
//! the check it guards succeeds and left in place when it fails, so once an
//! incompatibility short-circuits the traversal the tracker holds exactly the
//! path from the root pair to the failing node.

use serde::{Serialize, Serializer};
use std::fmt;

/// Token pushed for the root reader/writer pair
pub(crate) const ROOT_TOKEN: &str = "";

/// Path of reference tokens from the root pair to a node, root sentinel first
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location(Vec<String>);

impl Location {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Raw tokens, including the root sentinel
    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Render as a JSON-pointer style address into the reader schema.
    ///
    /// The root sentinel is skipped; `~` and `/` inside tokens are escaped as
    /// `~0` and `~1`. A failure at the root itself renders as `/`.
    pub fn to_pointer(&self) -> String {
        let segments: Vec<String> = self
            .0
            .iter()
            .skip(1)
            .map(|token| token.replace('~', "~0").replace('/', "~1"))
            .collect();
        format!("/{}", segments.join("/"))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pointer())
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pointer())
    }
}

/// Mutable stack of path tokens owned by one checker run
#[derive(Debug, Default)]
pub(crate) struct PathTracker {
    frames: Vec<String>,
}

impl PathTracker {
    pub(crate) fn push(&mut self, token: impl Into<String>) {
        self.frames.push(token.into());
    }

    pub(crate) fn pop(&mut self) {
        self.frames.pop();
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    /// Drop every frame above `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    pub(crate) fn extend(&mut self, tokens: &[String]) {
        self.frames.extend_from_slice(tokens);
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(crate) fn snapshot(&self) -> Location {
        Location(self.frames.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_skips_root_sentinel() {
        let location = Location::new([ROOT_TOKEN, "fields", "1", "type", "items"]);
        assert_eq!(location.to_pointer(), "/fields/1/type/items");
    }

    #[test]
    fn test_root_failure_renders_as_slash() {
        assert_eq!(Location::new([ROOT_TOKEN]).to_pointer(), "/");
    }

    #[test]
    fn test_pointer_escapes_tilde_and_slash() {
        let location = Location::new([ROOT_TOKEN, "a/b", "c~d", "~/"]);
        assert_eq!(location.to_pointer(), "/a~1b/c~0d/~0~1");
    }

    #[test]
    fn test_tracker_snapshot_and_truncate() {
        let mut tracker = PathTracker::default();
        tracker.push(ROOT_TOKEN);
        tracker.push("fields");
        let mark = tracker.len();
        tracker.push("0");
        tracker.push("type");
        tracker.truncate(mark);
        tracker.extend(&["3".to_string()]);

        assert_eq!(tracker.snapshot().to_pointer(), "/fields/3");
        tracker.pop();
        tracker.pop();
        assert_eq!(tracker.snapshot().to_pointer(), "/");
    }
}

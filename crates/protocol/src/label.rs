use std::sync::Arc;

/// Human-readable region name shared between the live outline and its
/// snapshots.
///
/// Wraps `Arc<str>` so taking a snapshot of a large outline clones a pointer
/// per node instead of re-allocating every label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(Arc<str>);

impl Label {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Label as printed in plain outlines: identifier-style underscores become
    /// spaces (`solve_linear` prints as `solve linear`).
    pub fn display_name(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl PartialEq<str> for Label {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Label {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::ops::Deref for Label {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Label {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    #[inline]
    fn from(s: &str) -> Self {
        Label(Arc::from(s))
    }
}

impl From<String> for Label {
    #[inline]
    fn from(s: String) -> Self {
        Label(Arc::from(s))
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

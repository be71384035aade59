//! Cache keys.

use std::fmt;

/// Hierarchical cache key, e.g. `["pageData", "dashboard"]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The fixed key holding the signed-in user.
    pub fn current_user() -> Self {
        Self::new(["user"])
    }

    /// Key for a page's `/{page}/onload` payload.
    pub fn page_data(page: &str) -> Self {
        Self::new(["pageData", page])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

use std::fmt;

/// Path plus query string of the host location; the wizard resets whenever
/// this identity changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteIdentity {
    pub path: String,
    pub query: String,
}

impl RouteIdentity {
    /// Parses a location such as `/cases/new?patient=42#top`. The fragment is
    /// ignored and a trailing `/` or `?` does not change the identity.
    pub fn parse(location: &str) -> Self {
        let without_fragment = location.trim().split('#').next().unwrap_or_default();
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        };
        Self {
            path,
            query: query.to_string(),
        }
    }
}

impl fmt::Display for RouteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

//! Route gate policy.
//!
//! A request bypasses authentication when its path, without the leading `/`,
//! starts with one of the public prefixes. Matching is a plain string prefix,
//! so `login` also covers `/login/` and `/login?error=...` paths.

/// Prefixes that bypass the gate when nothing else is configured.
pub const DEFAULT_PUBLIC_PREFIXES: &[&str] = &[
    "api/ingest",
    "api/auth",
    "static",
    "image",
    "favicon.ico",
    "login",
    "health",
];

/// Decides which request paths require a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGate {
    public_prefixes: Vec<String>,
}

impl Default for RouteGate {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_PREFIXES.iter().copied())
    }
}

impl RouteGate {
    /// Creates a gate from a list of public prefixes.
    ///
    /// Leading slashes are stripped and empty entries dropped, so a stray
    /// `"/"` cannot open every route.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let public_prefixes = prefixes
            .into_iter()
            .map(|p| p.as_ref().trim().trim_start_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();

        Self { public_prefixes }
    }

    /// Keeps `path` reachable without a session, e.g. the sign-in page.
    ///
    /// A bare `/` is ignored like any other empty prefix.
    #[must_use]
    pub fn with_public_path(mut self, path: &str) -> Self {
        let prefix = path.trim().trim_start_matches('/');
        if !prefix.is_empty() && !self.public_prefixes.iter().any(|p| p == prefix) {
            self.public_prefixes.push(prefix.to_string());
        }
        self
    }

    /// Returns the configured public prefixes.
    #[must_use]
    pub fn public_prefixes(&self) -> &[String] {
        &self.public_prefixes
    }

    /// Returns true when `path` passes through without authentication.
    #[must_use]
    pub fn is_public(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.public_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Returns true when `path` requires a session.
    #[must_use]
    pub fn is_gated(&self, path: &str) -> bool {
        !self.is_public(path)
    }
}

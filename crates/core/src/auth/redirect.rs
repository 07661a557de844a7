//! Post-sign-in redirect targets.

/// Reduces a requested callback URL to a same-origin path.
///
/// Relative paths are kept, absolute URLs on `base_url` are cut down to their
/// path, and anything else (other origins, protocol-relative `//host`) falls
/// back to `/`. Targets with control characters also fall back to `/`:
/// browsers drop tabs and newlines while parsing, which can turn `/\t/host`
/// into `//host`.
#[must_use]
pub fn safe_callback_path(requested: Option<&str>, base_url: &str) -> String {
    let Some(requested) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
        return "/".to_string();
    };

    if requested.chars().any(|c| c.is_control()) {
        return "/".to_string();
    }

    if is_local_path(requested) {
        return requested.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if let Some(rest) = requested.strip_prefix(base) {
        if rest.is_empty() {
            return "/".to_string();
        }
        if is_local_path(rest) {
            return rest.to_string();
        }
    }

    "/".to_string()
}

fn is_local_path(s: &str) -> bool {
    s.starts_with('/') && !s.starts_with("//") && !s.starts_with("/\\")
}

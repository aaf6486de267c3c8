//! The single "is this URL ours" predicate.

/// Split `scheme://host/rest` and lowercase the scheme and host.
fn normalize(url: &str) -> Option<(String, String, String)> {
    let (scheme, rest) = url.trim().split_once("://")?;
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return None;
    }
    let (host, path) = match rest.split_once('/') {
        Some((host, path)) => (host, format!("/{path}")),
        None => (rest, String::new()),
    };
    if host.is_empty() {
        return None;
    }
    Some((scheme, host.to_ascii_lowercase(), path))
}

/// URL prefixes owned by an asset store.
///
/// A URL matches a prefix when scheme and host are equal (case-insensitive)
/// and the path starts with the prefix path on a segment boundary, so
/// `https://cdn.test/a` does not match `https://cdn.test/ab/x.png` or
/// `https://cdn.test.evil.com/a/x.png`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagedUrlPolicy {
    prefixes: Vec<(String, String, String)>,
}

impl ManagedUrlPolicy {
    /// Prefixes that are not absolute http(s) URLs are ignored.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prefixes = prefixes
            .into_iter()
            .filter_map(|p| normalize(p.as_ref()))
            .map(|(scheme, host, path)| (scheme, host, path.trim_end_matches('/').to_string()))
            .collect();
        Self { prefixes }
    }

    #[must_use]
    pub fn is_managed(&self, url: &str) -> bool {
        let Some((scheme, host, path)) = normalize(url) else {
            return false;
        };
        self.prefixes.iter().any(|(p_scheme, p_host, p_path)| {
            if *p_scheme != scheme || *p_host != host {
                return false;
            }
            match path.strip_prefix(p_path.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            }
        })
    }

    /// Path of `url` relative to the first matching prefix, without a leading slash.
    #[must_use]
    pub fn relative_path(&self, url: &str) -> Option<String> {
        let (scheme, host, path) = normalize(url)?;
        self.prefixes
            .iter()
            .filter(|(p_scheme, p_host, _)| *p_scheme == scheme && *p_host == host)
            .find_map(|(_, _, p_path)| {
                let rest = path.strip_prefix(p_path.as_str())?;
                rest.strip_prefix('/').map(str::to_string)
            })
    }
}

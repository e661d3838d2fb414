//! Normalization and composition of URL path fragments.

/// Canonicalize a path fragment.
///
/// A single trailing `/*` wildcard is stripped first, then one trailing `/`
/// if what remains is longer than one character. An empty result is the
/// root, `"/"`.
///
/// ```
/// use paths::normalize;
///
/// assert_eq!(normalize("/foo/*"), "/foo");
/// assert_eq!(normalize("/foo/"), "/foo");
/// assert_eq!(normalize("/*"), "/");
/// assert_eq!(normalize(""), "/");
/// ```
pub fn normalize(path: &str) -> String {
    let mut stripped = path.strip_suffix("/*").unwrap_or(path);
    if stripped.len() > 1 {
        stripped = stripped.strip_suffix('/').unwrap_or(stripped);
    }
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}

/// Join two path fragments.
///
/// Both inputs are normalized first. Two roots compose to the empty string;
/// otherwise each root contributes nothing and the rest is concatenated as is.
///
/// ```
/// use paths::compose;
///
/// assert_eq!(compose("/", "/"), "");
/// assert_eq!(compose("/app", "/"), "/app");
/// assert_eq!(compose("/", "/api"), "/api");
/// assert_eq!(compose("/app", "/api"), "/app/api");
/// ```
pub fn compose(left: &str, right: &str) -> String {
    let left = normalize(left);
    let right = normalize(right);
    if left == "/" && right == "/" {
        return String::new();
    }

    let mut out = String::with_capacity(left.len() + right.len());
    if left != "/" {
        out.push_str(&left);
    }
    if right != "/" {
        out.push_str(&right);
    }
    out
}

/// Prefix `/` to a fragment that lacks one. Scanned path templates are not
/// guaranteed to start with a separator.
pub fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

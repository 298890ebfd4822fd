use url::Url;

/// Map an absolute URL to the relative path it gets stored at under the
/// workspace root.
///
/// The path component of the URL becomes the local path, with the single
/// leading separator stripped so it is safe to join under the workspace.
/// With `keep_query` the query string is appended after a `?`; that form is
/// used for rewriting references inside the document, never for the file
/// written to disk.
///
/// Returns `None` for anything that has no usable local path: unparseable
/// values, URLs without a host (`mailto:`, `javascript:`, `data:`), and root
/// URLs whose path is empty. Callers leave such references untouched.
pub fn local_path_for(url: &str, keep_query: bool) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str()?;

    let path = parsed.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    match parsed.query() {
        Some(query) if keep_query => Some(format!("{}?{}", path, query)),
        _ => Some(path.to_string()),
    }
}

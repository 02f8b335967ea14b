//! Repository slug derivation

use crate::error::{Error, Result};
use url::Url;

/// Derive the clone directory name from a template source
///
/// The slug is the last path segment with its final extension stripped.
///
/// # Examples
/// - https://github.com/user/repo.git -> repo
/// - git@github.com:user/my-project.git -> my-project
/// - /srv/templates/starter -> starter
///
/// # Errors
/// Returns `InvalidSource` when the path has no usable base name
pub fn resolve_slug(source: &str) -> Result<String> {
    let path = source_path(source.trim()).ok_or_else(|| Error::invalid_source(source))?;

    let base = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if base == "." || base == ".." {
        return Err(Error::invalid_source(source));
    }
    let slug = strip_extension(base);

    // the slug becomes a directory name under the base dir
    if slug.is_empty() || slug == "." || slug == ".." || slug.contains(['/', '\\']) {
        return Err(Error::invalid_source(source));
    }

    Ok(slug.to_string())
}

/// Extract the path component of a source
fn source_path(source: &str) -> Option<String> {
    if source.contains("://") {
        let parsed = Url::parse(source).ok()?;
        return Some(parsed.path().to_string());
    }

    if let Some(path) = scp_path(source) {
        return Some(path.to_string());
    }

    Some(source.to_string())
}

/// Path part of scp-like syntax (`user@host:owner/repo.git`)
fn scp_path(source: &str) -> Option<&str> {
    let (host, path) = source.split_once(':')?;
    // a single letter before ':' is a drive, not a host
    if host.len() <= 1 || host.contains('/') {
        return None;
    }
    Some(path)
}

fn strip_extension(base: &str) -> &str {
    match base.rfind('.') {
        Some(idx) => &base[..idx],
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_slug_https() {
        assert_eq!(
            resolve_slug("https://github.com/yaza-putu/golang-starter-api.git").unwrap(),
            "golang-starter-api"
        );
        assert_eq!(
            resolve_slug("https://github.com/user/repo").unwrap(),
            "repo"
        );
        assert_eq!(
            resolve_slug("https://github.com/user/repo.git/").unwrap(),
            "repo"
        );
    }

    #[test]
    fn test_resolve_slug_ignores_query() {
        assert_eq!(
            resolve_slug("https://example.com/user/repo.git?ref=main").unwrap(),
            "repo"
        );
    }

    #[test]
    fn test_resolve_slug_scp_and_local() {
        assert_eq!(
            resolve_slug("git@github.com:user/my-project.git").unwrap(),
            "my-project"
        );
        assert_eq!(resolve_slug("/srv/templates/starter").unwrap(), "starter");
        assert_eq!(resolve_slug("file:///srv/templates/starter.git").unwrap(), "starter");
        assert_eq!(resolve_slug("templates/my.api.git").unwrap(), "my.api");
    }

    #[test]
    fn test_resolve_slug_empty_base_is_invalid() {
        for source in [
            "",
            "   ",
            "/",
            "https://github.com/",
            "https://github.com",
            ".git",
            "git@host:",
            ".",
            "..",
            "../",
            "/srv/x/..",
            "/srv/x/...",
            "https://example.com/..",
            "templates\\..\\..",
        ] {
            assert!(
                matches!(resolve_slug(source), Err(Error::InvalidSource { .. })),
                "expected InvalidSource for {:?}",
                source
            );
        }
    }

    #[test]
    fn test_resolve_slug_is_deterministic() {
        let source = "https://github.com/yaza-putu/golang-starter-mongo-api.git";
        let first = resolve_slug(source).unwrap();
        for _ in 0..5 {
            assert_eq!(resolve_slug(source).unwrap(), first);
        }
    }
}

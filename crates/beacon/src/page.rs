//! Deriving what is being viewed from the embedding page.

use std::sync::LazyLock;

use regex::Regex;

/// A snapshot of the page being viewed, as the embedder sees it.
#[derive(Debug, Clone, Default)]
pub struct Page {
    /// URL path of the page, e.g. `/blog/first-post`.
    pub path: String,
    /// Hostname the page is served from.
    pub hostname: String,
    /// Explicit slug override, the markup-attribute escape hatch. Wins over
    /// any URL pattern when present.
    pub slug_override: Option<String>,
    /// Declared site identifier (the meta-tag value); hostname is the
    /// fallback.
    pub site_id: Option<String>,
}

/// Ordered URL templates, first match wins. Order is behaviorally
/// significant: the root template only sees single-segment paths, so a
/// deeper path that matches none of the content prefixes yields no slug.
static SLUG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^/blog/([^/]+)/?$",
        r"^/posts/([^/]+)/?$",
        r"^/articles/([^/]+)/?$",
        r"^/([^/]+)/?$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("slug pattern is valid"))
    .collect()
});

/// Resolve the content identifier for a page, if it has one.
///
/// An explicit override wins; otherwise the path is matched against the
/// ordered templates. `None` means the page is not trackable content and
/// tracking is skipped entirely.
///
/// The root template accepts any single-segment path, including pages that
/// are not content at all (`/about`, `/contact`); hosts with such routes
/// should set the explicit override on their content pages.
pub fn extract_slug(page: &Page) -> Option<String> {
    if let Some(slug) = page.slug_override.as_deref().filter(|s| !s.is_empty()) {
        return Some(slug.to_owned());
    }
    for pattern in SLUG_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(&page.path) {
            if let Some(m) = captures.get(1) {
                return Some(m.as_str().to_owned());
            }
        }
    }
    None
}

/// The website identifier reported with each view: the declared site id
/// when present, else the hostname.
pub fn resolve_site(page: &Page) -> String {
    page.site_id.clone().unwrap_or_else(|| page.hostname.clone())
}

/// Loopback hosts where automatic tracking stays off.
pub fn is_development_host(hostname: &str) -> bool {
    hostname == "localhost" || hostname == "127.0.0.1"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> Page {
        Page { path: path.to_owned(), hostname: "example.com".to_owned(), ..Page::default() }
    }

    #[test]
    fn test_blog_prefix_wins() {
        assert_eq!(extract_slug(&page("/blog/first-post")).as_deref(), Some("first-post"));
    }

    #[test]
    fn test_posts_and_articles_prefixes() {
        assert_eq!(extract_slug(&page("/posts/hello")).as_deref(), Some("hello"));
        assert_eq!(extract_slug(&page("/articles/hello")).as_deref(), Some("hello"));
    }

    #[test]
    fn test_trailing_slash_is_accepted() {
        assert_eq!(extract_slug(&page("/blog/first-post/")).as_deref(), Some("first-post"));
    }

    #[test]
    fn test_root_fallback_matches_single_segment() {
        assert_eq!(extract_slug(&page("/standalone")).as_deref(), Some("standalone"));
    }

    #[test]
    fn test_deep_unrecognized_path_has_no_slug() {
        assert_eq!(extract_slug(&page("/shop/items/42")), None);
        assert_eq!(extract_slug(&page("/docs/guide")), None);
    }

    #[test]
    fn test_bare_root_has_no_slug() {
        assert_eq!(extract_slug(&page("/")), None);
    }

    #[test]
    fn test_override_beats_url_patterns() {
        let mut p = page("/blog/from-url");
        p.slug_override = Some("from-markup".to_owned());
        assert_eq!(extract_slug(&p).as_deref(), Some("from-markup"));
    }

    #[test]
    fn test_empty_override_is_ignored() {
        let mut p = page("/blog/from-url");
        p.slug_override = Some(String::new());
        assert_eq!(extract_slug(&p).as_deref(), Some("from-url"));
    }

    #[test]
    fn test_site_prefers_declared_id() {
        let mut p = page("/blog/x");
        assert_eq!(resolve_site(&p), "example.com");
        p.site_id = Some("site-42".to_owned());
        assert_eq!(resolve_site(&p), "site-42");
    }

    #[test]
    fn test_development_hosts() {
        assert!(is_development_host("localhost"));
        assert!(is_development_host("127.0.0.1"));
        assert!(!is_development_host("example.com"));
    }
}

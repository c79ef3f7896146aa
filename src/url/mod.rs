//! URL handling module for Site-Health
//!
//! This module provides URL normalization, origin extraction, and link
//! classification.

mod domain;
mod normalize;

use crate::state::LinkType;
use ::url::Url;

// Re-export main functions
pub use domain::{extract_origin, is_same_origin};
pub use normalize::{normalize_url, parse_absolute};

/// Path suffixes treated as images
const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico"];

/// Classifies a link target
///
/// The first matching rule wins:
/// 1. Image extension on the path
/// 2. `.css` on the path
/// 3. `.js` on the path
/// 4. Different origin → External
/// 5. Page
///
/// Extension matching is case-insensitive and ignores the query string, so
/// asset checks take precedence over the origin check.
///
/// # Examples
///
/// ```
/// use site_health::url::classify_link;
/// use site_health::LinkType;
/// use url::Url;
///
/// let url = Url::parse("https://cdn.other.org/logo.PNG").unwrap();
/// assert_eq!(classify_link(&url, "example.com"), LinkType::Image);
///
/// let url = Url::parse("https://other.org/").unwrap();
/// assert_eq!(classify_link(&url, "example.com"), LinkType::External);
/// ```
pub fn classify_link(url: &Url, origin: &str) -> LinkType {
    let path = url.path().to_lowercase();

    if IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return LinkType::Image;
    }

    if path.ends_with(".css") {
        return LinkType::Css;
    }

    if path.ends_with(".js") {
        return LinkType::Js;
    }

    if !is_same_origin(url, origin) {
        return LinkType::External;
    }

    LinkType::Page
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "example.com";

    fn classify(s: &str) -> LinkType {
        classify_link(&Url::parse(s).unwrap(), ORIGIN)
    }

    #[test]
    fn test_classify_images() {
        for ext in ["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"] {
            let url = format!("https://example.com/img/pic.{}", ext);
            assert_eq!(classify(&url), LinkType::Image, "extension {}", ext);
        }
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("https://example.com/LOGO.JPG"), LinkType::Image);
        assert_eq!(classify("https://example.com/Site.CSS"), LinkType::Css);
        assert_eq!(classify("https://example.com/App.Js"), LinkType::Js);
    }

    #[test]
    fn test_classify_css_and_js() {
        assert_eq!(classify("https://example.com/style.css"), LinkType::Css);
        assert_eq!(classify("https://example.com/app.js"), LinkType::Js);
    }

    #[test]
    fn test_assets_take_precedence_over_origin() {
        assert_eq!(classify("https://cdn.other.org/style.css"), LinkType::Css);
        assert_eq!(classify("https://cdn.other.org/app.js"), LinkType::Js);
        assert_eq!(classify("https://cdn.other.org/pic.gif"), LinkType::Image);
    }

    #[test]
    fn test_query_does_not_affect_extension() {
        assert_eq!(
            classify("https://example.com/style.css?v=3"),
            LinkType::Css
        );
        assert_eq!(classify("https://example.com/page?file=a.css"), LinkType::Page);
    }

    #[test]
    fn test_classify_external() {
        assert_eq!(classify("https://other.org/"), LinkType::External);
        assert_eq!(classify("https://sub.example.com/"), LinkType::External);
    }

    #[test]
    fn test_classify_page() {
        assert_eq!(classify("https://example.com/"), LinkType::Page);
        assert_eq!(classify("https://example.com/about"), LinkType::Page);
        assert_eq!(classify("https://example.com/doc.pdf"), LinkType::Page);
    }

    #[test]
    fn test_classification_is_exhaustive() {
        let urls = [
            "https://example.com/",
            "https://example.com/a.png",
            "https://example.com/a.css",
            "https://example.com/a.js",
            "https://other.org/a",
            "https://other.org/a.jpeg",
        ];
        for url in urls {
            let link_type = classify(url);
            assert!(LinkType::all_types().contains(&link_type));
        }
    }
}

use url::Url;

/// Extracts the origin key of a URL: lowercase host plus an explicit port
///
/// Two URLs are same-origin when their keys are equal. The default port of the
/// scheme is not part of the key, so `https://example.com:443/` and
/// `https://example.com/` share an origin.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_health::url::extract_origin;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_origin(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_origin(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_origin(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Returns true if `url` belongs to `origin` (as produced by [`extract_origin`])
pub fn is_same_origin(url: &Url, origin: &str) -> bool {
    extract_origin(url).as_deref() == Some(origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_origin(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_origin(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_origin(&url), Some("example.com:8080".to_string()));
    }

    #[test]
    fn test_default_port_dropped() {
        let url = Url::parse("https://example.com:443/").unwrap();
        assert_eq!(extract_origin(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_uppercase_converted_to_lowercase() {
        let url = Url::parse("https://Example.COM/").unwrap();
        assert_eq!(extract_origin(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_same_origin() {
        let url = Url::parse("https://example.com/a?b=c").unwrap();
        assert!(is_same_origin(&url, "example.com"));
        assert!(!is_same_origin(&url, "www.example.com"));
        assert!(!is_same_origin(&url, "example.com:8080"));
    }

    #[test]
    fn test_different_port_is_different_origin() {
        let a = Url::parse("http://127.0.0.1:4000/").unwrap();
        let b = Url::parse("http://127.0.0.1:5000/").unwrap();
        let origin = extract_origin(&a).unwrap();
        assert!(is_same_origin(&a, &origin));
        assert!(!is_same_origin(&b, &origin));
    }
}

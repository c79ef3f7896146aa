use crate::UrlError;
use url::Url;

/// Normalizes a raw link relative to the page it was found on
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` (relative paths, protocol-relative `//host`,
///    and absolute URLs all follow standard URL resolution)
/// 2. Reject anything that is not HTTP(S) after resolution
/// 3. Remove fragment (everything after #)
///
/// The query string is kept as-is.
///
/// # Arguments
///
/// * `raw` - The link exactly as it appeared in the document
/// * `base` - The URL of the document
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL
/// * `Err(UrlError)` - The link is not a valid crawl target
///
/// # Examples
///
/// ```
/// use site_health::url::normalize_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let url = normalize_url("intro.html#setup", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/intro.html");
/// ```
pub fn normalize_url(raw: &str, base: &Url) -> Result<Url, UrlError> {
    let mut url = base
        .join(raw.trim())
        .map_err(|e| UrlError::Malformed(format!("{}: {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}

/// Parses an absolute URL and normalizes it against itself
///
/// Used for seed URLs, which have no page to be relative to.
pub fn parse_absolute(raw: &str) -> Result<Url, UrlError> {
    let base = Url::parse(raw.trim()).map_err(|e| UrlError::Malformed(format!("{}: {}", raw, e)))?;
    normalize_url(base.as_str(), &base)
}

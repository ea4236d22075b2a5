use url::Url;

/// Extracts the per-host bookkeeping key from a URL
///
/// The key is the URL's origin (`scheme://host[:port]`, host lowercased,
/// default ports omitted), so robots.txt can be fetched from
/// `<key>/robots.txt`. Returns `None` for URLs without a network host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use folio_bad_urls::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://example.com:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("http://example.com:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str()?;
    Some(url.origin().ascii_serialization())
}

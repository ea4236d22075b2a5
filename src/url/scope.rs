/// Decides whether a URL is in scope for checking
///
/// A non-empty allow-list wins outright: the URL must contain one of its
/// entries and the block-list is ignored. Otherwise the URL is rejected iff
/// it contains a block-list entry. Matching is plain substring containment.
///
/// # Examples
///
/// ```
/// use folio_bad_urls::url::accept;
///
/// let allow = vec!["example.org".to_string()];
/// let block = vec!["example.org/private".to_string()];
///
/// assert!(accept("https://example.org/private/a", &allow, &block));
/// assert!(!accept("https://other.org/a", &allow, &block));
/// assert!(!accept("https://example.org/private/a", &[], &block));
/// assert!(accept("https://other.org/a", &[], &[]));
/// ```
pub fn accept(url: &str, allow_list: &[String], block_list: &[String]) -> bool {
    if !allow_list.is_empty() {
        return allow_list.iter().any(|entry| url.contains(entry.as_str()));
    }

    !block_list.iter().any(|entry| url.contains(entry.as_str()))
}

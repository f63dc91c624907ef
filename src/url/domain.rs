use url::Url;

/// Extracts the lowercase host from a URL string
///
/// Returns None if the string does not parse or has no host.
///
/// # Examples
///
/// ```
/// use company_harvest::url::extract_domain;
///
/// assert_eq!(extract_domain("https://EXAMPLE.com/path"), Some("example.com".to_string()));
/// assert_eq!(extract_domain("not a url"), None);
/// ```
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|h| h.to_lowercase())
}

/// Returns true if the host is the target site or one of its subdomains
pub fn is_target_domain(host: &str) -> bool {
    host == "linkedin.com" || host.ends_with(".linkedin.com")
}

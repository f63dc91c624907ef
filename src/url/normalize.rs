/// Canonicalizes a company website value
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Protocol-relative `//host` becomes `https://host`
/// 3. A value without an `http://` or `https://` scheme gets `https://` prepended
///
/// Returns None for blank input.
///
/// # Examples
///
/// ```
/// use company_harvest::url::normalize_website;
///
/// assert_eq!(normalize_website("foo.com").as_deref(), Some("https://foo.com"));
/// assert_eq!(normalize_website("//cdn.foo.com/x").as_deref(), Some("https://cdn.foo.com/x"));
/// assert_eq!(normalize_website("http://foo.com").as_deref(), Some("http://foo.com"));
/// ```
pub fn normalize_website(raw: &str) -> Option<String> {
    let site = raw.trim();
    if site.is_empty() {
        return None;
    }

    let site = match site.strip_prefix("//") {
        Some(rest) => format!("https://{}", rest),
        None => site.to_string(),
    };

    if has_http_scheme(&site) {
        Some(site)
    } else {
        Some(format!("https://{}", site))
    }
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

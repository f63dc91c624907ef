use regex::Regex;
use std::sync::OnceLock;

/// Company profile paths on the target site, matched case-insensitively
const COMPANY_URL_PATTERN: &str = r"(?i)^https?://(www\.)?linkedin\.com/company/[A-Za-z0-9\-\._%]+/?$";

fn company_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(COMPANY_URL_PATTERN).expect("company URL regex is valid"))
}

/// Checks whether a URL points at a public company profile page
///
/// Only `http(s)://[www.]linkedin.com/company/<slug>[/]` is accepted; query
/// strings, fragments and deeper paths are rejected.
///
/// # Examples
///
/// ```
/// use company_harvest::url::is_company_url;
///
/// assert!(is_company_url("https://www.linkedin.com/company/acme"));
/// assert!(is_company_url("HTTP://LINKEDIN.COM/company/Acme-Corp/"));
/// assert!(!is_company_url("https://www.linkedin.com/in/someone"));
/// assert!(!is_company_url("https://example.com/company/acme"));
/// ```
pub fn is_company_url(url: &str) -> bool {
    company_url_regex().is_match(url)
}

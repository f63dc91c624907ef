//! Company page parser
//!
//! Structured data is preferred: JSON-LD organization blocks supply name,
//! logo, website, address and description. Meta tags fill in a missing
//! name or description, and a few conservative text patterns pick up
//! follower counts, company size, founding year and industry.

use crate::extract::schema::CompanyRecord;
use crate::extract::{ExtractError, PageParser};
use crate::url::{extract_domain, is_target_domain};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Longest raw snippet kept when the page has no `<head>`
const RAW_SNIPPET_CHARS: usize = 2000;

const ORGANIZATION_TYPES: &[&str] = &["Organization", "Corporation", "LocalBusiness"];

struct Patterns {
    followers: Regex,
    company_size: Regex,
    founded: Regex,
    industry: Regex,
    employees: Regex,
    external_link: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        followers: Regex::new(r"(?i)([\d,\.]+)\s+followers").expect("followers regex is valid"),
        company_size: Regex::new(r"(?i)(\d[\d,\.]*\+?\s*employees)")
            .expect("company size regex is valid"),
        founded: Regex::new(r"(?i)Founded\s+(\d{4})").expect("founded regex is valid"),
        industry: Regex::new(r"Industry\s*[:|-]\s*([A-Za-z &/,\-]+)")
            .expect("industry regex is valid"),
        employees: Regex::new(r"(?i)([\d,\.]+)\s+employees").expect("employees regex is valid"),
        external_link: Regex::new(r"^https?://(www\.)?[A-Za-z0-9\.\-]+\.[A-Za-z]{2,}(/.*)?$")
            .expect("external link regex is valid"),
    })
}

/// Parser for public company profile pages
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyPageParser {
    include_raw: bool,
}

impl CompanyPageParser {
    pub fn new(include_raw: bool) -> Self {
        Self { include_raw }
    }
}

impl PageParser for CompanyPageParser {
    fn parse(&self, html: &str, url: &str) -> Result<CompanyRecord, ExtractError> {
        parse_company_page(html, url, self.include_raw)
    }
}

/// Extracts a company record from page HTML
///
/// # Arguments
///
/// * `html` - The page body
/// * `url` - The page URL, stored on the record
/// * `include_raw` - Attach the `<head>` markup (or a prefix of the page)
///
/// # Returns
///
/// * `Ok(CompanyRecord)` - Record with every field that could be found
/// * `Err(ExtractError::EmptyDocument)` - The body was blank
///
/// # Example
///
/// ```
/// use company_harvest::extract::parse_company_page;
///
/// let html = r#"<html><head><meta property="og:title" content="Acme | LinkedIn"></head>
///               <body>Founded 1999</body></html>"#;
/// let record = parse_company_page(html, "https://www.linkedin.com/company/acme", false).unwrap();
/// assert_eq!(record.name.as_deref(), Some("Acme"));
/// assert_eq!(record.founded, Some(1999));
/// ```
pub fn parse_company_page(
    html: &str,
    url: &str,
    include_raw: bool,
) -> Result<CompanyRecord, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let document = Html::parse_document(html);
    let mut record = CompanyRecord::for_url(url);
    record.scraped_at = Some(super::now_iso_utc());

    for block in json_ld_blocks(&document) {
        apply_json_ld(&mut record, &block);
    }

    if record.name.is_none() {
        record.name = meta_content(&document, &["meta[property='og:title']", "meta[name='title']"])
            .and_then(|title| title.split(" | ").next().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty());
    }

    if record.description.is_none() {
        record.description = meta_content(
            &document,
            &["meta[property='og:description']", "meta[name='description']"],
        )
        .map(|d| d.trim().to_string())
        .filter(|s| !s.is_empty());
    }

    let text = visible_text(&document);
    apply_text_heuristics(&mut record, &text);

    if record.website.is_none() {
        record.website = first_external_link(&document);
    }

    if include_raw {
        record.raw_html = Some(raw_snippet(&document, html));
    }

    Ok(record)
}

/// Collects JSON-LD objects; arrays are flattened and invalid blocks skipped
fn json_ld_blocks(document: &Html) -> Vec<Map<String, Value>> {
    let mut blocks = Vec::new();
    let Ok(selector) = Selector::parse("script[type='application/ld+json']") else {
        return blocks;
    };

    for element in document.select(&selector) {
        let raw = element.text().collect::<String>();
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(obj)) => blocks.push(obj),
            Ok(Value::Array(items)) => blocks.extend(items.into_iter().filter_map(|item| match item {
                Value::Object(obj) => Some(obj),
                _ => None,
            })),
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping malformed JSON-LD block: {}", e),
        }
    }

    blocks
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// First string of a value that may be a string or a list of strings
fn first_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    }
}

fn is_organization_block(block: &Map<String, Value>) -> bool {
    let typed = match block.get("@type") {
        Some(Value::String(t)) => ORGANIZATION_TYPES.contains(&t.as_str()),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| ORGANIZATION_TYPES.contains(&t)),
        _ => false,
    };
    typed || block.contains_key("name")
}

/// Fills still-empty fields from one JSON-LD block
fn apply_json_ld(record: &mut CompanyRecord, block: &Map<String, Value>) {
    if !is_organization_block(block) {
        return;
    }

    if record.name.is_none() {
        record.name = str_field(block, "name");
    }

    if record.logo.is_none() {
        record.logo = match block.get("logo") {
            Some(Value::Object(logo)) => str_field(logo, "url").or_else(|| str_field(logo, "contentUrl")),
            other => first_string(other),
        };
    }

    if record.website.is_none() {
        record.website = str_field(block, "url").or_else(|| first_string(block.get("sameAs")));
    }

    if let Some(addr) = first_address(block) {
        let main = &mut record.main_address;
        main.street_address = main.street_address.take().or_else(|| str_field(addr, "streetAddress"));
        main.address_locality = main
            .address_locality
            .take()
            .or_else(|| str_field(addr, "addressLocality"));
        main.address_region = main.address_region.take().or_else(|| str_field(addr, "addressRegion"));
        main.postal_code = main.postal_code.take().or_else(|| str_field(addr, "postalCode"));
        main.address_country = main.address_country.take().or_else(|| match addr.get("addressCountry") {
            Some(Value::Object(country)) => str_field(country, "name"),
            _ => str_field(addr, "addressCountry"),
        });
    }

    if record.description.is_none() {
        record.description = str_field(block, "description");
    }
}

fn first_address(block: &Map<String, Value>) -> Option<&Map<String, Value>> {
    match block.get("address")? {
        Value::Object(addr) => Some(addr),
        Value::Array(items) => items.first()?.as_object(),
        _ => None,
    }
}

fn meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).ok()?;
        document
            .select(&selector)
            .find_map(|el| el.value().attr("content"))
            .map(str::to_string)
    })
}

/// Page text outside `<script>` and `<style>`, joined by single spaces
fn visible_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| matches!(parent.value().name(), "script" | "style" | "noscript"))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

/// Parses counts written with thousands separators, e.g. `124,567`
fn parse_count(raw: &str) -> Option<u64> {
    raw.chars()
        .filter(|c| *c != ',' && *c != '.')
        .collect::<String>()
        .parse()
        .ok()
}

fn apply_text_heuristics(record: &mut CompanyRecord, text: &str) {
    let p = patterns();

    if let Some(caps) = p.followers.captures(text) {
        if let Some(count) = parse_count(&caps[1]) {
            record.followers_count = Some(count);
        }
    }

    if record.company_size.is_none() {
        record.company_size = p.company_size.captures(text).map(|caps| caps[1].to_string());
    }

    if let Some(caps) = p.founded.captures(text) {
        record.founded = caps[1].parse().ok();
    }

    if record.industry.is_none() {
        record.industry = p
            .industry
            .captures(text)
            .map(|caps| caps[1].trim().to_string())
            .filter(|s| !s.is_empty());
    }

    if record.number_of_employees.is_none() {
        record.number_of_employees = p
            .employees
            .captures(text)
            .and_then(|caps| parse_count(&caps[1]));
    }
}

/// First absolute link that leaves the target site
fn first_external_link(document: &Html) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let p = patterns();

    document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| {
            p.external_link.is_match(href)
                && extract_domain(href).is_some_and(|host| !is_target_domain(&host))
        })
        .map(str::to_string)
}

fn raw_snippet(document: &Html, html: &str) -> String {
    Selector::parse("head")
        .ok()
        .and_then(|selector| document.select(&selector).next().map(|head| head.html()))
        .unwrap_or_else(|| html.chars().take(RAW_SNIPPET_CHARS).collect())
}

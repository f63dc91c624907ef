//! Record normalization
//!
//! Total over well-formed records: every step only tidies values.

use crate::extract::schema::{CompanyRecord, POSTAL_ADDRESS_TYPE};
use crate::url::normalize_website;

/// Collapses runs of whitespace to one space and trims
pub fn clean_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleans an optional text value; blank values become None
fn clean_field(field: &mut Option<String>) {
    if let Some(value) = field.take() {
        let cleaned = clean_whitespace(&value);
        if !cleaned.is_empty() {
            *field = Some(cleaned);
        }
    }
}

/// Normalizes an extracted record
///
/// - Text fields have whitespace collapsed; blank text becomes null
/// - The website is canonicalized to an absolute http(s) URL
/// - Address parts that are blank become null and the address type
///   defaults to `PostalAddress`
pub fn normalize_record(record: CompanyRecord) -> CompanyRecord {
    let mut out = record;

    for field in [
        &mut out.name,
        &mut out.description,
        &mut out.website,
        &mut out.industry,
        &mut out.company_size,
        &mut out.headquarters,
        &mut out.company_type,
        &mut out.specialties,
        &mut out.logo,
        &mut out.url,
        &mut out.scraped_at,
    ] {
        clean_field(field);
    }

    out.website = out.website.as_deref().and_then(normalize_website);

    for field in out.main_address.fields_mut() {
        clean_field(field);
    }
    if out.main_address.address_type.trim().is_empty() {
        out.main_address.address_type = POSTAL_ADDRESS_TYPE.to_string();
    }

    for field in [
        &mut out.stock.symbol,
        &mut out.stock.price,
        &mut out.stock.change,
    ] {
        clean_field(field);
    }

    out.addresses = out
        .addresses
        .iter()
        .map(|a| clean_whitespace(a))
        .filter(|a| !a.is_empty())
        .collect();

    out
}

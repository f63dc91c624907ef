//! Company data extraction
//!
//! Turns a fetched page body into a [`CompanyRecord`] and tidies it up
//! before it is written out.

mod normalize;
mod parser;
mod schema;

use thiserror::Error;

pub use normalize::{clean_whitespace, normalize_record};
pub use parser::{parse_company_page, CompanyPageParser};
pub use schema::{AffiliatedPage, CompanyRecord, PostalAddress, StockInfo, POSTAL_ADDRESS_TYPE};

/// Errors raised while extracting a record from a page
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("page body is empty")]
    EmptyDocument,
}

/// Parses a page body into a company record
pub trait PageParser: Send + Sync {
    fn parse(&self, html: &str, url: &str) -> Result<CompanyRecord, ExtractError>;
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SSZ`
pub fn now_iso_utc() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

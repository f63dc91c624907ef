//! Company record schema
//!
//! Field names serialize in camelCase to match the published output format.

use serde::{Deserialize, Serialize};

pub const POSTAL_ADDRESS_TYPE: &str = "PostalAddress";

/// Structured data extracted from one company page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompanyRecord {
    pub name: Option<String>,
    pub url: Option<String>,
    pub main_address: PostalAddress,
    pub description: Option<String>,
    pub number_of_employees: Option<u64>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub headquarters: Option<String>,
    #[serde(rename = "type")]
    pub company_type: Option<String>,
    pub founded: Option<i32>,
    pub specialties: Option<String>,
    pub followers_count: Option<u64>,
    pub stock: StockInfo,
    pub addresses: Vec<String>,
    pub affiliated_pages: Vec<AffiliatedPage>,
    pub similar_pages: Vec<AffiliatedPage>,
    /// Only present when raw snippets were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
    pub scraped_at: Option<String>,
}

impl CompanyRecord {
    /// Empty record for `url`
    pub fn for_url(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }
}

/// schema.org style postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostalAddress {
    #[serde(rename = "type")]
    pub address_type: String,
    pub street_address: Option<String>,
    pub address_locality: Option<String>,
    pub address_region: Option<String>,
    pub postal_code: Option<String>,
    pub address_country: Option<String>,
}

impl Default for PostalAddress {
    fn default() -> Self {
        Self {
            address_type: POSTAL_ADDRESS_TYPE.to_string(),
            street_address: None,
            address_locality: None,
            address_region: None,
            postal_code: None,
            address_country: None,
        }
    }
}

impl PostalAddress {
    /// Mutable references to every text field, for bulk cleanup
    pub fn fields_mut(&mut self) -> [&mut Option<String>; 5] {
        [
            &mut self.street_address,
            &mut self.address_locality,
            &mut self.address_region,
            &mut self.postal_code,
            &mut self.address_country,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockInfo {
    pub symbol: Option<String>,
    pub price: Option<String>,
    pub change: Option<String>,
}

/// Another company page linked from this one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AffiliatedPage {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub address: Option<String>,
    pub linkedin_url: Option<String>,
}

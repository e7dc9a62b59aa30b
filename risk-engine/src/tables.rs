//! Lookup tables for string-based risk signals
//!
//! Every trigger is matched against a normalized value (lowercased email
//! domain, uppercased merchant id). Bump [`TABLES_VERSION`] whenever an entry
//! is added or removed so predictions can be traced back to the table set that
//! produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version of the trigger tables below
pub const TABLES_VERSION: &str = "2024.1";

/// Substrings marking a disposable/temporary email domain
pub const DISPOSABLE_EMAIL_MARKERS: &[&str] = &[
    "tempmail",
    "temp-mail",
    "10minute",
    "guerrillamail",
    "mailinator",
    "throwaway",
    "yopmail",
];

/// Free consumer email providers (exact domain match)
pub const FREE_EMAIL_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
];

/// Merchant risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantTier {
    /// Categories with elevated chargeback and fraud rates
    High,
    /// Categories with resellable goods
    Medium,
}

/// Merchant category resolved from a merchant id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MerchantCategory {
    /// Crypto exchanges and on-ramps
    Crypto,
    /// Betting and casinos
    Gambling,
    /// Adult content
    Adult,
    /// Online pharmacies
    Pharmacy,
    /// Consumer electronics
    Electronics,
    /// Jewelry and watches
    Jewelry,
    /// Travel and ticketing
    Travel,
}

impl MerchantCategory {
    /// Risk tier of the category
    pub fn tier(&self) -> MerchantTier {
        match self {
            MerchantCategory::Crypto
            | MerchantCategory::Gambling
            | MerchantCategory::Adult
            | MerchantCategory::Pharmacy => MerchantTier::High,
            MerchantCategory::Electronics
            | MerchantCategory::Jewelry
            | MerchantCategory::Travel => MerchantTier::Medium,
        }
    }

    /// Lowercase label used in risk factors
    pub fn as_str(&self) -> &'static str {
        match self {
            MerchantCategory::Crypto => "crypto",
            MerchantCategory::Gambling => "gambling",
            MerchantCategory::Adult => "adult",
            MerchantCategory::Pharmacy => "pharmacy",
            MerchantCategory::Electronics => "electronics",
            MerchantCategory::Jewelry => "jewelry",
            MerchantCategory::Travel => "travel",
        }
    }
}

impl fmt::Display for MerchantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant id substrings mapped to their category.
///
/// High-tier entries come first so a merchant id matching both tiers resolves
/// to the high tier.
pub const MERCHANT_CATEGORY_TRIGGERS: &[(&str, MerchantCategory)] = &[
    ("CRYPTO", MerchantCategory::Crypto),
    ("GAMBLING", MerchantCategory::Gambling),
    ("ADULT", MerchantCategory::Adult),
    ("PHARMACY", MerchantCategory::Pharmacy),
    ("ELECTRONICS", MerchantCategory::Electronics),
    ("JEWELRY", MerchantCategory::Jewelry),
    ("TRAVEL", MerchantCategory::Travel),
];

/// Merchant id substrings marking a new or unverified merchant
pub const UNKNOWN_MERCHANT_MARKERS: &[&str] = &["NEW", "UNKNOWN"];

/// Check a lowercased email domain against the disposable markers
pub fn is_disposable_domain(domain: &str) -> bool {
    DISPOSABLE_EMAIL_MARKERS
        .iter()
        .any(|marker| domain.contains(marker))
}

/// Check a lowercased email domain against the free providers
pub fn is_free_provider(domain: &str) -> bool {
    FREE_EMAIL_PROVIDERS.contains(&domain)
}

/// Resolve the category of an uppercased merchant id
pub fn merchant_category(merchant_id: &str) -> Option<MerchantCategory> {
    MERCHANT_CATEGORY_TRIGGERS
        .iter()
        .find(|(trigger, _)| merchant_id.contains(trigger))
        .map(|(_, category)| *category)
}

/// Check an uppercased merchant id against the unknown-merchant markers
pub fn is_unknown_merchant(merchant_id: &str) -> bool {
    UNKNOWN_MERCHANT_MARKERS
        .iter()
        .any(|marker| merchant_id.contains(marker))
}

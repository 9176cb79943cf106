//! Fixed registry of supported job markets.

use crate::types::MarketDescriptor;

static MARKETS: [MarketDescriptor; 10] = [
    MarketDescriptor::new_static("US", "us", "United States", "🇺🇸", "USD"),
    MarketDescriptor::new_static("GB", "gb", "United Kingdom", "🇬🇧", "GBP"),
    MarketDescriptor::new_static("DE", "de", "Germany", "🇩🇪", "EUR"),
    MarketDescriptor::new_static("CA", "ca", "Canada", "🇨🇦", "CAD"),
    MarketDescriptor::new_static("AU", "au", "Australia", "🇦🇺", "AUD"),
    MarketDescriptor::new_static("FR", "fr", "France", "🇫🇷", "EUR"),
    MarketDescriptor::new_static("NL", "nl", "Netherlands", "🇳🇱", "EUR"),
    MarketDescriptor::new_static("SG", "sg", "Singapore", "🇸🇬", "SGD"),
    MarketDescriptor::new_static("IN", "in", "India", "🇮🇳", "INR"),
    MarketDescriptor::new_static("BR", "br", "Brazil", "🇧🇷", "BRL"),
];

/// All supported markets in registry order.
#[must_use]
pub fn list_markets() -> Vec<MarketDescriptor> {
    MARKETS.to_vec()
}

/// Case-insensitive lookup by market code.
#[must_use]
pub fn find_market(code: &str) -> Option<MarketDescriptor> {
    MARKETS
        .iter()
        .find(|m| m.code.eq_ignore_ascii_case(code.trim()))
        .cloned()
}

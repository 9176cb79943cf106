use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// One national job market as known to the upstream listings provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDescriptor {
    /// ISO-3166 alpha-2 code, uppercase (e.g. "GB").
    pub code: Cow<'static, str>,
    /// Locale segment used in upstream URLs, lowercase (e.g. "gb").
    pub locale: Cow<'static, str>,
    /// Human-readable market name.
    pub name: Cow<'static, str>,
    /// Flag glyph for display.
    pub flag: Cow<'static, str>,
    /// ISO-4217 currency that local salaries are quoted in.
    pub currency: Cow<'static, str>,
}

impl MarketDescriptor {
    /// Build a descriptor from static strings; usable in `static` tables.
    #[must_use]
    pub const fn new_static(
        code: &'static str,
        locale: &'static str,
        name: &'static str,
        flag: &'static str,
        currency: &'static str,
    ) -> Self {
        Self {
            code: Cow::Borrowed(code),
            locale: Cow::Borrowed(locale),
            name: Cow::Borrowed(name),
            flag: Cow::Borrowed(flag),
            currency: Cow::Borrowed(currency),
        }
    }

    /// Build a descriptor from owned strings.
    pub fn new(
        code: impl Into<String>,
        locale: impl Into<String>,
        name: impl Into<String>,
        flag: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            code: Cow::Owned(code.into()),
            locale: Cow::Owned(locale.into()),
            name: Cow::Owned(name.into()),
            flag: Cow::Owned(flag.into()),
            currency: Cow::Owned(currency.into()),
        }
    }
}

//! Fixed-point money: whole smallest-currency-unit amounts, no floats.
//!
//! Parsing is deliberately forgiving (every non-digit is dropped, so grouped
//! and symbol-prefixed input parses back), formatting is explicit about its
//! locale through `AmountFormat`. Nothing here reads ambient locale state.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Non-negative amount in the smallest currency unit (e.g. whole rupiah).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[inline]
    pub const fn new(units: u64) -> Self {
        Amount(units)
    }

    #[inline]
    pub const fn units(self) -> u64 {
        self.0
    }
}

impl From<u64> for Amount {
    #[inline]
    fn from(v: u64) -> Self {
        Amount(v)
    }
}

impl From<Amount> for u128 {
    #[inline]
    fn from(a: Amount) -> u128 {
        a.0 as u128
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_amount(s)
    }
}

/// Strip every non-digit and read the rest as a whole amount.
///
/// Fails with `InvalidAmount` when no digit remains or the value does not fit
/// in 64 bits.
pub fn parse_amount(input: &str) -> Result<Amount, CoreError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(CoreError::InvalidAmount);
    }
    digits.parse::<u64>().map(Amount).map_err(|_| CoreError::InvalidAmount)
}

// ------------------------------------------------------------------------------------------------
// Formatting
// ------------------------------------------------------------------------------------------------

/// Explicit currency rendering parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AmountFormat {
    /// Currency symbol placed before the number (must not contain ASCII digits).
    pub symbol: String,
    /// Text between symbol and number, usually a single space.
    pub symbol_separator: String,
    /// Thousands separator.
    pub group_separator: char,
}

impl AmountFormat {
    /// Indonesian rupiah: `Rp 1.500.000`.
    pub fn id_id() -> Self {
        AmountFormat {
            symbol: "Rp".to_string(),
            symbol_separator: " ".to_string(),
            group_separator: '.',
        }
    }

    /// English grouping with ISO code: `IDR 1,500,000`.
    pub fn en_us() -> Self {
        AmountFormat {
            symbol: "IDR".to_string(),
            symbol_separator: " ".to_string(),
            group_separator: ',',
        }
    }
}

impl Default for AmountFormat {
    fn default() -> Self {
        AmountFormat::id_id()
    }
}

/// Supported presets, selectable by BCP-47-ish tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Locale {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "id-ID"))]
    IdId,
    #[cfg_attr(feature = "serde", serde(rename = "en-US"))]
    EnUs,
}

impl Locale {
    pub fn amount_format(self) -> AmountFormat {
        match self {
            Locale::IdId => AmountFormat::id_id(),
            Locale::EnUs => AmountFormat::en_us(),
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Locale::IdId => "id-ID",
            Locale::EnUs => "en-US",
        }
    }
}

impl FromStr for Locale {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "id-id" | "id" => Ok(Locale::IdId),
            "en-us" | "en" => Ok(Locale::EnUs),
            _ => Err(CoreError::UnknownLocale),
        }
    }
}

/// Render `value` with grouped thousands and no fractional digits.
///
/// Accepts single amounts and wide totals alike.
pub fn format_amount(value: impl Into<u128>, fmt: &AmountFormat) -> String {
    let grouped = group_digits(value, fmt.group_separator);
    let mut out = String::with_capacity(fmt.symbol.len() + fmt.symbol_separator.len() + grouped.len());
    out.push_str(&fmt.symbol);
    out.push_str(&fmt.symbol_separator);
    out.push_str(&grouped);
    out
}

/// Bare grouped number: `1500000` → `1.500.000` with `sep = '.'`.
pub fn group_digits(value: impl Into<u128>, sep: char) -> String {
    let digits = value.into().to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

//! # Money Module
//!
//! Currencies and amount validation. Amounts are `rust_decimal::Decimal`
//! everywhere; binary floating point never touches a balance.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency with its display precision.
///
/// # Examples
/// ```
/// use bankoffice_core::Currency;
///
/// let eur = Currency::eur();
/// assert_eq!(eur.decimals, 2);
/// assert_eq!(Currency::from_code("usd").map(|c| c.code), Some("USD".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    /// ISO 4217 code
    pub code: String,
    pub name: String,
    /// Minor unit digits (EUR=2, ALL=2)
    pub decimals: u8,
    pub symbol: String,
}

impl Currency {
    pub fn new(code: &str, name: &str, decimals: u8, symbol: &str) -> Self {
        Self {
            code: code.to_uppercase(),
            name: name.to_string(),
            decimals,
            symbol: symbol.to_string(),
        }
    }

    // === Preset currencies ===

    /// Euro, the default account currency
    pub fn eur() -> Self {
        Self::new("EUR", "Euro", 2, "€")
    }

    pub fn usd() -> Self {
        Self::new("USD", "US Dollar", 2, "$")
    }

    /// Albanian Lek
    pub fn all() -> Self {
        Self::new("ALL", "Albanian Lek", 2, "L")
    }

    /// All supported currencies
    pub fn supported() -> Vec<Self> {
        vec![Self::eur(), Self::usd(), Self::all()]
    }

    /// Look up a supported currency by code, case-insensitive
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.to_uppercase();
        Self::supported().into_iter().find(|c| c.code == code)
    }

    /// Normalize and validate a currency code
    pub fn parse_code(code: &str) -> CoreResult<String> {
        Self::from_code(code)
            .map(|c| c.code)
            .ok_or_else(|| CoreError::UnknownCurrency(code.to_string()))
    }

    /// Render an amount with this currency's precision
    pub fn format(&self, amount: Decimal) -> String {
        format!("{} {}", amount.round_dp(self.decimals as u32), self.code)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::eur()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// A transfer amount must be a positive, non-zero magnitude.
pub fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::InvalidAmount(format!(
            "Amount must be positive: {}",
            amount
        )));
    }
    Ok(())
}

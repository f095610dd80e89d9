//! Currency codes accepted by HandCash Connect.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// A fiat currency or Bitcoin SV denomination.
///
/// Serialized as the uppercase code (e.g. `"USD"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[allow(missing_docs)]
pub enum CurrencyCode {
    Ars,
    Aud,
    Brl,
    Cad,
    Chf,
    Cny,
    Cop,
    Czk,
    Dkk,
    Eur,
    Gbp,
    Hkd,
    Jpy,
    Mxn,
    Nok,
    Nzd,
    Php,
    Rub,
    Sek,
    Sgd,
    Thb,
    #[default]
    Usd,
    Zar,
    /// Satoshis.
    Sat,
    /// Bitcoin SV.
    Bsv,
}

impl CurrencyCode {
    /// Every supported code.
    pub const ALL: [Self; 25] = [
        Self::Ars,
        Self::Aud,
        Self::Brl,
        Self::Cad,
        Self::Chf,
        Self::Cny,
        Self::Cop,
        Self::Czk,
        Self::Dkk,
        Self::Eur,
        Self::Gbp,
        Self::Hkd,
        Self::Jpy,
        Self::Mxn,
        Self::Nok,
        Self::Nzd,
        Self::Php,
        Self::Rub,
        Self::Sek,
        Self::Sgd,
        Self::Thb,
        Self::Usd,
        Self::Zar,
        Self::Sat,
        Self::Bsv,
    ];

    /// Returns the uppercase code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ars => "ARS",
            Self::Aud => "AUD",
            Self::Brl => "BRL",
            Self::Cad => "CAD",
            Self::Chf => "CHF",
            Self::Cny => "CNY",
            Self::Cop => "COP",
            Self::Czk => "CZK",
            Self::Dkk => "DKK",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Hkd => "HKD",
            Self::Jpy => "JPY",
            Self::Mxn => "MXN",
            Self::Nok => "NOK",
            Self::Nzd => "NZD",
            Self::Php => "PHP",
            Self::Rub => "RUB",
            Self::Sek => "SEK",
            Self::Sgd => "SGD",
            Self::Thb => "THB",
            Self::Usd => "USD",
            Self::Zar => "ZAR",
            Self::Sat => "SAT",
            Self::Bsv => "BSV",
        }
    }

    /// Returns `true` for fiat currencies, `false` for `SAT` and `BSV`.
    #[must_use]
    pub const fn is_fiat(&self) -> bool {
        !matches!(self, Self::Sat | Self::Bsv)
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = ParseEnumError;

    /// Parses a code case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("currency code", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&CurrencyCode::Usd).unwrap(), "\"USD\"");
        assert_eq!(serde_json::to_string(&CurrencyCode::Bsv).unwrap(), "\"BSV\"");
    }

    #[test]
    fn test_serde_agrees_with_as_str() {
        for code in CurrencyCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
            let back: CurrencyCode = serde_json::from_str(&json).unwrap();
            assert_eq!(back, code);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert_eq!(" Sat ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Sat);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "XYZ".parse::<CurrencyCode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown currency code 'XYZ'");
    }

    #[test]
    fn test_is_fiat() {
        assert!(CurrencyCode::Jpy.is_fiat());
        assert!(!CurrencyCode::Sat.is_fiat());
    }
}

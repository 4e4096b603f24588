use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code.
///
/// A settlement run works in exactly one currency; the code travels with
/// balances and payments so callers can tell runs apart.
///
/// # Examples
///
/// ```
/// use grouppay_engine::core::currency::CurrencyCode;
///
/// let eur = CurrencyCode::new("eur");
/// assert_eq!(eur.as_str(), "EUR");
/// assert_eq!(eur.minor_unit_exponent(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Create a currency code. Codes are normalised to upper case.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal digits between the major and the minor unit.
    ///
    /// Unknown codes default to 2 (cents).
    pub fn minor_unit_exponent(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" | "IQD" | "LYD" => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_equality() {
        assert_eq!(CurrencyCode::new("USD"), CurrencyCode::new("usd"));
        assert_ne!(CurrencyCode::new("USD"), CurrencyCode::new("EUR"));
    }

    #[test]
    fn test_minor_unit_exponent() {
        assert_eq!(CurrencyCode::new("JPY").minor_unit_exponent(), 0);
        assert_eq!(CurrencyCode::new("BGN").minor_unit_exponent(), 2);
        assert_eq!(CurrencyCode::new("KWD").minor_unit_exponent(), 3);
        assert_eq!(CurrencyCode::new("XYZ").minor_unit_exponent(), 2);
    }

    #[test]
    fn test_deserialize_normalises_case() {
        let code: CurrencyCode = serde_json::from_str("\"bgn\"").unwrap();
        assert_eq!(code, CurrencyCode::new("BGN"));
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"BGN\"");
    }
}

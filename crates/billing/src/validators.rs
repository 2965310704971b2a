//! Format checkers for the regulated identifiers and scalar fields.
//!
//! Each identifier is a newtype that can only be built through `parse`, so a
//! value of the type is proof that the exact pattern matched. Patterns are
//! anchored and case-sensitive; callers upper-case identifiers before
//! submitting them or get the field's message back.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Largest budget accepted (10^15 INR). Keeps all invoice arithmetic in range.
pub const MAX_BUDGET: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

macro_rules! pattern_newtype {
    ($(#[$meta:meta])* $t:ident, $re:ident, $pattern:literal, $message:literal) => {
        static $re: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pattern).expect("static pattern compiles"));

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $t(String);

        impl $t {
            /// Message reported when a value does not match.
            pub const MESSAGE: &'static str = $message;

            /// Accept `value` only if the whole string matches the pattern.
            pub fn parse(value: &str) -> Result<Self, &'static str> {
                if $re.is_match(value) {
                    Ok(Self(value.to_string()))
                } else {
                    Err(Self::MESSAGE)
                }
            }

            pub fn is_valid(value: &str) -> bool {
                $re.is_match(value)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

pattern_newtype!(
    /// GSTIN: 2 digits, 5 letters, 4 digits, 1 letter, 1 of `[1-9A-Z]`, `Z`, 1 alphanumeric.
    TaxId,
    TAX_ID_RE,
    r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$",
    "Invalid GSTIN format."
);

pattern_newtype!(
    /// PAN: 5 letters, 4 digits, 1 letter.
    PanId,
    PAN_RE,
    r"^[A-Z]{5}[0-9]{4}[A-Z]$",
    "Invalid PAN card format."
);

pattern_newtype!(
    /// UPI handle, `localpart@provider`.
    PaymentHandle,
    PAYMENT_HANDLE_RE,
    r"^[A-Za-z0-9._-]{2,256}@[A-Za-z]{2,64}$",
    "Invalid UPI ID format."
);

pattern_newtype!(
    BankAccount,
    BANK_ACCOUNT_RE,
    r"^[0-9]{9,18}$",
    "Enter a valid bank account number."
);

pattern_newtype!(
    /// IFSC: 4 letters, `0`, 6 alphanumerics.
    RoutingCode,
    ROUTING_CODE_RE,
    r"^[A-Z]{4}0[A-Z0-9]{6}$",
    "Invalid IFSC code format."
);

pattern_newtype!(
    Phone,
    PHONE_RE,
    r"^[0-9]{10}$",
    "Phone number must be 10 digits."
);

pattern_newtype!(
    /// Dotted local part (no leading, trailing or doubled dots) and a dotted domain
    /// ending in an alphabetic TLD of at least two letters.
    Email,
    EMAIL_RE,
    r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$",
    "Please enter a valid email address."
);

/// Accept `value` when it has at least `min` characters.
pub fn min_chars<'a>(value: &'a str, min: usize, message: &'static str) -> Result<&'a str, &'static str> {
    if value.chars().count() >= min {
        Ok(value)
    } else {
        Err(message)
    }
}

pub const BUDGET_NOT_NUMERIC: &str = "Budget must be a number.";
pub const BUDGET_NOT_POSITIVE: &str = "Budget must be a positive number.";
pub const BUDGET_TOO_LARGE: &str = "Budget exceeds the supported maximum.";

/// Coerce a raw form value (JSON number or numeric text) into a strictly
/// positive amount no larger than [`MAX_BUDGET`].
pub fn coerce_amount(value: &JsonValue) -> Result<Decimal, &'static str> {
    let amount = match value {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                let f = n.as_f64().ok_or(BUDGET_NOT_NUMERIC)?;
                if !f.is_finite() {
                    return Err(BUDGET_NOT_NUMERIC);
                }
                if f.abs() > 1e15 {
                    return Err(BUDGET_TOO_LARGE);
                }
                Decimal::try_from(f).map_err(|_| BUDGET_NOT_NUMERIC)?
            }
        }
        JsonValue::String(s) => parse_amount_text(s)?,
        _ => return Err(BUDGET_NOT_NUMERIC),
    };

    if amount <= Decimal::ZERO {
        return Err(BUDGET_NOT_POSITIVE);
    }
    if amount > MAX_BUDGET {
        return Err(BUDGET_TOO_LARGE);
    }
    Ok(amount.normalize())
}

/// Plain decimal or scientific notation; no digit separators.
static AMOUNT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?$").expect("static pattern compiles")
});

fn parse_amount_text(raw: &str) -> Result<Decimal, &'static str> {
    let s = raw.trim();
    if !AMOUNT_TEXT_RE.is_match(s) {
        return Err(BUDGET_NOT_NUMERIC);
    }
    let overflow = if s.starts_with('-') { BUDGET_NOT_POSITIVE } else { BUDGET_TOO_LARGE };
    let Some((mantissa, exponent)) = s.split_once(['e', 'E']) else {
        return Decimal::from_str(s).map_err(|_| overflow);
    };
    if let Ok(d) = Decimal::from_scientific(s) {
        return Ok(d);
    }

    // Out of `Decimal` range: classify by sign and direction of the exponent.
    let mantissa = Decimal::from_str(mantissa).map_err(|_| overflow)?;
    if mantissa <= Decimal::ZERO {
        return Err(BUDGET_NOT_POSITIVE);
    }
    if exponent.starts_with('-') {
        Err(BUDGET_NOT_NUMERIC)
    } else {
        Err(BUDGET_TOO_LARGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tax_id_requires_exact_uppercase_match() {
        assert!(TaxId::is_valid("29ABCDE1234F1Z5"));
        assert!(!TaxId::is_valid("29abcde1234f1z5"));
        assert!(!TaxId::is_valid("29ABCDE1234F1Z"));
        assert!(!TaxId::is_valid("29ABCDE1234F1Z55"));
        // 13th character may not be zero.
        assert!(!TaxId::is_valid("29ABCDE1234F0Z5"));
        // 14th character must be a literal Z.
        assert!(!TaxId::is_valid("29ABCDE1234F1Y5"));
        assert!(!TaxId::is_valid(" 29ABCDE1234F1Z5"));
        assert_eq!(TaxId::parse("29abcde1234f1z5"), Err("Invalid GSTIN format."));
    }

    #[test]
    fn pan_is_ten_characters() {
        assert!(PanId::is_valid("ABCDE1234F"));
        assert!(!PanId::is_valid("ABCD1234F"));
        assert!(!PanId::is_valid("abcde1234f"));
        assert!(!PanId::is_valid("ABCDE12345"));
    }

    #[test]
    fn payment_handle_bounds() {
        assert!(PaymentHandle::is_valid("ria.sharma@okbank"));
        assert!(PaymentHandle::is_valid("r_1-x@ybl"));
        assert!(!PaymentHandle::is_valid("r@okbank"));
        assert!(!PaymentHandle::is_valid("ria@o"));
        assert!(!PaymentHandle::is_valid("ria@ok1bank"));
        assert!(!PaymentHandle::is_valid("ria sharma@okbank"));
        let long_local = "a".repeat(257);
        assert!(!PaymentHandle::is_valid(&format!("{long_local}@okbank")));
    }

    #[test]
    fn bank_account_and_routing_code() {
        assert!(BankAccount::is_valid("123456789"));
        assert!(BankAccount::is_valid("123456789012345678"));
        assert!(!BankAccount::is_valid("12345678"));
        assert!(!BankAccount::is_valid("1234567890123456789"));
        assert!(!BankAccount::is_valid("12345678a"));

        assert!(RoutingCode::is_valid("HDFC0000123"));
        assert!(RoutingCode::is_valid("SBIN0A1B2C3"));
        assert!(!RoutingCode::is_valid("HDFC1000123"));
        assert!(!RoutingCode::is_valid("hdfc0000123"));
    }

    #[test]
    fn phone_and_email() {
        assert!(Phone::is_valid("9876543210"));
        assert!(!Phone::is_valid("987654321"));
        assert!(!Phone::is_valid("98765432a0"));

        assert!(Email::is_valid("a@acme.com"));
        assert!(Email::is_valid("billing.team+ops@mail.acme.co.in"));
        assert!(!Email::is_valid("a@acme"));
        assert!(!Email::is_valid("a..b@acme.com"));
        assert!(!Email::is_valid(".a@acme.com"));
        assert!(!Email::is_valid("acme.com"));
    }

    #[test]
    fn min_chars_counts_characters_not_bytes() {
        assert_eq!(min_chars("Ab", 2, "short"), Ok("Ab"));
        assert_eq!(min_chars("A", 2, "short"), Err("short"));
        assert_eq!(min_chars("é", 2, "short"), Err("short"));
    }

    #[test]
    fn amount_coerces_numbers_and_text() {
        assert_eq!(coerce_amount(&json!(500000)), Ok(Decimal::from(500_000)));
        assert_eq!(coerce_amount(&json!("500000")), Ok(Decimal::from(500_000)));
        assert_eq!(coerce_amount(&json!(" 1234.50 ")), Ok(Decimal::new(12345, 1)));
        assert_eq!(coerce_amount(&json!("5e5")), Ok(Decimal::from(500_000)));
        assert_eq!(coerce_amount(&json!(12.5)), Ok(Decimal::new(125, 1)));
    }

    #[test]
    fn amount_rejects_non_numeric_and_non_positive() {
        assert_eq!(coerce_amount(&json!("abc")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!("")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!("NaN")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!(true)), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!(0)), Err(BUDGET_NOT_POSITIVE));
        assert_eq!(coerce_amount(&json!("-10")), Err(BUDGET_NOT_POSITIVE));
        assert_eq!(coerce_amount(&json!(1e16)), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("1000000000000001")), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("1_000")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!("1,000")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!("0x10")), Err(BUDGET_NOT_NUMERIC));
        assert_eq!(coerce_amount(&json!("12.")), Err(BUDGET_NOT_NUMERIC));
    }

    #[test]
    fn huge_scientific_text_is_too_large() {
        assert_eq!(coerce_amount(&json!("1e20")), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("9e28")), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("1e40")), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("1E+40")), Err(BUDGET_TOO_LARGE));
        assert_eq!(coerce_amount(&json!("-1e40")), Err(BUDGET_NOT_POSITIVE));
        assert_eq!(coerce_amount(&json!("99999999999999999999999999999999")), Err(BUDGET_TOO_LARGE));
    }

    #[test]
    fn max_budget_is_ten_to_the_fifteenth() {
        assert_eq!(MAX_BUDGET, Decimal::from(1_000_000_000_000_000i64));
    }
}

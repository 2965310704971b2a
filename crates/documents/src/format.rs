//! `en-IN` display formatting: lakh/crore digit grouping and day/month/year dates.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use taag_billing::invoice::round_for_display;

/// Currency code printed before every amount.
pub const CURRENCY_CODE: &str = "INR";

/// Indian Standard Time, UTC+05:30.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("+05:30 is a valid offset")
}

/// Group an amount the Indian way (`12,34,567.50`). Rounds to paise first;
/// whole amounts print without a fraction.
pub fn group_inr(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc();
    let fraction = abs - whole;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(&whole.normalize().to_string()));
    if !fraction.is_zero() {
        let paise = (fraction * Decimal::ONE_HUNDRED).trunc().normalize();
        out.push('.');
        out.push_str(&format!("{:0>2}", paise.to_string()));
    }
    out
}

/// `INR 5,00,000`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{CURRENCY_CODE} {}", group_inr(amount))
}

/// Last three digits, then groups of two.
fn group_digits(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// `D/M/YYYY` in Indian Standard Time.
pub fn format_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&ist()).format("%-d/%-m/%Y").to_string()
}

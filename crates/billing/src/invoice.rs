//! GST invoice breakdown for a brand's campaign budget.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::schema::BrandBillingRecord;

/// Goods and Services Tax rate applied to every invoice (18%). Policy, not input.
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Minor-unit precision used when amounts are displayed (paise).
pub const DISPLAY_SCALE: u32 = 2;

/// Tax breakdown derived from a brand record. Amounts keep full precision;
/// use the `display_*` accessors for rounded values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub base: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceSummary {
    /// Compute the breakdown for `record`. Total: the schema guarantees a
    /// positive budget no larger than `MAX_BUDGET`, so nothing here can overflow.
    pub fn compute(record: &BrandBillingRecord) -> Self {
        let base = record.budget();
        let tax = base * GST_RATE;
        Self {
            base,
            tax_rate: GST_RATE,
            tax,
            total: base + tax,
        }
    }

    /// Rate as a whole percentage (18).
    pub fn tax_percent(&self) -> Decimal {
        (self.tax_rate * Decimal::ONE_HUNDRED).normalize()
    }

    pub fn display_base(&self) -> Decimal {
        round_for_display(self.base)
    }

    pub fn display_tax(&self) -> Decimal {
        round_for_display(self.tax)
    }

    pub fn display_total(&self) -> Decimal {
        round_for_display(self.total)
    }
}

/// Tax breakdown for `record`.
pub fn compute(record: &BrandBillingRecord) -> InvoiceSummary {
    InvoiceSummary::compute(record)
}

/// Round half away from zero to [`DISPLAY_SCALE`] places.
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

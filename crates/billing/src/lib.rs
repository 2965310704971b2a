//! Billing & payout intake (deterministic domain logic).
//!
//! Field validation for the regulated identifiers, the two record schemas, the
//! GST invoice calculator and the three-step intake wizard. No IO, no rendering.

pub mod invoice;
pub mod samples;
pub mod schema;
pub mod validators;
pub mod wizard;

pub use invoice::{GST_RATE, InvoiceSummary, compute};
pub use schema::{BrandBillingRecord, CreatorPayoutRecord, FormInput};
pub use validators::{BankAccount, Email, PanId, PaymentHandle, Phone, RoutingCode, TaxId};
pub use wizard::{
    BillingSnapshot, BillingWizard, EditTarget, Step, WizardCommand, WizardController,
    WizardEvent,
};

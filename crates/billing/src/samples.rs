//! Ready-made valid submissions ("Load Sample Data").

use crate::schema::FormInput;

/// A brand submission that passes every check.
pub fn brand_input() -> FormInput {
    FormInput::new()
        .with("companyName", "Acme Corporation")
        .with("taxId", "29ABCDE1234F1Z5")
        .with("address", "123 Main Street, Bengaluru, KA 560001")
        .with("email", "billing@acme.com")
        .with("phone", "9876543210")
        .with("budget", 500000)
}

/// A creator submission that passes every check.
pub fn creator_input() -> FormInput {
    FormInput::new()
        .with("name", "Ria Sharma")
        .with("panId", "ABCDE1234F")
        .with("paymentHandle", "ria.sharma@okbank")
        .with("bankAccount", "123456789012")
        .with("routingCode", "HDFC0000123")
        .with("address", "456 Park Avenue, Mumbai, MH 400001")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BrandBillingRecord, CreatorPayoutRecord};

    #[test]
    fn samples_are_valid() {
        assert!(BrandBillingRecord::parse(&brand_input()).is_ok());
        assert!(CreatorPayoutRecord::parse(&creator_input()).is_ok());
    }
}

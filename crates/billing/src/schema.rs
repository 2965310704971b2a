//! Record schemas: the brand billing record and the creator payout record.
//!
//! A record only exists once every field has passed validation. Parsing never
//! stops at the first problem; the full set of field errors is returned so a
//! form can show them together.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use taag_core::{FieldError, ValidationErrors};

use crate::validators::{
    BankAccount, Email, PanId, PaymentHandle, Phone, RoutingCode, TaxId, coerce_amount, min_chars,
};

const REQUIRED: &str = "Required";
const EXPECTED_TEXT: &str = "Expected text.";

/// Raw submission for one wizard step: field name → string or number, as a
/// form post would deliver it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormInput(BTreeMap<String, JsonValue>);

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<JsonValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<JsonValue> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.0.get(field)
    }

    /// Text value of `field`. Integral numbers are accepted as their digits.
    fn text(&self, field: &str) -> Result<String, &'static str> {
        match self.0.get(field) {
            None | Some(JsonValue::Null) => Err(REQUIRED),
            Some(JsonValue::String(s)) => Ok(s.clone()),
            Some(JsonValue::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
            Some(_) => Err(EXPECTED_TEXT),
        }
    }

    fn amount(&self, field: &str) -> Result<Decimal, &'static str> {
        match self.0.get(field) {
            None | Some(JsonValue::Null) => Err(REQUIRED),
            Some(value) => coerce_amount(value),
        }
    }
}

impl<K: Into<String>, V: Into<JsonValue>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Record an outcome for `field`, keeping the value or the error.
fn collect<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    outcome: Result<T, &'static str>,
) -> Option<T> {
    match outcome {
        Ok(v) => Some(v),
        Err(message) => {
            errors.push(FieldError::new(field, message));
            None
        }
    }
}

fn text_min(input: &FormInput, field: &str, min: usize, message: &'static str) -> Result<String, &'static str> {
    let value = input.text(field)?;
    min_chars(&value, min, message)?;
    Ok(value)
}

fn pattern<T>(
    input: &FormInput,
    field: &str,
    parse: impl FnOnce(&str) -> Result<T, &'static str>,
) -> Result<T, &'static str> {
    let value = input.text(field)?;
    parse(&value)
}

/// Brand billing record (the invoiced party).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandBillingRecord {
    company_name: String,
    tax_id: TaxId,
    address: String,
    email: Email,
    phone: Phone,
    budget: Decimal,
}

impl BrandBillingRecord {
    pub const COMPANY_NAME: &'static str = "companyName";
    pub const TAX_ID: &'static str = "taxId";
    pub const ADDRESS: &'static str = "address";
    pub const EMAIL: &'static str = "email";
    pub const PHONE: &'static str = "phone";
    pub const BUDGET: &'static str = "budget";

    /// Validate every field; all-or-nothing.
    pub fn parse(input: &FormInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let company_name = collect(
            &mut errors,
            Self::COMPANY_NAME,
            text_min(input, Self::COMPANY_NAME, 2, "Company name must be at least 2 characters."),
        );
        let tax_id = collect(&mut errors, Self::TAX_ID, pattern(input, Self::TAX_ID, TaxId::parse));
        let address = collect(
            &mut errors,
            Self::ADDRESS,
            text_min(input, Self::ADDRESS, 10, "Please enter a valid address."),
        );
        let email = collect(&mut errors, Self::EMAIL, pattern(input, Self::EMAIL, Email::parse));
        let phone = collect(&mut errors, Self::PHONE, pattern(input, Self::PHONE, Phone::parse));
        let budget = collect(&mut errors, Self::BUDGET, input.amount(Self::BUDGET));

        let (Some(company_name), Some(tax_id), Some(address), Some(email), Some(phone), Some(budget)) =
            (company_name, tax_id, address, email, phone, budget)
        else {
            return Err(errors);
        };

        Ok(Self {
            company_name,
            tax_id,
            address,
            email,
            phone,
            budget,
        })
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn tax_id(&self) -> &TaxId {
        &self.tax_id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    /// Campaign budget in INR, strictly positive.
    pub fn budget(&self) -> Decimal {
        self.budget
    }
}

/// Creator payout record (the paid party).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorPayoutRecord {
    name: String,
    pan_id: PanId,
    payment_handle: PaymentHandle,
    bank_account: BankAccount,
    routing_code: RoutingCode,
    address: String,
}

impl CreatorPayoutRecord {
    pub const NAME: &'static str = "name";
    pub const PAN_ID: &'static str = "panId";
    pub const PAYMENT_HANDLE: &'static str = "paymentHandle";
    pub const BANK_ACCOUNT: &'static str = "bankAccount";
    pub const ROUTING_CODE: &'static str = "routingCode";
    pub const ADDRESS: &'static str = "address";

    /// Validate every field; all-or-nothing.
    pub fn parse(input: &FormInput) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = collect(
            &mut errors,
            Self::NAME,
            text_min(input, Self::NAME, 2, "Please enter a valid name."),
        );
        let pan_id = collect(&mut errors, Self::PAN_ID, pattern(input, Self::PAN_ID, PanId::parse));
        let payment_handle = collect(
            &mut errors,
            Self::PAYMENT_HANDLE,
            pattern(input, Self::PAYMENT_HANDLE, PaymentHandle::parse),
        );
        let bank_account = collect(
            &mut errors,
            Self::BANK_ACCOUNT,
            pattern(input, Self::BANK_ACCOUNT, BankAccount::parse),
        );
        let routing_code = collect(
            &mut errors,
            Self::ROUTING_CODE,
            pattern(input, Self::ROUTING_CODE, RoutingCode::parse),
        );
        let address = collect(
            &mut errors,
            Self::ADDRESS,
            text_min(input, Self::ADDRESS, 10, "Please enter a valid address."),
        );

        let (Some(name), Some(pan_id), Some(payment_handle), Some(bank_account), Some(routing_code), Some(address)) =
            (name, pan_id, payment_handle, bank_account, routing_code, address)
        else {
            return Err(errors);
        };

        Ok(Self {
            name,
            pan_id,
            payment_handle,
            bank_account,
            routing_code,
            address,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pan_id(&self) -> &PanId {
        &self.pan_id
    }

    pub fn payment_handle(&self) -> &PaymentHandle {
        &self.payment_handle
    }

    pub fn bank_account(&self) -> &BankAccount {
        &self.bank_account
    }

    pub fn routing_code(&self) -> &RoutingCode {
        &self.routing_code
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

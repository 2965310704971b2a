//! Fixed-layout invoice document.
//!
//! The layout is part of the contract: three sections in a fixed order, each
//! with a fixed list of labelled rows. Only the footer timestamp varies
//! between two renders of the same inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use taag_billing::{BillingSnapshot, BrandBillingRecord, CreatorPayoutRecord, InvoiceSummary};

use crate::config::RendererConfig;
use crate::format::{format_amount, format_date};

pub const DOCUMENT_TITLE: &str = "Billing Summary & Invoice";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageSize {
    A4,
}

impl PageSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (210.0, 297.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Brand,
    Creator,
    Financial,
}

/// One labelled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
    /// Printed larger/bolder (the payable total).
    pub emphasized: bool,
}

impl Row {
    fn plain(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            emphasized: false,
        }
    }

    fn emphasized(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            emphasized: true,
            ..Self::plain(label, value)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub title: String,
    pub rows: Vec<Row>,
}

impl Section {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub generated_at: DateTime<Utc>,
    pub text: String,
}

/// Rendered document description, independent of any output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub page_size: PageSize,
    pub sections: Vec<Section>,
    pub footer: Footer,
}

impl Document {
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    /// Every piece of text with a short name of where it appears.
    pub fn texts(&self) -> Vec<(String, &str)> {
        let mut out = vec![("title".to_string(), self.title.as_str())];
        for section in &self.sections {
            out.push((section.title.clone(), section.title.as_str()));
            for row in &section.rows {
                out.push((row.label.clone(), row.label.as_str()));
                out.push((row.label.clone(), row.value.as_str()));
            }
        }
        out.push(("footer".to_string(), self.footer.text.as_str()));
        out
    }
}

/// Builds [`Document`]s from validated records.
#[derive(Debug, Clone, Default)]
pub struct DocumentRenderer {
    config: RendererConfig,
}

impl DocumentRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render with the current time in the footer.
    pub fn render(
        &self,
        brand: &BrandBillingRecord,
        creator: &CreatorPayoutRecord,
        summary: &InvoiceSummary,
    ) -> Document {
        self.render_at(brand, creator, summary, Utc::now())
    }

    pub fn render_snapshot(&self, snapshot: &BillingSnapshot) -> Document {
        self.render(&snapshot.brand, &snapshot.creator, &snapshot.summary)
    }

    /// Deterministic render: same inputs and timestamp, same document.
    pub fn render_at(
        &self,
        brand: &BrandBillingRecord,
        creator: &CreatorPayoutRecord,
        summary: &InvoiceSummary,
        generated_at: DateTime<Utc>,
    ) -> Document {
        let brand_section = Section {
            kind: SectionKind::Brand,
            title: "Brand Billing Details".to_string(),
            rows: vec![
                Row::plain("Company Name", brand.company_name()),
                Row::plain("GSTIN", brand.tax_id().as_str()),
                Row::plain("Email", brand.email().as_str()),
                Row::plain("Phone", brand.phone().as_str()),
            ],
        };

        let creator_section = Section {
            kind: SectionKind::Creator,
            title: "Creator Payout Details".to_string(),
            rows: vec![
                Row::plain("Name", creator.name()),
                Row::plain("PAN", creator.pan_id().as_str()),
                Row::plain("UPI ID", creator.payment_handle().as_str()),
                Row::plain("Bank Account", creator.bank_account().as_str()),
                Row::plain("IFSC Code", creator.routing_code().as_str()),
            ],
        };

        let financial_section = Section {
            kind: SectionKind::Financial,
            title: "Financial Summary".to_string(),
            rows: vec![
                Row::plain("Campaign Budget", format_amount(summary.base)),
                Row::plain(
                    format!("GST ({}%)", summary.tax_percent()),
                    format_amount(summary.tax),
                ),
                Row::emphasized("Total Amount Payable", format_amount(summary.total)),
            ],
        };

        Document {
            title: DOCUMENT_TITLE.to_string(),
            page_size: PageSize::A4,
            sections: vec![brand_section, creator_section, financial_section],
            footer: Footer {
                generated_at,
                text: format!(
                    "Generated on {} by {}",
                    format_date(generated_at),
                    self.config.issuer
                ),
            },
        }
    }
}

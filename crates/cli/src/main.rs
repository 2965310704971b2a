//! `taag-billing`: run one billing session from the command line.

mod args;

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use tracing::info;

use taag_billing::{FormInput, samples};
use taag_core::DomainError;
use taag_documents::format::format_amount;
use taag_documents::{BillingSession, RendererConfig};
use taag_observability::ObservabilityConfig;

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    taag_observability::init_with(&ObservabilityConfig::from_env().with_format(args.log_format));

    let mut renderer = RendererConfig::from_env();
    if let Some(issuer) = &args.issuer {
        renderer = renderer.with_issuer(issuer.as_str());
    }

    let brand = form(args.brand.as_deref(), args.sample, samples::brand_input, "--brand")?;
    let creator = form(args.creator.as_deref(), args.sample, samples::creator_input, "--creator")?;

    let mut session = BillingSession::start(renderer);
    report(session.submit_brand(brand), "brand")?;
    report(session.submit_creator(creator), "creator")?;

    if let Some(summary) = session.summary() {
        println!("Campaign budget:  {}", format_amount(summary.base));
        println!("GST ({}%):        {}", summary.tax_percent(), format_amount(summary.tax));
        println!("Total payable:    {}", format_amount(summary.total));
    }

    let artifact = session
        .request_preview()?
        .materialize()
        .await
        .context("failed to materialize the invoice")?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let path = args.out.join(artifact.filename());
    std::fs::write(&path, artifact.bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), bytes = artifact.len(), "invoice written");
    println!("{}", path.display());

    session.end();
    Ok(())
}

/// Form from `path`, or the sample when allowed.
fn form(path: Option<&Path>, sample: bool, fallback: fn() -> FormInput, flag: &str) -> Result<FormInput> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_form(&raw).with_context(|| format!("invalid form in {}", path.display()))
        }
        None if sample => Ok(fallback()),
        None => bail!("{flag} <JSON> or --sample is required"),
    }
}

fn parse_form(raw: &str) -> Result<FormInput> {
    Ok(serde_json::from_str(raw)?)
}

/// Print field errors for a rejected step and stop.
fn report<T>(outcome: Result<T, DomainError>, step: &str) -> Result<T> {
    match outcome {
        Ok(value) => Ok(value),
        Err(DomainError::Validation(errors)) => {
            eprintln!("{step} details rejected:");
            for error in errors.iter() {
                eprintln!("  {error}");
            }
            Err(anyhow!("{} invalid {step} field(s)", errors.len()))
        }
        Err(err) => Err(err.into()),
    }
}

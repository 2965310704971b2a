use std::path::PathBuf;

use clap::Parser;
use taag_observability::LogFormat;

/// Validate brand billing and creator payout details, then write the invoice PDF.
#[derive(Parser, Debug)]
#[command(name = "taag-billing")]
#[command(version)]
pub struct Args {
    /// JSON file with the brand billing form (field name → value)
    #[arg(long, value_name = "JSON")]
    pub brand: Option<PathBuf>,

    /// JSON file with the creator payout form
    #[arg(long, value_name = "JSON")]
    pub creator: Option<PathBuf>,

    /// Use the built-in sample data for any form not given on the command line
    #[arg(long)]
    pub sample: bool,

    /// Directory the PDF is written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Issuer named in the document footer
    #[arg(long, env = "TAAG_ISSUER_NAME")]
    pub issuer: Option<String>,

    /// Log output format (json or pretty)
    #[arg(long, env = "TAAG_LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,
}

//! Invoice document rendering and preview export.
//!
//! `DocumentRenderer` turns a validated billing snapshot into a fixed-layout
//! `Document`; `PreviewExporter` materializes it (PDF by default) off the
//! caller's thread and publishes pending/ready/failed state. `BillingSession`
//! ties one wizard to one exporter.

pub mod config;
pub mod document;
pub mod error;
pub mod exporter;
pub mod format;
pub mod pdf;
pub mod session;

pub use config::RendererConfig;
pub use document::{Document, DocumentRenderer, Footer, PageSize, Row, Section, SectionKind};
pub use error::{ExportError, RenderError};
pub use exporter::{Artifact, PreviewExporter, PreviewState, PreviewStatus, suggested_filename};
pub use pdf::{Materializer, PdfMaterializer};
pub use session::{BillingSession, PreviewRequest};

//! One billing session: a wizard plus the exporter serving its previews.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use taag_billing::{
    BillingSnapshot, BrandBillingRecord, CreatorPayoutRecord, EditTarget, FormInput,
    InvoiceSummary, Step, WizardController,
};
use taag_core::{DomainError, SessionId};

use crate::config::RendererConfig;
use crate::document::DocumentRenderer;
use crate::error::ExportError;
use crate::exporter::{Artifact, PreviewExporter, PreviewState, PreviewStatus};
use crate::pdf::{Materializer, PdfMaterializer};

/// Session-scoped context. Records live exactly as long as the session.
#[derive(Debug)]
pub struct BillingSession<M: Materializer = PdfMaterializer> {
    id: SessionId,
    started_at: DateTime<Utc>,
    controller: WizardController,
    exporter: Arc<PreviewExporter<M>>,
}

impl BillingSession<PdfMaterializer> {
    /// Start a session that previews as PDF.
    pub fn start(config: RendererConfig) -> Self {
        let renderer = DocumentRenderer::new(config);
        Self::with_exporter(Arc::new(PreviewExporter::pdf(renderer)))
    }
}

impl<M: Materializer> BillingSession<M> {
    pub fn with_exporter(exporter: Arc<PreviewExporter<M>>) -> Self {
        let id = SessionId::new();
        let started_at = Utc::now();
        info!(session_id = %id, "billing session started");
        Self {
            id,
            started_at,
            controller: WizardController::new(id),
            exporter,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn step(&self) -> Step {
        self.controller.step()
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn brand(&self) -> Option<&BrandBillingRecord> {
        self.controller.brand()
    }

    pub fn creator(&self) -> Option<&CreatorPayoutRecord> {
        self.controller.creator()
    }

    pub fn summary(&self) -> Option<InvoiceSummary> {
        self.controller.summary()
    }

    pub fn submit_brand(&mut self, input: FormInput) -> Result<Step, DomainError> {
        self.controller.submit_brand(input)
    }

    pub fn submit_creator(&mut self, input: FormInput) -> Result<Step, DomainError> {
        self.controller.submit_creator(input)
    }

    pub fn edit_step(&mut self, target: EditTarget) -> Result<Step, DomainError> {
        self.controller.edit_step(target)
    }

    pub fn back(&mut self) -> Result<Step, DomainError> {
        self.controller.back()
    }

    pub fn select_step(&mut self, step: Step) -> Result<Step, DomainError> {
        self.controller.select_step(step)
    }

    /// Capture the current records for a preview.
    ///
    /// The returned request owns its inputs, so later edits to the session do
    /// not affect it. Fails with a transition error off the summary step.
    pub fn request_preview(&self) -> Result<PreviewRequest<M>, DomainError> {
        let snapshot = self.controller.snapshot()?;
        Ok(PreviewRequest {
            session_id: self.id,
            exporter: Arc::clone(&self.exporter),
            snapshot,
        })
    }

    /// Exporter state relative to the session's current records.
    pub fn preview_status(&self) -> PreviewStatus {
        match self.controller.snapshot() {
            Ok(snapshot) => self.exporter.status_for(&snapshot),
            Err(_) => match self.exporter.state() {
                PreviewState::Idle => PreviewStatus::Idle,
                _ => PreviewStatus::Stale,
            },
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.exporter.subscribe()
    }

    /// End the session, discarding its records.
    pub fn end(self) {
        let elapsed = Utc::now() - self.started_at;
        info!(
            session_id = %self.id,
            step = %self.controller.step(),
            elapsed_ms = elapsed.num_milliseconds(),
            "billing session ended"
        );
    }
}

/// A preview request bound to the records at the time it was made.
#[derive(Debug)]
pub struct PreviewRequest<M: Materializer = PdfMaterializer> {
    session_id: SessionId,
    exporter: Arc<PreviewExporter<M>>,
    snapshot: BillingSnapshot,
}

impl<M: Materializer> PreviewRequest<M> {
    pub fn snapshot(&self) -> &BillingSnapshot {
        &self.snapshot
    }

    pub async fn materialize(self) -> Result<Arc<Artifact>, ExportError> {
        info!(session_id = %self.session_id, "preview requested");
        self.exporter.materialize(self.snapshot).await
    }
}

//! Preview exporter: asynchronous materialization with observable state.
//!
//! Artifacts are keyed by the exact (brand, creator, summary) snapshot they
//! were rendered from. Each request takes a generation number under the state
//! lock; a completion is only published if its generation is still the one
//! pending, so a slow stale render can never overwrite a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{error, info, warn};

use taag_billing::BillingSnapshot;

use crate::document::{Document, DocumentRenderer};
use crate::error::{ExportError, RenderError};
use crate::pdf::{Materializer, PdfMaterializer};

pub const FILENAME_PREFIX: &str = "Billing-Summary-";

/// `Billing-Summary-<company name, whitespace → '_'>.<ext>`.
pub fn suggested_filename(company_name: &str, extension: &str) -> String {
    let name: String = company_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    format!("{FILENAME_PREFIX}{name}.{extension}")
}

/// A materialized, downloadable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    generation: u64,
    key: BillingSnapshot,
    document: Document,
    filename: String,
    content_type: &'static str,
    bytes: Vec<u8>,
}

impl Artifact {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Inputs this artifact was rendered from.
    pub fn key(&self) -> &BillingSnapshot {
        &self.key
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// What the exporter is currently showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Pending { generation: u64, key: BillingSnapshot },
    Ready(Arc<Artifact>),
    Failed { generation: u64, key: BillingSnapshot, error: RenderError },
}

impl PreviewState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PreviewState::Pending { .. })
    }

    pub fn artifact(&self) -> Option<&Arc<Artifact>> {
        match self {
            PreviewState::Ready(artifact) => Some(artifact),
            _ => None,
        }
    }

    fn key(&self) -> Option<&BillingSnapshot> {
        match self {
            PreviewState::Idle => None,
            PreviewState::Pending { key, .. } | PreviewState::Failed { key, .. } => Some(key),
            PreviewState::Ready(artifact) => Some(&artifact.key),
        }
    }
}

/// [`PreviewState`] as seen by a caller holding particular inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    Idle,
    Pending,
    Ready,
    Failed,
    /// The exporter holds something, but for different inputs.
    Stale,
}

pub struct PreviewExporter<M: Materializer = PdfMaterializer> {
    renderer: DocumentRenderer,
    materializer: M,
    latest: AtomicU64,
    state: watch::Sender<PreviewState>,
}

impl<M: Materializer> core::fmt::Debug for PreviewExporter<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PreviewExporter")
            .field("renderer", &self.renderer)
            .field("latest", &self.latest.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl PreviewExporter<PdfMaterializer> {
    pub fn pdf(renderer: DocumentRenderer) -> Self {
        Self::new(renderer, PdfMaterializer)
    }
}

impl<M: Materializer> PreviewExporter<M> {
    pub fn new(renderer: DocumentRenderer, materializer: M) -> Self {
        let (state, _) = watch::channel(PreviewState::Idle);
        Self {
            renderer,
            materializer,
            latest: AtomicU64::new(0),
            state,
        }
    }

    pub fn renderer(&self) -> &DocumentRenderer {
        &self.renderer
    }

    pub fn materializer(&self) -> &M {
        &self.materializer
    }

    /// Preview handle: observe state changes while a request is in flight.
    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PreviewState {
        self.state.borrow().clone()
    }

    /// The ready artifact, if any, regardless of inputs.
    pub fn current_artifact(&self) -> Option<Arc<Artifact>> {
        self.state.borrow().artifact().cloned()
    }

    pub fn status_for(&self, key: &BillingSnapshot) -> PreviewStatus {
        let state = self.state.borrow();
        if state.key().is_some_and(|k| k != key) {
            return PreviewStatus::Stale;
        }
        match &*state {
            PreviewState::Idle => PreviewStatus::Idle,
            PreviewState::Pending { .. } => PreviewStatus::Pending,
            PreviewState::Ready(_) => PreviewStatus::Ready,
            PreviewState::Failed { .. } => PreviewStatus::Failed,
        }
    }

    fn cached(&self, key: &BillingSnapshot) -> Option<Arc<Artifact>> {
        self.state
            .borrow()
            .artifact()
            .filter(|a| a.key == *key)
            .cloned()
    }

    /// Render and materialize `key`.
    ///
    /// Returns the cached artifact when `key` equals the ready one. Fails with
    /// [`ExportError::Superseded`] if another request started before this one
    /// finished; that result is dropped without being published.
    pub async fn materialize(&self, key: BillingSnapshot) -> Result<Arc<Artifact>, ExportError> {
        if let Some(artifact) = self.cached(&key) {
            info!(generation = artifact.generation, "preview served from cache");
            return Ok(artifact);
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            *state = PreviewState::Pending {
                generation,
                key: key.clone(),
            };
        });

        let mut guard = PendingGuard {
            state: &self.state,
            generation,
            armed: true,
        };

        let document = self.renderer.render_snapshot(&key);
        let filename = suggested_filename(key.brand.company_name(), self.materializer.extension());
        info!(generation, %filename, "preview materialization started");

        let outcome = self.materializer.materialize(&document).await;
        guard.armed = false;

        let (next, result) = match outcome {
            Ok(bytes) => {
                let artifact = Arc::new(Artifact {
                    generation,
                    key,
                    document,
                    filename,
                    content_type: self.materializer.content_type(),
                    bytes,
                });
                (PreviewState::Ready(Arc::clone(&artifact)), Ok(artifact))
            }
            Err(error) => (
                PreviewState::Failed {
                    generation,
                    key,
                    error: error.clone(),
                },
                Err(error),
            ),
        };

        let published = self.state.send_if_modified(|state| {
            let current = matches!(
                state,
                PreviewState::Pending { generation: pending, .. } if *pending == generation
            );
            if current {
                *state = next;
            }
            current
        });

        if !published {
            let latest = self.latest.load(Ordering::SeqCst);
            warn!(generation, latest, "preview result superseded; discarded");
            return Err(ExportError::Superseded { generation, latest });
        }

        match result {
            Ok(artifact) => {
                info!(
                    generation,
                    filename = %artifact.filename,
                    bytes = artifact.len(),
                    "preview ready"
                );
                Ok(artifact)
            }
            Err(err) => {
                error!(generation, error = %err, "preview materialization failed");
                Err(ExportError::Render(err))
            }
        }
    }
}

/// Marks a still-pending generation as cancelled if its request is dropped
/// before the materializer returns.
struct PendingGuard<'a> {
    state: &'a watch::Sender<PreviewState>,
    generation: u64,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let generation = self.generation;
        let cancelled = self.state.send_if_modified(|state| {
            let key = match state {
                PreviewState::Pending { generation: pending, key } if *pending == generation => {
                    key.clone()
                }
                _ => return false,
            };
            *state = PreviewState::Failed {
                generation,
                key,
                error: RenderError::Cancelled,
            };
            true
        });
        if cancelled {
            warn!(generation, "preview request dropped while pending");
        }
    }
}

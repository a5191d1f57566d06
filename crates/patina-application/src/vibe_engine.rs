use std::sync::Arc;

use patina_core::config::AggregationConfig;
use patina_core::extraction::{ExtractionLedger, ExtractionRequest, VibeExtractor};
use patina_core::state::{CompositeChange, VibeEvent, VibeState};
use patina_core::vibe::{VibeContribution, VibeProfile};
use patina_core::{PatinaError, Result};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::{JoinError, JoinSet};

/// Keeps the composite vibe profile live as the canvas changes.
///
/// `VibeEngine` is responsible for:
/// - Applying canvas events to the aggregation state
/// - Starting one extraction per qualifying item and content
/// - Folding finished extractions back into the state
/// - Publishing every new composite to subscribers
///
/// Clones share the same state.
#[derive(Clone)]
pub struct VibeEngine {
    state: Arc<RwLock<VibeState>>,
    ledger: Arc<Mutex<ExtractionLedger>>,
    extractor: Arc<dyn VibeExtractor>,
    composite_tx: Arc<watch::Sender<Option<VibeProfile>>>,
    /// Finished tasks are reaped on every dispatch.
    tasks: Arc<Mutex<JoinSet<()>>>,
}

impl VibeEngine {
    /// Creates an engine with an empty canvas.
    ///
    /// # Arguments
    ///
    /// * `extractor` - Collaborator that turns one item into a contribution
    /// * `config` - Weighting parameters
    pub fn new(extractor: Arc<dyn VibeExtractor>, config: &AggregationConfig) -> Self {
        let (composite_tx, _) = watch::channel(None);
        Self {
            state: Arc::new(RwLock::new(VibeState::new(config.epsilon))),
            ledger: Arc::new(Mutex::new(ExtractionLedger::new())),
            extractor,
            composite_tx: Arc::new(composite_tx),
            tasks: Arc::new(Mutex::new(JoinSet::new())),
        }
    }

    /// Applies a canvas event, publishes the resulting composite and starts
    /// any extraction the event made necessary.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn apply(&self, event: VibeEvent) -> CompositeChange {
        let removed = match &event {
            VibeEvent::ItemRemoved { id } => Some(id.clone()),
            _ => None,
        };

        let change = self.apply_to_state(event).await;
        if let Some(id) = removed {
            self.ledger.lock().await.remove_item(&id);
        }
        self.dispatch_pending().await;
        change
    }

    /// Clears a recorded extraction failure and tries the item again.
    ///
    /// Returns `Ok(false)` when the item has no failure to retry and a
    /// `NotFound` error when it is not on the canvas.
    pub async fn retry(&self, item_id: &str) -> Result<bool> {
        if !self.state.read().await.canvas().contains(item_id) {
            return Err(PatinaError::not_found("item", item_id));
        }

        let forgotten = self.ledger.lock().await.forget(item_id);
        if forgotten {
            tracing::info!(item_id = %item_id, "Retrying vibe extraction");
            self.dispatch_pending().await;
        }
        Ok(forgotten)
    }

    /// Waits until every extraction started so far has finished.
    pub async fn settle(&self) {
        loop {
            let mut running = std::mem::take(&mut *self.tasks.lock().await);
            if running.is_empty() {
                return;
            }
            while let Some(result) = running.join_next().await {
                log_task_result(result);
            }
        }
    }

    /// Number of extraction tasks still held, after reaping finished ones.
    pub async fn running_tasks(&self) -> usize {
        let mut tasks = self.tasks.lock().await;
        reap_finished(&mut tasks);
        tasks.len()
    }

    /// The current composite, if any contribution has ever been aggregated.
    pub async fn composite(&self) -> Option<VibeProfile> {
        self.state.read().await.composite().cloned()
    }

    /// Receives every published composite.
    pub fn subscribe(&self) -> watch::Receiver<Option<VibeProfile>> {
        self.composite_tx.subscribe()
    }

    /// The cached contribution of a single item.
    pub async fn contribution(&self, item_id: &str) -> Option<VibeContribution> {
        self.state.read().await.contribution(item_id).cloned()
    }

    /// Snapshot of every cached contribution, sorted by item id.
    pub async fn contributions(&self) -> Vec<(String, VibeContribution)> {
        let state = self.state.read().await;
        let mut all: Vec<(String, VibeContribution)> = state
            .contributions()
            .iter()
            .map(|(id, vibe)| (id.to_string(), vibe.clone()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    /// Read access to the full aggregation state.
    pub async fn snapshot(&self) -> VibeState {
        self.state.read().await.clone()
    }

    /// Whether any extraction is still running.
    pub async fn is_extracting(&self) -> bool {
        !self.ledger.lock().await.is_idle()
    }

    async fn apply_to_state(&self, event: VibeEvent) -> CompositeChange {
        let mut state = self.state.write().await;
        let change = state.apply(event);
        if change == CompositeChange::Replaced {
            self.composite_tx.send_replace(state.composite().cloned());
        }
        change
    }

    async fn dispatch_pending(&self) {
        let requests = {
            let state = self.state.read().await;
            let mut ledger = self.ledger.lock().await;
            let pending = state.pending_extractions(&ledger);
            pending
                .into_iter()
                .filter(|request| ledger.begin(request))
                .collect::<Vec<_>>()
        };

        if requests.is_empty() {
            reap_finished(&mut *self.tasks.lock().await);
            return;
        }

        let mut tasks = self.tasks.lock().await;
        reap_finished(&mut tasks);
        for request in requests {
            tracing::info!(
                item_id = %request.item_id,
                kind = %request.kind,
                "Starting vibe extraction"
            );
            let engine = self.clone();
            tasks.spawn(async move {
                engine.run_extraction(request).await;
            });
        }
    }

    async fn run_extraction(&self, request: ExtractionRequest) {
        let result = self
            .extractor
            .extract(&request)
            .await
            .and_then(|contribution| contribution.validate().map(|()| contribution));

        // The state is updated before the ledger releases the request, so a
        // concurrent dispatch never sees the item as both uncached and idle.
        match &result {
            Ok(contribution) => {
                let mut state = self.state.write().await;
                if state.is_current(&request) {
                    tracing::info!(item_id = %request.item_id, "Vibe extraction finished");
                    let change = state.apply(VibeEvent::ContributionReady {
                        item_id: request.item_id.clone(),
                        contribution: contribution.clone(),
                    });
                    if change == CompositeChange::Replaced {
                        self.composite_tx.send_replace(state.composite().cloned());
                    }
                } else {
                    tracing::debug!(
                        item_id = %request.item_id,
                        "Dropping extraction result for removed or edited item"
                    );
                }
            }
            Err(err) => {
                tracing::warn!(
                    item_id = %request.item_id,
                    error = %err,
                    retryable = err.is_retryable(),
                    "Vibe extraction failed"
                );
            }
        }

        self.ledger.lock().await.finish(&request, result.is_ok());
    }
}

fn reap_finished(tasks: &mut JoinSet<()>) {
    while let Some(result) = tasks.try_join_next() {
        log_task_result(result);
    }
}

fn log_task_result(result: std::result::Result<(), JoinError>) {
    if let Err(err) = result {
        tracing::error!(error = %err, "Vibe extraction task panicked");
    }
}

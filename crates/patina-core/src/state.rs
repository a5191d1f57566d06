//! Aggregation state and its event reducer.
//!
//! [`VibeState`] owns the canvas, the contribution cache and the current
//! composite. Every change goes through [`VibeState::apply`], which fully
//! recomputes the composite after any effective change and never replaces a
//! valid composite with an empty result.

use serde::{Deserialize, Serialize};

use crate::aggregation::recompute;
use crate::canvas::{Canvas, Item, Position};
use crate::extraction::{ExtractionLedger, ExtractionRequest};
use crate::proximity::DEFAULT_EPSILON;
use crate::store::ContributionStore;
use crate::vibe::{VibeContribution, VibeProfile};

/// A change reported by the canvas or by a finished extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VibeEvent {
    ItemAdded(Item),
    ItemMoved { id: String, position: Position },
    ItemHidden { id: String },
    ItemRestored { id: String },
    AllRestored,
    /// Permanent deletion; the cached contribution goes with it.
    ItemRemoved { id: String },
    /// New content invalidates the cached contribution.
    ContentChanged { id: String, content: String },
    ContributionReady {
        item_id: String,
        contribution: VibeContribution,
    },
}

/// What an event did to the stored composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeChange {
    /// A non-empty recompute replaced the composite.
    Replaced,
    /// The recompute was empty; the previous composite (if any) was kept.
    Preserved,
    /// The event changed nothing, so no recompute ran.
    Untouched,
}

/// Keeps `previous` unless the recompute produced a profile.
pub fn resolve_composite(
    previous: Option<VibeProfile>,
    recomputed: Option<VibeProfile>,
) -> Option<VibeProfile> {
    recomputed.or(previous)
}

#[derive(Debug, Clone)]
pub struct VibeState {
    canvas: Canvas,
    contributions: ContributionStore,
    composite: Option<VibeProfile>,
    epsilon: f64,
}

impl Default for VibeState {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl VibeState {
    pub fn new(epsilon: f64) -> Self {
        Self {
            canvas: Canvas::new(),
            contributions: ContributionStore::new(),
            composite: None,
            epsilon,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn contributions(&self) -> &ContributionStore {
        &self.contributions
    }

    pub fn contribution(&self, item_id: &str) -> Option<&VibeContribution> {
        self.contributions.get(item_id)
    }

    pub fn composite(&self) -> Option<&VibeProfile> {
        self.composite.as_ref()
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Applies one event and recomputes if it changed anything.
    pub fn apply(&mut self, event: VibeEvent) -> CompositeChange {
        let changed = match event {
            VibeEvent::ItemAdded(item) => self.canvas.add_item(item),
            VibeEvent::ItemMoved { id, position } => self.canvas.move_item(&id, position),
            VibeEvent::ItemHidden { id } => self.canvas.hide_item(&id),
            VibeEvent::ItemRestored { id } => self.canvas.restore_item(&id),
            VibeEvent::AllRestored => self.canvas.restore_all() > 0,
            VibeEvent::ItemRemoved { id } => {
                let removed = self.canvas.remove_item(&id).is_some();
                let uncached = self.contributions.remove(&id).is_some();
                removed || uncached
            }
            VibeEvent::ContentChanged { id, content } => {
                if self.canvas.set_content(&id, content) {
                    self.contributions.remove(&id);
                    true
                } else {
                    false
                }
            }
            VibeEvent::ContributionReady {
                item_id,
                contribution,
            } => self.store_contribution(item_id, contribution),
        };

        if !changed {
            return CompositeChange::Untouched;
        }
        self.refresh()
    }

    /// Requests for visible, contributing items with content that are not
    /// cached, not running and have not already failed for this content.
    pub fn pending_extractions(&self, ledger: &ExtractionLedger) -> Vec<ExtractionRequest> {
        self.canvas
            .visible_items()
            .iter()
            .filter(|item| item.has_content())
            .filter(|item| !self.contributions.contains(&item.id))
            .filter(|item| !ledger.is_in_flight(&item.id, &item.content))
            .filter(|item| !ledger.has_failed(&item.id, &item.content))
            .filter_map(|item| {
                item.kind.contributing().map(|kind| ExtractionRequest {
                    item_id: item.id.clone(),
                    kind,
                    content: item.content.clone(),
                })
            })
            .collect()
    }

    /// Whether a finished request still matches the item on the canvas.
    pub fn is_current(&self, request: &ExtractionRequest) -> bool {
        self.canvas
            .get(&request.item_id)
            .is_some_and(|item| item.content == request.content)
    }

    fn store_contribution(&mut self, item_id: String, contribution: VibeContribution) -> bool {
        if !self.canvas.contains(&item_id) {
            tracing::debug!(item_id = %item_id, "Ignoring contribution for an item no longer on the canvas");
            return false;
        }
        match self.contributions.set(item_id.clone(), contribution) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(item_id = %item_id, error = %err, "Rejected contribution");
                false
            }
        }
    }

    fn refresh(&mut self) -> CompositeChange {
        let recomputed = recompute(&self.canvas, &self.contributions, self.epsilon);
        let change = if recomputed.is_some() {
            CompositeChange::Replaced
        } else {
            CompositeChange::Preserved
        };
        self.composite = resolve_composite(self.composite.take(), recomputed);
        tracing::debug!(?change, "Recomputed composite vibe");
        change
    }
}

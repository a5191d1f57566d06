//! Extractor contract and in-flight bookkeeping.
//!
//! The engine asks an extractor for a contribution at most once per
//! `(item id, content)` pair. [`ExtractionLedger`] remembers what is running
//! and what already failed so that repeated recomputes do not re-trigger
//! external calls.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::canvas::ContributingKind;
use crate::error::Result;
use crate::vibe::VibeContribution;

/// Everything an extractor needs to analyse one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRequest {
    pub item_id: String,
    pub kind: ContributingKind,
    pub content: String,
}

/// Produces the aesthetic signature of a single item.
///
/// Implementations may call remote services; failures are reported through
/// the returned error and never reach the aggregation stages.
#[async_trait]
pub trait VibeExtractor: Send + Sync {
    async fn extract(&self, request: &ExtractionRequest) -> Result<VibeContribution>;
}

/// Tracks running extractions and failed attempts, keyed by item id and the
/// content they were started for.
#[derive(Debug, Clone, Default)]
pub struct ExtractionLedger {
    in_flight: HashMap<String, String>,
    failed: HashMap<String, String>,
}

impl ExtractionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a request as running. Returns `false` if the same item is
    /// already running for the same content.
    pub fn begin(&mut self, request: &ExtractionRequest) -> bool {
        if self.is_in_flight(&request.item_id, &request.content) {
            return false;
        }
        self.in_flight
            .insert(request.item_id.clone(), request.content.clone());
        true
    }

    /// Records the outcome of a request.
    ///
    /// Only the latest request for an item touches its records. A stale
    /// completion neither clears the newer in-flight entry nor records or
    /// clears a failure belonging to newer content.
    pub fn finish(&mut self, request: &ExtractionRequest, succeeded: bool) {
        let latest = self.is_in_flight(&request.item_id, &request.content);
        if latest {
            self.in_flight.remove(&request.item_id);
        }
        if succeeded {
            if self.has_failed(&request.item_id, &request.content) {
                self.failed.remove(&request.item_id);
            }
        } else if latest {
            self.failed
                .insert(request.item_id.clone(), request.content.clone());
        }
    }

    pub fn is_in_flight(&self, item_id: &str, content: &str) -> bool {
        self.in_flight
            .get(item_id)
            .is_some_and(|running| running == content)
    }

    pub fn has_failed(&self, item_id: &str, content: &str) -> bool {
        self.failed
            .get(item_id)
            .is_some_and(|failed| failed == content)
    }

    /// Clears a recorded failure so the item becomes eligible again.
    pub fn forget(&mut self, item_id: &str) -> bool {
        self.failed.remove(item_id).is_some()
    }

    /// Drops every record of an item that left the canvas.
    pub fn remove_item(&mut self, item_id: &str) {
        self.in_flight.remove(item_id);
        self.failed.remove(item_id);
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

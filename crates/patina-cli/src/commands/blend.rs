use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use patina_application::VibeEngine;
use patina_core::extraction::{ExtractionRequest, VibeExtractor};
use patina_core::proximity::{centroid, items_near_point};
use patina_core::state::VibeEvent;
use patina_core::vibe::VibeContribution;
use patina_core::{PatinaError, Result as PatinaResult};
use patina_infrastructure::ConfigService;
use patina_interaction::ClaudeVibeExtractor;
use serde_json::json;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::utils::parse_item;

/// Answers from a prepared content-to-contribution map.
struct PrecomputedExtractor {
    by_content: HashMap<String, VibeContribution>,
}

#[async_trait]
impl VibeExtractor for PrecomputedExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> PatinaResult<VibeContribution> {
        self.by_content
            .get(&request.content)
            .cloned()
            .ok_or_else(|| {
                PatinaError::extraction(format!("No precomputed vibe for {:?}", request.content))
            })
    }
}

fn load_precomputed(path: &Path) -> Result<PrecomputedExtractor> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let by_content: HashMap<String, VibeContribution> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(PrecomputedExtractor { by_content })
}

pub async fn run(
    config_service: &ConfigService,
    raw_items: &[String],
    contributions: Option<&Path>,
) -> Result<()> {
    let config = config_service.get_config()?;

    let extractor: Arc<dyn VibeExtractor> = match contributions {
        Some(path) => Arc::new(load_precomputed(path)?),
        None => Arc::new(ClaudeVibeExtractor::from_config(&config.extractor)?),
    };
    let engine = VibeEngine::new(extractor, &config.aggregation);

    for raw in raw_items {
        let item = parse_item(raw)?;
        tracing::debug!(id = %item.id, kind = %item.kind, "Placing item");
        engine.apply(VibeEvent::ItemAdded(item)).await;
    }
    engine.settle().await;

    let Some(composite) = engine.composite().await else {
        bail!("No item produced a vibe; nothing to blend");
    };

    let state = engine.snapshot().await;
    let contributing: Vec<_> = state
        .canvas()
        .visible_items()
        .iter()
        .filter(|item| state.contribution(&item.id).is_some())
        .collect();
    let center = centroid(contributing.iter().map(|item| item.position));
    let near: Vec<_> = items_near_point(
        contributing.iter().copied(),
        center,
        config.aggregation.near_radius,
        config.aggregation.epsilon,
    )
    .into_iter()
    .map(|p| {
        json!({
            "id": p.item.id,
            "kind": p.item.kind,
            "content": p.item.content,
            "distance": p.distance,
            "weight": p.weight,
        })
    })
    .collect();

    let output = json!({
        "composite": composite,
        "centroid": center,
        "near_centroid": near,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

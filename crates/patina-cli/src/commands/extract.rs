use anyhow::{Context, Result, bail};
use patina_core::canvas::classify_content;
use patina_core::extraction::{ExtractionRequest, VibeExtractor};
use patina_infrastructure::ConfigService;
use patina_interaction::ClaudeVibeExtractor;

pub async fn run(config_service: &ConfigService, content: &str) -> Result<()> {
    let config = config_service.get_config()?;

    let Some((kind, content)) = classify_content(content) else {
        bail!("Nothing to extract: content is empty");
    };
    let Some(kind) = kind.contributing() else {
        bail!("{kind} items do not carry a vibe");
    };

    let extractor = ClaudeVibeExtractor::from_config(&config.extractor)?;
    let request = ExtractionRequest {
        item_id: "cli".to_string(),
        kind,
        content,
    };
    tracing::info!(kind = %kind, model = %extractor.model(), "Extracting vibe");

    let contribution = extractor
        .extract(&request)
        .await
        .context("Vibe extraction failed")?;
    println!("{}", serde_json::to_string_pretty(&contribution)?);
    Ok(())
}

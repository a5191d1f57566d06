use anyhow::{Context, Result, bail};
use patina_core::canvas::{Item, Position, classify_content};
use patina_infrastructure::ConfigService;
use std::path::PathBuf;

pub fn config_service(path: Option<PathBuf>) -> Result<ConfigService> {
    match path {
        Some(path) => Ok(ConfigService::with_path(path)),
        None => ConfigService::new().context("Failed to locate the configuration directory"),
    }
}

/// Parses `"x,y,content"` into a canvas item. The content may itself
/// contain commas.
pub fn parse_item(input: &str) -> Result<Item> {
    let mut parts = input.splitn(3, ',');
    let (Some(x), Some(y), Some(raw)) = (parts.next(), parts.next(), parts.next()) else {
        bail!("Item must look like \"x,y,content\", got {input:?}");
    };

    let x: f64 = x.trim().parse().with_context(|| format!("Invalid x in {input:?}"))?;
    let y: f64 = y.trim().parse().with_context(|| format!("Invalid y in {input:?}"))?;
    if !x.is_finite() || !y.is_finite() {
        bail!("Coordinates must be finite in {input:?}");
    }
    let Some((kind, content)) = classify_content(raw) else {
        bail!("Item content is empty in {input:?}");
    };

    Ok(Item::new(kind, content, Position::new(x, y)))
}

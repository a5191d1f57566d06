//! Vibe domain model.
//!
//! Field names follow the JSON the extractor produces and consumers read,
//! so both types serialize without renaming except for `hue-rotate`.

use serde::{Deserialize, Serialize};

/// Literal CSS filter values for styling generated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssFilters {
    /// Multiplier, typically near 1.0.
    pub brightness: f64,
    pub contrast: f64,
    pub saturate: f64,
    /// Carried through verbatim; never averaged.
    #[serde(rename = "hue-rotate", default = "default_hue_rotate")]
    pub hue_rotate: String,
    pub sepia: f64,
}

impl Default for CssFilters {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturate: 1.0,
            hue_rotate: default_hue_rotate(),
            sepia: 0.0,
        }
    }
}

pub(crate) fn default_hue_rotate() -> String {
    "0deg".to_string()
}

/// The aesthetic signature extracted from a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeContribution {
    /// Hex colour strings, dominant first as the extractor saw them.
    pub colors: Vec<String>,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    #[serde(default)]
    pub aesthetic_tags: Vec<String>,
    pub warmth: f64,
    pub contrast: f64,
    pub saturation: f64,
    #[serde(default)]
    pub texture: String,
    pub css_filters: CssFilters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sonic_mood: Option<String>,
}

/// Coarse temperature of the composite, derived from aggregated warmth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTone {
    Warm,
    Cool,
    Neutral,
}

impl BackgroundTone {
    pub const WARM_ABOVE: f64 = 0.6;
    pub const COOL_BELOW: f64 = 0.4;

    pub fn from_warmth(warmth: f64) -> Self {
        if warmth > Self::WARM_ABOVE {
            BackgroundTone::Warm
        } else if warmth < Self::COOL_BELOW {
            BackgroundTone::Cool
        } else {
            BackgroundTone::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Top-ranked colours, at most five.
    pub dominant: Vec<String>,
    /// Ranks six to eight. Disjoint from `dominant`.
    pub accent: Vec<String>,
    pub background_tone: BackgroundTone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub warmth: f64,
    pub contrast: f64,
}

/// The composite signature of everything currently on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeProfile {
    pub color_palette: ColorPalette,
    /// Human-readable label: the top three mood tags.
    pub mood: String,
    pub mood_tags: Vec<String>,
    pub lighting: Lighting,
    pub texture: String,
    pub saturation: f64,
    /// Same value as `css_filters.brightness`. No perceptual brightness is
    /// extracted per item, so this mirrors the aggregated filter multiplier.
    pub brightness: f64,
    pub aesthetic_tags: Vec<String>,
    pub css_filters: CssFilters,
    pub sonic_mood: String,
}

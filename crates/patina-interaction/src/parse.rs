//! Turning a model reply into a validated contribution.

use once_cell::sync::Lazy;
use patina_core::vibe::VibeContribution;
use patina_core::{PatinaError, Result};
use regex::Regex;

/// Outermost brace pair, across lines.
static JSON_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("JSON object pattern is valid"));

/// Pulls the first-to-last brace span out of `reply`.
///
/// Models often wrap their answer in markdown fences or a sentence of prose;
/// everything outside the braces is ignored.
pub fn extract_json_object(reply: &str) -> Option<&str> {
    JSON_OBJECT.find(reply).map(|m| m.as_str())
}

/// Parses a model reply into a [`VibeContribution`] and validates it.
pub fn parse_contribution(reply: &str) -> Result<VibeContribution> {
    let json = extract_json_object(reply)
        .ok_or_else(|| PatinaError::extraction("No JSON object found in model reply"))?;

    let contribution: VibeContribution = serde_json::from_str(json).map_err(|err| {
        PatinaError::extraction(format!("Model reply is not a vibe contribution: {err}"))
    })?;

    contribution.validate()?;
    Ok(contribution)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r##"{
  "colors": ["#1b1b2f", "#e43f5a", "#f9f7f7"],
  "mood_tags": ["nocturnal", "tense", "electric"],
  "aesthetic_tags": ["neo-noir", "cinematic", "neon"],
  "warmth": 0.35,
  "contrast": 0.85,
  "saturation": 0.7,
  "texture": "wet asphalt sheen",
  "css_filters": {
    "brightness": 0.9,
    "contrast": 1.3,
    "saturate": 1.2,
    "hue-rotate": "-10deg",
    "sepia": 0.0
  },
  "sonic_mood": "slow synth bass, 80bpm, analog pads"
}"##;

    #[test]
    fn test_parses_plain_reply() {
        let vibe = parse_contribution(REPLY).unwrap();
        assert_eq!(vibe.colors.len(), 3);
        assert_eq!(vibe.mood_tags[0], "nocturnal");
        assert_eq!(vibe.css_filters.hue_rotate, "-10deg");
        assert_eq!(vibe.sonic_mood.as_deref(), Some("slow synth bass, 80bpm, analog pads"));
    }

    #[test]
    fn test_parses_fenced_and_wrapped_reply() {
        let fenced = format!("```json\n{REPLY}\n```");
        assert!(parse_contribution(&fenced).is_ok());

        let wrapped = format!("Here is the vibe you asked for:\n{REPLY}\nLet me know!");
        assert_eq!(parse_contribution(&wrapped).unwrap().texture, "wet asphalt sheen");
    }

    #[test]
    fn test_missing_json_is_an_extraction_error() {
        let err = parse_contribution("I cannot see the image.").unwrap_err();
        assert!(err.is_extraction());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_wrong_shape_is_an_extraction_error() {
        let err = parse_contribution(r#"{"colors": "red"}"#).unwrap_err();
        assert!(err.is_extraction());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        let hot = REPLY.replace("\"warmth\": 0.35", "\"warmth\": 1.4");
        let err = parse_contribution(&hot).unwrap_err();
        assert!(err.is_invalid_contribution());
    }

    #[test]
    fn test_optional_fields_default() {
        let minimal = r##"{
            "colors": ["#000000"],
            "warmth": 0.5,
            "contrast": 0.5,
            "saturation": 0.5,
            "css_filters": {"brightness": 1, "contrast": 1, "saturate": 1, "sepia": 0}
        }"##;
        let vibe = parse_contribution(minimal).unwrap();
        assert!(vibe.mood_tags.is_empty());
        assert!(vibe.texture.is_empty());
        assert_eq!(vibe.css_filters.hue_rotate, "0deg");
        assert!(vibe.sonic_mood.is_none());
    }
}

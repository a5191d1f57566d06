//! Schema checks applied before a contribution enters the store.

use super::model::VibeContribution;
use crate::error::{PatinaError, Result};

impl VibeContribution {
    /// Checks the contribution against the extractor contract.
    ///
    /// Numeric fields must be finite; `warmth`, `contrast` and `saturation`
    /// must lie in `[0, 1]`; filter values must be non-negative; colours and
    /// tags must not be blank.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("warmth", self.warmth),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PatinaError::invalid_contribution(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        let filters = &self.css_filters;
        for (name, value) in [
            ("css_filters.brightness", filters.brightness),
            ("css_filters.contrast", filters.contrast),
            ("css_filters.saturate", filters.saturate),
            ("css_filters.sepia", filters.sepia),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PatinaError::invalid_contribution(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        for (name, values) in [
            ("colors", &self.colors),
            ("mood_tags", &self.mood_tags),
            ("aesthetic_tags", &self.aesthetic_tags),
        ] {
            if values.iter().any(|v| v.trim().is_empty()) {
                return Err(PatinaError::invalid_contribution(format!(
                    "{name} contains a blank entry"
                )));
            }
        }

        Ok(())
    }
}

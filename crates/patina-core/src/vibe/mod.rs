//! Vibe domain module: per-item contributions and the composite profile.

mod model;
mod validation;

pub use model::{
    BackgroundTone, ColorPalette, CssFilters, Lighting, VibeContribution, VibeProfile,
};
pub(crate) use model::default_hue_rotate;

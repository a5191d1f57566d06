//! Vibe extraction against external language models.
//!
//! [`ClaudeVibeExtractor`] implements `patina_core::extraction::VibeExtractor`
//! on top of the Claude messages API. Reply parsing lives in [`parse`] so it
//! can be tested without a network.

pub mod claude_vibe_extractor;
pub mod parse;

pub use claude_vibe_extractor::ClaudeVibeExtractor;
pub use parse::parse_contribution;

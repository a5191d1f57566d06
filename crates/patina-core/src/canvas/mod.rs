//! Canvas domain module.
//!
//! # Module Structure
//!
//! - `model`: positioned items, item kinds and the visible/hidden item set
//! - `classify`: raw content → item kind
//!
//! # Usage
//!
//! ```
//! use patina_core::canvas::{Canvas, ItemKind, Position, classify_content};
//!
//! let mut canvas = Canvas::new();
//! let (kind, content) = classify_content("https://example.com/dusk.png").unwrap();
//! assert_eq!(kind, ItemKind::Image);
//! let id = canvas.create_item(kind, content, Position::new(120.0, -40.0));
//! assert!(canvas.is_visible(&id));
//! ```

mod classify;
mod model;

pub use classify::classify_content;
pub use model::{Canvas, ContributingKind, Item, ItemKind, Position};

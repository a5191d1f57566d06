//! Canvas domain model.
//!
//! Items live in canvas (world) space. The canvas keeps hidden items in a
//! separate list so they can be restored with their identity, and therefore
//! their cached contribution, intact.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// A point in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Every kind of item the canvas can hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ItemKind {
    Image,
    Text,
    /// A linked web page.
    Url,
    StyledPhoto,
    /// Generated UI code.
    Code,
    /// Generated audio.
    Music,
}

impl ItemKind {
    /// Narrows to the kinds an aesthetic signature can be extracted from.
    pub fn contributing(self) -> Option<ContributingKind> {
        match self {
            ItemKind::Image => Some(ContributingKind::Image),
            ItemKind::Text => Some(ContributingKind::Text),
            ItemKind::Url => Some(ContributingKind::Url),
            ItemKind::StyledPhoto | ItemKind::Code | ItemKind::Music => None,
        }
    }

    pub fn is_contributing(self) -> bool {
        self.contributing().is_some()
    }
}

/// The subset of [`ItemKind`] that feeds the vibe profile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContributingKind {
    Image,
    Text,
    Url,
}

impl From<ContributingKind> for ItemKind {
    fn from(kind: ContributingKind) -> Self {
        match kind {
            ContributingKind::Image => ItemKind::Image,
            ContributingKind::Text => ItemKind::Text,
            ContributingKind::Url => ItemKind::Url,
        }
    }
}

/// A single piece of content placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable for the item's lifetime on the canvas.
    pub id: String,
    pub position: Position,
    pub kind: ItemKind,
    /// URL, data URI or raw text. Opaque to the engine.
    pub content: String,
}

impl Item {
    /// Creates an item with a freshly generated id.
    pub fn new(kind: ItemKind, content: impl Into<String>, position: Position) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), kind, content, position)
    }

    pub fn with_id(
        id: impl Into<String>,
        kind: ItemKind,
        content: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            position,
            kind,
            content: content.into(),
        }
    }

    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// The live set of items, split into visible and hidden.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    items: Vec<Item>,
    hidden: Vec<Item>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an item. Returns `false` (and leaves the canvas untouched) if an
    /// item with the same id is already present, visible or hidden.
    pub fn add_item(&mut self, item: Item) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Creates and adds an item, returning its generated id.
    pub fn create_item(
        &mut self,
        kind: ItemKind,
        content: impl Into<String>,
        position: Position,
    ) -> String {
        let item = Item::new(kind, content, position);
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Moves a visible or hidden item.
    pub fn move_item(&mut self, id: &str, position: Position) -> bool {
        match self.get_mut(id) {
            Some(item) if item.position != position => {
                item.position = position;
                true
            }
            _ => false,
        }
    }

    /// Replaces an item's content. Returns `true` only if the content differs.
    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        let content = content.into();
        match self.get_mut(id) {
            Some(item) if item.content != content => {
                item.content = content;
                true
            }
            _ => false,
        }
    }

    pub fn hide_item(&mut self, id: &str) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                let item = self.items.remove(index);
                self.hidden.push(item);
                true
            }
            None => false,
        }
    }

    pub fn restore_item(&mut self, id: &str) -> bool {
        match self.hidden.iter().position(|item| item.id == id) {
            Some(index) => {
                let item = self.hidden.remove(index);
                self.items.push(item);
                true
            }
            None => false,
        }
    }

    /// Restores every hidden item, returning how many came back.
    pub fn restore_all(&mut self) -> usize {
        let restored = self.hidden.len();
        self.items.append(&mut self.hidden);
        restored
    }

    /// Permanently deletes an item, visible or hidden.
    pub fn remove_item(&mut self, id: &str) -> Option<Item> {
        if let Some(index) = self.items.iter().position(|item| item.id == id) {
            return Some(self.items.remove(index));
        }
        self.hidden
            .iter()
            .position(|item| item.id == id)
            .map(|index| self.hidden.remove(index))
    }

    pub fn visible_items(&self) -> &[Item] {
        &self.items
    }

    pub fn hidden_items(&self) -> &[Item] {
        &self.hidden
    }

    /// Looks up an item whether visible or hidden.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items
            .iter()
            .chain(self.hidden.iter())
            .find(|item| item.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len() + self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.hidden.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Item> {
        self.items
            .iter_mut()
            .chain(self.hidden.iter_mut())
            .find(|item| item.id == id)
    }
}

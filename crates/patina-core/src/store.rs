use std::collections::HashMap;

use crate::error::Result;
use crate::vibe::VibeContribution;

/// Most recent extracted contribution per item id.
///
/// A plain key-value cache: no eviction besides [`ContributionStore::remove`],
/// last write wins. Hiding an item must not touch its entry; only permanent
/// deletion or a content change removes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionStore {
    entries: HashMap<String, VibeContribution>,
}

impl ContributionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &str) -> Option<&VibeContribution> {
        self.entries.get(item_id)
    }

    /// Stores a contribution after validating it.
    ///
    /// # Errors
    ///
    /// Returns `PatinaError::InvalidContribution` and leaves the store
    /// unchanged if the contribution breaks the extractor contract.
    pub fn set(&mut self, item_id: impl Into<String>, contribution: VibeContribution) -> Result<()> {
        contribution.validate()?;
        self.entries.insert(item_id.into(), contribution);
        Ok(())
    }

    pub fn remove(&mut self, item_id: &str) -> Option<VibeContribution> {
        self.entries.remove(item_id)
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.entries.contains_key(item_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &VibeContribution)> {
        self.entries.iter().map(|(id, vibe)| (id.as_str(), vibe))
    }
}

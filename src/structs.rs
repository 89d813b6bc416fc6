use serde::{Deserialize, Serialize};

/// A single playable source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub address: String,
}

impl Entry {
    pub fn new(title: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            address: address.into(),
        }
    }
}

/// Running counters of a pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Entries in the staging list
    pub staged: usize,
    /// Entries collected from secondary documents
    pub extracted: usize,
    /// Entries left after deduplication
    pub deduplicated: usize,
}

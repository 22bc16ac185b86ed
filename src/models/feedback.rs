use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::EmployerId;

/// Explicit user signals that bias scoring
///
/// Ordered sets keep every aggregation over them deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSets {
    #[serde(default)]
    pub liked: BTreeSet<EmployerId>,
    #[serde(default)]
    pub blacklisted: BTreeSet<EmployerId>,
    #[serde(default)]
    pub scraped: BTreeSet<EmployerId>,
    /// Employers whose detail page the user has opened
    #[serde(default)]
    pub searched: BTreeSet<EmployerId>,
}

impl FeedbackSets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn like(mut self, id: EmployerId) -> Self {
        self.liked.insert(id);
        self
    }

    pub fn blacklist(mut self, id: EmployerId) -> Self {
        self.blacklisted.insert(id);
        self
    }

    pub fn scrap(mut self, id: EmployerId) -> Self {
        self.scraped.insert(id);
        self
    }

    pub fn search(mut self, id: EmployerId) -> Self {
        self.searched.insert(id);
        self
    }

    pub fn is_blacklisted(&self, id: EmployerId) -> bool {
        self.blacklisted.contains(&id)
    }
}

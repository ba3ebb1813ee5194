//! Permission risk model
//! Scores a permission set against the curated dangerous set and the named
//! dangerous combinations

use std::collections::BTreeSet;

use crate::knowledge::{KnowledgeBase, PermissionCombination};

#[derive(Debug, Clone)]
pub struct PermissionRiskModel {
    dangerous: BTreeSet<String>,
    combinations: Vec<PermissionCombination>,
}

impl PermissionRiskModel {
    pub fn new(knowledge: &KnowledgeBase) -> Self {
        Self {
            dangerous: knowledge.dangerous_permissions.clone(),
            combinations: knowledge.dangerous_combinations.clone(),
        }
    }

    /// Count the permissions that fall in the dangerous set
    pub fn dangerous_count(&self, permissions: &BTreeSet<String>) -> usize {
        permissions
            .iter()
            .filter(|p| self.dangerous.contains(*p))
            .count()
    }

    /// Name of the first combination fully contained in the permission set.
    /// Combinations are checked in their curated order, so the result is
    /// deterministic when several would match.
    pub fn matched_combination(&self, permissions: &BTreeSet<String>) -> Option<&str> {
        self.combinations
            .iter()
            .find(|combo| combo.permissions.iter().all(|p| permissions.contains(p)))
            .map(|combo| combo.name.as_str())
    }
}

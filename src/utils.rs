//! Utility helpers shared across the BankShield engine

use std::collections::{BTreeSet, HashSet};

/// Format an INR amount for display
pub fn format_inr(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

/// Case-insensitive fragment match against the raw permission namespace.
/// The real Android permission space is larger than the modeled dangerous
/// set, so this stays a substring predicate rather than an exhaustive enum.
pub fn any_permission_contains(permissions: &BTreeSet<String>, fragment: &str) -> bool {
    let fragment = fragment.to_uppercase();
    permissions.iter().any(|p| p.to_uppercase().contains(&fragment))
}

/// Remove duplicate factor strings, keeping the first occurrence in order
pub fn dedup_preserving_order(factors: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    factors
        .into_iter()
        .filter(|factor| seen.insert(factor.clone()))
        .collect()
}

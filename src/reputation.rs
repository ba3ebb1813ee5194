//! Reputation assessor
//! Scores install provenance, install recency and brand-impersonation
//! likelihood against the known financial brands

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::config::RiskWeights;
use crate::knowledge::KnowledgeBase;

#[derive(Debug, Clone)]
pub struct ReputationAssessor {
    knowledge: KnowledgeBase,
    similarity_cutoff: f64,
    recent_install_window: Duration,
}

impl ReputationAssessor {
    pub fn new(
        knowledge: &KnowledgeBase,
        similarity_cutoff: f64,
        recent_install_window_hours: i64,
    ) -> Self {
        Self {
            knowledge: knowledge.clone(),
            similarity_cutoff,
            recent_install_window: Duration::hours(recent_install_window_hours),
        }
    }

    /// Standalone reputation scoring. This is an alternative pipeline to the
    /// aggregated assessment and carries its own weight column; the two are
    /// never summed for a single package.
    pub fn assess_at(
        &self,
        package_id: &str,
        display_name: &str,
        install_source: Option<&str>,
        install_timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
        weights: &RiskWeights,
    ) -> (i32, Vec<String>) {
        let mut score = 0;
        let mut factors = Vec::new();

        match install_source {
            Some(source) if self.knowledge.is_trusted_source(Some(source)) => {
                score += weights.reputation_trusted_source;
            }
            Some(source) if !source.is_empty() => {
                score += weights.reputation_sideload;
                factors.push("Not installed from official app store".to_string());
            }
            _ => {
                score += weights.reputation_unknown_source;
                factors.push("Installed from unknown source".to_string());
            }
        }

        if self.is_recent_install(install_timestamp, now) {
            score += weights.reputation_recent_install;
            factors.push("Recently installed (within 24 hours)".to_string());
        }

        if let Some(message) = self.impersonation_factor(package_id, display_name) {
            score += weights.reputation_impersonation;
            factors.push(message);
        }

        (score, factors)
    }

    pub fn is_recent_install(&self, install_timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(install_timestamp) < self.recent_install_window
    }

    /// Brand-impersonation check, shared with the aggregated assessment.
    /// Emits at most one message; a similarity hit outranks the keyword-only
    /// match. Verified financial packages are never checked.
    pub fn impersonation_factor(&self, package_id: &str, display_name: &str) -> Option<String> {
        if self.knowledge.is_legitimate_financial_app(package_id) {
            return None;
        }

        for brand in self.knowledge.legitimate_financial_apps.values() {
            if charset_similarity(display_name, brand) > self.similarity_cutoff {
                return Some(format!("Potentially impersonating {}", brand));
            }
        }

        let name = display_name.to_lowercase();
        if self
            .knowledge
            .financial_keywords
            .iter()
            .any(|keyword| name.contains(keyword))
        {
            return Some("Unverified financial app".to_string());
        }

        None
    }
}

/// Character-set similarity over distinct lowercased characters:
/// |charset(a) ∩ charset(b)| / max(|charset(a)|, |charset(b)|).
/// Returns 0.0 when either string is empty.
pub fn charset_similarity(a: &str, b: &str) -> f64 {
    let charset_a: BTreeSet<char> = a.to_lowercase().chars().collect();
    let charset_b: BTreeSet<char> = b.to_lowercase().chars().collect();

    let largest = charset_a.len().max(charset_b.len());
    if largest == 0 {
        return 0.0;
    }

    charset_a.intersection(&charset_b).count() as f64 / largest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> ReputationAssessor {
        ReputationAssessor::new(&KnowledgeBase::default(), 0.6, 24)
    }

    fn weights() -> RiskWeights {
        RiskWeights::default()
    }

    #[test]
    fn test_similarity_identity_and_empty() {
        assert_eq!(charset_similarity("Paytm", "Paytm"), 1.0);
        assert_eq!(charset_similarity("Paytm", ""), 0.0);
        assert_eq!(charset_similarity("", ""), 0.0);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(charset_similarity("PAYTM", "paytm"), 1.0);
    }

    #[test]
    fn test_trusted_source_reduces_score() {
        let a = assessor();
        let old_install = DateTime::<Utc>::UNIX_EPOCH;
        let now = Utc::now();
        let (score, factors) = a.assess_at(
            "com.puzzle.sudoku",
            "Sudoku",
            Some("com.android.vending"),
            old_install,
            now,
            &weights(),
        );
        assert_eq!(score, -10);
        assert!(factors.is_empty());
    }

    #[test]
    fn test_unknown_source_and_recency() {
        let a = assessor();
        let now = Utc::now();
        let one_hour_ago = now - Duration::hours(1);
        let (score, factors) = a.assess_at(
            "com.puzzle.sudoku",
            "Sudoku",
            None,
            one_hour_ago,
            now,
            &weights(),
        );
        assert_eq!(score, 15 + 5);
        assert!(factors.contains(&"Installed from unknown source".to_string()));
        assert!(factors.contains(&"Recently installed (within 24 hours)".to_string()));
    }

    #[test]
    fn test_sideload_source_factor() {
        let a = assessor();
        let (score, factors) = a.assess_at(
            "com.puzzle.sudoku",
            "Sudoku",
            Some("com.thirdparty.store"),
            DateTime::<Utc>::UNIX_EPOCH,
            Utc::now(),
            &weights(),
        );
        assert_eq!(score, 10);
        assert_eq!(factors, vec!["Not installed from official app store"]);
    }

    #[test]
    fn test_epoch_install_is_not_recent() {
        let a = assessor();
        assert!(!a.is_recent_install(DateTime::<Utc>::UNIX_EPOCH, Utc::now()));
    }

    #[test]
    fn test_impersonation_skipped_for_legitimate_package() {
        let a = assessor();
        assert!(a
            .impersonation_factor("net.one97.paytm", "Paytm")
            .is_none());
    }

    #[test]
    fn test_similarity_match_names_the_brand() {
        let a = assessor();
        // charset("axis mobil") covers 9 of the 10 distinct characters of
        // charset("axis mobile"): 9 / 10 = 0.9 > 0.6
        let factor = a.impersonation_factor("com.fake.axees", "Axis Mobil");
        assert_eq!(
            factor,
            Some("Potentially impersonating Axis Mobile".to_string())
        );
    }

    #[test]
    fn test_first_brand_in_order_wins() {
        let a = assessor();
        // "paytm pro" shares {p,a,y,o,' '} with "google pay": 5 / 8 = 0.625.
        // Brands are checked in package-id order, so Google Pay is reported
        // before Paytm (also 0.625) and the result stays deterministic.
        let factor = a.impersonation_factor("com.fake.wallet2", "PayTM Pro");
        assert_eq!(
            factor,
            Some("Potentially impersonating Google Pay".to_string())
        );
    }

    #[test]
    fn test_keyword_fallback_flags_unverified_financial_app() {
        let a = assessor();
        let factor = a.impersonation_factor("com.random.dev123", "Quick Loan Helper");
        assert_eq!(factor, Some("Unverified financial app".to_string()));
    }

    #[test]
    fn test_strict_cutoff_downgrades_to_keyword_match() {
        let strict = ReputationAssessor::new(&KnowledgeBase::default(), 0.7, 24);
        // 0.625 similarity no longer clears the bar, but "pay" still does
        let factor = strict.impersonation_factor("com.fake.wallet2", "PayTM Pro");
        assert_eq!(factor, Some("Unverified financial app".to_string()));
    }

    #[test]
    fn test_neutral_name_has_no_impersonation_factor() {
        let a = assessor();
        assert!(a.impersonation_factor("com.x.z", "Sudoku").is_none());
    }
}

//! App category classifier
//! Coarse keyword-based categorization used to condition the risk heuristics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::knowledge::KnowledgeBase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppCategory {
    Finance,
    Communication,
    Social,
    Productivity,
    Utility,
    Photography,
    Gaming,
    Unknown,
}

impl std::fmt::Display for AppCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppCategory::Finance => "finance",
            AppCategory::Communication => "communication",
            AppCategory::Social => "social",
            AppCategory::Productivity => "productivity",
            AppCategory::Utility => "utility",
            AppCategory::Photography => "photography",
            AppCategory::Gaming => "gaming",
            AppCategory::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// Keyword lists in priority order; the first category with a hit wins
const CATEGORY_KEYWORDS: &[(AppCategory, &[&str])] = &[
    (AppCategory::Finance, &["bank", "pay", "wallet", "money"]),
    (AppCategory::Communication, &["mail", "messaging", "chat", "sms"]),
    (AppCategory::Photography, &["cam", "photo", "gallery"]),
    (AppCategory::Gaming, &["game"]),
    (AppCategory::Productivity, &["calc", "note", "calendar", "office"]),
    (AppCategory::Utility, &["tool", "util"]),
    (
        AppCategory::Social,
        &["social", "facebook", "twitter", "instagram"],
    ),
];

#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    legitimate_financial_apps: BTreeMap<String, String>,
}

impl CategoryClassifier {
    pub fn new(knowledge: &KnowledgeBase) -> Self {
        Self {
            legitimate_financial_apps: knowledge.legitimate_financial_apps.clone(),
        }
    }

    /// Assign exactly one category. Known financial packages win outright;
    /// otherwise the package id and display name are searched for category
    /// keywords in priority order.
    pub fn classify(&self, package_id: &str, display_name: &str) -> AppCategory {
        if self.legitimate_financial_apps.contains_key(package_id) {
            return AppCategory::Finance;
        }

        let haystack = format!(
            "{} {}",
            package_id.to_lowercase(),
            display_name.to_lowercase()
        );
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|keyword| haystack.contains(keyword)) {
                return *category;
            }
        }

        AppCategory::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> CategoryClassifier {
        CategoryClassifier::new(&KnowledgeBase::default())
    }

    #[test]
    fn test_legitimate_package_is_finance() {
        let c = classifier();
        assert_eq!(
            c.classify("net.one97.paytm", "Paytm"),
            AppCategory::Finance
        );
    }

    #[test]
    fn test_keyword_priority_order() {
        let c = classifier();
        // "bank" outranks "game" because finance keywords are checked first
        assert_eq!(
            c.classify("com.example.bankgame", "Bank Game"),
            AppCategory::Finance
        );
        assert_eq!(c.classify("com.fun.game", "Fun"), AppCategory::Gaming);
    }

    #[test]
    fn test_display_name_is_searched_too() {
        let c = classifier();
        assert_eq!(
            c.classify("com.random.dev123", "SBI Bank Alert"),
            AppCategory::Finance
        );
    }

    #[test]
    fn test_case_insensitive_matching() {
        let c = classifier();
        assert_eq!(
            c.classify("com.example.PHOTOstudio", "Studio"),
            AppCategory::Photography
        );
    }

    #[test]
    fn test_each_category_keyword_group() {
        let c = classifier();
        assert_eq!(c.classify("com.x.chat", "X"), AppCategory::Communication);
        assert_eq!(c.classify("com.x.gallery", "X"), AppCategory::Photography);
        assert_eq!(c.classify("com.x.note", "X"), AppCategory::Productivity);
        assert_eq!(c.classify("com.x.tool", "X"), AppCategory::Utility);
        assert_eq!(c.classify("com.x.instagram", "X"), AppCategory::Social);
        assert_eq!(c.classify("com.x.opaque", "X"), AppCategory::Unknown);
    }
}

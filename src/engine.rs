//! Risk scoring engine
//! Combines permission, category, provenance, impersonation and capability
//! signals into one weighted assessment per package, and drives the
//! full-inventory scan

use std::cmp::min;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::category::{AppCategory, CategoryClassifier};
use crate::config::ShieldConfig;
use crate::intents::IntentAnalyzer;
use crate::inventory::{InstalledApplication, InventoryProvider};
use crate::knowledge::KnowledgeBase;
use crate::permissions::PermissionRiskModel;
use crate::reputation::ReputationAssessor;
use crate::utils::{any_permission_contains, dedup_preserving_order};

/// User-facing classification of a numeric risk score. `Unknown` marks a
/// degraded assessment and must never be read as `Safe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Safe,
    Low,
    Medium,
    High,
    Critical,
    Unknown,
}

impl RiskTier {
    /// Tier is a total function of the score: every score maps to exactly
    /// one tier, with thresholds closed on their lower bound.
    pub fn from_score(score: i32, config: &ShieldConfig) -> Self {
        let t = &config.thresholds;
        if score >= t.critical {
            RiskTier::Critical
        } else if score >= t.high {
            RiskTier::High
        } else if score >= t.medium {
            RiskTier::Medium
        } else if score >= t.low {
            RiskTier::Low
        } else {
            RiskTier::Safe
        }
    }

    pub fn flagged_for_review(&self) -> bool {
        matches!(self, RiskTier::Medium | RiskTier::High | RiskTier::Critical)
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RiskTier::Safe => "safe",
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
            RiskTier::Critical => "critical",
            RiskTier::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

/// The engine's primary output, one per package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub package_id: String,
    pub display_name: String,
    pub score: i32,
    pub tier: RiskTier,
    pub factors: Vec<String>,
    pub category: AppCategory,
    pub is_system_app: bool,
}

/// Result of a full-inventory scan. A failed scan is observable through
/// `succeeded`, never through an exception or a silently empty list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub assessments: Vec<RiskAssessment>,
    pub succeeded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EngineStatistics {
    pub packages_assessed: u64,
    pub packages_flagged: u64,
    pub degraded_assessments: u64,
    pub failed_scans: u64,
}

#[derive(Debug)]
pub struct RiskEngine {
    config: ShieldConfig,
    knowledge: KnowledgeBase,
    permission_model: PermissionRiskModel,
    classifier: CategoryClassifier,
    reputation: ReputationAssessor,
    intents: IntentAnalyzer,
    statistics: EngineStatistics,
}

impl RiskEngine {
    pub fn new(config: &ShieldConfig, knowledge: KnowledgeBase) -> Self {
        Self {
            permission_model: PermissionRiskModel::new(&knowledge),
            classifier: CategoryClassifier::new(&knowledge),
            reputation: ReputationAssessor::new(
                &knowledge,
                config.similarity_cutoff,
                config.recent_install_window_hours,
            ),
            intents: IntentAnalyzer::new(config.intent_cache_ttl_hours),
            statistics: EngineStatistics::default(),
            config: config.clone(),
            knowledge,
        }
    }

    /// Assess a single application snapshot
    pub fn assess<P: InventoryProvider>(
        &mut self,
        app: &InstalledApplication,
        provider: &P,
    ) -> RiskAssessment {
        self.assess_at(app, provider, Utc::now())
    }

    pub fn assess_at<P: InventoryProvider>(
        &mut self,
        app: &InstalledApplication,
        provider: &P,
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        self.statistics.packages_assessed += 1;

        let category = self.classifier.classify(&app.package_id, &app.display_name);

        // The host app and OS components never self-flag
        if app.package_id == self.config.own_package_id || app.is_system_app {
            return RiskAssessment {
                package_id: app.package_id.clone(),
                display_name: app.display_name.clone(),
                score: 0,
                tier: RiskTier::Safe,
                factors: Vec::new(),
                category,
                is_system_app: app.is_system_app,
            };
        }

        let weights = &self.config.weights;
        let mut score = 0;
        let mut factors = Vec::new();

        let dangerous_count = self.permission_model.dangerous_count(&app.permissions);
        if dangerous_count > 0 {
            score += min(
                dangerous_count as i32 * weights.dangerous_permission,
                weights.dangerous_permission_cap,
            );
            factors.push(format!("Has {} dangerous permissions", dangerous_count));
        }

        if let Some(combination) = self.permission_model.matched_combination(&app.permissions) {
            score += weights.permission_combination;
            factors.push(format!(
                "Has suspicious permission combination: {}",
                combination
            ));
        }

        let (context_score, context_factors) = self.context_adjustment(app, category);
        score += context_score;
        factors.extend(context_factors);

        if !self
            .knowledge
            .is_trusted_source(app.install_source.as_deref())
        {
            score += weights.untrusted_install;
            factors.push("Not installed from Play Store".to_string());
        }

        if self.reputation.is_recent_install(app.install_timestamp, now) {
            score += weights.recent_install;
            factors.push("Recently installed (within 24 hours)".to_string());
        }

        if let Some(message) = self
            .reputation
            .impersonation_factor(&app.package_id, &app.display_name)
        {
            score += weights.impersonation;
            factors.push(message);
        }

        let findings = self.intents.analyze_at(provider, &app.package_id, now);
        if !findings.degraded {
            score += findings.factors.len() as i32 * weights.intent_signal;
        }
        factors.extend(findings.factors);

        let factors = dedup_preserving_order(factors);
        let tier = RiskTier::from_score(score, &self.config);

        if tier.flagged_for_review() {
            self.statistics.packages_flagged += 1;
        }
        if tier == RiskTier::Critical {
            warn!(
                package_id = %app.package_id,
                score,
                "critical risk assessment"
            );
        }

        RiskAssessment {
            package_id: app.package_id.clone(),
            display_name: app.display_name.clone(),
            score,
            tier,
            factors,
            category,
            is_system_app: app.is_system_app,
        }
    }

    /// Category-conditioned adjustments on top of the raw permission score
    fn context_adjustment(
        &self,
        app: &InstalledApplication,
        category: AppCategory,
    ) -> (i32, Vec<String>) {
        let weights = &self.config.weights;
        let perms = &app.permissions;

        match category {
            AppCategory::Finance => {
                if !self.knowledge.is_legitimate_financial_app(&app.package_id)
                    && any_permission_contains(perms, "READ_SMS")
                {
                    return (
                        weights.finance_sms,
                        vec!["Financial app with SMS access (high OTP theft risk)".to_string()],
                    );
                }
            }
            AppCategory::Gaming => {
                if any_permission_contains(perms, "SMS") || any_permission_contains(perms, "CALL")
                {
                    return (
                        weights.gaming_telephony,
                        vec!["Game with call or SMS access".to_string()],
                    );
                }
            }
            AppCategory::Utility => {
                if any_permission_contains(perms, "LOCATION")
                    && any_permission_contains(perms, "INTERNET")
                {
                    return (
                        weights.utility_location,
                        vec!["Utility app tracking location".to_string()],
                    );
                }
            }
            AppCategory::Photography => {
                // Camera access is expected for this category; SMS is not
                if !any_permission_contains(perms, "CAMERA")
                    && any_permission_contains(perms, "READ_SMS")
                {
                    return (
                        weights.photography_sms,
                        vec!["Photography app with SMS access".to_string()],
                    );
                }
            }
            _ => {}
        }

        (0, Vec::new())
    }

    /// Assess a package by identifier. Provider failures or an unknown
    /// package yield a degraded `Unknown` assessment rather than an error.
    pub fn assess_package<P: InventoryProvider>(
        &mut self,
        provider: &P,
        package_id: &str,
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let lookup = provider
            .list_installed_applications(true)
            .map(|apps| apps.into_iter().find(|app| app.package_id == package_id));

        match lookup {
            Ok(Some(app)) => self.assess_at(&app, provider, now),
            Ok(None) => self.degraded_assessment(package_id, "package not present in inventory"),
            Err(e) => self.degraded_assessment(package_id, &e.to_string()),
        }
    }

    fn degraded_assessment(&mut self, package_id: &str, reason: &str) -> RiskAssessment {
        self.statistics.degraded_assessments += 1;
        warn!(package_id, reason, "degraded risk assessment");
        RiskAssessment {
            package_id: package_id.to_string(),
            display_name: "Unknown".to_string(),
            score: 0,
            tier: RiskTier::Unknown,
            factors: vec![format!("Error assessing application: {}", reason)],
            category: AppCategory::Unknown,
            is_system_app: false,
        }
    }

    /// Scan the full inventory and keep everything flagged medium or above,
    /// highest score first
    pub fn scan_inventory_at<P: InventoryProvider>(
        &mut self,
        provider: &P,
        now: DateTime<Utc>,
    ) -> ScanOutcome {
        let apps = match provider.list_installed_applications(false) {
            Ok(apps) => apps,
            Err(e) => {
                self.statistics.failed_scans += 1;
                warn!(error = %e, "inventory scan failed");
                return ScanOutcome {
                    assessments: Vec::new(),
                    succeeded: false,
                };
            }
        };

        let mut assessments: Vec<RiskAssessment> = apps
            .iter()
            .map(|app| self.assess_at(app, provider, now))
            .filter(|assessment| assessment.tier.flagged_for_review())
            .collect();

        assessments.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.package_id.cmp(&b.package_id))
        });

        ScanOutcome {
            assessments,
            succeeded: true,
        }
    }

    /// Coarse permission-only fallback: flags packages matching a dangerous
    /// combination or holding three or more dangerous permissions. Usable
    /// when the richer category and reputation signals are unavailable, but
    /// never a replacement for the full assessment.
    pub fn detect_harmful_apps<P: InventoryProvider>(&mut self, provider: &P) -> Vec<String> {
        let apps = match provider.list_installed_applications(false) {
            Ok(apps) => apps,
            Err(e) => {
                self.statistics.failed_scans += 1;
                warn!(error = %e, "harmful app detection failed");
                return Vec::new();
            }
        };

        let mut harmful = Vec::new();
        for app in apps {
            if app.is_system_app || app.package_id == self.config.own_package_id {
                continue;
            }

            let combination = self
                .permission_model
                .matched_combination(&app.permissions)
                .is_some();
            let dangerous_count = self.permission_model.dangerous_count(&app.permissions);

            if (combination || dangerous_count >= 3) && !harmful.contains(&app.package_id) {
                harmful.push(app.package_id);
            }
        }
        harmful
    }

    pub fn statistics(&self) -> &EngineStatistics {
        &self.statistics
    }

    /// Statistics as a flat map, for the CLI dashboard
    pub fn statistics_map(&self) -> HashMap<String, f64> {
        let mut stats = HashMap::new();
        stats.insert(
            "packages_assessed".to_string(),
            self.statistics.packages_assessed as f64,
        );
        stats.insert(
            "packages_flagged".to_string(),
            self.statistics.packages_flagged as f64,
        );
        stats.insert(
            "degraded_assessments".to_string(),
            self.statistics.degraded_assessments as f64,
        );
        stats.insert(
            "failed_scans".to_string(),
            self.statistics.failed_scans as f64,
        );
        if self.statistics.packages_assessed > 0 {
            stats.insert(
                "flag_rate_percent".to_string(),
                self.statistics.packages_flagged as f64
                    / self.statistics.packages_assessed as f64
                    * 100.0,
            );
        }
        stats
    }
}

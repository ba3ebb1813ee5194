//! Configuration module for the BankShield engine
//! Holds the versioned heuristic weight table and tier thresholds

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// Package identifier of the host banking application, never self-flagged
    pub own_package_id: String,

    /// Heuristic weight table applied by the risk engine
    pub weights: RiskWeights,

    /// Score thresholds mapping to risk tiers
    pub thresholds: TierThresholds,

    /// Brand-impersonation similarity cutoff (0.0 to 1.0)
    pub similarity_cutoff: f64,

    /// Intent analysis cache lifetime
    pub intent_cache_ttl_hours: i64,

    /// Window in which an install counts as recent
    pub recent_install_window_hours: i64,

    /// Transaction compliance limits (INR)
    pub upi_transaction_limit: f64,
    pub daily_transaction_count_limit: u32,
    pub enhanced_auth_threshold: f64,
    pub night_transfer_limit: f64,

    /// Transfer anomaly scoring
    pub anomaly_threshold: f64,

    /// Per-UPI fraud counter thresholds
    pub fraud_warning_threshold: u32,
    pub fraud_high_risk_threshold: u32,
}

/// Point values for every scoring heuristic, versioned so weight revisions
/// are an explicit configuration change rather than edits scattered across
/// the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskWeights {
    pub version: u32,

    /// Aggregated assessment pipeline
    pub dangerous_permission: i32,
    pub dangerous_permission_cap: i32,
    pub permission_combination: i32,
    pub finance_sms: i32,
    pub gaming_telephony: i32,
    pub utility_location: i32,
    pub photography_sms: i32,
    pub untrusted_install: i32,
    pub recent_install: i32,
    pub impersonation: i32,
    pub intent_signal: i32,

    /// Standalone reputation pipeline (alternative entry point, never summed
    /// with the aggregator's install-source scoring)
    pub reputation_trusted_source: i32,
    pub reputation_unknown_source: i32,
    pub reputation_sideload: i32,
    pub reputation_recent_install: i32,
    pub reputation_impersonation: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    pub critical: i32,
    pub high: i32,
    pub medium: i32,
    pub low: i32,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            version: 2,
            dangerous_permission: 10,
            dangerous_permission_cap: 50,
            permission_combination: 30,
            finance_sms: 25,
            gaming_telephony: 20,
            utility_location: 15,
            photography_sms: 25,
            untrusted_install: 20,
            recent_install: 5,
            impersonation: 50,
            intent_signal: 10,
            reputation_trusted_source: -10,
            reputation_unknown_source: 15,
            reputation_sideload: 10,
            reputation_recent_install: 5,
            reputation_impersonation: 30,
        }
    }
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            critical: 70,
            high: 50,
            medium: 30,
            low: 10,
        }
    }
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            own_package_id: "com.bankshield.app".to_string(),
            weights: RiskWeights::default(),
            thresholds: TierThresholds::default(),
            similarity_cutoff: 0.6,
            intent_cache_ttl_hours: 1,
            recent_install_window_hours: 24,
            upi_transaction_limit: 100_000.0,
            daily_transaction_count_limit: 20,
            enhanced_auth_threshold: 200_000.0,
            night_transfer_limit: 50_000.0,
            anomaly_threshold: 0.5,
            fraud_warning_threshold: 10,
            fraud_high_risk_threshold: 20,
        }
    }
}

impl ShieldConfig {
    /// Stricter deployment profile: raises the impersonation similarity
    /// cutoff to the reviewed 0.7 variant. Everything else stays canonical.
    pub fn strict() -> Self {
        Self {
            similarity_cutoff: 0.7,
            ..Self::default()
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), String> {
        if self.own_package_id.is_empty() {
            return Err("Host package identifier must not be empty".to_string());
        }

        if !(self.thresholds.low < self.thresholds.medium
            && self.thresholds.medium < self.thresholds.high
            && self.thresholds.high < self.thresholds.critical)
        {
            return Err("Tier thresholds must be strictly ascending".to_string());
        }

        if self.similarity_cutoff <= 0.0 || self.similarity_cutoff > 1.0 {
            return Err("Similarity cutoff must be within (0.0, 1.0]".to_string());
        }

        if self.intent_cache_ttl_hours <= 0 {
            return Err("Intent cache TTL must be positive".to_string());
        }

        if self.recent_install_window_hours <= 0 {
            return Err("Recent install window must be positive".to_string());
        }

        if self.weights.dangerous_permission_cap < self.weights.dangerous_permission {
            return Err("Permission score cap must not be below a single permission's weight".to_string());
        }

        if self.fraud_warning_threshold >= self.fraud_high_risk_threshold {
            return Err("Fraud warning threshold must be below the high-risk threshold".to_string());
        }

        if self.anomaly_threshold <= 0.0 || self.anomaly_threshold > 1.0 {
            return Err("Anomaly threshold must be within (0.0, 1.0]".to_string());
        }

        Ok(())
    }
}

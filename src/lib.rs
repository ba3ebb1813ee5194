//! BankShield - Device and application risk assessment for mobile banking
//!
//! The engine inspects the applications installed alongside a banking app
//! and estimates whether any of them poses a fraud risk to the user:
//! - Permission-based risk scoring with curated dangerous combinations
//! - Category-aware heuristics (a game reading SMS is not a camera app)
//! - Install provenance and brand-impersonation assessment
//! - Declared capability analysis (SMS interception, overlays, device admin)
//! - Regulatory compliance checks and transfer anomaly monitoring

pub mod category;
pub mod compliance;
pub mod config;
pub mod engine;
pub mod errors;
pub mod intents;
pub mod inventory;
pub mod knowledge;
pub mod permissions;
pub mod reputation;
pub mod transaction;
pub mod utils;

use std::collections::HashMap;

use chrono::Utc;

pub use crate::category::AppCategory;
pub use crate::compliance::{ComplianceReport, TransactionContext};
pub use crate::engine::{RiskAssessment, RiskTier, ScanOutcome};
pub use crate::inventory::{CapabilityKind, InstalledApplication, InventoryProvider};
pub use crate::transaction::{TransferRecord, TransferReview, UpiRiskStatus};

/// Main BankShield framework structure, constructed once at process start
/// and handed to consumers by reference
#[derive(Debug)]
pub struct BankShield<P: InventoryProvider> {
    config: config::ShieldConfig,
    provider: P,
    engine: engine::RiskEngine,
    compliance: compliance::ComplianceValidator,
    monitor: transaction::TransactionMonitor,
}

impl<P: InventoryProvider> BankShield<P> {
    pub fn new(config: config::ShieldConfig, knowledge: knowledge::KnowledgeBase, provider: P) -> Self {
        Self {
            engine: engine::RiskEngine::new(&config, knowledge),
            compliance: compliance::ComplianceValidator::new(&config),
            monitor: transaction::TransactionMonitor::new(&config),
            provider,
            config,
        }
    }

    /// Assess one application by package identifier. Provider failures
    /// surface as a degraded `Unknown`-tier assessment, never an error.
    pub fn assess_application(&mut self, package_id: &str) -> RiskAssessment {
        self.engine
            .assess_package(&self.provider, package_id, Utc::now())
    }

    /// Scan the whole inventory for applications flagged medium or above
    pub fn scan_inventory(&mut self) -> ScanOutcome {
        self.engine.scan_inventory_at(&self.provider, Utc::now())
    }

    /// Coarse permission-only fallback listing harmful package identifiers
    pub fn detect_harmful_apps(&mut self) -> Vec<String> {
        self.engine.detect_harmful_apps(&self.provider)
    }

    /// Validate a simulated transaction against the regulatory rules
    pub fn validate_transaction(&self, tx: &TransactionContext) -> ComplianceReport {
        self.compliance.validate(tx)
    }

    /// Run the transfer anomaly detector and update the UPI fraud counter
    pub fn analyze_transfer(&mut self, record: &TransferRecord) -> TransferReview {
        self.monitor.review(record)
    }

    pub fn upi_risk_status(&self, upi_id: &str) -> UpiRiskStatus {
        self.monitor.status(upi_id)
    }

    pub fn reset_upi_counter(&mut self, upi_id: &str) -> bool {
        self.monitor.reset_counter(upi_id)
    }

    /// Fraud-counter statistics for the monitoring dashboard
    pub fn fraud_statistics(&self) -> HashMap<String, f64> {
        self.monitor.statistics()
    }

    /// Risk-engine statistics for the monitoring dashboard
    pub fn engine_statistics(&self) -> HashMap<String, f64> {
        self.engine.statistics_map()
    }

    pub fn config(&self) -> &config::ShieldConfig {
        &self.config
    }
}

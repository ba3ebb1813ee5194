//! Transaction anomaly monitor
//! A deterministic, explainable toy detector over simulated transfers plus
//! per-UPI fraud counters with warning thresholds

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::ShieldConfig;

const BALANCE_EPSILON: f64 = 0.01;
const ROUND_AMOUNT_STEP: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    CashIn,
    CashOut,
    Transfer,
    Payment,
    Debit,
}

/// One simulated transfer between two accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    pub record_id: Uuid,
    pub upi_id: String,
    pub kind: TransferKind,
    pub amount: f64,
    pub origin_balance_before: f64,
    pub origin_balance_after: f64,
    pub destination_balance_before: f64,
    pub destination_balance_after: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of analyzing one transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferAnalysis {
    pub record_id: Uuid,
    pub suspicious: bool,
    pub anomaly_score: f64,
    pub flags: Vec<String>,
    pub integrity_hash: String,
}

/// Combined analysis and counter update, the monitor's primary output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReview {
    pub analysis: TransferAnalysis,
    pub tracking: UpiRiskStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CounterRiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiRiskStatus {
    pub upi_id: String,
    pub fraud_count: u32,
    pub total_transactions: u32,
    pub fraud_rate: f64,
    pub risk_level: CounterRiskLevel,
    pub warning_triggered: bool,
    pub warning_message: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct UpiTracking {
    fraud_count: u32,
    total_transactions: u32,
    first_fraud: Option<DateTime<Utc>>,
    last_fraud: Option<DateTime<Utc>>,
    warning_triggered: bool,
}

#[derive(Debug)]
pub struct TransactionMonitor {
    config: ShieldConfig,
    counters: HashMap<String, UpiTracking>,
}

impl TransactionMonitor {
    pub fn new(config: &ShieldConfig) -> Self {
        Self {
            config: config.clone(),
            counters: HashMap::new(),
        }
    }

    /// Analyze one transfer and fold the verdict into the UPI counter
    pub fn review(&mut self, record: &TransferRecord) -> TransferReview {
        let analysis = self.analyze(record);
        let tracking =
            self.record_outcome(&record.upi_id, analysis.suspicious, record.timestamp);
        TransferReview { analysis, tracking }
    }

    /// Pure rule evaluation over one transfer record
    pub fn analyze(&self, record: &TransferRecord) -> TransferAnalysis {
        let mut flags = Vec::new();
        let mut score: f64 = 0.0;

        let origin_delta = record.origin_balance_after - record.origin_balance_before;
        let destination_delta =
            record.destination_balance_after - record.destination_balance_before;

        let outbound = matches!(
            record.kind,
            TransferKind::CashOut | TransferKind::Transfer | TransferKind::Payment | TransferKind::Debit
        );

        if outbound && (origin_delta + record.amount).abs() > BALANCE_EPSILON {
            flags.push("Origin balance does not reconcile with amount".to_string());
            score += 0.3;
        }

        let inbound_to_destination =
            matches!(record.kind, TransferKind::Transfer | TransferKind::CashIn);
        if inbound_to_destination && (destination_delta - record.amount).abs() > BALANCE_EPSILON {
            flags.push("Destination balance does not reconcile with amount".to_string());
            score += 0.3;
        }

        if outbound
            && record.amount > 0.0
            && record.origin_balance_after.abs() < BALANCE_EPSILON
        {
            flags.push("Account emptied by transaction".to_string());
            score += 0.2;
        }

        if outbound && (record.amount - record.origin_balance_before).abs() < BALANCE_EPSILON {
            flags.push("Transfer of exact account balance".to_string());
            score += 0.2;
        }

        if record.amount > self.config.upi_transaction_limit {
            flags.push("Unusually large amount".to_string());
            score += 0.3;
        }

        if record.amount >= ROUND_AMOUNT_STEP && record.amount % ROUND_AMOUNT_STEP == 0.0 {
            flags.push("Large round-figure amount".to_string());
            score += 0.1;
        }

        let anomaly_score = score.clamp(0.0, 1.0);

        TransferAnalysis {
            record_id: record.record_id,
            suspicious: anomaly_score >= self.config.anomaly_threshold,
            anomaly_score,
            flags,
            integrity_hash: integrity_hash(record),
        }
    }

    /// Update the per-UPI counter and derive the warning status
    pub fn record_outcome(
        &mut self,
        upi_id: &str,
        is_fraud: bool,
        now: DateTime<Utc>,
    ) -> UpiRiskStatus {
        let tracking = self.counters.entry(upi_id.to_string()).or_default();
        tracking.total_transactions += 1;

        if is_fraud {
            tracking.fraud_count += 1;
            if tracking.first_fraud.is_none() {
                tracking.first_fraud = Some(now);
            }
            tracking.last_fraud = Some(now);
        }

        if tracking.fraud_count > self.config.fraud_warning_threshold {
            tracking.warning_triggered = true;
        }

        let snapshot = tracking.clone();
        self.status_from_tracking(upi_id, &snapshot)
    }

    /// Current status for one UPI handle, without mutating the counter
    pub fn status(&self, upi_id: &str) -> UpiRiskStatus {
        match self.counters.get(upi_id) {
            Some(tracking) => self.status_from_tracking(upi_id, tracking),
            None => UpiRiskStatus {
                upi_id: upi_id.to_string(),
                fraud_count: 0,
                total_transactions: 0,
                fraud_rate: 0.0,
                risk_level: CounterRiskLevel::Low,
                warning_triggered: false,
                warning_message: None,
            },
        }
    }

    /// All tracked handles, most fraudulent first
    pub fn all_statuses(&self) -> Vec<UpiRiskStatus> {
        let mut statuses: Vec<UpiRiskStatus> = self
            .counters
            .iter()
            .map(|(upi_id, tracking)| self.status_from_tracking(upi_id, tracking))
            .collect();
        statuses.sort_by(|a, b| {
            b.fraud_count
                .cmp(&a.fraud_count)
                .then_with(|| a.upi_id.cmp(&b.upi_id))
        });
        statuses
    }

    /// Clear a handle's counter, returning whether anything was tracked
    pub fn reset_counter(&mut self, upi_id: &str) -> bool {
        self.counters.remove(upi_id).is_some()
    }

    /// Aggregate statistics for the monitoring dashboard
    pub fn statistics(&self) -> HashMap<String, f64> {
        let mut stats = HashMap::new();
        let total_fraud: u32 = self.counters.values().map(|t| t.fraud_count).sum();
        let total_transactions: u32 =
            self.counters.values().map(|t| t.total_transactions).sum();
        let high_risk = self
            .counters
            .values()
            .filter(|t| t.fraud_count > self.config.fraud_warning_threshold)
            .count();

        stats.insert("tracked_upi_ids".to_string(), self.counters.len() as f64);
        stats.insert("total_fraud_cases".to_string(), total_fraud as f64);
        stats.insert("total_transactions".to_string(), total_transactions as f64);
        stats.insert("high_risk_upi_ids".to_string(), high_risk as f64);
        if total_transactions > 0 {
            stats.insert(
                "overall_fraud_rate_percent".to_string(),
                total_fraud as f64 / total_transactions as f64 * 100.0,
            );
        }
        stats
    }

    fn status_from_tracking(&self, upi_id: &str, tracking: &UpiTracking) -> UpiRiskStatus {
        let risk_level = if tracking.fraud_count > self.config.fraud_high_risk_threshold {
            CounterRiskLevel::Critical
        } else if tracking.fraud_count > self.config.fraud_warning_threshold {
            CounterRiskLevel::High
        } else if tracking.fraud_count > 5 {
            CounterRiskLevel::Medium
        } else {
            CounterRiskLevel::Low
        };

        let warning_message = match risk_level {
            CounterRiskLevel::Critical => Some(format!(
                "CRITICAL RISK: UPI ID {} has {} fraudulent transactions, consider blocking",
                upi_id, tracking.fraud_count
            )),
            CounterRiskLevel::High => Some(format!(
                "HIGH RISK: UPI ID {} has {} fraudulent transactions",
                upi_id, tracking.fraud_count
            )),
            CounterRiskLevel::Medium => Some(format!(
                "MEDIUM RISK: UPI ID {} has {} fraudulent transactions",
                upi_id, tracking.fraud_count
            )),
            CounterRiskLevel::Low => None,
        };

        UpiRiskStatus {
            upi_id: upi_id.to_string(),
            fraud_count: tracking.fraud_count,
            total_transactions: tracking.total_transactions,
            fraud_rate: if tracking.total_transactions > 0 {
                tracking.fraud_count as f64 / tracking.total_transactions as f64
            } else {
                0.0
            },
            risk_level,
            warning_triggered: tracking.warning_triggered,
            warning_message,
        }
    }
}

/// SHA-256 over the record's identifying fields, hex encoded
pub fn integrity_hash(record: &TransferRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.record_id.as_bytes());
    hasher.update(record.upi_id.as_bytes());
    hasher.update(format!("{:?}", record.kind).as_bytes());
    hasher.update(record.amount.to_le_bytes());
    hasher.update(record.timestamp.timestamp_millis().to_le_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor() -> TransactionMonitor {
        TransactionMonitor::new(&ShieldConfig::default())
    }

    fn clean_transfer(amount: f64) -> TransferRecord {
        TransferRecord {
            record_id: Uuid::new_v4(),
            upi_id: "mary@upi".to_string(),
            kind: TransferKind::Transfer,
            amount,
            origin_balance_before: 10_000.0,
            origin_balance_after: 10_000.0 - amount,
            destination_balance_before: 500.0,
            destination_balance_after: 500.0 + amount,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_clean_transfer_has_no_flags() {
        let analysis = monitor().analyze(&clean_transfer(750.5));
        assert!(analysis.flags.is_empty());
        assert!(!analysis.suspicious);
        assert_eq!(analysis.anomaly_score, 0.0);
    }

    #[test]
    fn test_balance_reconciliation_flags() {
        let mut record = clean_transfer(1_500.5);
        record.origin_balance_after = record.origin_balance_before; // nothing left the account
        record.destination_balance_after = record.destination_balance_before;

        let analysis = monitor().analyze(&record);
        assert!(analysis
            .flags
            .contains(&"Origin balance does not reconcile with amount".to_string()));
        assert!(analysis
            .flags
            .contains(&"Destination balance does not reconcile with amount".to_string()));
        assert!(analysis.suspicious);
    }

    #[test]
    fn test_account_emptied_and_exact_balance() {
        let mut record = clean_transfer(10_000.0);
        record.origin_balance_after = 0.0;

        let analysis = monitor().analyze(&record);
        assert!(analysis
            .flags
            .contains(&"Account emptied by transaction".to_string()));
        assert!(analysis
            .flags
            .contains(&"Transfer of exact account balance".to_string()));
    }

    #[test]
    fn test_large_round_amount_flag() {
        let mut record = clean_transfer(5_000.0);
        record.origin_balance_before = 50_000.0;
        record.origin_balance_after = 45_000.0;
        let analysis = monitor().analyze(&record);
        assert_eq!(analysis.flags, vec!["Large round-figure amount"]);
        assert!(!analysis.suspicious);
    }

    #[test]
    fn test_unusually_large_amount_flag() {
        let mut record = clean_transfer(150_000.5);
        record.origin_balance_before = 400_000.0;
        record.origin_balance_after = 400_000.0 - 150_000.5;
        let analysis = monitor().analyze(&record);
        assert!(analysis
            .flags
            .contains(&"Unusually large amount".to_string()));
    }

    #[test]
    fn test_counter_thresholds() {
        let mut monitor = monitor();
        let now = Utc::now();

        for _ in 0..6 {
            monitor.record_outcome("shady@upi", true, now);
        }
        assert_eq!(monitor.status("shady@upi").risk_level, CounterRiskLevel::Medium);

        for _ in 0..5 {
            monitor.record_outcome("shady@upi", true, now);
        }
        let status = monitor.status("shady@upi");
        assert_eq!(status.risk_level, CounterRiskLevel::High);
        assert!(status.warning_triggered);

        for _ in 0..10 {
            monitor.record_outcome("shady@upi", true, now);
        }
        let status = monitor.status("shady@upi");
        assert_eq!(status.risk_level, CounterRiskLevel::Critical);
        assert!(status
            .warning_message
            .as_deref()
            .unwrap()
            .starts_with("CRITICAL RISK"));
        assert_eq!(status.fraud_count, 21);
    }

    #[test]
    fn test_clean_history_stays_low() {
        let mut monitor = monitor();
        let now = Utc::now();
        for _ in 0..30 {
            monitor.record_outcome("mary@upi", false, now);
        }
        let status = monitor.status("mary@upi");
        assert_eq!(status.risk_level, CounterRiskLevel::Low);
        assert_eq!(status.fraud_rate, 0.0);
        assert!(status.warning_message.is_none());
    }

    #[test]
    fn test_reset_counter() {
        let mut monitor = monitor();
        monitor.record_outcome("shady@upi", true, Utc::now());
        assert!(monitor.reset_counter("shady@upi"));
        assert!(!monitor.reset_counter("shady@upi"));
        assert_eq!(monitor.status("shady@upi").total_transactions, 0);
    }

    #[test]
    fn test_review_combines_analysis_and_tracking() {
        let mut monitor = monitor();
        let mut record = clean_transfer(10_000.0);
        record.origin_balance_after = 0.0;
        record.upi_id = "drain@upi".to_string();

        let review = monitor.review(&record);
        assert!(review.analysis.suspicious);
        assert_eq!(review.tracking.total_transactions, 1);
        assert_eq!(review.tracking.fraud_count, 1);
    }

    #[test]
    fn test_statistics_aggregation() {
        let mut monitor = monitor();
        let now = Utc::now();
        monitor.record_outcome("a@upi", true, now);
        monitor.record_outcome("a@upi", false, now);
        monitor.record_outcome("b@upi", false, now);

        let stats = monitor.statistics();
        assert_eq!(stats["tracked_upi_ids"], 2.0);
        assert_eq!(stats["total_fraud_cases"], 1.0);
        assert_eq!(stats["total_transactions"], 3.0);
    }

    #[test]
    fn test_integrity_hash_is_stable() {
        let record = clean_transfer(123.0);
        assert_eq!(integrity_hash(&record), integrity_hash(&record));
        assert_eq!(integrity_hash(&record).len(), 64);
    }
}

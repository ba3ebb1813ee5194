//! Regulatory compliance checks for simulated transactions
//! Thin threshold rules modeled on RBI and NPCI guidance; deliberately
//! simple compared to the risk engine

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ShieldConfig;
use crate::utils::format_inr;

/// Snapshot of a transaction under validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionContext {
    pub upi_id: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    /// Transactions already made today on this UPI handle
    pub transactions_today: u32,
    pub two_factor_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: String,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub compliant: bool,
    pub violations: Vec<RuleViolation>,
}

#[derive(Debug, Clone)]
pub struct ComplianceValidator {
    config: ShieldConfig,
}

impl ComplianceValidator {
    pub fn new(config: &ShieldConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Evaluate every rule; the report lists all violations rather than
    /// stopping at the first
    pub fn validate(&self, tx: &TransactionContext) -> ComplianceReport {
        let mut violations = Vec::new();

        if tx.amount > self.config.upi_transaction_limit {
            violations.push(RuleViolation {
                rule: "NPCI UPI per-transaction limit".to_string(),
                detail: format!(
                    "Amount {} exceeds the UPI limit of {}",
                    format_inr(tx.amount),
                    format_inr(self.config.upi_transaction_limit)
                ),
            });
        }

        if tx.transactions_today >= self.config.daily_transaction_count_limit {
            violations.push(RuleViolation {
                rule: "NPCI daily transaction count".to_string(),
                detail: format!(
                    "{} transactions already made today (limit {})",
                    tx.transactions_today, self.config.daily_transaction_count_limit
                ),
            });
        }

        if tx.amount > self.config.enhanced_auth_threshold && !tx.two_factor_verified {
            violations.push(RuleViolation {
                rule: "RBI enhanced authentication".to_string(),
                detail: format!(
                    "Transfers above {} require a verified second factor",
                    format_inr(self.config.enhanced_auth_threshold)
                ),
            });
        }

        let hour = tx.timestamp.hour();
        if hour < 5 && tx.amount > self.config.night_transfer_limit {
            violations.push(RuleViolation {
                rule: "RBI night transfer review".to_string(),
                detail: format!(
                    "Transfer of {} between 00:00 and 05:00 requires review",
                    format_inr(tx.amount)
                ),
            });
        }

        ComplianceReport {
            compliant: violations.is_empty(),
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn validator() -> ComplianceValidator {
        ComplianceValidator::new(&ShieldConfig::default())
    }

    fn daytime_tx(amount: f64) -> TransactionContext {
        TransactionContext {
            upi_id: "user@upi".to_string(),
            amount,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 10, 11, 30, 0).unwrap(),
            transactions_today: 2,
            two_factor_verified: false,
        }
    }

    #[test]
    fn test_ordinary_transaction_is_compliant() {
        let report = validator().validate(&daytime_tx(5_000.0));
        assert!(report.compliant);
        assert!(report.violations.is_empty());
    }

    #[test]
    fn test_upi_limit_violation() {
        let report = validator().validate(&daytime_tx(150_000.0));
        assert!(!report.compliant);
        assert!(report
            .violations
            .iter()
            .any(|v| v.rule == "NPCI UPI per-transaction limit"));
    }

    #[test]
    fn test_daily_count_violation() {
        let mut tx = daytime_tx(1_000.0);
        tx.transactions_today = 20;
        let report = validator().validate(&tx);
        assert!(!report.compliant);
        assert!(report
            .violations
            .iter()
            .any(|v| v.rule == "NPCI daily transaction count"));
    }

    #[test]
    fn test_enhanced_auth_rule() {
        let mut tx = daytime_tx(250_000.0);
        let report = validator().validate(&tx);
        assert!(report
            .violations
            .iter()
            .any(|v| v.rule == "RBI enhanced authentication"));

        tx.two_factor_verified = true;
        let report = validator().validate(&tx);
        assert!(!report
            .violations
            .iter()
            .any(|v| v.rule == "RBI enhanced authentication"));
    }

    #[test]
    fn test_night_transfer_rule() {
        let mut tx = daytime_tx(60_000.0);
        tx.timestamp = Utc.with_ymd_and_hms(2025, 6, 10, 2, 15, 0).unwrap();
        let report = validator().validate(&tx);
        assert!(!report.compliant);
        assert!(report
            .violations
            .iter()
            .any(|v| v.rule == "RBI night transfer review"));
    }

    #[test]
    fn test_multiple_violations_are_all_reported() {
        let mut tx = daytime_tx(250_000.0);
        tx.timestamp = Utc.with_ymd_and_hms(2025, 6, 10, 1, 0, 0).unwrap();
        tx.transactions_today = 25;
        let report = validator().validate(&tx);
        assert_eq!(report.violations.len(), 4);
    }
}

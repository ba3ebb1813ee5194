//! Intent and capability analyzer
//! Probes declared capabilities through the inventory provider and caches
//! results per package for a fixed TTL

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::errors::Result;
use crate::inventory::{CapabilityKind, InventoryProvider};

/// Outcome of a capability probe for one package
#[derive(Debug, Clone, PartialEq)]
pub struct IntentFindings {
    pub factors: Vec<String>,
    /// True when the provider could not be queried; the diagnostic factor
    /// annotates the assessment but carries no points
    pub degraded: bool,
}

#[derive(Debug)]
pub struct IntentAnalyzer {
    cache: HashMap<String, (DateTime<Utc>, Vec<String>)>,
    ttl: Duration,
}

impl IntentAnalyzer {
    pub fn new(ttl_hours: i64) -> Self {
        Self {
            cache: HashMap::new(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Analyze a package's declared capabilities. A cache hit within the TTL
    /// returns the stored list without touching the provider. Provider
    /// failures degrade to a diagnostic factor and are not cached, so the
    /// next call probes again.
    pub fn analyze_at<P: InventoryProvider>(
        &mut self,
        provider: &P,
        package_id: &str,
        now: DateTime<Utc>,
    ) -> IntentFindings {
        if let Some((cached_at, factors)) = self.cache.get(package_id) {
            if now.signed_duration_since(*cached_at) < self.ttl {
                debug!(package_id, "intent cache hit");
                return IntentFindings {
                    factors: factors.clone(),
                    degraded: false,
                };
            }
        }

        match self.probe(provider, package_id) {
            Ok(factors) => {
                self.cache
                    .insert(package_id.to_string(), (now, factors.clone()));
                IntentFindings {
                    factors,
                    degraded: false,
                }
            }
            Err(e) => IntentFindings {
                factors: vec![format!("Error analyzing intents: {}", e)],
                degraded: true,
            },
        }
    }

    fn probe<P: InventoryProvider>(
        &self,
        provider: &P,
        package_id: &str,
    ) -> Result<Vec<String>> {
        let mut factors = Vec::new();

        if provider.query_capability(package_id, CapabilityKind::SmsReceiver)? {
            factors.push("Intercepts incoming SMS messages".to_string());
        }

        if provider.query_capability(package_id, CapabilityKind::AccessibilityService)? {
            factors.push("Registers an accessibility service".to_string());
        }

        // Overlay access is only a signal for apps a user can actually launch
        if provider.query_capability(package_id, CapabilityKind::Overlay)?
            && provider.query_capability(package_id, CapabilityKind::LauncherActivity)?
        {
            factors.push("Can draw over other apps".to_string());
        }

        if provider.query_capability(package_id, CapabilityKind::DeviceAdmin)? {
            factors.push("Requests device administrator access".to_string());
        }

        Ok(factors)
    }

    /// Drop every cached entry, forcing fresh probes
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SimulatedInventory;

    fn analyzer() -> IntentAnalyzer {
        IntentAnalyzer::new(1)
    }

    #[test]
    fn test_all_capabilities_detected() {
        let inventory = SimulatedInventory::new()
            .with_capability("com.spy.app", CapabilityKind::SmsReceiver)
            .with_capability("com.spy.app", CapabilityKind::AccessibilityService)
            .with_capability("com.spy.app", CapabilityKind::Overlay)
            .with_capability("com.spy.app", CapabilityKind::LauncherActivity)
            .with_capability("com.spy.app", CapabilityKind::DeviceAdmin);

        let mut analyzer = analyzer();
        let findings = analyzer.analyze_at(&inventory, "com.spy.app", Utc::now());
        assert!(!findings.degraded);
        assert_eq!(findings.factors.len(), 4);
    }

    #[test]
    fn test_overlay_without_launcher_is_ignored() {
        let inventory = SimulatedInventory::new()
            .with_capability("com.svc.app", CapabilityKind::Overlay);

        let mut analyzer = analyzer();
        let findings = analyzer.analyze_at(&inventory, "com.svc.app", Utc::now());
        assert!(findings.factors.is_empty());
    }

    #[test]
    fn test_cache_hit_within_ttl_skips_provider() {
        let inventory = SimulatedInventory::new()
            .with_capability("com.spy.app", CapabilityKind::SmsReceiver);

        let mut analyzer = analyzer();
        let now = Utc::now();
        let first = analyzer.analyze_at(&inventory, "com.spy.app", now);
        let queries_after_first = inventory.capability_queries();

        let second = analyzer.analyze_at(&inventory, "com.spy.app", now + Duration::minutes(30));
        assert_eq!(first, second);
        assert_eq!(inventory.capability_queries(), queries_after_first);
    }

    #[test]
    fn test_expired_entry_is_recomputed() {
        let inventory = SimulatedInventory::new()
            .with_capability("com.spy.app", CapabilityKind::SmsReceiver);

        let mut analyzer = analyzer();
        let now = Utc::now();
        analyzer.analyze_at(&inventory, "com.spy.app", now);
        let queries_after_first = inventory.capability_queries();

        analyzer.analyze_at(&inventory, "com.spy.app", now + Duration::hours(2));
        assert!(inventory.capability_queries() > queries_after_first);
    }

    #[test]
    fn test_provider_failure_degrades_without_caching() {
        let mut inventory = SimulatedInventory::new();
        inventory.set_unavailable(true);

        let mut analyzer = analyzer();
        let now = Utc::now();
        let findings = analyzer.analyze_at(&inventory, "com.spy.app", now);
        assert!(findings.degraded);
        assert_eq!(findings.factors.len(), 1);
        assert!(findings.factors[0].starts_with("Error analyzing intents:"));

        // Once the provider recovers, the next call within the TTL probes
        // fresh instead of serving the failure
        inventory.set_unavailable(false);
        let findings = analyzer.analyze_at(&inventory, "com.spy.app", now);
        assert!(!findings.degraded);
        assert!(findings.factors.is_empty());
    }
}

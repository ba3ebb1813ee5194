//! Application inventory access
//! The platform-specific package enumeration lives behind a trait so the
//! engine can run against the real device bridge or a simulated inventory

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShieldError};

/// One installed application as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledApplication {
    pub package_id: String,
    pub display_name: String,
    pub permissions: BTreeSet<String>,
    /// Installer package identifier, absent when sideloaded or unknown
    pub install_source: Option<String>,
    /// Unix epoch when the platform cannot report an install time
    pub install_timestamp: DateTime<Utc>,
    pub is_system_app: bool,
}

/// Declared capabilities the intent analyzer probes for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CapabilityKind {
    SmsReceiver,
    AccessibilityService,
    Overlay,
    DeviceAdmin,
    LauncherActivity,
}

/// Read-only access to the device's application inventory
pub trait InventoryProvider {
    fn list_installed_applications(&self, include_system: bool) -> Result<Vec<InstalledApplication>>;

    fn query_capability(&self, package_id: &str, kind: CapabilityKind) -> Result<bool>;
}

/// In-memory inventory used by the CLI demo and tests
#[derive(Debug, Default)]
pub struct SimulatedInventory {
    apps: Vec<InstalledApplication>,
    capabilities: HashMap<String, BTreeSet<CapabilityKind>>,
    unavailable: bool,
    capability_queries: AtomicUsize,
}

impl SimulatedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app: InstalledApplication) -> Self {
        self.apps.push(app);
        self
    }

    pub fn with_capability(mut self, package_id: &str, kind: CapabilityKind) -> Self {
        self.capabilities
            .entry(package_id.to_string())
            .or_default()
            .insert(kind);
        self
    }

    /// Simulate the platform bridge being unreachable
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Number of capability queries served, for cache verification
    pub fn capability_queries(&self) -> usize {
        self.capability_queries.load(Ordering::Relaxed)
    }
}

impl InventoryProvider for SimulatedInventory {
    fn list_installed_applications(&self, include_system: bool) -> Result<Vec<InstalledApplication>> {
        if self.unavailable {
            return Err(ShieldError::ProviderUnavailable {
                message: "simulated inventory offline".to_string(),
            });
        }

        Ok(self
            .apps
            .iter()
            .filter(|app| include_system || !app.is_system_app)
            .cloned()
            .collect())
    }

    fn query_capability(&self, package_id: &str, kind: CapabilityKind) -> Result<bool> {
        if self.unavailable {
            return Err(ShieldError::CapabilityQueryFailed {
                package_id: package_id.to_string(),
                message: "simulated inventory offline".to_string(),
            });
        }

        self.capability_queries.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .capabilities
            .get(package_id)
            .map(|kinds| kinds.contains(&kind))
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_app(package_id: &str, is_system: bool) -> InstalledApplication {
        InstalledApplication {
            package_id: package_id.to_string(),
            display_name: package_id.to_string(),
            permissions: BTreeSet::new(),
            install_source: None,
            install_timestamp: DateTime::<Utc>::UNIX_EPOCH,
            is_system_app: is_system,
        }
    }

    #[test]
    fn test_system_filter() {
        let inventory = SimulatedInventory::new()
            .with_app(sample_app("com.user.app", false))
            .with_app(sample_app("com.android.core", true));

        let user_only = inventory.list_installed_applications(false).unwrap();
        assert_eq!(user_only.len(), 1);
        assert_eq!(user_only[0].package_id, "com.user.app");

        let all = inventory.list_installed_applications(true).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_capability_lookup() {
        let inventory = SimulatedInventory::new()
            .with_capability("com.user.app", CapabilityKind::SmsReceiver);

        assert!(inventory
            .query_capability("com.user.app", CapabilityKind::SmsReceiver)
            .unwrap());
        assert!(!inventory
            .query_capability("com.user.app", CapabilityKind::DeviceAdmin)
            .unwrap());
        assert!(!inventory
            .query_capability("com.other.app", CapabilityKind::SmsReceiver)
            .unwrap());
        assert_eq!(inventory.capability_queries(), 3);
    }

    #[test]
    fn test_unavailable_inventory_fails() {
        let mut inventory = SimulatedInventory::new().with_app(sample_app("com.user.app", false));
        inventory.set_unavailable(true);

        assert!(inventory.list_installed_applications(false).is_err());
        assert!(inventory
            .query_capability("com.user.app", CapabilityKind::Overlay)
            .is_err());
    }
}

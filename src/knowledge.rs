//! Static knowledge base backing the risk heuristics
//! Loaded once at startup and immutable afterwards

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Permissions historically tied to data exfiltration or interception
const DANGEROUS_PERMISSIONS: &[&str] = &[
    "android.permission.READ_SMS",
    "android.permission.RECEIVE_SMS",
    "android.permission.SEND_SMS",
    "android.permission.READ_CALL_LOG",
    "android.permission.CALL_PHONE",
    "android.permission.PROCESS_OUTGOING_CALLS",
    "android.permission.READ_CONTACTS",
    "android.permission.READ_PHONE_STATE",
    "android.permission.ACCESS_FINE_LOCATION",
    "android.permission.ACCESS_COARSE_LOCATION",
    "android.permission.CAMERA",
    "android.permission.RECORD_AUDIO",
    "android.permission.SYSTEM_ALERT_WINDOW",
    "android.permission.BIND_ACCESSIBILITY_SERVICE",
    "android.permission.READ_EXTERNAL_STORAGE",
    "android.permission.WRITE_EXTERNAL_STORAGE",
];

/// Installer package identifiers accepted as official store channels
const TRUSTED_INSTALL_SOURCES: &[&str] = &[
    "com.android.vending",
    "com.sec.android.app.samsungapps",
    "com.amazon.venezia",
];

/// Known legitimate financial apps, package id to brand name
const LEGITIMATE_FINANCIAL_APPS: &[(&str, &str)] = &[
    ("com.sbi.lotusintouch", "SBI YONO"),
    ("com.google.android.apps.nbu.paisa.user", "Google Pay"),
    ("net.one97.paytm", "Paytm"),
    ("com.phonepe.app", "PhonePe"),
    ("com.icicibank.imobile", "iMobile Pay"),
    ("com.snapwork.hdfc", "HDFC Bank"),
    ("com.axis.mobile", "Axis Mobile"),
    ("in.org.npci.upiapp", "BHIM"),
    ("com.dreamplug.androidapp", "CRED"),
];

/// Display-name fragments that suggest a financial app
const FINANCIAL_KEYWORDS: &[&str] = &[
    "bank",
    "upi",
    "pay",
    "wallet",
    "finance",
    "money",
    "transaction",
    "loan",
];

/// A curated set of 2-3 permissions whose joint presence is a stronger
/// signal than any single permission alone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCombination {
    pub name: String,
    pub permissions: BTreeSet<String>,
}

impl PermissionCombination {
    fn new(name: &str, permissions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub dangerous_permissions: BTreeSet<String>,
    /// Combination match order is the Vec order and must stay deterministic
    pub dangerous_combinations: Vec<PermissionCombination>,
    pub legitimate_financial_apps: BTreeMap<String, String>,
    pub trusted_install_sources: BTreeSet<String>,
    pub financial_keywords: Vec<String>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            dangerous_permissions: DANGEROUS_PERMISSIONS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            dangerous_combinations: vec![
                PermissionCombination::new(
                    "SMS and Call Logger",
                    &[
                        "android.permission.READ_SMS",
                        "android.permission.READ_CALL_LOG",
                    ],
                ),
                PermissionCombination::new(
                    "SMS Interceptor",
                    &[
                        "android.permission.RECEIVE_SMS",
                        "android.permission.SEND_SMS",
                    ],
                ),
                PermissionCombination::new(
                    "Covert Surveillance",
                    &[
                        "android.permission.CAMERA",
                        "android.permission.RECORD_AUDIO",
                        "android.permission.ACCESS_FINE_LOCATION",
                    ],
                ),
                PermissionCombination::new(
                    "Screen Hijacker",
                    &[
                        "android.permission.SYSTEM_ALERT_WINDOW",
                        "android.permission.BIND_ACCESSIBILITY_SERVICE",
                    ],
                ),
                PermissionCombination::new(
                    "Contact Harvester",
                    &[
                        "android.permission.READ_CONTACTS",
                        "android.permission.READ_EXTERNAL_STORAGE",
                    ],
                ),
            ],
            legitimate_financial_apps: LEGITIMATE_FINANCIAL_APPS
                .iter()
                .map(|(pkg, brand)| (pkg.to_string(), brand.to_string()))
                .collect(),
            trusted_install_sources: TRUSTED_INSTALL_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            financial_keywords: FINANCIAL_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KnowledgeBase {
    pub fn is_legitimate_financial_app(&self, package_id: &str) -> bool {
        self.legitimate_financial_apps.contains_key(package_id)
    }

    /// An absent or empty installer identifier is never trusted
    pub fn is_trusted_source(&self, install_source: Option<&str>) -> bool {
        match install_source {
            Some(source) if !source.is_empty() => {
                self.trusted_install_sources.contains(source)
            }
            _ => false,
        }
    }
}

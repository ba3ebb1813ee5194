//! BankShield CLI - Device and Application Risk Assessment
//!
//! Demonstrates the risk engine against a simulated device inventory:
//! scanning for suspicious apps, the coarse harmful-app fallback,
//! regulatory transaction checks and the transfer anomaly monitor.

use chrono::{Duration, Utc};
use clap::{Arg, Command};
use std::collections::BTreeSet;
use uuid::Uuid;

use bankshield::{
    config::ShieldConfig,
    inventory::SimulatedInventory,
    knowledge::KnowledgeBase,
    transaction::TransferKind,
    utils::format_inr,
    BankShield, CapabilityKind, InstalledApplication, RiskTier, TransactionContext,
    TransferRecord,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("BankShield")
        .version("1.0.0")
        .author("BankShield Team")
        .about("Device and Application Risk Assessment for Mobile Banking")
        .arg(
            Arg::new("strict")
                .long("strict")
                .help("Use the stricter impersonation similarity cutoff")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan the simulated inventory for suspicious apps")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the scan outcome as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("assess")
                .about("Assess a single package")
                .arg(Arg::new("package").required(true).help("Package identifier")),
        )
        .subcommand(
            Command::new("harmful")
                .about("Run the coarse permission-only harmful app detector"),
        )
        .subcommand(
            Command::new("transfer")
                .about("Run the transfer anomaly monitor on sample transfers"),
        )
        .subcommand(
            Command::new("demo")
                .about("Run a complete demo showcasing the risk engine"),
        )
        .subcommand(
            Command::new("stats")
                .about("Show engine and fraud-counter statistics after a scan"),
        )
        .get_matches();

    let config = if matches.get_flag("strict") {
        ShieldConfig::strict()
    } else {
        ShieldConfig::default()
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        return;
    }

    let mut shield = BankShield::new(config, KnowledgeBase::default(), demo_inventory());

    match matches.subcommand() {
        Some(("scan", sub_matches)) => {
            let outcome = shield.scan_inventory();
            if sub_matches.get_flag("json") {
                match serde_json::to_string_pretty(&outcome) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("Failed to serialize scan outcome: {}", e),
                }
            } else {
                print_scan_results(&shield, outcome.succeeded, &outcome.assessments);
            }
        }
        Some(("assess", sub_matches)) => {
            let package = sub_matches.get_one::<String>("package").unwrap();
            print_assessment(&shield.assess_application(package));
        }
        Some(("harmful", _)) => {
            let harmful = shield.detect_harmful_apps();
            if harmful.is_empty() {
                println!("✅ No harmful apps detected by the permission pre-filter");
            } else {
                println!("🚫 Harmful apps (permission pre-filter):");
                for package in harmful {
                    println!("   - {}", package);
                }
            }
        }
        Some(("transfer", _)) => {
            run_transfer_demo(&mut shield);
        }
        Some(("demo", _)) => {
            println!("🏦 BankShield Demo - Mobile Banking Device Security");
            println!("{}", "=".repeat(50));
            run_demo(&mut shield);
        }
        Some(("stats", _)) => {
            let _ = shield.scan_inventory();
            show_statistics(&shield);
        }
        _ => {
            println!("🏦 BankShield - Device and Application Risk Assessment");
            println!("Use --help to see available commands");
            println!();
            println!("Quick Demo:");
            println!("  cargo run -- demo    # Run complete demonstration");
            println!("  cargo run -- scan    # Scan the simulated inventory");
        }
    }
}

/// Simulated device inventory used by every subcommand
fn demo_inventory() -> SimulatedInventory {
    let now = Utc::now();
    let old_install = now - Duration::days(90);

    SimulatedInventory::new()
        .with_app(InstalledApplication {
            package_id: "com.random.dev123".to_string(),
            display_name: "SBI Bank Alert".to_string(),
            permissions: perms(&[
                "android.permission.READ_SMS",
                "android.permission.READ_CALL_LOG",
            ]),
            install_source: None,
            install_timestamp: now - Duration::hours(1),
            is_system_app: false,
        })
        .with_capability("com.random.dev123", CapabilityKind::SmsReceiver)
        .with_app(InstalledApplication {
            package_id: "com.sbi.lotusintouch".to_string(),
            display_name: "SBI YONO".to_string(),
            permissions: perms(&[
                "android.permission.CAMERA",
                "android.permission.READ_SMS",
            ]),
            install_source: Some("com.android.vending".to_string()),
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_app(InstalledApplication {
            package_id: "com.fun.game".to_string(),
            display_name: "Fun Game".to_string(),
            permissions: perms(&[
                "android.permission.SEND_SMS",
                "android.permission.READ_SMS",
            ]),
            install_source: Some("com.android.vending".to_string()),
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_app(InstalledApplication {
            package_id: "com.handy.tool".to_string(),
            display_name: "Handy Tool".to_string(),
            permissions: perms(&[
                "android.permission.ACCESS_FINE_LOCATION",
                "android.permission.INTERNET",
            ]),
            install_source: Some("com.thirdparty.store".to_string()),
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_app(InstalledApplication {
            package_id: "com.quiet.helper".to_string(),
            display_name: "Device Helper".to_string(),
            permissions: perms(&[
                "android.permission.SYSTEM_ALERT_WINDOW",
                "android.permission.BIND_ACCESSIBILITY_SERVICE",
            ]),
            install_source: None,
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_capability("com.quiet.helper", CapabilityKind::AccessibilityService)
        .with_capability("com.quiet.helper", CapabilityKind::Overlay)
        .with_capability("com.quiet.helper", CapabilityKind::LauncherActivity)
        .with_capability("com.quiet.helper", CapabilityKind::DeviceAdmin)
        .with_app(InstalledApplication {
            package_id: "com.shots.cam".to_string(),
            display_name: "Shots".to_string(),
            permissions: perms(&["android.permission.CAMERA"]),
            install_source: Some("com.android.vending".to_string()),
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_app(InstalledApplication {
            package_id: "com.puzzle.sudoku".to_string(),
            display_name: "Sudoku".to_string(),
            permissions: BTreeSet::new(),
            install_source: Some("com.android.vending".to_string()),
            install_timestamp: old_install,
            is_system_app: false,
        })
        .with_app(InstalledApplication {
            package_id: "com.android.phone".to_string(),
            display_name: "Phone".to_string(),
            permissions: perms(&[
                "android.permission.READ_SMS",
                "android.permission.READ_CALL_LOG",
                "android.permission.CALL_PHONE",
            ]),
            install_source: None,
            install_timestamp: old_install,
            is_system_app: true,
        })
}

fn perms(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|p| p.to_string()).collect()
}

fn run_demo(shield: &mut BankShield<SimulatedInventory>) {
    println!("Initializing device security demonstration...");

    println!("\n1. Scanning installed applications...");
    let outcome = shield.scan_inventory();
    print_scan_results(shield, outcome.succeeded, &outcome.assessments);

    println!("\n2. Running the coarse harmful-app fallback...");
    for package in shield.detect_harmful_apps() {
        println!("   🚫 {}", package);
    }

    println!("\n3. Validating sample transactions...");
    demonstrate_compliance(shield);

    println!("\n4. Monitoring sample transfers...");
    run_transfer_demo(shield);

    println!("\n5. Security Analytics Dashboard:");
    show_statistics(shield);

    println!("\n✅ Demo completed successfully!");
}

fn print_scan_results(
    shield: &BankShield<SimulatedInventory>,
    succeeded: bool,
    assessments: &[bankshield::RiskAssessment],
) {
    if !succeeded {
        println!("   ❌ Scan failed: the inventory provider was unavailable");
        return;
    }

    if assessments.is_empty() {
        println!("   ✅ No suspicious applications found");
        return;
    }

    println!(
        "   ⚠️  {} suspicious application(s) (similarity cutoff {:.1}):",
        assessments.len(),
        shield.config().similarity_cutoff
    );
    for assessment in assessments {
        print_assessment(assessment);
    }
}

fn print_assessment(assessment: &bankshield::RiskAssessment) {
    let symbol = match assessment.tier {
        RiskTier::Safe => "✅",
        RiskTier::Low => "✅",
        RiskTier::Medium => "⚠️",
        RiskTier::High => "🚨",
        RiskTier::Critical => "🚫",
        RiskTier::Unknown => "❓",
    };
    println!(
        "   {} {} ({}) - score {}, tier {}, category {}",
        symbol,
        assessment.display_name,
        assessment.package_id,
        assessment.score,
        assessment.tier,
        assessment.category
    );
    for factor in &assessment.factors {
        println!("      • {}", factor);
    }
}

fn demonstrate_compliance(shield: &BankShield<SimulatedInventory>) {
    let now = Utc::now();
    let samples = vec![
        ("school fees", 5_000.0, 2, true),
        ("property advance", 250_000.0, 2, false),
        ("burst of payments", 1_000.0, 25, true),
    ];

    for (label, amount, transactions_today, two_factor_verified) in samples {
        let report = shield.validate_transaction(&TransactionContext {
            upi_id: "mary@upi".to_string(),
            amount,
            timestamp: now,
            transactions_today,
            two_factor_verified,
        });

        if report.compliant {
            println!("   ✅ {} ({}) is compliant", label, format_inr(amount));
        } else {
            println!("   ⚠️  {} ({}) has violations:", label, format_inr(amount));
            for violation in &report.violations {
                println!("      • {}: {}", violation.rule, violation.detail);
            }
        }
    }
}

fn run_transfer_demo(shield: &mut BankShield<SimulatedInventory>) {
    let now = Utc::now();
    let transfers = vec![
        TransferRecord {
            record_id: Uuid::new_v4(),
            upi_id: "mary@upi".to_string(),
            kind: TransferKind::Payment,
            amount: 750.5,
            origin_balance_before: 10_000.0,
            origin_balance_after: 9_249.5,
            destination_balance_before: 500.0,
            destination_balance_after: 1_250.5,
            timestamp: now,
        },
        TransferRecord {
            record_id: Uuid::new_v4(),
            upi_id: "shady@upi".to_string(),
            kind: TransferKind::Transfer,
            amount: 10_000.0,
            origin_balance_before: 10_000.0,
            origin_balance_after: 0.0,
            destination_balance_before: 0.0,
            destination_balance_after: 10_000.0,
            timestamp: now,
        },
    ];

    for record in &transfers {
        let review = shield.analyze_transfer(record);
        let symbol = if review.analysis.suspicious { "🚫" } else { "✅" };
        println!(
            "   {} {} from {}: anomaly score {:.2}",
            symbol,
            format_inr(record.amount),
            record.upi_id,
            review.analysis.anomaly_score
        );
        for flag in &review.analysis.flags {
            println!("      • {}", flag);
        }
        if let Some(message) = &review.tracking.warning_message {
            println!("      ⚠️  {}", message);
        }
    }
}

fn show_statistics(shield: &BankShield<SimulatedInventory>) {
    println!("   📊 Risk Engine Statistics:");
    let mut engine_stats: Vec<(String, f64)> = shield.engine_statistics().into_iter().collect();
    engine_stats.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, value) in engine_stats {
        println!("      {}: {:.1}", key.replace('_', " "), value);
    }

    println!("   📊 Fraud Counter Statistics:");
    let mut fraud_stats: Vec<(String, f64)> = shield.fraud_statistics().into_iter().collect();
    fraud_stats.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, value) in fraud_stats {
        println!("      {}: {:.1}", key.replace('_', " "), value);
    }
}

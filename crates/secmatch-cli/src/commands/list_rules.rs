//! List rules command implementation.

use secmatch_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<6} {:<10} {:<26} Description", "Code", "Severity", "Name");
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<6} {:<10} {:<26} {}",
            rule.code(),
            rule.default_severity().to_string(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for (name, preset, note) in [
        ("recommended", Preset::Recommended, "(default)"),
        ("strict", Preset::Strict, "os.Create requires 0600, imports raised to high"),
        ("minimal", Preset::Minimal, "for gradual adoption"),
    ] {
        let codes: Vec<&str> = preset.rules().iter().map(|r| r.code()).collect();
        println!("  {name:<12} {} {note}", codes.join(", "));
    }

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  secmatch check --rules weak-rand,tls-insecure-config");
    println!("  secmatch check --rules G402,G404,G504");
}

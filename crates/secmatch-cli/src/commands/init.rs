//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# secmatch configuration

# Rule set: "recommended" (default), "strict" or "minimal"
preset = "recommended"

# Lowest severity that makes `secmatch check` exit non-zero
# fail_on = "low"

# Honor `// #nosec` comments
nosec = true

[analyzer]
# Directory holding *.unit.json files (default: this file's directory)
# root = "build/units"   # relative to this file

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/testdata/**",
]

# Check _test.go units
include_tests = true

# Rule configurations, keyed by code or name.
# Each rule can be enabled/disabled and have its severity overridden.

[rules.G302]
# Maximum mode for os.Chmod / os.OpenFile
mode = "0o600"

# [rules.G307]
# Report os.Create when files must be stricter than 0666
# mode = "0o600"

# [rules.G402]
# Lowest accepted TLS version (0x0303 = TLS 1.2)
# min_version = "0x0303"

# [rules.weak-rand]
# severity = "medium"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("secmatch.toml"), force)?;

    println!("Created secmatch.toml");
    println!("\nNext steps:");
    println!("  1. Edit secmatch.toml to configure rules");
    println!("  2. Run: secmatch check <dir-with-unit-files>");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secmatch_core::{Config, Severity};

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).expect("template parses");
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert!(config.nosec);
        assert_eq!(config.rules["G302"].get_int("mode"), Some(0o600));
        assert_eq!(config.rule_severity("G404", "weak-rand"), None::<Severity>);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("secmatch.toml");
        std::fs::write(&path, "# mine").expect("write");

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "# mine");

        write_config(&path, true).expect("forced write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), DEFAULT_CONFIG);
    }
}

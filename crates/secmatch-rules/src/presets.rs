//! Rule presets for common configurations.

use crate::{
    BlocklistedImport, FilePermissions, InsecureIgnoreHostKey, OsCreatePerms,
    RatSetStringOverflow, TlsInsecureConfig, WeakRand,
};
use secmatch_core::{Config, Rule, RuleBox, RuleConfig, Severity};

/// Preset configurations for secmatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every rule with its default options.
    Recommended,
    /// Every rule, with stricter file modes and raised import severities.
    Strict,
    /// Only the highest-signal rules, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        self.rules_with(&Config::default())
    }

    /// Returns the rules for this preset with per-rule options from `config`.
    ///
    /// Options in a rule section are applied on top of the preset's own
    /// settings for that rule; rules not in the preset are not added.
    #[must_use]
    pub fn rules_with(self, config: &Config) -> Vec<RuleBox> {
        match self {
            Self::Recommended => all_rules_with(config),
            Self::Strict => strict_rules_with(config),
            Self::Minimal => minimal_rules_with(config),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!("unknown preset '{other}'")),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes every rule with default options. `os-create-perms` (G307)
/// reports nothing until a mode stricter than `0666` is configured.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns the strict set of rules.
///
/// Includes all recommended rules, plus:
/// - `os-create-perms` (G307) requiring `0600`
/// - blocklisted imports (G501-G505) raised to high severity
#[must_use]
pub fn strict_rules() -> Vec<RuleBox> {
    Preset::Strict.rules()
}

/// Returns the minimal set of rules.
///
/// For gradual adoption, only includes:
/// - `insecure-ignore-host-key` (G106)
/// - `tls-insecure-config` (G402)
/// - `blocklisted-import-cgi` (G504)
#[must_use]
pub fn minimal_rules() -> Vec<RuleBox> {
    Preset::Minimal.rules()
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    all_rules_with(&Config::default())
}

/// Looks up a single rule by code or name, applying options from `config`.
#[must_use]
pub fn rule_by_id(id: &str, config: &Config) -> Option<RuleBox> {
    all_rules_with(config)
        .into_iter()
        .find(|rule| rule.code() == id || rule.name() == id)
}

fn all_rules_with(config: &Config) -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = vec![
        Box::new(InsecureIgnoreHostKey::new()),
        Box::new(RatSetStringOverflow::new()),
        tuned(FilePermissions::new(), config, FilePermissions::with_config),
        tuned(OsCreatePerms::new(), config, OsCreatePerms::with_config),
        tuned(TlsInsecureConfig::new(), config, TlsInsecureConfig::with_config),
        Box::new(WeakRand::new()),
    ];
    rules.extend(
        BlocklistedImport::all()
            .into_iter()
            .map(|rule| Box::new(rule) as RuleBox),
    );
    rules
}

fn strict_rules_with(config: &Config) -> Vec<RuleBox> {
    let mut rules: Vec<RuleBox> = vec![
        Box::new(InsecureIgnoreHostKey::new()),
        Box::new(RatSetStringOverflow::new()),
        tuned(FilePermissions::new(), config, FilePermissions::with_config),
        tuned(
            OsCreatePerms::new().max_mode(0o600),
            config,
            OsCreatePerms::with_config,
        ),
        tuned(TlsInsecureConfig::new(), config, TlsInsecureConfig::with_config),
        Box::new(WeakRand::new()),
    ];
    rules.extend(
        BlocklistedImport::all()
            .into_iter()
            .map(|rule| Box::new(rule.severity(Severity::High)) as RuleBox),
    );
    rules
}

fn minimal_rules_with(config: &Config) -> Vec<RuleBox> {
    vec![
        Box::new(InsecureIgnoreHostKey::new()),
        tuned(TlsInsecureConfig::new(), config, TlsInsecureConfig::with_config),
        Box::new(BlocklistedImport::cgi()),
    ]
}

/// Boxes `rule` after applying its configuration section, if there is one.
fn tuned<R: Rule + 'static>(
    rule: R,
    config: &Config,
    apply: fn(R, &RuleConfig) -> R,
) -> RuleBox {
    match config.rule(rule.code(), rule.name()) {
        Some(section) => Box::new(apply(rule, section)),
        None => Box::new(rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_rules() {
        assert!(!Preset::Recommended.rules().is_empty());
        assert!(!Preset::Strict.rules().is_empty());
        assert!(!Preset::Minimal.rules().is_empty());
    }

    #[test]
    fn test_all_rules_have_unique_codes() {
        let rules = all_rules();
        let mut codes: Vec<&str> = rules.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), rules.len());
        assert_eq!(rules.len(), 11);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Strict".parse::<Preset>(), Ok(Preset::Strict));
        assert!("paranoid".parse::<Preset>().is_err());
    }

    #[test]
    fn test_rule_by_id_accepts_code_or_name() {
        let config = Config::default();
        assert_eq!(
            rule_by_id("weak-rand", &config).map(|r| r.code()),
            Some("G404")
        );
        assert_eq!(
            rule_by_id("G504", &config).map(|r| r.name()),
            Some("blocklisted-import-cgi")
        );
        assert!(rule_by_id("G999", &config).is_none());
    }

    #[test]
    fn test_rules_with_applies_options() {
        use secmatch_core::ast::build::{call, ident, selector};
        use secmatch_core::{Context, NodeId, Symbol, SymbolKind, Unit, UnitContext};

        let unit = Unit::new("main.go", "main")
            .with_decl(call(selector(ident(1, "os"), ident(2, "Create")), vec![]))
            .with_uses(
                Context::new().with_use(NodeId(2), Symbol::new("os", "Create", SymbolKind::Func)),
            );
        let ctx = UnitContext::new(&unit, std::path::Path::new("."));
        let count_g307 = |rules: Vec<RuleBox>| {
            rules
                .iter()
                .filter(|r| r.code() == "G307")
                .map(|r| r.check(&ctx, &unit).len())
                .sum::<usize>()
        };

        let config = Config::parse("[rules.G307]\nmode = \"0o600\"\n").expect("config");
        assert_eq!(count_g307(Preset::Recommended.rules()), 0);
        assert_eq!(count_g307(Preset::Recommended.rules_with(&config)), 1);
        assert_eq!(count_g307(Preset::Strict.rules()), 1);
        assert_eq!(count_g307(Preset::Minimal.rules_with(&config)), 0);

        let severity_only = Config::parse("[rules.G307]\nseverity = \"high\"\n").expect("config");
        assert_eq!(count_g307(Preset::Strict.rules_with(&severity_only)), 1);
        assert_eq!(count_g307(Preset::Recommended.rules_with(&severity_only)), 0);
    }

    #[test]
    fn test_rule_by_id_applies_section_options() {
        use secmatch_core::ast::build::{call, ident, selector};
        use secmatch_core::{Context, NodeId, Symbol, SymbolKind, Unit, UnitContext};

        let unit = Unit::new("main.go", "main")
            .with_decl(call(selector(ident(1, "os"), ident(2, "Create")), vec![]))
            .with_uses(
                Context::new().with_use(NodeId(2), Symbol::new("os", "Create", SymbolKind::Func)),
            );
        let ctx = UnitContext::new(&unit, std::path::Path::new("."));

        let config = Config::parse("[rules.os-create-perms]\nmode = \"0600\"\n").expect("config");
        let rule = rule_by_id("G307", &config).expect("G307 exists");
        assert_eq!(rule.check(&ctx, &unit).len(), 1);
    }
}

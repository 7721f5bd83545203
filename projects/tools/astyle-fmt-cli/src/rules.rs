//! Rules files.
//!
//! A rules file maps rule names to the options used for the files each rule includes:
//!
//! ```yaml
//! DEFAULT:
//!     options: "--style=otbs"
//!
//! generated:
//!     include:
//!         - "/gen/"
//!     check: false
//! ```
//!
//! `DEFAULT` supplies the values the other rules start from. For each file the last rule
//! whose `include` patterns match is used, falling back to `DEFAULT`.

use crate::error::CliError;
use crate::patterns::{compile_all, matches_any};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_RULE: &str = "DEFAULT";

/// One rule as written in the file. Missing keys are inherited from `DEFAULT`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleEntry {
    options: Option<String>,
    check: Option<bool>,
    include: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    /// Formatter options, as one string.
    pub options: String,
    /// Files selected by a rule with `check: false` are skipped.
    pub check: bool,
    include: Vec<Regex>,
}

impl Rule {
    fn builtin_default() -> Result<Self, CliError> {
        Ok(Self {
            name: String::from(DEFAULT_RULE),
            options: String::new(),
            check: true,
            include: compile_all(&["*"])?,
        })
    }

    /// Applies `entry` on top of `self`.
    fn derive(&self, name: &str, entry: RuleEntry) -> Result<Self, CliError> {
        Ok(Self {
            name: name.to_owned(),
            options: entry.options.unwrap_or_else(|| self.options.clone()),
            check: entry.check.unwrap_or(self.check),
            include: match entry.include {
                Some(patterns) => compile_all(&patterns)?,
                None => self.include.clone(),
            },
        })
    }

    pub fn includes(&self, path: &Path) -> bool {
        matches_any(path, &self.include)
    }
}

#[derive(Debug, Clone)]
pub struct Rules {
    default: Rule,
    rules: Vec<Rule>,
}

impl Rules {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?;
        let entries: IndexMap<String, serde_yaml::Value> =
            serde_yaml::from_str(&text).map_err(|source| CliError::RulesFile {
                path: path.to_owned(),
                source,
            })?;
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: IndexMap<String, serde_yaml::Value>) -> Result<Self, CliError> {
        let mut default = Rule::builtin_default()?;
        if let Some(entry) = entries.shift_remove(DEFAULT_RULE) {
            default = default.derive(DEFAULT_RULE, parse_entry(DEFAULT_RULE, entry)?)?;
        }

        let rules = entries
            .into_iter()
            .map(|(name, entry)| {
                let entry = parse_entry(&name, entry)?;
                default.derive(&name, entry)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(rules = rules.len(), "loaded rules");
        Ok(Self { default, rules })
    }

    /// The rule deciding how `path` is formatted.
    pub fn select(&self, path: &Path) -> &Rule {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.includes(path))
            .unwrap_or(&self.default)
    }
}

fn parse_entry(name: &str, value: serde_yaml::Value) -> Result<RuleEntry, CliError> {
    if value.is_null() {
        return Ok(RuleEntry::default());
    }
    serde_yaml::from_value(value).map_err(|source| CliError::Rule {
        rule: name.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rules(yaml: &str) -> Result<Rules, CliError> {
        Rules::from_entries(serde_yaml::from_str(yaml).unwrap())
    }

    const RULES: &str = r#"
DEFAULT:
    options: "--opt1 --opt2=foo"
    check: true

rule_1:
    include:
        - "*_b.c"
    options: "--opt3 --opt4=bar"

rule_2:
    include:
        - "/sub/"
    check: false

rule_3:
    include:
        - "/**/sub2/"
    options: "--opt7 --opt8=ffs"
"#;

    #[rstest]
    #[case::default("file_a.c", "DEFAULT", true, "--opt1 --opt2=foo")]
    #[case::own_options("file_b.c", "rule_1", true, "--opt3 --opt4=bar")]
    #[case::skipped("sub/file_c.c", "rule_2", false, "--opt1 --opt2=foo")]
    #[case::last_match_wins("sub/sub2/file_d.c", "rule_3", true, "--opt7 --opt8=ffs")]
    fn selects_last_matching_rule(
        #[case] file: &str,
        #[case] name: &str,
        #[case] check: bool,
        #[case] options: &str,
    ) {
        let rules = rules(RULES).unwrap();
        let rule = rules.select(Path::new(file));
        assert_eq!(rule.name, name);
        assert_eq!(rule.check, check);
        assert_eq!(rule.options, options);
    }

    #[test]
    fn empty_rule_inherits_default() {
        let rules = rules("DEFAULT:\n    check: false\nall:\n").unwrap();
        let rule = rules.select(Path::new("x.c"));
        assert_eq!(rule.name, "all");
        assert!(!rule.check);
    }

    #[rstest]
    #[case::unknown_key("bad:\n    exclude: [\"*.c\"]\n")]
    #[case::options_not_string("bad:\n    options: [\"--a\"]\n")]
    #[case::check_not_bool("bad:\n    check: \"yes\"\n")]
    #[case::include_not_list("bad:\n    include: 5\n")]
    fn invalid_rules_name_the_rule(#[case] yaml: &str) {
        let error = rules(yaml).unwrap_err();
        assert!(matches!(&error, CliError::Rule { rule, .. } if rule == "bad"));
        assert!(error.to_string().starts_with("Invalid rule bad: "));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let error = rules("bad:\n    include: [\"/a/**\"]\n").unwrap_err();
        assert!(matches!(error, CliError::InvalidPattern(pattern) if pattern == "/a/**"));
    }
}

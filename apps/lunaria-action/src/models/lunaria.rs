//! Lunaria configuration as emitted by the status engine, scoped to the
//! fields this action reads.
//!
//! The engine prints the user's full configuration; unknown keys are
//! ignored on deserialization so only these fields are kept:
//! - `repository.rootDir`: prefix stripped from PR filenames before matching.
//! - `defaultLocale` / `locales`: source and translated languages.
//! - `files`: tracked file rules (`location`, `ignore`, `pattern`).
//! - `ignoreKeywords`: PR title keywords that mark the PR as untracked.
//! - `dashboard.basesToHide`: prefixes hidden from displayed paths.

use crate::error::{ActionError, Result};
use crate::pattern::PathResolver;
use serde::Deserialize;
use serde_json::Value as Json;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Scoped Lunaria configuration.
pub struct LunariaConfig {
    pub repository: RepositoryCfg,
    pub default_locale: Locale,
    pub locales: Vec<Locale>,
    pub files: Vec<FileConfig>,
    #[serde(default = "default_ignore_keywords")]
    pub ignore_keywords: Vec<String>,
    #[serde(default)]
    pub dashboard: DashboardCfg,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryCfg {
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Locale {
    pub lang: String,
}

#[derive(Debug, Clone, Deserialize)]
/// A tracked file rule.
pub struct FileConfig {
    /// Glob selecting candidate files.
    pub location: String,
    /// Globs excluded from `location`.
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Path template with `@lang` / `@path` placeholders.
    pub pattern: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCfg {
    #[serde(default)]
    pub bases_to_hide: Option<Vec<String>>,
}

fn default_ignore_keywords() -> Vec<String> {
    vec!["lunaria-ignore".to_string(), "fix typo".to_string()]
}

fn default_root_dir() -> String {
    ".".to_string()
}

impl LunariaConfig {
    /// Languages of every configured locale, default first.
    pub fn langs(&self) -> Vec<&str> {
        std::iter::once(self.default_locale.lang.as_str())
            .chain(self.locales.iter().map(|l| l.lang.as_str()))
            .collect()
    }

    /// Collect schema violations; empty when the config is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.files.is_empty() {
            problems.push("`files` must contain at least one entry".to_string());
        }
        let langs = self.langs();
        for (i, f) in self.files.iter().enumerate() {
            if let Err(e) = glob::Pattern::new(&f.location) {
                problems.push(format!("`files[{}].location` is not a valid glob: {}", i, e));
            }
            for (j, ig) in f.ignore.iter().enumerate() {
                if let Err(e) = glob::Pattern::new(ig) {
                    problems.push(format!(
                        "`files[{}].ignore[{}]` is not a valid glob: {}",
                        i, j, e
                    ));
                }
            }
            if let Err(e) = PathResolver::new(&f.pattern, &langs) {
                problems.push(format!("`files[{}].pattern`: {}", i, e));
            }
        }
        if self.default_locale.lang.trim().is_empty() {
            problems.push("`defaultLocale.lang` must not be empty".to_string());
        }
        if self.locales.is_empty() {
            problems.push("`locales` must contain at least one entry".to_string());
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, l) in self.locales.iter().enumerate() {
            if l.lang.trim().is_empty() {
                problems.push(format!("`locales[{}].lang` must not be empty", i));
            } else if l.lang == self.default_locale.lang {
                problems.push(format!(
                    "`locales[{}].lang` duplicates the default locale `{}`",
                    i, l.lang
                ));
            } else if !seen.insert(l.lang.as_str()) {
                problems.push(format!("`locales[{}].lang` `{}` is declared twice", i, l.lang));
            }
        }
        problems
    }
}

/// Deserialize and validate the engine's user config.
///
/// Both serde failures and schema violations surface as
/// `ActionError::InvalidConfig` with one problem per line.
pub fn parse_scoped_config(user_config: Json) -> Result<LunariaConfig> {
    let cfg: LunariaConfig = serde_json::from_value(user_config)
        .map_err(|e| ActionError::InvalidConfig(format!("- {}", e)))?;
    let problems = cfg.validate();
    if !problems.is_empty() {
        let lines: Vec<String> = problems.into_iter().map(|p| format!("- {}", p)).collect();
        return Err(ActionError::InvalidConfig(lines.join("\n")));
    }
    Ok(cfg)
}

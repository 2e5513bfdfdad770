use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::finder;
use crate::rules::Action;

/// Well-known config file, read from the working directory.
pub const CONFIG_FILE_NAME: &str = "go-license-auditor.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output format (text, csv, json, markdown, spdx)
    pub format: Option<String>,

    /// Classifier confidence threshold in [0, 1]
    #[serde(rename = "confidence-threshold")]
    pub confidence_threshold: Option<f64>,

    /// Git remotes to try for license URLs, in order
    #[serde(rename = "git-remotes")]
    pub git_remotes: Option<Vec<String>>,

    /// License patterns that are permitted (allow action)
    #[serde(default)]
    pub permit: Vec<String>,

    /// License patterns that are forbidden (deny action)
    #[serde(default)]
    pub forbid: Vec<String>,

    /// Library names excluded from rule evaluation
    #[serde(default, rename = "ignore-packages")]
    pub ignore_packages: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: None,
            confidence_threshold: Some(finder::DEFAULT_CONFIDENCE_THRESHOLD),
            git_remotes: None,
            permit: vec![],
            forbid: vec![],
            ignore_packages: vec![],
        }
    }
}

impl Config {
    /// Rule input is mutually exclusive: a policy is an allow-list or a
    /// deny-list, never both.
    pub fn validate(&self) -> Result<()> {
        if !self.permit.is_empty() && !self.forbid.is_empty() {
            bail!("'permit' and 'forbid' options are mutually exclusive");
        }
        if let Some(threshold) = self.confidence_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                bail!("'confidence-threshold' must be within [0, 1], got {threshold}");
            }
        }
        Ok(())
    }

    /// The configured rule action, if any rules are configured at all.
    pub fn action(&self) -> Option<Action> {
        if !self.permit.is_empty() {
            Some(Action::Allow)
        } else if !self.forbid.is_empty() {
            Some(Action::Deny)
        } else {
            None
        }
    }

    pub fn patterns(&self) -> &[String] {
        if !self.permit.is_empty() {
            &self.permit
        } else {
            &self.forbid
        }
    }

    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
            .unwrap_or(finder::DEFAULT_CONFIDENCE_THRESHOLD)
    }

    pub fn git_remotes(&self) -> Vec<String> {
        self.git_remotes.clone().unwrap_or_else(|| {
            finder::DEFAULT_GIT_REMOTES
                .iter()
                .map(|s| s.to_string())
                .collect()
        })
    }
}

/// Load configuration from the working directory. A missing file is not an
/// error; the defaults apply.
pub fn load_config() -> Result<Config> {
    let path = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE_NAME);

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.action(), None);
        assert_eq!(config.confidence_threshold(), 0.9);
        assert_eq!(config.git_remotes(), vec!["origin", "upstream"]);
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
format = "json"
confidence-threshold = 0.8
git-remotes = ["origin"]
permit = ["MIT", "BSD.*"]
ignore-packages = ["github.com/org/legacy"]
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.action(), Some(Action::Allow));
        assert_eq!(config.patterns(), &["MIT".to_string(), "BSD.*".to_string()]);
        assert_eq!(config.confidence_threshold(), 0.8);
        assert_eq!(config.git_remotes(), vec!["origin"]);
        assert_eq!(config.ignore_packages, vec!["github.com/org/legacy"]);
    }

    #[test]
    fn test_forbid_selects_deny_action() {
        let config: Config = toml::from_str("forbid = [\"GPL.*\"]").unwrap();
        assert_eq!(config.action(), Some(Action::Deny));
        assert_eq!(config.patterns(), &["GPL.*".to_string()]);
    }

    #[test]
    fn test_permit_and_forbid_are_mutually_exclusive() {
        let config: Config =
            toml::from_str("permit = [\"MIT\"]\nforbid = [\"GPL.*\"]").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let config: Config = toml::from_str("confidence-threshold = 1.5").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<Config>("nonsense = true").is_err());
    }
}

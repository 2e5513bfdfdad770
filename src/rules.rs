//! License policy rules.
//!
//! One configured policy: an allow-list or a deny-list of license-name
//! patterns, plus a set of library names ignored unconditionally. The
//! action is a tagged variant so "both allow and deny" cannot be
//! represented; the mutual-exclusion check lives in config validation.

use std::collections::HashSet;

use regex::Regex;

use crate::finder::LicenseResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Allow,
    Deny,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("invalid license pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

#[derive(Debug)]
enum Policy {
    /// Pass iff the license matches at least one pattern.
    Allow(Vec<Regex>),
    /// Pass iff the license matches none of the patterns.
    Deny(Vec<Regex>),
}

#[derive(Debug)]
pub struct Rules {
    policy: Policy,
    ignore: HashSet<String>,
}

/// Outcome of one evaluation. Violations keep the input order of the
/// results they came from.
#[derive(Debug)]
pub struct Evaluation {
    pub passed: bool,
    pub violations: Vec<LicenseResult>,
}

impl Rules {
    /// Compile a rule set. An empty pattern list is valid (it allows
    /// nothing or denies nothing); an invalid regex is not.
    pub fn new<I, S>(action: Action, patterns: &[String], ignore: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let compiled = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| RuleError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let policy = match action {
            Action::Allow => Policy::Allow(compiled),
            Action::Deny => Policy::Deny(compiled),
        };

        Ok(Self {
            policy,
            ignore: ignore.into_iter().map(Into::into).collect(),
        })
    }

    /// Evaluate results against the policy. Ignored libraries count toward
    /// neither pass nor violation; an empty input always passes.
    pub fn evaluate(&self, results: &[LicenseResult]) -> Evaluation {
        let mut violations = Vec::new();

        for result in results {
            if self.ignore.contains(&result.library) {
                continue;
            }
            // A missing license name matches as the empty string.
            let license = result.license.as_deref().unwrap_or("");
            let matched = self.patterns().iter().any(|p| p.is_match(license));
            let passed = match self.policy {
                Policy::Allow(_) => matched,
                Policy::Deny(_) => !matched,
            };
            if !passed {
                violations.push(result.clone());
            }
        }

        Evaluation {
            passed: violations.is_empty(),
            violations,
        }
    }

    fn patterns(&self) -> &[Regex] {
        match &self.policy {
            Policy::Allow(p) | Policy::Deny(p) => p,
        }
    }
}

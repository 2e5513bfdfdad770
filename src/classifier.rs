//! License text classifier.
//!
//! A phrase-fingerprint scorer behind a two-call contract: construct once
//! per scan with a confidence threshold and the corpus bytes, then
//! `identify` license files. Confidence is the fraction of a license's
//! corpus phrases found in the candidate text; a best match below the
//! threshold is reported as unclassified, never as a low-confidence guess.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The corpus shipped inside the binary.
pub fn embedded_corpus() -> &'static [u8] {
    include_bytes!("../assets/license-corpus.toml")
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("confidence threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("unable to load license corpus: {0}")]
    Corpus(#[from] toml::de::Error),

    #[error("license corpus contains no entries")]
    EmptyCorpus,

    #[error("unable to read license file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("no license matched {path} with confidence >= {threshold} (best: {best} at {score:.2})")]
    Unclassified {
        path: String,
        threshold: f64,
        best: String,
        score: f64,
    },
}

/// License category, following the taxonomy the classifier corpus uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LicenseCategory {
    Forbidden,
    Restricted,
    Reciprocal,
    Notice,
    Permissive,
    Unencumbered,
    #[default]
    Unknown,
}

impl fmt::Display for LicenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forbidden => "forbidden",
            Self::Restricted => "restricted",
            Self::Reciprocal => "reciprocal",
            Self::Notice => "notice",
            Self::Permissive => "permissive",
            Self::Unencumbered => "unencumbered",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Deserialize)]
struct Corpus {
    #[serde(rename = "license")]
    licenses: Vec<Fingerprint>,
}

#[derive(Debug, Deserialize)]
struct Fingerprint {
    name: String,
    category: LicenseCategory,
    phrases: Vec<String>,
}

/// Built once per scan, read-only afterwards. Safe to share across
/// classification threads.
#[derive(Debug)]
pub struct Classifier {
    threshold: f64,
    corpus: Vec<Fingerprint>,
}

impl Classifier {
    pub fn new(threshold: f64, corpus_bytes: &[u8]) -> Result<Self, ClassifierError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ClassifierError::InvalidThreshold(threshold));
        }

        let raw = String::from_utf8_lossy(corpus_bytes);
        let corpus: Corpus = toml::from_str(&raw)?;
        if corpus.licenses.is_empty() {
            return Err(ClassifierError::EmptyCorpus);
        }

        Ok(Self {
            threshold,
            corpus: corpus.licenses,
        })
    }

    /// Classify the license file at `path`. Returns the license name and
    /// its category; an unreadable file or a sub-threshold match is an
    /// error the caller may downgrade.
    pub fn identify(&self, path: &Path) -> Result<(String, LicenseCategory), ClassifierError> {
        let text = std::fs::read_to_string(path).map_err(|source| ClassifierError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        self.identify_text(&text, path)
    }

    fn identify_text(
        &self,
        text: &str,
        path: &Path,
    ) -> Result<(String, LicenseCategory), ClassifierError> {
        let haystack = normalize(text);

        let mut best: Option<(&Fingerprint, f64)> = None;
        for entry in &self.corpus {
            let hits = entry
                .phrases
                .iter()
                .filter(|p| haystack.contains(p.as_str()))
                .count();
            let score = hits as f64 / entry.phrases.len() as f64;
            // Strictly greater keeps the earlier entry on ties, which is
            // how the corpus disambiguates license families.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }

        match best {
            Some((entry, score)) if score >= self.threshold => {
                Ok((entry.name.clone(), entry.category))
            }
            Some((entry, score)) => Err(ClassifierError::Unclassified {
                path: path.display().to_string(),
                threshold: self.threshold,
                best: entry.name.clone(),
                score,
            }),
            None => Err(ClassifierError::EmptyCorpus),
        }
    }
}

/// Lowercase and collapse all whitespace runs so phrase matching survives
/// line wrapping.
fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

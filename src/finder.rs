//! The license finder: package graph in, stream of per-library results out.
//!
//! `find` performs the fatal setup work (classifier construction, graph
//! load) up front, then hands back a channel fed by a producer thread.
//! Per-library failures are downgraded to record-level annotations; the
//! stream always carries exactly one record per library.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::{self, Classifier, ClassifierError, LicenseCategory};
use crate::graph::{GraphError, PackageGraph};
use crate::library::{self, Library};
use crate::locator::LicenseCache;
use crate::vcs;

pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.9;
pub const DEFAULT_GIT_REMOTES: &[&str] = &["origin", "upstream"];

#[derive(Debug, thiserror::Error)]
pub enum FindError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// One record per library. `errors` aggregates the non-fatal failures hit
/// while resolving this library; empty means a clean record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseResult {
    pub library: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(rename = "type")]
    pub category: LicenseCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Finds licenses in a Go project's dependencies.
#[derive(Debug, Clone)]
pub struct LicenseFinder {
    pub paths: Vec<String>,
    pub git_remotes: Vec<String>,
    pub confidence_threshold: f64,
}

impl LicenseFinder {
    pub fn new(paths: Vec<String>, git_remotes: Vec<String>, confidence_threshold: f64) -> Self {
        Self {
            paths,
            git_remotes,
            confidence_threshold,
        }
    }

    /// Scan and stream discovered results. Setup failures (classifier,
    /// graph load) abort here; everything later degrades per record.
    pub fn find(&self) -> Result<Receiver<LicenseResult>, FindError> {
        let classifier = Arc::new(Classifier::new(
            self.confidence_threshold,
            classifier::embedded_corpus(),
        )?);
        let graph = PackageGraph::load(&self.paths, Path::new("."))?;
        Ok(scan(graph, classifier, self.git_remotes.clone()))
    }
}

/// Stream one `LicenseResult` per library over a channel. Classification
/// of independent libraries runs in parallel; arrival order is
/// unspecified. A dropped receiver abandons the producer.
pub fn scan(
    graph: PackageGraph,
    classifier: Arc<Classifier>,
    remotes: Vec<String>,
) -> Receiver<LicenseResult> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut cache = LicenseCache::new();
        let libs = library::libraries(&graph, &mut cache);

        let results: Vec<LicenseResult> = libs
            .par_iter()
            .map(|lib| resolve_library(lib, &classifier, &remotes))
            .collect();

        for result in results {
            if tx.send(result).is_err() {
                break;
            }
        }
    });

    rx
}

fn resolve_library(lib: &Library, classifier: &Classifier, remotes: &[String]) -> LicenseResult {
    let mut errors = Vec::new();
    let mut url = None;
    let mut license = None;
    let mut category = LicenseCategory::Unknown;

    if let Some(path) = &lib.license_path {
        match vcs::resolve_license_url(lib, path, remotes) {
            Ok(resolved) => url = Some(resolved),
            Err(err) => errors.push(format!(
                "failed to locate license URL ({}): {}",
                path.display(),
                err
            )),
        }

        match classifier.identify(path) {
            Ok((name, cat)) => {
                license = Some(name);
                category = cat;
            }
            Err(err) => errors.push(format!(
                "failed to identify license ({}): {}",
                path.display(),
                err
            )),
        }
    }

    LicenseResult {
        library: unvendor(&lib.name()).to_string(),
        url,
        path: lib.license_path.clone(),
        license,
        category,
        errors,
    }
}

/// Strip the `*/vendor/` prefix from an import path for reporting clarity.
pub fn unvendor(import_path: &str) -> &str {
    match import_path.split_once("/vendor/") {
        Some((_, vendored)) => vendored,
        None => import_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::test_fixtures::MIT_TEXT;
    use crate::graph::PackageNode;
    use crate::rules::{Action, Rules};
    use std::fs;

    fn node(path: &str, dir: Option<&Path>, standard: bool) -> PackageNode {
        PackageNode {
            import_path: path.to_string(),
            dir: dir.map(|d| d.to_path_buf()),
            standard,
            imports: vec![],
        }
    }

    fn classifier() -> Arc<Classifier> {
        Arc::new(Classifier::new(DEFAULT_CONFIDENCE_THRESHOLD, classifier::embedded_corpus()).unwrap())
    }

    #[test]
    fn test_unvendor() {
        assert_eq!(
            unvendor("host/app/vendor/github.com/org/lib"),
            "github.com/org/lib"
        );
        assert_eq!(unvendor("github.com/org/lib"), "github.com/org/lib");
    }

    #[test]
    fn test_shared_license_yields_one_mit_result() {
        let root = tempfile::tempdir().unwrap();
        let repo = root.path().join("repo");
        let a = repo.join("pkga");
        let b = repo.join("pkgb");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(repo.join("LICENSE"), MIT_TEXT).unwrap();

        let graph = PackageGraph::from_nodes(
            vec![
                node("github.com/org/repo/pkga", Some(&a), false),
                node("github.com/org/repo/pkgb", Some(&b), false),
            ],
            vec![],
        );

        let results: Vec<LicenseResult> =
            scan(graph, classifier(), vec!["origin".to_string()]).into_iter().collect();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].library, "github.com/org/repo");
        assert_eq!(results[0].license.as_deref(), Some("MIT"));
        assert_eq!(results[0].category, LicenseCategory::Notice);
        // Name-derived URL: the tempdir is not a git working tree.
        assert_eq!(
            results[0].url.as_deref(),
            Some("https://github.com/org/repo/blob/master/LICENSE")
        );
        assert!(results[0].errors.is_empty());
    }

    #[test]
    fn test_missing_license_record_and_rule_outcomes() {
        let root = tempfile::tempdir().unwrap();
        let pkg = root.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();

        let graph = PackageGraph::from_nodes(
            vec![node("example.com/org/bare", Some(&pkg), false)],
            vec![],
        );

        let results: Vec<LicenseResult> =
            scan(graph, classifier(), vec![]).into_iter().collect();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].license, None);
        assert_eq!(results[0].path, None);

        let patterns = vec!["MIT.*".to_string()];
        let allow = Rules::new(Action::Allow, &patterns, Vec::<String>::new()).unwrap();
        let eval = allow.evaluate(&results);
        assert!(!eval.passed);
        assert_eq!(eval.violations.len(), 1);

        let deny = Rules::new(Action::Deny, &patterns, Vec::<String>::new()).unwrap();
        assert!(deny.evaluate(&results).passed);
    }

    #[test]
    fn test_unclassifiable_license_degrades_to_record_error() {
        let root = tempfile::tempdir().unwrap();
        let repo = root.path().join("repo");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join("LICENSE"), "bespoke terms, call legal").unwrap();

        let graph = PackageGraph::from_nodes(
            vec![node("example.org/org/custom", Some(&repo), false)],
            vec![],
        );

        let results: Vec<LicenseResult> =
            scan(graph, classifier(), vec![]).into_iter().collect();

        // The record survives with empty fields plus the failure messages.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].license, None);
        assert_eq!(results[0].url, None);
        assert_eq!(results[0].errors.len(), 2);
        assert!(results[0].errors.iter().any(|e| e.contains("identify")));
        assert!(results[0].errors.iter().any(|e| e.contains("license URL")));
    }

    #[test]
    fn test_standard_library_never_reaches_results() {
        let graph = PackageGraph::from_nodes(
            vec![node("fmt", None, true), node("os", None, true)],
            vec![],
        );

        let results: Vec<LicenseResult> =
            scan(graph, classifier(), vec![]).into_iter().collect();
        assert!(results.is_empty());
    }
}

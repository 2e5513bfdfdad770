//! Library aggregation.
//!
//! A library is the set of packages covered by one license file. Packages
//! with no covering license each form their own singleton library, so every
//! package in a scan belongs to exactly one library.

use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::warn;

use crate::graph::PackageGraph;
use crate::locator::LicenseCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// Path of the covering license file. `None` means no license found.
    pub license_path: Option<PathBuf>,
    /// Import paths of the member packages.
    pub packages: Vec<String>,
}

impl Library {
    /// Canonical name: the longest common `/`-delimited prefix of the
    /// member import paths. A single-member library's name is that member
    /// verbatim.
    pub fn name(&self) -> String {
        let name = common_ancestor(&self.packages);
        if name.is_empty() && !self.packages.is_empty() {
            // Members were grouped by one license file yet share no path
            // segment. Surface it; the empty name is still emitted.
            warn!(
                "library for {:?} has no common import path prefix: {:?}",
                self.license_path, self.packages
            );
        }
        name
    }
}

/// Group every non-standard-library package in the graph into libraries.
/// Failure to locate a license for a package degrades that package to a
/// no-license singleton; it never aborts the scan.
pub fn libraries(graph: &PackageGraph, cache: &mut LicenseCache) -> Vec<Library> {
    let mut by_license: IndexMap<PathBuf, Vec<String>> = IndexMap::new();
    let mut unlicensed: Vec<String> = Vec::new();

    for pkg in graph.packages() {
        if pkg.standard {
            continue;
        }
        let located = pkg.dir.as_deref().and_then(|dir| cache.find(dir));
        match located {
            Some(path) => by_license.entry(path).or_default().push(pkg.import_path.clone()),
            None => unlicensed.push(pkg.import_path.clone()),
        }
    }

    let mut out: Vec<Library> = by_license
        .into_iter()
        .map(|(license_path, packages)| Library {
            license_path: Some(license_path),
            packages,
        })
        .collect();

    // No-license packages are never merged with each other.
    out.extend(unlicensed.into_iter().map(|pkg| Library {
        license_path: None,
        packages: vec![pkg],
    }));

    out
}

/// Longest common `/`-prefix of a set of paths. Sorting lets the two
/// lexicographic extremes stand in for the whole set.
fn common_ancestor(paths: &[String]) -> String {
    match paths {
        [] => return String::new(),
        [only] => return only.clone(),
        _ => {}
    }

    let mut sorted: Vec<&str> = paths.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let (min, max) = (sorted[0], sorted[sorted.len() - 1]);

    let min_bytes = min.as_bytes();
    let max_bytes = max.as_bytes();
    let mut last_slash = 0;
    for i in 0..min_bytes.len().min(max_bytes.len()) {
        if min_bytes[i] != max_bytes[i] {
            return min[..last_slash].to_string();
        }
        if min_bytes[i] == b'/' {
            last_slash = i;
        }
    }
    min.to_string()
}

//! Package graph provider.
//!
//! Shells out to the Go toolchain: one `go list -json` invocation to pin
//! down the root packages for the given patterns, one `go list -deps -json`
//! invocation for the transitive closure. Both emit a stream of
//! concatenated JSON objects which serde parses incrementally.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::str;

use indexmap::IndexMap;
use serde::Deserialize;

const GO_COMMAND: &str = "go";
const GO_LIST_ARGS: &[&str] = &["list", "-json=ImportPath,Dir,Standard,Imports"];
const GO_LIST_DEPS_ARGS: &[&str] = &["list", "-deps", "-json=ImportPath,Dir,Standard,Imports"];

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("go list failed for {patterns:?}: {stderr}")]
    Loader { patterns: Vec<String>, stderr: String },

    #[error("invalid go list output: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("go list returned no packages for {patterns:?}")]
    Empty { patterns: Vec<String> },
}

/// One package as reported by the loader. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageNode {
    #[serde(rename = "ImportPath")]
    pub import_path: String,

    /// Source directory. Absent for packages the toolchain cannot place on
    /// disk (synthesized or vendored-without-source packages).
    #[serde(rename = "Dir", default)]
    pub dir: Option<PathBuf>,

    /// Part of the standard distribution. Carries no license obligation.
    #[serde(rename = "Standard", default)]
    pub standard: bool,

    /// Direct dependency edges, in declared import order.
    #[serde(rename = "Imports", default)]
    pub imports: Vec<String>,
}

/// The transitive package graph for one scan.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    packages: IndexMap<String, PackageNode>,
    roots: Vec<String>,
}

impl PackageGraph {
    /// Build a graph directly from nodes. The test seam, and the entry
    /// point for callers that obtain packages some other way.
    pub fn from_nodes(nodes: Vec<PackageNode>, roots: Vec<String>) -> Self {
        let packages = nodes
            .into_iter()
            .map(|n| (n.import_path.clone(), n))
            .collect();
        Self { packages, roots }
    }

    /// Load the transitive dependency graph for the given `go list`
    /// patterns, resolved relative to `project_dir`.
    pub fn load(patterns: &[String], project_dir: &Path) -> Result<Self, GraphError> {
        let roots = run_go_list(GO_LIST_ARGS, patterns, project_dir)?;
        let all = run_go_list(GO_LIST_DEPS_ARGS, patterns, project_dir)?;

        if all.is_empty() {
            return Err(GraphError::Empty {
                patterns: patterns.to_vec(),
            });
        }

        let root_paths = roots.into_iter().map(|p| p.import_path).collect();
        Ok(Self::from_nodes(all, root_paths))
    }

    pub fn get(&self, import_path: &str) -> Option<&PackageNode> {
        self.packages.get(import_path)
    }

    /// All packages in load order.
    pub fn packages(&self) -> impl Iterator<Item = &PackageNode> {
        self.packages.values()
    }

    /// Import paths of the packages the scan was rooted at.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

fn run_go_list(
    args: &[&str],
    patterns: &[String],
    project_dir: &Path,
) -> Result<Vec<PackageNode>, GraphError> {
    let output = Command::new(GO_COMMAND)
        .args(args)
        .args(patterns)
        .current_dir(project_dir)
        .output()
        .map_err(|source| GraphError::Spawn {
            command: format!("{} {}", GO_COMMAND, args.join(" ")),
            source,
        })?;

    if !output.status.success() {
        let stderr = str::from_utf8(&output.stderr)
            .unwrap_or("unknown error")
            .trim()
            .to_string();
        return Err(GraphError::Loader {
            patterns: patterns.to_vec(),
            stderr,
        });
    }

    // go list emits one JSON object per package, back to back.
    let mut nodes = Vec::new();
    let stream = serde_json::Deserializer::from_slice(&output.stdout);
    for node in stream.into_iter::<PackageNode>() {
        nodes.push(node?);
    }
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn node(path: &str, dir: Option<&str>, standard: bool, imports: &[&str]) -> PackageNode {
        PackageNode {
            import_path: path.to_string(),
            dir: dir.map(PathBuf::from),
            standard,
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_nodes_preserves_order_and_roots() {
        let graph = PackageGraph::from_nodes(
            vec![
                node("example.com/a", None, false, &["example.com/b"]),
                node("example.com/b", None, false, &[]),
            ],
            vec!["example.com/a".to_string()],
        );

        let paths: Vec<&str> = graph.packages().map(|p| p.import_path.as_str()).collect();
        assert_eq!(paths, vec!["example.com/a", "example.com/b"]);
        assert_eq!(graph.roots(), &["example.com/a".to_string()]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_parse_go_list_stream() {
        let stdout = br#"
{
    "ImportPath": "example.com/mod/pkg",
    "Dir": "/home/dev/mod/pkg",
    "Imports": ["fmt", "example.com/mod/util"]
}
{
    "ImportPath": "fmt",
    "Standard": true
}
"#;
        let stream = serde_json::Deserializer::from_slice(stdout.as_slice());
        let nodes: Vec<PackageNode> = stream
            .into_iter::<PackageNode>()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].import_path, "example.com/mod/pkg");
        assert_eq!(nodes[0].dir.as_deref(), Some(Path::new("/home/dev/mod/pkg")));
        assert!(!nodes[0].standard);
        assert_eq!(nodes[0].imports, vec!["fmt", "example.com/mod/util"]);
        assert!(nodes[1].standard);
        assert!(nodes[1].dir.is_none());
        assert!(nodes[1].imports.is_empty());
    }

    #[test]
    fn test_load_reports_missing_toolchain_or_bad_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let result = PackageGraph::load(&["./definitely-missing/...".to_string()], dir.path());
        // Either the toolchain is absent (Spawn) or go list rejects the
        // pattern (Loader); both are fatal setup errors, never a panic.
        assert!(result.is_err());
    }
}

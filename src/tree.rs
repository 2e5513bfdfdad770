//! Dependency tree construction and rendering.
//!
//! Nodes live in an arena and are addressed by index; a per-build memo
//! maps import path to index and is populated *before* a node's children
//! are visited, so a cycle back to an in-progress node resolves to the
//! same index instead of recursing forever. The resulting structure is a
//! DAG; renderers track their own visitation and mark repeats as cycles.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::path::PathBuf;

use serde_json::{json, Value};

use crate::classifier::Classifier;
use crate::graph::PackageGraph;
use crate::locator::LicenseCache;

/// One package in the tree. Children are arena indices in declared import
/// order; standard-library packages are pruned and never appear.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub path: String,
    pub license: Option<String>,
    pub license_path: Option<PathBuf>,
    pub dependencies: Vec<usize>,
}

#[derive(Debug)]
pub struct DependencyTree {
    nodes: Vec<DependencyNode>,
    roots: Vec<usize>,
}

/// Builds one tree per scan. Memoization is per builder: two separate
/// builds never share node identity, even for identical import paths.
pub struct TreeBuilder<'a> {
    graph: &'a PackageGraph,
    classifier: &'a Classifier,
    cache: LicenseCache,
    nodes: Vec<DependencyNode>,
    index: HashMap<String, usize>,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(graph: &'a PackageGraph, classifier: &'a Classifier) -> Self {
        Self {
            graph,
            classifier,
            cache: LicenseCache::new(),
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build the tree rooted at the graph's root packages.
    pub fn build(mut self) -> DependencyTree {
        let root_paths: Vec<String> = self.graph.roots().to_vec();
        let roots = root_paths
            .iter()
            .filter_map(|path| self.visit(path))
            .collect();
        DependencyTree {
            nodes: self.nodes,
            roots,
        }
    }

    fn visit(&mut self, import_path: &str) -> Option<usize> {
        if let Some(&existing) = self.index.get(import_path) {
            // Already built, or currently building (cycle).
            return Some(existing);
        }

        let graph = self.graph;
        let pkg = graph.get(import_path)?;
        if pkg.standard {
            return None;
        }

        let idx = self.nodes.len();
        self.nodes.push(DependencyNode {
            path: pkg.import_path.clone(),
            license: None,
            license_path: None,
            dependencies: Vec::new(),
        });
        // Register before descending so self-reference resolves here.
        self.index.insert(pkg.import_path.clone(), idx);

        // Best-effort license annotation; failure leaves the fields empty.
        if let Some(dir) = pkg.dir.as_deref() {
            if let Some(license_path) = self.cache.find(dir) {
                if let Ok((name, _)) = self.classifier.identify(&license_path) {
                    self.nodes[idx].license = Some(name);
                }
                self.nodes[idx].license_path = Some(license_path);
            }
        }

        let children: Vec<usize> = pkg
            .imports
            .iter()
            .filter_map(|import| self.visit(import))
            .collect();
        self.nodes[idx].dependencies = children;
        Some(idx)
    }
}

impl DependencyTree {
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, idx: usize) -> &DependencyNode {
        &self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// ASCII rendering. A node already printed anywhere in this render is
    /// marked as a cycle instead of being re-expanded.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        let mut visited = HashSet::new();
        for &root in &self.roots {
            self.render_node(root, "", "", &mut visited, &mut out);
        }
        out
    }

    fn render_node(
        &self,
        idx: usize,
        connector: &str,
        child_prefix: &str,
        visited: &mut HashSet<usize>,
        out: &mut String,
    ) {
        let node = &self.nodes[idx];
        if !visited.insert(idx) {
            let _ = writeln!(out, "{connector}{} ... (cycle)", node.path);
            return;
        }

        let annotation = match (&node.license, &node.license_path) {
            (Some(license), _) => format!(" (License: {license})"),
            (None, Some(path)) => format!(" (License Path: {})", path.display()),
            (None, None) => String::new(),
        };
        let _ = writeln!(out, "{connector}{}{annotation}", node.path);

        let count = node.dependencies.len();
        for (i, &child) in node.dependencies.iter().enumerate() {
            let last = i + 1 == count;
            let (branch, continuation) = if last {
                ("└── ", "    ")
            } else {
                ("├── ", "│   ")
            };
            self.render_node(
                child,
                &format!("{child_prefix}{branch}"),
                &format!("{child_prefix}{continuation}"),
                visited,
                out,
            );
        }
    }

    /// JSON rendering with the same repeat-marking rule as the ASCII one.
    pub fn to_json(&self) -> Value {
        let mut visited = HashSet::new();
        Value::Array(
            self.roots
                .iter()
                .map(|&root| self.node_value(root, &mut visited))
                .collect(),
        )
    }

    fn node_value(&self, idx: usize, visited: &mut HashSet<usize>) -> Value {
        let node = &self.nodes[idx];
        if !visited.insert(idx) {
            return json!({ "path": node.path, "cycle": true });
        }

        let mut obj = serde_json::Map::new();
        obj.insert("path".to_string(), json!(node.path));
        if let Some(license) = &node.license {
            obj.insert("license".to_string(), json!(license));
        }
        if let Some(path) = &node.license_path {
            obj.insert("licensePath".to_string(), json!(path.display().to_string()));
        }
        if !node.dependencies.is_empty() {
            let deps: Vec<Value> = node
                .dependencies
                .iter()
                .map(|&child| self.node_value(child, visited))
                .collect();
            obj.insert("dependencies".to_string(), Value::Array(deps));
        }
        Value::Object(obj)
    }
}

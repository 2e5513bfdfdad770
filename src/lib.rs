pub mod classifier;
pub mod cli;
pub mod config;
pub mod finder;
pub mod graph;
pub mod library;
pub mod locator;
pub mod logging;
pub mod presenter;
pub mod rules;
pub mod tree;
pub mod vcs;

// Re-export main types for easy access
pub use classifier::{Classifier, LicenseCategory};
pub use finder::{LicenseFinder, LicenseResult};
pub use graph::{PackageGraph, PackageNode};
pub use library::Library;
pub use rules::{Action, Evaluation, Rules};
pub use tree::{DependencyNode, DependencyTree, TreeBuilder};

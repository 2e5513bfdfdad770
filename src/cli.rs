use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use crate::presenter::Format;

#[derive(Parser)]
#[command(name = "go-license-auditor")]
#[command(about = "Attribute and police the licenses of a Go project's dependencies")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all discovered licenses for a project (including dependencies)
    List {
        /// Package patterns to scan (default: ./...)
        paths: Vec<String>,

        /// Output format
        #[arg(short, long)]
        format: Option<Format>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Remote git repositories to try, in order
        #[arg(long = "git-remote")]
        git_remotes: Vec<String>,
    },
    /// Ensure only permitted licenses are used
    Check {
        /// Package patterns to scan (default: ./...)
        paths: Vec<String>,

        /// Output format for violations
        #[arg(short, long)]
        format: Option<Format>,

        /// Pattern a license must match to pass (repeatable)
        #[arg(long = "allow")]
        allow: Vec<String>,

        /// Pattern no license may match (repeatable)
        #[arg(long = "deny")]
        deny: Vec<String>,

        /// Library name to exclude from evaluation (repeatable)
        #[arg(long = "ignore")]
        ignore: Vec<String>,

        /// Remote git repositories to try, in order
        #[arg(long = "git-remote")]
        git_remotes: Vec<String>,

        /// Exit with code 0 even on violations
        #[arg(long)]
        exit_zero: bool,
    },
    /// Display the dependency tree with licenses
    Tree {
        /// Package patterns to scan (default: ./...)
        paths: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "ascii")]
        format: TreeFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeFormat {
    Ascii,
    Json,
}

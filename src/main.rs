use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;

use go_license_auditor::cli::{Cli, Commands, Format, TreeFormat};
use go_license_auditor::classifier::{embedded_corpus, Classifier};
use go_license_auditor::config::{load_config, Config};
use go_license_auditor::finder::{LicenseFinder, LicenseResult};
use go_license_auditor::graph::PackageGraph;
use go_license_auditor::logging::{self, Verbosity};
use go_license_auditor::presenter;
use go_license_auditor::rules::{Action, Rules};
use go_license_auditor::tree::TreeBuilder;

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        Commands::List {
            paths,
            format,
            output,
            git_remotes,
        } => handle_list(paths, format, output, git_remotes),
        Commands::Check {
            paths,
            format,
            allow,
            deny,
            ignore,
            git_remotes,
            exit_zero,
        } => handle_check(paths, format, allow, deny, ignore, git_remotes, exit_zero),
        Commands::Tree { paths, format } => handle_tree(paths, format),
    };

    if let Err(err) = result {
        eprintln!("{}", format!("{err:#}").red().bold());
        std::process::exit(1);
    }
}

fn handle_list(
    paths: Vec<String>,
    format: Option<Format>,
    output: Option<PathBuf>,
    git_remotes: Vec<String>,
) -> Result<()> {
    let config = load_config()?;
    let format = resolve_format(format, &config)?;

    let finder = LicenseFinder::new(
        scan_paths(paths),
        pick(git_remotes, config.git_remotes()),
        config.confidence_threshold(),
    );
    let results = finder.find()?;

    match output {
        Some(path) => {
            let mut file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            presenter::present(format, results, &mut file)?;
        }
        None => {
            presenter::present(format, results, &mut std::io::stdout().lock())?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_check(
    paths: Vec<String>,
    format: Option<Format>,
    allow: Vec<String>,
    deny: Vec<String>,
    ignore: Vec<String>,
    git_remotes: Vec<String>,
    exit_zero: bool,
) -> Result<()> {
    let config = load_config()?;
    let format = resolve_format(format, &config)?;
    let rules = build_rules(&config, allow, deny, ignore)?;

    let finder = LicenseFinder::new(
        scan_paths(paths),
        pick(git_remotes, config.git_remotes()),
        config.confidence_threshold(),
    );
    // Drain the whole stream before evaluating; the producer must never be
    // left blocked on a half-read channel.
    let results: Vec<LicenseResult> = finder.find()?.into_iter().collect();
    info!("collected {} license results", results.len());

    let evaluation = rules.evaluate(&results);
    if evaluation.passed {
        println!("{}", "Passed!".green().bold());
        return Ok(());
    }

    let count = evaluation.violations.len();
    presenter::present(format, evaluation.violations, &mut std::io::stdout().lock())?;
    if exit_zero {
        eprintln!("{}", format!("{count} license violations (ignored)").yellow());
        return Ok(());
    }
    eprintln!("{}", format!("license check failed: {count} violations").red().bold());
    std::process::exit(1);
}

fn handle_tree(paths: Vec<String>, format: TreeFormat) -> Result<()> {
    let config = load_config()?;
    let classifier = Classifier::new(config.confidence_threshold(), embedded_corpus())?;
    let graph = PackageGraph::load(&scan_paths(paths), Path::new("."))?;
    let tree = TreeBuilder::new(&graph, &classifier).build();

    match format {
        TreeFormat::Ascii => print!("{}", tree.render_ascii()),
        TreeFormat::Json => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &tree.to_json())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// CLI rules win over the config file; either way an action must emerge.
fn build_rules(
    config: &Config,
    allow: Vec<String>,
    deny: Vec<String>,
    ignore: Vec<String>,
) -> Result<Rules> {
    if !allow.is_empty() && !deny.is_empty() {
        bail!("--allow and --deny are mutually exclusive");
    }

    let (action, patterns) = if !allow.is_empty() {
        (Action::Allow, allow)
    } else if !deny.is_empty() {
        (Action::Deny, deny)
    } else {
        match config.action() {
            Some(action) => (action, config.patterns().to_vec()),
            None => bail!("no rules configured: set --allow/--deny or permit/forbid in the config"),
        }
    };

    match action {
        Action::Allow => info!("allow rules: {patterns:?}"),
        Action::Deny => info!("deny rules: {patterns:?}"),
    }

    let ignore = pick(ignore, config.ignore_packages.clone());
    Ok(Rules::new(action, &patterns, ignore)?)
}

fn resolve_format(cli: Option<Format>, config: &Config) -> Result<Format> {
    if let Some(format) = cli {
        return Ok(format);
    }
    match config.format.as_deref() {
        Some(name) => <Format as clap::ValueEnum>::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("bad output format {name:?} in config")),
        None => Ok(Format::Text),
    }
}

fn scan_paths(paths: Vec<String>) -> Vec<String> {
    if paths.is_empty() {
        vec!["./...".to_string()]
    } else {
        paths
    }
}

fn pick(cli: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if cli.is_empty() {
        fallback
    } else {
        cli
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tree_interval::config::{load_from_path, Settings};
use tree_interval::resolve::{ExecutionPositionResolver, FsSourceLoader, Probe};
use tree_interval::statement::{self, Markers};
use tree_interval::{NodeId, PatternLocator, SyntaxInfo, SyntaxTreeBuilder, TreeIndex};

#[derive(Parser)]
#[command(name = "tree-interval")]
#[command(about = "Interval-indexed syntax trees for Python source", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the tree for a file and print it as JSON
    Tree {
        file: PathBuf,

        /// Print JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Print the node best matching a byte range
    Match {
        file: PathBuf,
        start: usize,
        end: usize,
    },

    /// Resolve an execution point to the node running there
    Locate {
        file: PathBuf,
        line: usize,

        /// Byte column on the line (defaults to the first non-blank character)
        #[arg(long)]
        column: Option<usize>,
    },

    /// Print the nodes matching an ast-grep pattern
    Find { file: PathBuf, pattern: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config {
        Some(path) => load_from_path(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Tree { file, compact } => cmd_tree(&settings, &file, compact),
        Commands::Match { file, start, end } => cmd_match(&settings, &file, start, end),
        Commands::Locate { file, line, column } => cmd_locate(settings, &file, line, column),
        Commands::Find { file, pattern } => cmd_find(&settings, &file, &pattern),
    }
}

/// Initialize tracing subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn build_tree(settings: &Settings, file: &Path) -> Result<TreeIndex<SyntaxInfo>> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let tree = SyntaxTreeBuilder::new(file.display().to_string(), source)
        .with_settings(settings)
        .build()
        .with_context(|| format!("failed to build tree for {}", file.display()))?;
    Ok(tree)
}

fn cmd_tree(settings: &Settings, file: &Path, compact: bool) -> Result<()> {
    let tree = build_tree(settings, file)?;
    let json = if compact {
        tree.to_json()?
    } else {
        tree.to_json_pretty()?
    };
    println!("{json}");
    Ok(())
}

fn cmd_match(settings: &Settings, file: &Path, start: usize, end: usize) -> Result<()> {
    if start > end {
        anyhow::bail!("start {start} is after end {end}");
    }
    let tree = build_tree(settings, file)?;
    match tree.find_best_match(start, end) {
        Some(id) => print_node(&tree, id),
        None => println!("{}", "no node".yellow()),
    }
    Ok(())
}

fn cmd_locate(settings: Settings, file: &Path, line: usize, column: Option<usize>) -> Result<()> {
    let mut resolver =
        ExecutionPositionResolver::with_loader(FsSourceLoader::new()).with_settings(settings);
    let mut probe = Probe::new(file.display().to_string(), line);
    probe.column = column;

    let Some(hit) = resolver.resolve(&probe)? else {
        println!("{}", "no node".yellow());
        return Ok(());
    };

    print_node(&hit.tree, hit.node);
    if statement::is_set(&hit.tree, hit.node) {
        println!("  {}", "assignment target".cyan());
    }
    if let Some(stmt) = hit.statement() {
        println!();
        println!("{}", stmt.as_text(Markers::default()));
    }
    Ok(())
}

fn cmd_find(settings: &Settings, file: &Path, pattern: &str) -> Result<()> {
    let tree = build_tree(settings, file)?;
    let source = tree
        .root_node()
        .map(|root| root.info().text.clone())
        .unwrap_or_default();
    let nodes = PatternLocator::new(&source).locate(&tree, pattern)?;

    if nodes.is_empty() {
        println!("{}", "no matches".yellow());
        return Ok(());
    }
    for &id in &nodes {
        print_node(&tree, id);
    }
    println!("\n{} {}", "Matches:".bold(), nodes.len());
    Ok(())
}

fn print_node(tree: &TreeIndex<SyntaxInfo>, id: NodeId) {
    let node = &tree[id];
    let info = node.info();
    let field = info
        .field
        .as_deref()
        .map(|field| format!(" ({field})"))
        .unwrap_or_default();
    println!(
        "{} {}{} {}",
        "✓".green(),
        info.kind.bold(),
        field.dimmed(),
        node.position().to_string().cyan()
    );
    if !info.description().is_empty() {
        println!("  {}", info.description().dimmed());
    }
    for line in info.text.lines() {
        println!("    {line}");
    }
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dirscope_capability::FsDirectory;
use dirscope_search::search_index;
use dirscope_snapshot::{BuildStats, DirectoryNode, NodeKind, Snapshot, SnapshotBuilder};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dirscope")]
#[command(about = "Directory snapshots and content search", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a snapshot of a directory and print its tree
    Scan {
        /// Directory to snapshot
        path: PathBuf,

        /// Emit the tree and build stats as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build a snapshot and search file names and contents
    Search {
        /// Directory to snapshot
        path: PathBuf,

        /// Substring to look for (case-insensitive)
        query: String,

        /// Emit matching paths as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Scan { path, json } => {
            let (snapshot, stats) = build(&path).await?;
            if json {
                let payload = json!({
                    "generation": snapshot.generation,
                    "root": snapshot.root,
                    "stats": stats,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", render_tree(&snapshot.root));
                print_stats(&stats);
            }
        }
        Commands::Search { path, query, json } => {
            let (snapshot, _) = build(&path).await?;
            let paths = search_index(&snapshot.index, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&json!({ "paths": paths }))?);
            } else if paths.is_empty() {
                println!("no matches for {query:?}");
            } else {
                for path in paths {
                    println!("{path}");
                }
            }
        }
    }

    Ok(())
}

async fn build(path: &PathBuf) -> Result<(Snapshot, BuildStats)> {
    let root = FsDirectory::open_root(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))?;
    SnapshotBuilder::build_with_stats(&root, 1)
        .await
        .context("snapshot build failed")
}

fn render_tree(node: &DirectoryNode) -> String {
    let mut out = String::new();
    render_node(node, 0, &mut out);
    out
}

fn render_node(node: &DirectoryNode, depth: usize, out: &mut String) {
    use std::fmt::Write;

    let indent = "  ".repeat(depth);
    match node.kind {
        NodeKind::Directory => {
            let _ = writeln!(out, "{indent}{}/", node.name);
            if let Some(children) = &node.children {
                for child in children {
                    render_node(child, depth + 1, out);
                }
            }
        }
        NodeKind::File => {
            let size = node
                .size
                .map(|s| format!(" ({:.1} KB)", s as f64 / 1024.0))
                .unwrap_or_default();
            let _ = writeln!(out, "{indent}{}{size}", node.name);
        }
    }
}

fn print_stats(stats: &BuildStats) {
    println!(
        "\n{} files, {} directories in {}ms ({} degraded, {} unreadable)",
        stats.files,
        stats.directories,
        stats.duration_ms,
        stats.degraded_dirs,
        stats.unreadable_files
    );
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

//! kms - A knowledge explorer for native and synced folders, with TUI.
//!
//! Usage:
//!   kms                      Launch interactive TUI
//!   kms tree                 Print the folder tree
//!   kms ls [FOLDER_ID]       List a folder, filtered and sorted
//!   kms --help               Show help

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use humansize::{BINARY, format_size};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use kms_core::{
    Element, ElementId, ElementStore, ExplorerConfig, SortConfig, SortDirection, SortKey,
    filter_and_sort,
};
use kms_explorer::{FolderRow, FolderTree, NavigationContext, NodeState};
use kms_ops::{KnowledgeBackend, MemoryBackend, SharedBackend};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "KMS_LOG";

#[derive(Parser)]
#[command(
    name = "kms",
    version,
    about = "Explore a knowledge base of files, links and folders",
    long_about = "kms browses a knowledge base of uploaded files, crawled links and \
                  folders, native or synced from a provider.\n\n\
                  Launch the interactive TUI by running `kms`, or use subcommands \
                  for quick listings."
)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Root crumb label for the native store
    #[arg(long)]
    root_label: Option<String>,

    /// Reuse folder listings younger than this many seconds (0 = always refetch)
    #[arg(long)]
    cache_ttl: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct SourceArgs {
    /// JSON file with the knowledge base (defaults to a built-in sample)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the folder tree (folders only)
    Tree {
        /// Maximum depth to expand
        #[arg(short = 'D', long, default_value = "3")]
        depth: usize,
    },

    /// List a folder's elements
    Ls {
        /// Folder to list (defaults to the root)
        folder: Option<u64>,

        /// Keep elements whose name contains this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Column to sort by
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = ExplorerConfig::load();
    if let Some(label) = cli.root_label {
        config.native_root_label = label;
    }
    if let Some(ttl) = cli.cache_ttl {
        config.cache_ttl_secs = ttl;
    }

    match cli.command {
        Some(Command::Tree { depth }) => {
            init_stderr_logging();
            let backend = load_backend(cli.source.data.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_tree(backend.as_ref(), &config, depth));
        }
        Some(Command::Ls {
            folder,
            search,
            sort,
            desc,
            format,
        }) => {
            init_stderr_logging();
            let backend = load_backend(cli.source.data.as_deref())?;
            let direction = if desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            let sort = sort
                .map(|key| SortConfig::by(key, direction))
                .unwrap_or_default();
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_ls(
                backend.as_ref(),
                folder.map(ElementId::new),
                &search,
                &sort,
                format,
            ))?;
        }
        None => {
            // Keep the guard alive so buffered log lines are flushed on exit
            let _guard = init_file_logging();
            let backend = load_backend(cli.source.data.as_deref())?;
            kms_tui::run(backend, config)?;
        }
    }

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr for one-shot subcommands.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a file while the TUI owns the terminal.
fn init_file_logging() -> Option<WorkerGuard> {
    let dir = dirs::cache_dir()?.join("kms-explorer");
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::never(dir, "kms.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn load_backend(data: Option<&Path>) -> Result<SharedBackend> {
    let backend = match data {
        Some(path) => MemoryBackend::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load knowledge base {}", path.display()))?,
        None => MemoryBackend::sample(),
    };
    Ok(Arc::new(backend))
}

/// Print the folder tree down to `max_depth`.
async fn run_tree(backend: &dyn KnowledgeBackend, config: &ExplorerConfig, max_depth: usize) {
    let mut store = ElementStore::new();
    let mut tree = FolderTree::new(config);
    let ctx = NavigationContext::mounted();

    tree.load_root_with(&mut store, backend).await;
    for depth in 0..max_depth {
        let pending: Vec<ElementId> = tree
            .visible_rows(&store, &ctx)
            .into_iter()
            .filter(|row| row.depth == depth && row.state == NodeState::Collapsed)
            .map(|row| row.id)
            .collect();
        for id in pending {
            tree.expand_with(&mut store, backend, id).await;
        }
    }

    println!("{}", config.native_root_label);
    for row in tree.visible_rows(&store, &ctx) {
        println!("{}", tree_line(&row, &tree, &store));
    }

    if let Some(error) = tree.node(None).and_then(|root| root.error()) {
        eprintln!("{error}");
    }
}

fn tree_line(row: &FolderRow, tree: &FolderTree, store: &ElementStore) -> String {
    let mut line = String::new();
    for &parent_is_last in &row.parent_last_siblings {
        line.push_str(if parent_is_last { "    " } else { "│   " });
    }
    line.push_str(if row.is_last_sibling { "└── " } else { "├── " });
    line.push_str(&row.label);

    let source = store.get(row.id).map(|e| &e.source);
    if let Some(source) = source.filter(|s| !s.is_local()) {
        line.push_str(&format!(" [{source}]"));
    }
    match row.state {
        NodeState::Loaded if row.is_empty => line.push_str(" (empty)"),
        NodeState::Failed => {
            let reason = tree
                .node(Some(row.id))
                .and_then(|node| node.error())
                .map(|e| e.to_string())
                .unwrap_or_default();
            line.push_str(&format!(" (failed: {reason})"));
        }
        _ => {}
    }
    line
}

/// List one folder through the table's filter and sort.
async fn run_ls(
    backend: &dyn KnowledgeBackend,
    folder: Option<ElementId>,
    search: &str,
    sort: &SortConfig,
    format: OutputFormat,
) -> Result<()> {
    let listing = backend.list_children(folder).await.wrap_err_with(|| match folder {
        Some(id) => format!("Failed to list folder {id}"),
        None => "Failed to list the root".to_string(),
    })?;
    let elements = filter_and_sort(listing.iter(), search, sort);

    match format {
        OutputFormat::Text => {
            println!("{}", "─".repeat(70));
            for element in &elements {
                println!("{}", ls_line(element));
            }
            println!("{}", "─".repeat(70));
            println!(" {} of {} element(s)", elements.len(), listing.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&elements)?);
        }
    }

    Ok(())
}

fn ls_line(element: &Element) -> String {
    let mut name = element.display_name().to_string();
    if element.is_folder {
        name.push('/');
    }
    let size = element
        .file_size
        .map(|bytes| format_size(bytes, BINARY))
        .unwrap_or_else(|| "-".to_string());
    format!(
        " {:>4}  {:<40} {:<12} {:>10}",
        element.id.to_string(),
        name,
        element.status.as_ref(),
        size
    )
}

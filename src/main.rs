//! codemind: CLI over the Core facade -- index a workspace, search it, and
//! run the navigation queries (lookup, refs, outline, trace, explore)
//! against its indexed state.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use codemind::core::{Core, WorkspaceAction, WorkspaceActionOutcome};
use codemind::query::{ExploreMode, ExploreParams, OutlineMode, TraceDirection};
use codemind::search::{SearchFilters, SearchMethod, SearchOptions};
use codemind::workspace::registry::WorkspaceType;
use codemind::RelationshipKind;

#[derive(Parser)]
#[command(name = "codemind")]
#[command(about = "Local code intelligence engine for AI coding agents", long_about = None)]
#[command(version)]
struct Cli {
    /// Workspace root. Defaults to the current directory.
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Optional log file path; without it, only warnings go to stderr.
    #[arg(short, long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the workspace and bring the store, vector index, and search
    /// index up to date with what's on disk.
    Index {
        /// Extra ignore glob patterns, on top of .gitignore and built-ins.
        #[arg(short, long)]
        ignore: Vec<String>,
    },
    /// Hybrid/text/pattern/semantic search over indexed symbols.
    Search {
        query: String,
        #[arg(short, long, value_enum)]
        method: Option<CliSearchMethod>,
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        rerank: bool,
        #[arg(long)]
        expand: bool,
    },
    /// Resolve symbol names to their definitions.
    Lookup {
        symbols: Vec<String>,
        #[arg(short, long)]
        context_file: Option<String>,
    },
    /// Find references to a symbol.
    Refs {
        symbol: String,
        #[arg(short, long, value_enum)]
        kind: Option<CliRelationshipKind>,
        #[arg(long)]
        context: bool,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Outline a file's symbol tree.
    Outline {
        file: String,
        #[arg(short, long, value_enum, default_value_t = CliOutlineMode::Structure)]
        mode: CliOutlineMode,
        #[arg(short = 'd', long, default_value_t = 3)]
        max_depth: usize,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Trace a call path from (or to) a symbol across language boundaries.
    Trace {
        symbol: String,
        #[arg(short, long, value_enum, default_value_t = CliTraceDirection::Downstream)]
        direction: CliTraceDirection,
        #[arg(short = 'd', long, default_value_t = 5)]
        max_depth: usize,
        #[arg(short, long)]
        context_file: Option<String>,
    },
    /// Whole-workspace questions: dead code, reference hot spots, and
    /// reachability/semantic neighborhoods.
    Explore {
        #[arg(value_enum)]
        mode: CliExploreMode,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
    /// Register, unregister, list, or sweep workspaces in the cross-project
    /// registry.
    Workspace {
        #[command(subcommand)]
        action: WorkspaceSubcommand,
    },
}

#[derive(Subcommand)]
enum WorkspaceSubcommand {
    Register {
        path: String,
        #[arg(long, default_value_t = false)]
        reference: bool,
    },
    Unregister {
        workspace_id: String,
    },
    List,
    CleanExpired,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliSearchMethod {
    Text,
    Pattern,
    Semantic,
    Hybrid,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliRelationshipKind {
    Calls,
    Extends,
    Implements,
    Uses,
    Returns,
    Parameter,
    Imports,
    Instantiates,
    References,
    Defines,
    Overrides,
    Contains,
    Joins,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliOutlineMode {
    Minimal,
    Structure,
    Full,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliTraceDirection {
    Upstream,
    Downstream,
    Both,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliExploreMode {
    DeadCode,
    HotSpots,
    Types,
    Similar,
    Deps,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_ref())?;

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let core = Core::open(root).await?;

    match cli.command {
        Commands::Index { ignore } => {
            let stats = core.index_workspace(&ignore).await?;
            println!("{stats:#?}");
        }
        Commands::Search {
            query,
            method,
            limit,
            kind,
            language,
            rerank,
            expand,
        } => {
            let mut opts = SearchOptions::new(limit);
            opts.method = method.map(Into::into);
            opts.filters = SearchFilters {
                kind,
                language,
                file_path_prefix: None,
            };
            opts.rerank = rerank;
            opts.expand = expand;
            let hits = core.search(&query, opts).await?;
            for hit in hits {
                println!("{:>6.3} {} {} ({}:{})", hit.score, hit.kind, hit.name, hit.file_path, hit.start_line);
            }
        }
        Commands::Lookup { symbols, context_file } => {
            let results = core.lookup(&symbols, context_file.as_deref()).await?;
            for result in results {
                println!("{:?}", result);
            }
        }
        Commands::Refs { symbol, kind, context, limit } => {
            let groups = core.find_refs(&symbol, kind.map(Into::into), context, limit).await?;
            for group in groups {
                println!("{}: {} reference(s)", group.file_path, group.hits.len());
                for hit in group.hits {
                    println!("  {}:{} ({:?})", hit.file_path, hit.line_number, hit.kind);
                }
            }
        }
        Commands::Outline { file, mode, max_depth, target, limit } => {
            let nodes = core
                .get_symbols(&file, mode.into(), max_depth, target.as_deref(), limit)
                .await?;
            print_outline(&nodes, 0);
        }
        Commands::Trace { symbol, direction, max_depth, context_file } => {
            let result = core
                .trace(&symbol, direction.into(), max_depth, context_file.as_deref())
                .await?;
            print_trace(&result.root, 0);
            if result.truncated {
                eprintln!("(truncated at node budget)");
            }
        }
        Commands::Explore { mode, target, limit } => {
            let params = ExploreParams {
                target,
                limit,
                workspace_id: "primary".to_string(),
            };
            let results = core.explore(mode.into(), params).await?;
            for result in results {
                println!("{:>6.3} {} ({})", result.score, result.symbol.name, result.symbol.file_path);
            }
        }
        Commands::Workspace { action } => {
            let action = match action {
                WorkspaceSubcommand::Register { path, reference } => WorkspaceAction::Register {
                    path,
                    workspace_type: if reference {
                        WorkspaceType::Reference
                    } else {
                        WorkspaceType::Primary
                    },
                },
                WorkspaceSubcommand::Unregister { workspace_id } => WorkspaceAction::Unregister { workspace_id },
                WorkspaceSubcommand::List => WorkspaceAction::List,
                WorkspaceSubcommand::CleanExpired => WorkspaceAction::CleanExpired,
            };
            match core.manage_workspace(action).await? {
                WorkspaceActionOutcome::Registered(entry) => println!("Registered: {} ({})", entry.display_name, entry.id),
                WorkspaceActionOutcome::Unregistered(removed) => println!("Removed: {removed}"),
                WorkspaceActionOutcome::Listed(entries) => {
                    for entry in entries {
                        println!("{} {} {:?}", entry.id, entry.original_path, entry.status);
                    }
                }
                WorkspaceActionOutcome::Cleaned(ids) => println!("Cleaned {} expired workspace(s)", ids.len()),
            }
        }
    }

    Ok(())
}

fn print_outline(nodes: &[codemind::query::OutlineNode], depth: usize) {
    for node in nodes {
        println!("{}{:?} {} ({}:{})", "  ".repeat(depth), node.kind, node.name, node.start_line, node.end_line);
        print_outline(&node.children, depth + 1);
    }
}

fn print_trace(node: &codemind::query::TraceNode, depth: usize) {
    println!(
        "{}{} [{:?}, conf {:.2}]",
        "  ".repeat(depth),
        node.symbol.name,
        node.edge,
        node.confidence
    );
    for child in &node.children {
        print_trace(child, depth + 1);
    }
}

/// Initialize tracing with optional file output; warn+ always goes to stderr.
fn init_logging(log_path: Option<&PathBuf>) -> Result<()> {
    use tracing_subscriber::fmt::writer::MakeWriterExt;

    if let Some(log_file) = log_path {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

        let file_appender = tracing_appender::rolling::never(
            log_file.parent().unwrap_or_else(|| std::path::Path::new(".")),
            log_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("codemind.log"),
        );

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(file_appender.and(std::io::stderr.with_max_level(tracing::Level::WARN)))
            .init();
    } else {
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

impl From<CliSearchMethod> for SearchMethod {
    fn from(value: CliSearchMethod) -> Self {
        match value {
            CliSearchMethod::Text => SearchMethod::Text,
            CliSearchMethod::Pattern => SearchMethod::Pattern,
            CliSearchMethod::Semantic => SearchMethod::Semantic,
            CliSearchMethod::Hybrid => SearchMethod::Hybrid,
        }
    }
}

impl From<CliRelationshipKind> for RelationshipKind {
    fn from(value: CliRelationshipKind) -> Self {
        match value {
            CliRelationshipKind::Calls => RelationshipKind::Calls,
            CliRelationshipKind::Extends => RelationshipKind::Extends,
            CliRelationshipKind::Implements => RelationshipKind::Implements,
            CliRelationshipKind::Uses => RelationshipKind::Uses,
            CliRelationshipKind::Returns => RelationshipKind::Returns,
            CliRelationshipKind::Parameter => RelationshipKind::Parameter,
            CliRelationshipKind::Imports => RelationshipKind::Imports,
            CliRelationshipKind::Instantiates => RelationshipKind::Instantiates,
            CliRelationshipKind::References => RelationshipKind::References,
            CliRelationshipKind::Defines => RelationshipKind::Defines,
            CliRelationshipKind::Overrides => RelationshipKind::Overrides,
            CliRelationshipKind::Contains => RelationshipKind::Contains,
            CliRelationshipKind::Joins => RelationshipKind::Joins,
        }
    }
}

impl From<CliOutlineMode> for OutlineMode {
    fn from(value: CliOutlineMode) -> Self {
        match value {
            CliOutlineMode::Minimal => OutlineMode::Minimal,
            CliOutlineMode::Structure => OutlineMode::Structure,
            CliOutlineMode::Full => OutlineMode::Full,
        }
    }
}

impl From<CliTraceDirection> for TraceDirection {
    fn from(value: CliTraceDirection) -> Self {
        match value {
            CliTraceDirection::Upstream => TraceDirection::Upstream,
            CliTraceDirection::Downstream => TraceDirection::Downstream,
            CliTraceDirection::Both => TraceDirection::Both,
        }
    }
}

impl From<CliExploreMode> for ExploreMode {
    fn from(value: CliExploreMode) -> Self {
        match value {
            CliExploreMode::DeadCode => ExploreMode::DeadCode,
            CliExploreMode::HotSpots => ExploreMode::HotSpots,
            CliExploreMode::Types => ExploreMode::Types,
            CliExploreMode::Similar => ExploreMode::Similar,
            CliExploreMode::Deps => ExploreMode::Deps,
        }
    }
}

//! Thin CLI over the lineage engine library: load a taxonomy and an
//! instance-data graph once, run a single `traverse` or `one-hop` query,
//! print the JSON response, exit. No server loop, no persistence —
//! grounded in the teacher's `src/bin/rfdb_server.rs` /
//! `src/bin/memory_profile.rs` pattern of small, single-purpose binaries
//! built on the library crate.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use lineage_engine::engine::{
    CancellationToken, EngineConfig, OneHopQuery, TraversalEngine, TraversalRequest,
};
use lineage_engine::model::{XDirectionFilter, YDirectionFilter, ZDirectionFilter};
use lineage_engine::{loader, Axis, MemoryGraph, TaxonomyCatalogue};

#[derive(Parser, Debug)]
#[command(name = "lineage-cli", about = "Run a single lineage-graph traversal query")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Full multi-axis BFS traversal from a start node.
    Traverse {
        #[arg(long)]
        taxonomy: PathBuf,
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long, value_delimiter = ',', default_values_t = vec![AxisArg::X, AxisArg::Y, AxisArg::Z])]
        axes: Vec<AxisArg>,
        #[arg(long, value_enum, default_value_t = DirArg::Both)]
        x_direction: DirArg,
        #[arg(long, value_enum, default_value_t = DirArg::Both)]
        y_direction: DirArg,
        #[arg(long, value_enum, default_value_t = DirArg::Both)]
        z_direction: DirArg,
        #[arg(long, default_value_t = 1)]
        max_z_hops: usize,
        #[arg(long)]
        max_depth: Option<usize>,
        #[arg(long, default_value_t = true)]
        include_transformers: bool,
        #[arg(long, default_value_t = 10_000)]
        node_cap: usize,
    },
    /// Immediate neighbors of a node, bucketed by axis and direction.
    OneHop {
        #[arg(long)]
        taxonomy: PathBuf,
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        start: String,
        #[arg(long, value_delimiter = ',', default_values_t = vec![AxisArg::X, AxisArg::Y, AxisArg::Z])]
        axes: Vec<AxisArg>,
        #[arg(long, value_enum, default_value_t = DirArg::Both)]
        z_direction: DirArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
}

impl From<AxisArg> for Axis {
    fn from(a: AxisArg) -> Self {
        match a {
            AxisArg::X => Axis::X,
            AxisArg::Y => Axis::Y,
            AxisArg::Z => Axis::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DirArg {
    Both,
    Upstream,
    Downstream,
    Up,
    Down,
    Outgoing,
    Incoming,
}

impl From<DirArg> for XDirectionFilter {
    fn from(d: DirArg) -> Self {
        match d {
            DirArg::Upstream => XDirectionFilter::Upstream,
            DirArg::Downstream => XDirectionFilter::Downstream,
            _ => XDirectionFilter::Both,
        }
    }
}

impl From<DirArg> for YDirectionFilter {
    fn from(d: DirArg) -> Self {
        match d {
            DirArg::Up => YDirectionFilter::Up,
            DirArg::Down => YDirectionFilter::Down,
            _ => YDirectionFilter::Both,
        }
    }
}

impl From<DirArg> for ZDirectionFilter {
    fn from(d: DirArg) -> Self {
        match d {
            DirArg::Outgoing => ZDirectionFilter::Outgoing,
            DirArg::Incoming => ZDirectionFilter::Incoming,
            _ => ZDirectionFilter::Both,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// The graph file carries its own embedded schema under a top-level
/// `schema:` key alongside `data:`, keeping the CLI to a two-file
/// invocation (`--taxonomy`, `--graph`) rather than three.
fn load_engine(
    taxonomy_path: &PathBuf,
    graph_path: &PathBuf,
    node_cap: usize,
) -> anyhow::Result<TraversalEngine<MemoryGraph>> {
    let taxonomy = Arc::new(TaxonomyCatalogue::load(taxonomy_path)?);

    let graph_yaml = fs::read_to_string(graph_path)?;
    let combined: serde_yaml::Value = serde_yaml::from_str(&graph_yaml)?;
    let schema_yaml = serde_yaml::to_string(
        combined
            .get("schema")
            .ok_or_else(|| anyhow::anyhow!("graph file missing top-level 'schema' key"))?,
    )?;
    let data_yaml = serde_yaml::to_string(
        combined
            .get("data")
            .ok_or_else(|| anyhow::anyhow!("graph file missing top-level 'data' key"))?,
    )?;

    let graph = loader::load_into_memory(&schema_yaml, &data_yaml)?;
    Ok(TraversalEngine::new(graph, taxonomy, EngineConfig { node_cap }))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Traverse {
            taxonomy,
            graph,
            start,
            axes,
            x_direction,
            y_direction,
            z_direction,
            max_z_hops,
            max_depth,
            include_transformers,
            node_cap,
        } => {
            let engine = load_engine(&taxonomy, &graph, node_cap)?;
            let req = TraversalRequest {
                start_node_id: start,
                axes: axes.into_iter().map(Axis::from).collect(),
                x_direction: x_direction.into(),
                y_direction: y_direction.into(),
                z_direction: z_direction.into(),
                max_z_hops,
                max_depth,
                include_transformers,
            };

            let response = engine.traverse(&req, &CancellationToken::new())?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::OneHop {
            taxonomy,
            graph,
            start,
            axes,
            z_direction,
        } => {
            let engine = load_engine(&taxonomy, &graph, EngineConfig::default().node_cap)?;
            let query = OneHopQuery {
                start_node_id: start,
                axes: axes.into_iter().map(Axis::from).collect(),
                z_direction: z_direction.into(),
            };
            let response = engine.one_hop(&query)?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use road_network_graph::application::build_network;
use road_network_graph::domain::{CoordinatePrecision, NetworkConfig};
use road_network_graph::infrastructure::{
    load_geometries, save_data, save_edge_table, save_split_failures, AppData,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Build a weighted road graph from JSONL road geometries")]
struct Args {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long, help = "Binary graph output")]
    output: PathBuf,
    #[arg(short, long, help = "CSV edge table output")]
    edges: Option<PathBuf>,
    #[arg(long, help = "JSONL output for segments that failed to split")]
    failures: Option<PathBuf>,
    #[arg(long, help = "Projected CRS of the input, overrides the declared one")]
    crs: Option<String>,
    #[arg(long, help = "Round coordinates to this many decimals when matching nodes")]
    decimals: Option<u32>,
    #[arg(long, default_value_t = 1e-9, help = "Max distance from a split point to its line")]
    split_tolerance: f64,
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = NetworkConfig {
        precision: args
            .decimals
            .map_or(CoordinatePrecision::Exact, CoordinatePrecision::Decimals),
        split_tolerance: args.split_tolerance,
    };

    let source = load_geometries(&args.input)?;
    info!("Read {} geometries from {:?}", source.geometries.len(), args.input);

    let network = build_network(&source, args.crs.as_deref(), &config)?;

    if let Some(path) = &args.edges {
        save_edge_table(&network.edge_table(), path)?;
        info!("Edge table saved to {:?}", path);
    }
    if let Some(path) = &args.failures {
        save_split_failures(&network.split_failures, path)?;
        info!("Split failures saved to {:?}", path);
    }

    let topology = network.graph.topological_database();
    let data = AppData {
        crs: network.crs,
        graph: network.graph,
        topology,
        stats: network.stats,
    };
    save_data(&data, &args.output)?;
    println!(
        "Number of Nodes: {}, Number of Edges: {}",
        data.graph.node_count(),
        data.graph.edge_count()
    );
    Ok(())
}

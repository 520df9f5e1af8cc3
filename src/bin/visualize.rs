use anyhow::{anyhow, Result};
use clap::Parser;
use plotters::prelude::*;
use road_network_graph::infrastructure::{load_data, AppData};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Render a preprocessed road graph")]
struct Args {
    #[arg(short, long)]
    input: PathBuf,
    #[arg(short, long, default_value = "network.png", help = "Output image filename")]
    output: PathBuf,
    #[arg(long, default_value_t = 1600)]
    width: u32,
    #[arg(long, default_value_t = 1200)]
    height: u32,
    #[arg(long, default_value_t = 1, help = "Node marker radius in pixels, 0 hides nodes")]
    node_size: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let data = load_data(&args.input)?;
    println!(
        "Loaded graph in {} with {} nodes and {} edges",
        data.crs,
        data.graph.node_count(),
        data.graph.edge_count()
    );

    draw_network(&data, &args.output, (args.width, args.height), args.node_size)?;
    println!("Network map saved to: {:?}", args.output);
    Ok(())
}

fn draw_network(data: &AppData, output_path: &Path, size: (u32, u32), node_size: u32) -> Result<()> {
    let graph = &data.graph.graph;
    if graph.node_count() == 0 {
        return Err(anyhow!("Graph has no nodes to draw"));
    }

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for node in graph.node_weights() {
        min_x = min_x.min(node.x);
        max_x = max_x.max(node.x);
        min_y = min_y.min(node.y);
        max_y = max_y.max(node.y);
    }

    let padding = ((max_x - min_x).max(max_y - min_y) * 0.02).max(1.0);
    min_x -= padding;
    max_x += padding;
    min_y -= padding;
    max_y += padding;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Road Network ({})", data.crs), ("sans-serif", 30))
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(min_x..max_x, min_y..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Easting")
        .y_desc("Northing")
        .draw()?;

    chart.draw_series(graph.edge_indices().filter_map(|e_idx| {
        let (u, v) = graph.edge_endpoints(e_idx)?;
        let (node_u, node_v) = (&graph[u], &graph[v]);
        Some(PathElement::new(
            vec![(node_u.x, node_u.y), (node_v.x, node_v.y)],
            RGBColor(60, 60, 60),
        ))
    }))?;

    if node_size > 0 {
        chart.draw_series(
            graph
                .node_weights()
                .map(|n| Circle::new((n.x, n.y), node_size, BLUE.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

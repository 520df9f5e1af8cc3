use anyhow::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::domain::{EdgeRow, PipelineStats, RoadGraph, SplitFailure, TopologicalDatabase};

#[derive(serde::Serialize, serde::Deserialize)]
pub struct AppData {
    pub crs: String,
    pub graph: RoadGraph,
    pub topology: TopologicalDatabase,
    pub stats: PipelineStats,
}

#[derive(serde::Serialize)]
struct FailureRow {
    segment_id: u64,
    polyline: Vec<[f64; 2]>,
    intersection: [f64; 2],
}

pub fn save_data(data: &AppData, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    bincode::serialize_into(&mut writer, data)?;
    Ok(())
}

pub fn load_data(path: &Path) -> Result<AppData> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data: AppData = bincode::deserialize_from(reader)?;
    Ok(data)
}

pub fn write_edge_table<W: Write>(rows: &[EdgeRow], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_edge_table(rows: &[EdgeRow], path: &Path) -> Result<()> {
    write_edge_table(rows, BufWriter::new(File::create(path)?))
}

pub fn write_split_failures<W: Write>(failures: &[SplitFailure], mut writer: W) -> Result<()> {
    for f in failures {
        let row = FailureRow {
            segment_id: f.segment_id,
            polyline: f.line.coords().map(|c| [c.x, c.y]).collect(),
            intersection: [f.intersection.x, f.intersection.y],
        };
        serde_json::to_writer(&mut writer, &row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_split_failures(failures: &[SplitFailure], path: &Path) -> Result<()> {
    write_split_failures(failures, BufWriter::new(File::create(path)?))
}

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::{GeometrySource, RawGeometry, RawPosition};

fn parse_position(value: &Value) -> Result<RawPosition> {
    let parts = value
        .as_array()
        .ok_or(anyhow!("Position is not an array"))?;
    if parts.len() < 2 || parts.len() > 3 {
        return Err(anyhow!("Position needs 2 or 3 numbers, got {}", parts.len()));
    }
    let x = parts[0].as_f64().ok_or(anyhow!("Invalid x"))?;
    let y = parts[1].as_f64().ok_or(anyhow!("Invalid y"))?;
    let z = match parts.get(2) {
        Some(z) => Some(z.as_f64().ok_or(anyhow!("Invalid z"))?),
        None => None,
    };
    Ok(RawPosition { x, y, z })
}

fn parse_line(value: &Value) -> Result<Vec<RawPosition>> {
    let positions = value
        .as_array()
        .ok_or(anyhow!("Line coordinates are not an array"))?
        .iter()
        .map(parse_position)
        .collect::<Result<Vec<_>>>()?;
    if positions.len() < 2 {
        return Err(anyhow!("Line needs at least 2 positions"));
    }
    Ok(positions)
}

/// Reads geometry records from JSON lines, one record per line.
pub fn read_geometries<R: BufRead>(reader: R) -> Result<GeometrySource> {
    let mut source = GeometrySource::default();
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(&line)?;
        let context = |e: anyhow::Error| e.context(format!("line {}", n + 1));
        match record["type"].as_str() {
            Some("meta") => {
                source.crs = record["crs"].as_str().map(str::to_string);
            }
            Some("line") => {
                let positions = parse_line(&record["coordinates"]).map_err(context)?;
                source.geometries.push(RawGeometry::Line(positions));
            }
            Some("multiline") => {
                let parts = record["coordinates"]
                    .as_array()
                    .ok_or(anyhow!("Multiline coordinates are not an array"))
                    .and_then(|parts| parts.iter().map(parse_line).collect::<Result<Vec<_>>>())
                    .map_err(context)?;
                source.geometries.push(RawGeometry::MultiLine(parts));
            }
            _ => return Err(context(anyhow!("Unknown record type"))),
        }
    }
    Ok(source)
}

pub fn load_geometries(path: &Path) -> Result<GeometrySource> {
    let file = File::open(path)?;
    read_geometries(BufReader::new(file))
}

use serde::{Deserialize, Serialize};

use super::models::Coordinate;

/// How coordinates are compared when they are used as node or dedup keys.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoordinatePrecision {
    /// Bitwise equality of both components (`-0.0` and `0.0` are the same key).
    #[default]
    Exact,
    /// Components are rounded to this many decimal places before comparison.
    Decimals(u32),
}

impl CoordinatePrecision {
    pub fn key(&self, c: Coordinate) -> NodeKey {
        match *self {
            CoordinatePrecision::Exact => NodeKey {
                x: ordered_bits(c.x),
                y: ordered_bits(c.y),
            },
            CoordinatePrecision::Decimals(places) => {
                let scale = 10f64.powi(places as i32);
                NodeKey {
                    x: (c.x * scale).round() as i64,
                    y: (c.y * scale).round() as i64,
                }
            }
        }
    }
}

/// Hashable, totally ordered stand-in for a coordinate.
///
/// Ordering follows the numeric ordering of `x`, then `y`, so sorting two keys
/// gives the canonical orientation of an undirected connection.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub x: i64,
    pub y: i64,
}

// Same transform `f64::total_cmp` uses: monotone from f64 order to i64 order.
fn ordered_bits(v: f64) -> i64 {
    let v = if v == 0.0 { 0.0 } else { v };
    let bits = v.to_bits() as i64;
    bits ^ ((((bits >> 63) as u64) >> 1) as i64)
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct NetworkConfig {
    pub precision: CoordinatePrecision,
    /// Largest distance, in linear units, between an intersection point and
    /// the polyline it splits.
    pub split_tolerance: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            precision: CoordinatePrecision::Exact,
            split_tolerance: 1e-9,
        }
    }
}

impl NetworkConfig {
    pub fn key(&self, c: Coordinate) -> NodeKey {
        self.precision.key(c)
    }

    pub fn same_point(&self, a: Coordinate, b: Coordinate) -> bool {
        self.key(a) == self.key(b)
    }
}

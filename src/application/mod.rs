mod edges;
mod graph_builder;
mod intersections;
mod normalizer;
mod services;
mod splitter;

pub use edges::*;
pub use graph_builder::*;
pub use intersections::*;
pub use normalizer::*;
pub use services::*;
pub use splitter::*;

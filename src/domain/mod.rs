mod config;
mod error;
mod graph;
mod models;

pub use config::*;
pub use error::*;
pub use graph::*;
pub use models::*;

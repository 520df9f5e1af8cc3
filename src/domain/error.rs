use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Input has no coordinate reference system defined, set one explicitly")]
    MissingProjection,
    #[error("Coordinate reference system {crs} is geographic, lengths need a projected CRS")]
    GeographicProjection { crs: String },
}

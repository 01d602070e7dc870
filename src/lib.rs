//! `korea-weather` - KMA ultra-short-term nowcast for AI assistants
//!
//! This library converts WGS84 coordinates to the KMA 5km forecast grid,
//! fetches the current observations for that cell and renders them as
//! descriptive Korean text, exposed as tools of an MCP server over stdio.

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;
pub mod grid;
pub mod mcp;
pub mod models;
pub mod normalizer;
pub mod regions;
pub mod tools;

// Re-export core types for public API
pub use api::{BaseTime, KmaClient, ObservationSource};
pub use config::WeatherConfig;
pub use error::WeatherError;
pub use grid::LambertGrid;
pub use mcp::WeatherServer;
pub use models::{Coordinate, GridCell, WeatherReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

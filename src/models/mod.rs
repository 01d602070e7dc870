//! Data models for the weather service
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic coordinates and KMA grid cells
//! - Observation: raw nowcast items and their category codes
//! - Response: the provider's XML envelope
//! - Report: the normalized, human-readable weather report

pub mod location;
pub mod observation;
pub mod report;
pub mod response;

// Re-export all public types for convenient access
pub use location::{Coordinate, GridCell};
pub use observation::{Category, ObservationItem};
pub use report::{ReportField, ReportKey, WeatherReport};
pub use response::UltraSrtNcstResponse;

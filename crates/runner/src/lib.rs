//! Runner for the TSP genetic algorithm over the capitals of the Americas.
//!
//! This crate provides:
//! - Capital datasets (bundled or JSON files) with DMS coordinate parsing
//! - TOML run configuration files
//! - A terminal logger for the `log` facade
//! - Run reports (JSON, CSV history) and crossover comparison tables

mod coords;
mod dataset;
pub mod logger;
mod report;
mod settings;

pub use coords::{parse_coordinate, Axis, CoordinateError};
pub use dataset::{Capital, CapitalRecord, Dataset, DatasetError, RawCoordinate};
pub use logger::TermLogger;
pub use report::{Comparison, ComparisonRow, RunReport, TourStop};
pub use settings::{load_config, parse_config, SettingsError};

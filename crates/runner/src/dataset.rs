//! Capital datasets.
//!
//! A dataset is a JSON array of capitals:
//!
//! ```json
//! [
//!   { "name": "Ottawa", "country": "Canada", "latitude": "45°25′29″N", "longitude": "75°41′42″W" },
//!   { "name": "Lima", "country": "Peru", "latitude": -12.0433, "longitude": -77.0283 }
//! ]
//! ```
//!
//! Coordinates are either decimal degrees (numbers) or DMS strings parsed by
//! [`parse_coordinate`]. The capitals of the 35 sovereign states of the
//! Americas ship inside the binary, see [`Dataset::bundled`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tsp_ga_core::{DistanceMatrix, GeoPoint};

use crate::coords::{parse_coordinate, Axis, CoordinateError};

const BUNDLED_CAPITALS: &str = include_str!("../resources/capitals.json");

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("capital '{name}': {source}")]
    Coordinate {
        name: String,
        #[source]
        source: CoordinateError,
    },

    #[error("capital '{name}': {source}")]
    Geo {
        name: String,
        #[source]
        source: tsp_ga_core::Error,
    },

    #[error("dataset '{0}' has fewer than 2 capitals")]
    TooSmall(String),
}

/// A coordinate as written in the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    /// Signed decimal degrees.
    Degrees(f64),
    /// DMS or decimal text, e.g. `"15°47′S"`.
    Text(String),
}

impl RawCoordinate {
    fn to_degrees(&self, axis: Axis) -> Result<f64, CoordinateError> {
        match self {
            RawCoordinate::Degrees(value) => Ok(*value),
            RawCoordinate::Text(text) => parse_coordinate(text, axis),
        }
    }
}

/// One record of the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalRecord {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
}

/// A capital city with its resolved position.
#[derive(Debug, Clone, PartialEq)]
pub struct Capital {
    pub name: String,
    pub country: String,
    pub point: GeoPoint,
}

impl Capital {
    /// Resolves a raw record into a capital.
    pub fn from_record(record: CapitalRecord) -> Result<Self, DatasetError> {
        let lat = record
            .latitude
            .to_degrees(Axis::Latitude)
            .map_err(|source| DatasetError::Coordinate {
                name: record.name.clone(),
                source,
            })?;
        let lon = record
            .longitude
            .to_degrees(Axis::Longitude)
            .map_err(|source| DatasetError::Coordinate {
                name: record.name.clone(),
                source,
            })?;
        let point = GeoPoint::from_degrees(lat, lon).map_err(|source| DatasetError::Geo {
            name: record.name.clone(),
            source,
        })?;

        Ok(Self {
            name: record.name,
            country: record.country,
            point,
        })
    }
}

/// An ordered list of capitals; indices are the point indices of the tour.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the data came from (file path or `"bundled"`).
    pub source: String,
    pub capitals: Vec<Capital>,
}

impl Dataset {
    /// The bundled capitals of the Americas.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::parse_json("bundled", BUNDLED_CAPITALS)
    }

    /// Loads a dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse_json(&path.display().to_string(), &content)
    }

    /// Loads `path` when given, the bundled dataset otherwise.
    pub fn load_or_bundled(path: Option<&Path>) -> Result<Self, DatasetError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// Parses dataset JSON.
    pub fn parse_json(source: &str, content: &str) -> Result<Self, DatasetError> {
        let records: Vec<CapitalRecord> = serde_json::from_str(content)?;
        let capitals = records
            .into_iter()
            .map(Capital::from_record)
            .collect::<Result<Vec<_>, _>>()?;

        if capitals.len() < 2 {
            return Err(DatasetError::TooSmall(source.to_string()));
        }

        log::debug!("loaded {} capitals from {}", capitals.len(), source);
        Ok(Self {
            source: source.to_string(),
            capitals,
        })
    }

    /// Number of capitals.
    pub fn len(&self) -> usize {
        self.capitals.len()
    }

    /// Returns true if the dataset holds no capitals.
    pub fn is_empty(&self) -> bool {
        self.capitals.is_empty()
    }

    /// Positions in dataset order.
    pub fn points(&self) -> Vec<GeoPoint> {
        self.capitals.iter().map(|c| c.point).collect()
    }

    /// Great-circle distance matrix (km) between all capitals.
    pub fn distance_matrix(&self) -> Result<DistanceMatrix, DatasetError> {
        DistanceMatrix::from_points(&self.points()).map_err(|source| DatasetError::Geo {
            name: self.source.clone(),
            source,
        })
    }

    /// Capital names in the order given by `cities`.
    pub fn names_in_order(&self, cities: &[usize]) -> Vec<String> {
        cities
            .iter()
            .filter_map(|&i| self.capitals.get(i))
            .map(|c| c.name.clone())
            .collect()
    }
}

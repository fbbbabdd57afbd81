//! Degree/minute/second coordinate parsing.
//!
//! Accepts the notations found in gazetteers and encyclopedia infoboxes:
//!
//! - `45°25′29″N`, `15°47′S` (symbols, hemisphere suffix)
//! - `45 25 29 N`, `45:25:29N` (any non-numeric separators)
//! - `-15.7939`, `15.7939S` (decimal degrees)

use std::fmt;

use thiserror::Error;

/// Which axis a coordinate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// North/south.
    Latitude,
    /// East/west.
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Latitude => "latitude",
            Axis::Longitude => "longitude",
        })
    }
}

/// Errors from [`parse_coordinate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("empty coordinate")]
    Empty,

    #[error("malformed coordinate '{0}'")]
    Malformed(String),

    #[error("hemisphere '{hemisphere}' is not valid for a {axis}")]
    WrongHemisphere { hemisphere: char, axis: Axis },

    #[error("{component} out of range in '{text}'")]
    OutOfRange {
        component: &'static str,
        text: String,
    },
}

/// Parses a coordinate into signed decimal degrees (north and east positive).
pub fn parse_coordinate(text: &str, axis: Axis) -> Result<f64, CoordinateError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CoordinateError::Empty);
    }

    let (body, hemisphere_sign) = split_hemisphere(text, axis)?;

    let body = body.trim();
    let (negative, body) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    if negative && hemisphere_sign.is_some() {
        return Err(CoordinateError::Malformed(text.to_string()));
    }

    let parts = body
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| CoordinateError::Malformed(text.to_string()))
        })
        .collect::<Result<Vec<f64>, _>>()?;

    let (degrees, minutes, seconds) = match parts.as_slice() {
        [d] => (*d, 0.0, 0.0),
        [d, m] => (*d, *m, 0.0),
        [d, m, s] => (*d, *m, *s),
        _ => return Err(CoordinateError::Malformed(text.to_string())),
    };

    if !(0.0..60.0).contains(&minutes) {
        return Err(CoordinateError::OutOfRange {
            component: "minutes",
            text: text.to_string(),
        });
    }
    if !(0.0..60.0).contains(&seconds) {
        return Err(CoordinateError::OutOfRange {
            component: "seconds",
            text: text.to_string(),
        });
    }

    let magnitude = degrees + minutes / 60.0 + seconds / 3600.0;
    let sign = hemisphere_sign.unwrap_or(if negative { -1.0 } else { 1.0 });
    Ok(sign * magnitude)
}

/// Strips a trailing hemisphere letter, returning the sign it implies.
fn split_hemisphere(text: &str, axis: Axis) -> Result<(&str, Option<f64>), CoordinateError> {
    let Some(last) = text.chars().last() else {
        return Err(CoordinateError::Empty);
    };
    if !last.is_ascii_alphabetic() {
        return Ok((text, None));
    }

    let sign = match (last.to_ascii_uppercase(), axis) {
        ('N', Axis::Latitude) | ('E', Axis::Longitude) => 1.0,
        ('S', Axis::Latitude) | ('W', Axis::Longitude) => -1.0,
        ('N' | 'S' | 'E' | 'W', _) => {
            return Err(CoordinateError::WrongHemisphere {
                hemisphere: last,
                axis,
            })
        }
        _ => return Err(CoordinateError::Malformed(text.to_string())),
    };

    Ok((&text[..text.len() - last.len_utf8()], Some(sign)))
}

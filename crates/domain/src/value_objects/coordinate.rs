//! Coordinate value object
//!
//! A geocoded `"lat,lon"` pair, kept in its percent-encoded form because it
//! is used both as a cache key and verbatim as a URL path segment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A percent-encoded `"lat,lon"` pair produced by geocoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coordinate(String);

impl Coordinate {
    /// Build a coordinate from the textual latitude and longitude of a geocoder hit
    ///
    /// The numbers are kept exactly as the geocoder returned them.
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::Coordinate;
    ///
    /// let coord = Coordinate::from_lat_lon("34.0536909", "-118.242766").unwrap();
    /// assert_eq!(coord.as_str(), "34.0536909%2C-118.242766");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either part is blank.
    pub fn from_lat_lon(latitude: &str, longitude: &str) -> Result<Self, DomainError> {
        let (latitude, longitude) = (latitude.trim(), longitude.trim());
        if latitude.is_empty() || longitude.is_empty() {
            return Err(DomainError::InvalidCoordinate(format!(
                "'{latitude}','{longitude}'"
            )));
        }
        Ok(Self(encode_component(&format!("{latitude},{longitude}"))))
    }

    /// Wrap an already-encoded coordinate key (e.g. read back from persisted state)
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Get the encoded coordinate
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Percent-encode with URI-component rules
fn encode_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 3);
    for b in input.bytes() {
        match b {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(char::from(b)),
            _ => result.push_str(&format!("%{b:02X}")),
        }
    }
    result
}

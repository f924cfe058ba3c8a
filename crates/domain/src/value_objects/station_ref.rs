//! Forecast grid station reference

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a gridded forecast cell as `"<grid-id>/<x>,<y>"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationRef(String);

impl StationRef {
    /// Build a station reference from the grid office id and cell indices
    ///
    /// # Examples
    ///
    /// ```
    /// use domain::StationRef;
    ///
    /// let station = StationRef::new("LOX", 154, 44);
    /// assert_eq!(station.as_str(), "LOX/154,44");
    /// ```
    pub fn new(grid_id: &str, grid_x: u32, grid_y: u32) -> Self {
        Self(format!("{grid_id}/{grid_x},{grid_y}"))
    }

    /// Wrap a previously built reference
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Place name value object
//!
//! The lookup key of the resolution chain. The text is kept exactly as the
//! user typed it, so `"Los Angeles"` and `"los angeles"` are distinct keys.
//!
//! # Examples
//!
//! ```
//! use domain::PlaceName;
//!
//! let place = PlaceName::new("Los Angeles, CA").unwrap();
//! assert_eq!(place.as_str(), "Los Angeles, CA");
//!
//! assert!(PlaceName::new("   ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A free-text place name used as the first-stage cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceName(String);

impl PlaceName {
    /// Create a place name, rejecting blank input
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the text is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "place name must not be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    /// Get the place name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PlaceName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PlaceName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_surface_form_verbatim() {
        let place = PlaceName::new("  Los Angeles, CA ").unwrap();
        assert_eq!(place.as_str(), "  Los Angeles, CA ");
    }

    #[test]
    fn case_variants_are_distinct() {
        let a = PlaceName::new("Los Angeles").unwrap();
        let b = PlaceName::new("los angeles").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn rejects_empty() {
        assert!(PlaceName::new("").is_err());
        assert!(PlaceName::new(" \t ").is_err());
    }

    #[test]
    fn display_matches_input() {
        let place = PlaceName::new("Nowhereville").unwrap();
        assert_eq!(place.to_string(), "Nowhereville");
    }

    #[test]
    fn serializes_as_plain_string() {
        let place = PlaceName::new("Boise").unwrap();
        assert_eq!(serde_json::to_string(&place).unwrap(), r#""Boise""#);
    }
}

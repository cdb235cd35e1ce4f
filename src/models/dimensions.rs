//! Drawable surface size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing a `WxH` size string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimensionsError {
    /// Not of the form `WxH`
    #[error("invalid size '{0}', expected WxH (e.g., \"800x600\")")]
    Format(String),
    /// Width is not an unsigned integer
    #[error("invalid width '{0}'")]
    Width(String),
    /// Height is not an unsigned integer
    #[error("invalid height '{0}'")]
    Height(String),
}

/// Current drawable width and height in pixels.
///
/// A zero-area surface is valid. Particles reset into it collapse onto the
/// origin until a non-zero resize arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceDimensions {
    pub width: u32,
    pub height: u32,
}

impl SurfaceDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for SurfaceDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for SurfaceDimensions {
    type Err = DimensionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('x').collect();
        if parts.len() != 2 {
            return Err(DimensionsError::Format(s.to_string()));
        }
        let width: u32 = parts[0]
            .trim()
            .parse()
            .map_err(|_| DimensionsError::Width(parts[0].trim().to_string()))?;
        let height: u32 = parts[1]
            .trim()
            .parse()
            .map_err(|_| DimensionsError::Height(parts[1].trim().to_string()))?;
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        let dims: SurfaceDimensions = "800x600".parse().unwrap();
        assert_eq!(dims, SurfaceDimensions::new(800, 600));
        assert_eq!(dims.to_string(), "800x600");
    }

    #[test]
    fn test_parse_size_with_spaces() {
        let dims: SurfaceDimensions = " 1280 x 720 ".parse().unwrap();
        assert_eq!(dims, SurfaceDimensions::new(1280, 720));
    }

    #[test]
    fn test_parse_size_errors() {
        assert_eq!(
            "800".parse::<SurfaceDimensions>(),
            Err(DimensionsError::Format("800".to_string()))
        );
        assert_eq!(
            "axb".parse::<SurfaceDimensions>(),
            Err(DimensionsError::Width("a".to_string()))
        );
        assert_eq!(
            "10x-4".parse::<SurfaceDimensions>(),
            Err(DimensionsError::Height("-4".to_string()))
        );
    }

    #[test]
    fn test_zero_area() {
        assert!(SurfaceDimensions::new(0, 600).is_empty());
        assert!(SurfaceDimensions::new(800, 0).is_empty());
        assert!(!SurfaceDimensions::new(1, 1).is_empty());
    }
}

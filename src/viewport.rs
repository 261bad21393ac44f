use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Browser viewport used for page captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected WIDTHxHEIGHT (e.g., 1920x1080)")]
    InvalidFormat,
    #[error("Invalid viewport width: {0}")]
    InvalidWidth(String),
    #[error("Invalid viewport height: {0}")]
    InvalidHeight(String),
    #[error("Invalid viewport: width must be positive")]
    ZeroWidth,
    #[error("Invalid viewport: height must be positive")]
    ZeroHeight,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or(ViewportParseError::InvalidFormat)?;

        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidWidth(width.trim().to_string()))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidHeight(height.trim().to_string()))?;

        let viewport = Viewport { width, height };
        viewport.check()?;
        Ok(viewport)
    }
}

impl Viewport {
    pub fn check(&self) -> Result<(), ViewportParseError> {
        if self.width == 0 {
            return Err(ViewportParseError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ViewportParseError::ZeroHeight);
        }
        Ok(())
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

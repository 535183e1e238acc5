//! Through-thickness report locations of a layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayupError;

/// Spot within a layer.
///
/// Result blocks store the spots of a layer in the order bottom, top,
/// middle. [`Spot::buffer_position`] is the only place that order is
/// encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spot {
    Bottom,
    Top,
    Middle,
}

impl Spot {
    /// All spots in buffer order
    pub const ALL: [Spot; 3] = [Spot::Bottom, Spot::Top, Spot::Middle];

    /// Position of the spot within a node's spot values
    pub fn buffer_position(self) -> usize {
        match self {
            Spot::Bottom => 0,
            Spot::Top => 1,
            Spot::Middle => 2,
        }
    }

    /// The first `n_spots` spots in buffer order
    pub fn available(n_spots: usize) -> &'static [Spot] {
        &Self::ALL[..n_spots.min(Self::ALL.len())]
    }

    pub fn name(self) -> &'static str {
        match self {
            Spot::Bottom => "bottom",
            Spot::Top => "top",
            Spot::Middle => "middle",
        }
    }
}

impl fmt::Display for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Spot {
    type Err = LayupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bottom" | "bot" => Ok(Spot::Bottom),
            "top" => Ok(Spot::Top),
            "middle" | "mid" => Ok(Spot::Middle),
            other => Err(LayupError::InvalidSelection(format!("unknown spot '{other}'"))),
        }
    }
}

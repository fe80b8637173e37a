use std::io::{Read};

use serde::{Deserialize, Serialize};

use super::{Result, Position, Range, Lut, Interp, Extrap};

/// A JSON description of a [`Lut`]'s grid and default policies.
///
/// ```
/// use gridlut::{GridConfig, Interp, Extrap};
/// let config = GridConfig::from_json(r#"{
///     "min": [0.0, -1.0],
///     "max": [1.0, 1.0],
///     "size": [11, 21],
///     "output_dim": 3,
///     "extrap": "nearest"
/// }"#).unwrap();
/// assert_eq!(config.interp, Interp::Linear);
/// assert_eq!(config.extrap, Extrap::Nearest);
/// let lut = config.to_lut().unwrap();
/// assert_eq!(lut.range().numel(), 231);
/// let far = gridlut::Position::Val(vec![5.0, 5.0]);
/// assert_eq!(config.lookup(&lut, &far).unwrap(), [0.0; 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfig {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
    pub size: Vec<usize>,
    #[serde(default = "one")]
    pub output_dim: usize,
    #[serde(default)]
    pub interp: Interp,
    #[serde(default)]
    pub extrap: Extrap,
}

fn one() -> usize { 1 }

impl GridConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader(r: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(r)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describes the grid of an existing `Lut`, with default policies.
    pub fn of(lut: &Lut) -> Self {
        let range = lut.range();
        Self {
            min: range.min().to_vec(),
            max: range.max().to_vec(),
            size: range.size().to_vec(),
            output_dim: lut.output_dim(),
            interp: Interp::default(),
            extrap: Extrap::default(),
        }
    }

    pub fn to_range(&self) -> Result<Range> {
        Range::new(self.min.clone(), self.max.clone(), self.size.clone())
    }

    /// Constructs a zero-filled `Lut` on the configured grid.
    pub fn to_lut(&self) -> Result<Lut> {
        Lut::new(self.to_range()?, self.output_dim)
    }

    /// Calls [`Lut::get()`] with the configured policies.
    pub fn lookup(&self, lut: &Lut, pos: &Position) -> Result<Vec<f64>> {
        lut.get(pos, self.interp, self.extrap)
    }
}

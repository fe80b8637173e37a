//! How a [`Lut`] reconstructs values between and beyond its grid points.
//!
//! [`Lut`]: super::Lut

use std::fmt;
use std::str::{FromStr};

use serde::{Deserialize, Serialize};

use super::{Error};

/// Reconstruction between grid points.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interp {
    /// Snap to the nearest grid point. Halves round away from zero.
    Nearest,
    /// Multilinear blend of the `2^rank` surrounding grid points.
    #[default]
    Linear,
}

/// Behaviour for coordinates outside the grid.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrap {
    /// Return `NaN` on every output channel.
    #[default]
    #[serde(rename = "nan")]
    NaN,
    /// Clamp the coordinates to the grid.
    Nearest,
}

impl FromStr for Interp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(Interp::Nearest),
            "linear" => Ok(Interp::Linear),
            _ => Err(Error::InvalidPolicy {kind: "interpolation", name: s.to_owned()}),
        }
    }
}

impl FromStr for Extrap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "nan" => Ok(Extrap::NaN),
            "nearest" => Ok(Extrap::Nearest),
            _ => Err(Error::InvalidPolicy {kind: "extrapolation", name: s.to_owned()}),
        }
    }
}

impl fmt::Display for Interp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Interp::Nearest => "nearest", Interp::Linear => "linear" })
    }
}

impl fmt::Display for Extrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self { Extrap::NaN => "nan", Extrap::Nearest => "nearest" })
    }
}

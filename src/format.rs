use std::str::{FromStr};

use serde::{Deserialize, Serialize};
use thiserror::{Error as ThisError};

use super::{Error};

/// The three ways of naming a location in a grid.
///
/// ```
/// use gridlut::Format;
/// assert_eq!("sub".parse::<Format>().unwrap(), Format::Sub);
/// assert!("index".parse::<Format>().is_err());
/// ```
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A single flat index.
    Ind,
    /// One integer subscript per dimension.
    Sub,
    /// One real coordinate per dimension.
    Val,
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "ind" => Ok(Format::Ind),
            "sub" => Ok(Format::Sub),
            "val" => Ok(Format::Val),
            _ => Err(FormatError::Name(s.to_owned()).into()),
        }
    }
}

/// Why a [`Format`] was rejected.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The conversion has no meaning, e.g. to `Val` without a [`Range`].
    ///
    /// [`Range`]: super::Range
    #[error("cannot convert from {from:?} to {to:?}")]
    Pair { from: Format, to: Format },
    /// A name that is not `ind`, `sub` or `val`.
    #[error("unknown position format {0:?}")]
    Name(String),
}

// ----------------------------------------------------------------------------

/// A location in a grid, tagged with its [`Format`].
///
/// Flat indices and subscripts are 0-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    Ind(usize),
    Sub(Vec<usize>),
    Val(Vec<f64>),
}

impl Position {
    /// Returns the tag of `self`.
    pub fn format(&self) -> Format {
        match self {
            Position::Ind(_) => Format::Ind,
            Position::Sub(_) => Format::Sub,
            Position::Val(_) => Format::Val,
        }
    }

    /// Returns the flat index, if `self` is one.
    pub fn as_ind(&self) -> Option<usize> {
        if let Position::Ind(ind) = *self { Some(ind) } else { None }
    }

    /// Returns the subscripts, if `self` is a subscript.
    pub fn as_sub(&self) -> Option<&[usize]> {
        if let Position::Sub(sub) = self { Some(sub) } else { None }
    }

    /// Returns the coordinates, if `self` is a coordinate.
    pub fn as_val(&self) -> Option<&[f64]> {
        if let Position::Val(val) = self { Some(val) } else { None }
    }
}

impl From<usize> for Position {
    fn from(ind: usize) -> Self { Position::Ind(ind) }
}

impl From<Vec<usize>> for Position {
    fn from(sub: Vec<usize>) -> Self { Position::Sub(sub) }
}

impl From<Vec<f64>> for Position {
    fn from(val: Vec<f64>) -> Self { Position::Val(val) }
}

impl<const N: usize> From<[usize; N]> for Position {
    fn from(sub: [usize; N]) -> Self { Position::Sub(sub.into()) }
}

impl<const N: usize> From<[f64; N]> for Position {
    fn from(val: [f64; N]) -> Self { Position::Val(val.into()) }
}

/// Rounds a fractional subscript to the nearest grid point.
///
/// Halves round away from zero. Fails if the result is not in `0..size`.
pub(crate) fn round_sub(frac: &[f64], size: &[usize]) -> Result<Vec<usize>, Error> {
    frac.iter().zip(size).map(|(&x, &n)| {
        let r = x.round();
        if r >= 0.0 && r < n as f64 {
            Ok(r as usize)
        } else {
            Err(Error::OutOfRange(format!("subscript {} rounds outside 0..{}", x, n)))
        }
    }).collect()
}

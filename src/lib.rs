//! A pure-Rust library of dense multi-dimensional arrays and the lookup
//! tables built on them.
//!
//! A location in an array can be named in three equivalent [`Format`]s: a
//! flat index (`Ind`), one integer subscript per dimension (`Sub`), or one
//! real coordinate per dimension (`Val`). [`IndexSpace`] converts between
//! `Ind` and `Sub` using a stride table in which dimension 0 varies fastest.
//! [`Range`] adds a per-dimension interval `[min, max]` and converts to and
//! from `Val`. [`DenseArray`] stores one value per element of an
//! `IndexSpace`.
//!
//! [`Lut`] approximates a function `f: ℝ^m → ℝ^n` by sampling it on the
//! regular grid of a `Range`, one `DenseArray` per output channel. Values
//! between grid points are reconstructed by multilinear interpolation of the
//! `2^m` surrounding samples, or by snapping to the nearest sample; values
//! outside the grid are either `NaN` or clamped to the boundary. A `Lut` can
//! be saved to and loaded from a simple little-endian binary format (see
//! [`io`]), and its grid can be described in JSON (see [`GridConfig`]).
//!
//! ```
//! use gridlut::{Range, Lut, Position, Interp, Extrap};
//! let range = Range::new([0.0, 0.0], [1.0, 1.0], [2, 2]).unwrap();
//! let mut lut = Lut::new(range, 1).unwrap();
//! lut.set(&Position::Sub(vec![1, 0]), &[1.0]).unwrap();
//! lut.set(&Position::Sub(vec![0, 1]), &[1.0]).unwrap();
//! lut.set(&Position::Sub(vec![1, 1]), &[2.0]).unwrap();
//! let y = lut.get(&Position::Val(vec![0.5, 0.5]), Interp::Linear, Extrap::NaN).unwrap();
//! assert_eq!(y, [1.0]);
//! ```
//!
//! The library logs through the [`log`] facade and does not install a logger.

mod error;
pub use error::{Error, Result};
use error::{bad_pair, check_len};

mod format;
pub use format::{Format, FormatError, Position};
use format::{round_sub};

mod index;
pub use index::{IndexSpace, Order, strides};

mod range;
pub use range::{Range};

mod array;
pub use array::{DenseArray};

pub mod policy;
pub use policy::{Interp, Extrap};

mod lut;
pub use lut::{Lut};

pub mod io;

mod config;
pub use config::{GridConfig};

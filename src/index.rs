use std::sync::{Arc};

use serde::{Deserialize, Serialize};

use super::{Error, Result, Format, Position, bad_pair, check_len};

/// Returns `(n / d, n % d)`.
#[inline(always)]
pub(crate) fn div_mod(n: usize, d: usize) -> (usize, usize) { (n / d, n % d) }

/// Which dimension varies fastest as the flat index increases.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Order {
    /// Dimension 0 varies fastest (Fortran order). Used by [`Lut`].
    ///
    /// [`Lut`]: super::Lut
    #[default]
    FirstFastest,
    /// The last dimension varies fastest (C order).
    LastFastest,
}

/// Computes the stride of each dimension for `shape` laid out in `order`.
///
/// For `FirstFastest`, `strides[0] = 1` and
/// `strides[d] = strides[d - 1] * shape[d - 1]`.
pub fn strides(shape: &[usize], order: Order) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    let mut running = 1usize;
    let mut visit = |d: usize| {
        strides[d] = running;
        running = running.saturating_mul(shape[d]);
    };
    match order {
        Order::FirstFastest => (0..shape.len()).for_each(&mut visit),
        Order::LastFastest => (0..shape.len()).rev().for_each(&mut visit),
    }
    strides
}

// ----------------------------------------------------------------------------

/// The shape of a dense array, with conversions between flat indices and
/// subscripts.
///
/// Cloning an `IndexSpace` shares its stride table.
///
/// ```
/// use gridlut::IndexSpace;
/// let s = IndexSpace::new(vec![3, 4]).unwrap();
/// assert_eq!(s.numel(), 12);
/// assert_eq!(s.strides(), [1, 3]);
/// assert_eq!(s.ind_to_sub(7).unwrap(), [1, 2]);
/// assert_eq!(s.sub_to_ind(&[1, 2]).unwrap(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    shape: Arc<[usize]>,
    strides: Arc<[usize]>,
    order: Order,
    numel: usize,
}

impl IndexSpace {
    /// Constructs an `IndexSpace` in which dimension 0 varies fastest.
    ///
    /// Fails if `shape` is empty or has a zero entry.
    pub fn new(shape: impl Into<Vec<usize>>) -> Result<Self> {
        Self::with_order(shape, Order::default())
    }

    /// Constructs an `IndexSpace` with the given memory order.
    pub fn with_order(shape: impl Into<Vec<usize>>, order: Order) -> Result<Self> {
        let shape: Vec<usize> = shape.into();
        if shape.is_empty() {
            return Err(Error::SizeMismatch {what: "rank", expected: 1, actual: 0});
        }
        if let Some(d) = shape.iter().position(|&n| n == 0) {
            return Err(Error::SizeMismatch {what: "dimension size", expected: 1, actual: shape[d]});
        }
        let numel = shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| Error::OutOfRange(format!("shape {:?} has too many elements", shape)))?;
        let strides = strides(&shape, order).into();
        Ok(Self {shape: shape.into(), strides, order, numel})
    }

    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn strides(&self) -> &[usize] { &self.strides }

    pub fn order(&self) -> Order { self.order }

    /// The number of dimensions.
    pub fn rank(&self) -> usize { self.shape.len() }

    /// The number of elements.
    pub fn numel(&self) -> usize { self.numel }

    /// Returns the subscripts of flat index `ind`.
    pub fn ind_to_sub(&self, ind: usize) -> Result<Vec<usize>> {
        if ind >= self.numel {
            return Err(Error::OutOfRange(format!("index {} is out of bounds for {} elements", ind, self.numel)));
        }
        Ok(self.shape.iter().zip(self.strides.iter()).map(|(&n, &stride)| {
            div_mod(ind / stride, n).1
        }).collect())
    }

    /// Returns the flat index of subscripts `sub`.
    pub fn sub_to_ind(&self, sub: &[usize]) -> Result<usize> {
        check_len("subscript", self.rank(), sub.len())?;
        let mut ind = 0;
        for (d, (&s, &n)) in sub.iter().zip(self.shape.iter()).enumerate() {
            if s >= n {
                return Err(Error::OutOfRange(format!("subscript {} on axis {} is out of bounds for size {}", s, d, n)));
            }
            ind += s * self.strides[d];
        }
        Ok(ind)
    }

    /// Converts `pos` to format `to`.
    ///
    /// Only [`Format::Ind`] and [`Format::Sub`] are meaningful here;
    /// [`Format::Val`] needs a [`Range`].
    ///
    /// [`Range`]: super::Range
    pub fn convert(&self, pos: &Position, to: Format) -> Result<Position> {
        match (pos, to) {
            (Position::Ind(_), Format::Ind) => Ok(Position::Ind(self.resolve(pos)?)),
            (Position::Ind(ind), Format::Sub) => Ok(Position::Sub(self.ind_to_sub(*ind)?)),
            (Position::Sub(sub), Format::Ind) => Ok(Position::Ind(self.sub_to_ind(sub)?)),
            (Position::Sub(sub), Format::Sub) => {
                self.sub_to_ind(sub)?;
                Ok(Position::Sub(sub.clone()))
            },
            (pos, to) => Err(bad_pair(pos.format(), to)),
        }
    }

    /// Returns the flat index of `pos`, which must be an `Ind` or a `Sub`.
    pub fn resolve(&self, pos: &Position) -> Result<usize> {
        match pos {
            Position::Ind(ind) => {
                self.ind_to_sub(*ind)?;
                Ok(*ind)
            },
            Position::Sub(sub) => self.sub_to_ind(sub),
            Position::Val(_) => Err(bad_pair(Format::Val, Format::Ind)),
        }
    }

    /// Calls `f` with the subscripts of every element, in order of increasing
    /// flat index.
    ///
    /// Equivalent to, but more efficient than,
    /// ```text
    /// for i in 0..self.numel() { f(&self.ind_to_sub(i)?); }
    /// ```
    pub fn each(&self, mut f: impl FnMut(&[usize])) {
        let mut sub = vec![0; self.rank()];
        let dims: Vec<usize> = match self.order {
            Order::FirstFastest => (0..self.rank()).collect(),
            Order::LastFastest => (0..self.rank()).rev().collect(),
        };
        for _ in 0..self.numel {
            f(&sub);
            // Odometer increment.
            for &d in &dims {
                sub[d] += 1;
                if sub[d] < self.shape[d] { break; }
                sub[d] = 0;
            }
        }
    }
}

use super::{Error, Result, Format, Position, IndexSpace, check_len, round_sub};

/// An [`IndexSpace`] with a continuous coordinate system.
///
/// Axis `d` spans `[min[d], max[d]]` with `size[d]` evenly spaced grid
/// points; subscript `0` lies at `min[d]` and subscript `size[d] - 1` at
/// `max[d]`. An axis of size 1 is a single fixed coordinate and must have
/// `min[d] == max[d]`.
///
/// ```
/// use gridlut::{Range, Position, Format};
/// let r = Range::new([0.0, -1.0], [10.0, 1.0], [11, 3]).unwrap();
/// assert_eq!(r.sub_to_val(&[3.0, 2.0]).unwrap(), [3.0, 1.0]);
/// assert_eq!(r.val_to_sub(&[2.5, 0.5]).unwrap(), [2.5, 1.5]);
/// assert_eq!(
///     r.convert(&Position::Val(vec![2.6, 0.0]), Format::Ind).unwrap(),
///     Position::Ind(14),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    space: IndexSpace,
    min: Box<[f64]>,
    max: Box<[f64]>,
    scale_sub_to_val: Box<[f64]>,
    scale_val_to_sub: Box<[f64]>,
}

impl Range {
    /// Constructs a `Range` from per-axis bounds and sizes.
    pub fn new(
        min: impl Into<Vec<f64>>,
        max: impl Into<Vec<f64>>,
        size: impl Into<Vec<usize>>,
    ) -> Result<Self> {
        let (min, max, size) = (min.into(), max.into(), size.into());
        check_len("min", size.len(), min.len())?;
        check_len("max", size.len(), max.len())?;
        let space = IndexSpace::new(size)?;
        let mut scale_sub_to_val = Vec::with_capacity(space.rank());
        let mut scale_val_to_sub = Vec::with_capacity(space.rank());
        for (axis, &n) in space.shape().iter().enumerate() {
            let (lo, hi) = (min[axis], max[axis]);
            let invalid = Error::InvalidRange {axis, min: lo, max: hi, size: n};
            let ok = lo.is_finite() && hi.is_finite() && if n == 1 { lo == hi } else { lo < hi };
            if !ok { return Err(invalid); }
            if n == 1 {
                scale_sub_to_val.push(0.0);
                scale_val_to_sub.push(0.0);
            } else {
                // `hi - lo` can overflow, and a tiny step has no finite inverse.
                let scale = (hi - lo) / (n - 1) as f64;
                let inverse = 1.0 / scale;
                if !(scale.is_finite() && inverse.is_finite() && scale > 0.0) { return Err(invalid); }
                scale_sub_to_val.push(scale);
                scale_val_to_sub.push(inverse);
            }
        }
        Ok(Self {
            space,
            min: min.into(),
            max: max.into(),
            scale_sub_to_val: scale_sub_to_val.into(),
            scale_val_to_sub: scale_val_to_sub.into(),
        })
    }

    pub fn index_space(&self) -> &IndexSpace { &self.space }

    pub fn min(&self) -> &[f64] { &self.min }

    pub fn max(&self) -> &[f64] { &self.max }

    pub fn size(&self) -> &[usize] { self.space.shape() }

    pub fn rank(&self) -> usize { self.space.rank() }

    pub fn numel(&self) -> usize { self.space.numel() }

    /// The distance between neighbouring grid points on each axis.
    pub fn step(&self) -> &[f64] { &self.scale_sub_to_val }

    /// Maps (possibly fractional) subscripts to coordinates.
    pub fn sub_to_val(&self, sub: &[f64]) -> Result<Vec<f64>> {
        check_len("subscript", self.rank(), sub.len())?;
        Ok((0..self.rank()).map(|d| self.axis_sub_to_val(d, sub[d])).collect())
    }

    /// Maps coordinates to fractional subscripts.
    ///
    /// The result is not rounded, and is not clamped to the grid.
    pub fn val_to_sub(&self, val: &[f64]) -> Result<Vec<f64>> {
        check_len("coordinate", self.rank(), val.len())?;
        Ok((0..self.rank()).map(|d| self.scale_val_to_sub[d] * (val[d] - self.min[d])).collect())
    }

    fn axis_sub_to_val(&self, d: usize, sub: f64) -> f64 {
        // Pin the last grid point so that it lands exactly on `max`.
        if sub == (self.size()[d] - 1) as f64 { return self.max[d]; }
        self.scale_sub_to_val[d] * sub + self.min[d]
    }

    /// Converts `pos` to format `to`.
    ///
    /// All nine pairs of formats are supported. Converting a `Val` to a `Sub`
    /// or an `Ind` rounds to the nearest grid point (halves away from zero);
    /// use [`Self::val_to_sub()`] for the unrounded subscript.
    pub fn convert(&self, pos: &Position, to: Format) -> Result<Position> {
        match (pos, to) {
            (Position::Ind(_) | Position::Sub(_), Format::Ind | Format::Sub) => self.space.convert(pos, to),
            (Position::Ind(_) | Position::Sub(_), Format::Val) => Ok(Position::Val(self.to_val(pos)?)),
            (Position::Val(val), Format::Val) => {
                check_len("coordinate", self.rank(), val.len())?;
                Ok(pos.clone())
            },
            (Position::Val(val), Format::Sub) => {
                Ok(Position::Sub(round_sub(&self.val_to_sub(val)?, self.size())?))
            },
            (Position::Val(val), Format::Ind) => {
                let sub = round_sub(&self.val_to_sub(val)?, self.size())?;
                Ok(Position::Ind(self.space.sub_to_ind(&sub)?))
            },
        }
    }

    /// Returns the coordinates of `pos` in any format.
    pub fn to_val(&self, pos: &Position) -> Result<Vec<f64>> {
        match pos {
            Position::Val(val) => {
                check_len("coordinate", self.rank(), val.len())?;
                Ok(val.clone())
            },
            _ => self.sub_to_val(&self.to_frac_sub(pos)?),
        }
    }

    /// Returns the unrounded subscripts of `pos` in any format.
    pub fn to_frac_sub(&self, pos: &Position) -> Result<Vec<f64>> {
        match pos {
            Position::Ind(ind) => Ok(self.space.ind_to_sub(*ind)?.into_iter().map(|s| s as f64).collect()),
            Position::Sub(sub) => {
                self.space.sub_to_ind(sub)?;
                Ok(sub.iter().map(|&s| s as f64).collect())
            },
            Position::Val(val) => self.val_to_sub(val),
        }
    }

    /// Clamps each coordinate to its axis bounds.
    pub fn limit(&self, val: &[f64]) -> Vec<f64> {
        val.iter().zip(self.min.iter().zip(self.max.iter()))
            .map(|(&v, (&lo, &hi))| v.clamp(lo, hi))
            .collect()
    }

    /// Tests whether every coordinate lies within its axis bounds.
    ///
    /// A `NaN` coordinate is never contained.
    pub fn has(&self, val: &[f64]) -> bool {
        val.len() == self.rank() &&
        val.iter().zip(self.min.iter().zip(self.max.iter()))
            .all(|(&v, (&lo, &hi))| lo <= v && v <= hi)
    }

    /// The coordinates of the grid points along axis `d`.
    pub fn axis_samples(&self, d: usize) -> Result<Vec<f64>> {
        if d >= self.rank() {
            return Err(Error::OutOfRange(format!("axis {} of a rank {} range", d, self.rank())));
        }
        Ok((0..self.size()[d]).map(|i| self.axis_sub_to_val(d, i as f64)).collect())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn unit_square() -> Range { Range::new([0.0, 0.0], [1.0, 1.0], [2, 2]).unwrap() }

    #[test]
    fn rejects_bad_bounds() {
        assert!(matches!(Range::new([0.0], [1.0, 2.0], [2, 2]), Err(Error::SizeMismatch {..})));
        assert!(matches!(Range::new([1.0], [1.0], [2]), Err(Error::InvalidRange {axis: 0, ..})));
        assert!(matches!(Range::new([0.0, 2.0], [1.0, 1.0], [2, 2]), Err(Error::InvalidRange {axis: 1, ..})));
        assert!(matches!(Range::new([0.0], [f64::NAN], [2]), Err(Error::InvalidRange {..})));
        assert!(matches!(Range::new([0.0], [1.0], [1]), Err(Error::InvalidRange {..})));
        assert!(matches!(Range::new([0.0], [1.0], [0]), Err(Error::SizeMismatch {..})));
    }

    #[test]
    fn rejects_unrepresentable_steps() {
        assert!(matches!(Range::new([-1e308], [1e308], [3]), Err(Error::InvalidRange {axis: 0, ..})));
        assert!(matches!(
            Range::new([0.0, 0.0], [1.0, 1e-310], [2, 3]),
            Err(Error::InvalidRange {axis: 1, ..})
        ));
        let r = Range::new([-1e308], [0.0], [3]).unwrap();
        assert_eq!(r.convert(&Position::Sub(vec![0]), Format::Val).unwrap(), Position::Val(vec![-1e308]));
        assert!(r.axis_samples(0).unwrap().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn all_conversions() {
        let r = unit_square();
        let ind = Position::Ind(3);
        let sub = Position::Sub(vec![1, 1]);
        let val = Position::Val(vec![1.0, 1.0]);
        for from in [&ind, &sub, &val] {
            assert_eq!(&r.convert(from, Format::Ind).unwrap(), &ind);
            assert_eq!(&r.convert(from, Format::Sub).unwrap(), &sub);
            assert_eq!(&r.convert(from, Format::Val).unwrap(), &val);
        }
    }

    #[test]
    fn val_to_ind_rounds() {
        let r = Range::new([0.0], [10.0], [11]).unwrap();
        assert_eq!(r.convert(&Position::Val(vec![3.5]), Format::Ind).unwrap(), Position::Ind(4));
        assert_eq!(r.convert(&Position::Val(vec![3.49]), Format::Sub).unwrap(), Position::Sub(vec![3]));
        assert!(matches!(r.convert(&Position::Val(vec![10.6]), Format::Ind), Err(Error::OutOfRange(_))));
        assert!(matches!(r.convert(&Position::Val(vec![1.0, 2.0]), Format::Ind), Err(Error::SizeMismatch {..})));
    }

    #[test]
    fn val_to_sub_is_fractional() {
        let r = Range::new([-1.0], [1.0], [5]).unwrap();
        assert_eq!(r.val_to_sub(&[0.25]).unwrap(), [2.5]);
        assert_eq!(r.val_to_sub(&[-2.0]).unwrap(), [-2.0]);
    }

    #[test]
    fn single_point_axis() {
        let r = Range::new([0.0, 3.0], [1.0, 3.0], [2, 1]).unwrap();
        assert_eq!(r.val_to_sub(&[0.5, 3.0]).unwrap(), [0.5, 0.0]);
        assert_eq!(r.sub_to_val(&[1.0, 0.0]).unwrap(), [1.0, 3.0]);
        assert_eq!(r.axis_samples(1).unwrap(), [3.0]);
        assert!(r.has(&[0.5, 3.0]));
        assert!(!r.has(&[0.5, 3.1]));
    }

    #[test]
    fn limit_and_has() {
        let r = unit_square();
        assert_eq!(r.limit(&[-0.5, 1.5]), [0.0, 1.0]);
        assert!(r.has(&[0.0, 1.0]));
        assert!(!r.has(&[0.0, 1.0 + 1e-12]));
        assert!(!r.has(&[f64::NAN, 0.0]));
        assert!(!r.has(&[0.5]));
    }

    #[test]
    fn axis_samples() {
        let r = Range::new([0.0, 0.1], [10.0, 0.7], [11, 7]).unwrap();
        assert_eq!(r.axis_samples(0).unwrap(), (0..11).map(|i| i as f64).collect::<Vec<_>>());
        let ys = r.axis_samples(1).unwrap();
        assert_eq!(ys.len(), 7);
        assert_eq!(ys[0], 0.1);
        assert_eq!(ys[6], 0.7);
        assert!(r.axis_samples(2).is_err());
    }

    proptest! {
        #[test]
        fn boundaries_are_exact(
            lo in -1e3f64..1e3,
            width in 1e-3f64..1e3,
            n in 2usize..50,
        ) {
            let r = Range::new([lo, 0.0], [lo + width, 1.0], [n, 2]).unwrap();
            let first = r.convert(&Position::Sub(vec![0, 1]), Format::Val).unwrap();
            let last = r.convert(&Position::Sub(vec![n - 1, 0]), Format::Val).unwrap();
            prop_assert_eq!(first, Position::Val(vec![lo, 1.0]));
            prop_assert_eq!(last, Position::Val(vec![lo + width, 0.0]));
        }

        #[test]
        fn containment_matches_limit(x in -2.0f64..3.0, y in -2.0f64..3.0) {
            let r = Range::new([0.0, -1.0], [1.0, 2.0], [3, 4]).unwrap();
            let v = [x, y];
            prop_assert_eq!(r.has(&v), r.limit(&v) == v);
        }
    }
}

use log::{debug};

use super::{Error, Result, Position, Range, DenseArray, Interp, Extrap, check_len, round_sub};

/// A lookup table approximating a function `f: ℝ^input_dim → ℝ^output_dim`.
///
/// The function is sampled at every point of a regular grid described by a
/// [`Range`]. Each output channel is stored in its own [`DenseArray`], and
/// all channels share the `Range`'s stride table.
///
/// ```
/// use gridlut::{Range, Lut, Position, Interp, Extrap};
/// let range = Range::new([0.0], [10.0], [11]).unwrap();
/// let lut = Lut::from_fn(range, 1, |x| [x[0] * x[0]]).unwrap();
/// let y = lut.get(&Position::Val(vec![3.5]), Interp::Linear, Extrap::NaN).unwrap();
/// assert_eq!(y, [12.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    range: Range,
    channels: Box<[DenseArray<f64>]>,
}

impl Lut {
    /// Constructs a zero-filled `Lut` with `output_dim` output channels.
    ///
    /// Fails with [`Error::Alloc`] rather than aborting if the samples do not
    /// fit in memory.
    pub fn new(range: Range, output_dim: usize) -> Result<Self> {
        if output_dim == 0 {
            return Err(Error::SizeMismatch {what: "output_dim", expected: 1, actual: 0});
        }
        sample_count(&range, output_dim)?;
        debug!("allocating lut: size {:?}, output_dim {}", range.size(), output_dim);
        let mut channels = Vec::new();
        channels.try_reserve_exact(output_dim)?;
        for _ in 0..output_dim {
            channels.push(DenseArray::try_filled(range.index_space().clone(), 0.0)?);
        }
        Ok(Self {range, channels: channels.into()})
    }

    /// Constructs a `Lut` and fills it by calling `f` at every grid point.
    pub fn from_fn<Y: AsRef<[f64]>>(
        range: Range,
        output_dim: usize,
        f: impl FnMut(&[f64]) -> Y,
    ) -> Result<Self> {
        let mut lut = Self::new(range, output_dim)?;
        lut.set_func(f)?;
        Ok(lut)
    }

    pub fn range(&self) -> &Range { &self.range }

    /// The number of input variables, i.e. the rank of the grid.
    pub fn input_dim(&self) -> usize { self.range.rank() }

    /// The number of output channels.
    pub fn output_dim(&self) -> usize { self.channels.len() }

    /// The samples of output channel `k`.
    pub fn channel(&self, k: usize) -> Option<&DenseArray<f64>> { self.channels.get(k) }

    /// Returns the stored output vector at flat index `ind`.
    pub fn sample(&self, ind: usize) -> Result<Vec<f64>> {
        let pos = Position::Ind(ind);
        self.channels.iter().map(|c| c.get(&pos).copied()).collect()
    }

    /// Iterates over `(ind, y)` for every grid point, in order of increasing
    /// flat index.
    pub fn samples(&self) -> impl Iterator<Item=(usize, Vec<f64>)> + '_ {
        (0..self.range.numel()).map(move |ind| {
            (ind, self.channels.iter().map(|c| c.as_ref()[ind]).collect())
        })
    }

    /// Overwrites every sample with `f(val)`, where `val` is the coordinate
    /// of the grid point.
    ///
    /// `f` is called exactly once per grid point, in order of increasing flat
    /// index. Fails if `f` returns a vector whose length is not
    /// `output_dim`, in which case no sample is changed.
    pub fn set_func<Y: AsRef<[f64]>>(&mut self, mut f: impl FnMut(&[f64]) -> Y) -> Result<()> {
        let output_dim = self.output_dim();
        debug!("sampling {} grid points", self.range.numel());
        let mut staged: Vec<f64> = Vec::new();
        staged.try_reserve_exact(sample_count(&self.range, output_dim)?)?;
        for ind in 0..self.range.numel() {
            let val = self.range.to_val(&Position::Ind(ind))?;
            let y = f(&val);
            check_len("output vector", output_dim, y.as_ref().len())?;
            staged.extend_from_slice(y.as_ref());
        }
        for (k, channel) in self.channels.iter_mut().enumerate() {
            let column = staged.iter().skip(k).step_by(output_dim);
            channel.as_mut().iter_mut().zip(column).for_each(|(dst, &y)| *dst = y);
        }
        Ok(())
    }

    /// Stores `y` at the grid point nearest to `pos`.
    ///
    /// Fractional positions are snapped to the nearest grid point, with
    /// halves rounded away from zero.
    pub fn set(&mut self, pos: &Position, y: &[f64]) -> Result<()> {
        check_len("output vector", self.output_dim(), y.len())?;
        let sub = round_sub(&self.range.to_frac_sub(pos)?, self.range.size())?;
        let pos = Position::Sub(sub);
        for (channel, &y) in self.channels.iter_mut().zip(y) {
            channel.set(&pos, y)?;
        }
        Ok(())
    }

    /// Estimates the function at `pos`.
    ///
    /// Out-of-range positions are handled according to `extrap`; the result
    /// is then reconstructed from neighbouring samples according to `interp`.
    ///
    /// `Ind` and `Sub` positions name grid points directly, so they are never
    /// extrapolated; an off-grid one is an error.
    ///
    /// ```
    /// use gridlut::{Range, Lut, Position, Interp, Extrap};
    /// let range = Range::new([0.0, 0.0], [1.0, 1.0], [2, 2]).unwrap();
    /// let lut = Lut::from_fn(range, 1, |v| [v[0] + v[1]]).unwrap();
    /// let centre = Position::Val(vec![0.5, 0.5]);
    /// assert_eq!(lut.get(&centre, Interp::Linear, Extrap::NaN).unwrap(), [1.0]);
    /// let outside = Position::Val(vec![2.0, 0.0]);
    /// assert!(lut.get(&outside, Interp::Linear, Extrap::NaN).unwrap()[0].is_nan());
    /// assert_eq!(lut.get(&outside, Interp::Linear, Extrap::Nearest).unwrap(), [1.0]);
    /// ```
    pub fn get(&self, pos: &Position, interp: Interp, extrap: Extrap) -> Result<Vec<f64>> {
        let frac: Vec<f64> = match pos {
            Position::Val(val) => {
                check_len("coordinate", self.input_dim(), val.len())?;
                let mut val = val.clone();
                if !self.range.has(&val) {
                    match extrap {
                        Extrap::NaN => return Ok(vec![f64::NAN; self.output_dim()]),
                        Extrap::Nearest => { val = self.range.limit(&val); },
                    }
                }
                if let Some(d) = val.iter().position(|v| v.is_nan()) {
                    return Err(Error::OutOfRange(format!("coordinate on axis {} is NaN", d)));
                }
                // `val` is now inside the grid, but rounding can push the
                // subscript just past the last grid point.
                self.range.val_to_sub(&val)?.into_iter()
                    .zip(self.range.size())
                    .map(|(s, &n)| s.clamp(0.0, (n - 1) as f64))
                    .collect()
            },
            _ => self.range.to_frac_sub(pos)?,
        };
        match interp {
            Interp::Nearest => {
                let sub = round_sub(&frac, self.range.size())?;
                self.sample(self.range.index_space().sub_to_ind(&sub)?)
            },
            Interp::Linear => self.linear(&frac),
        }
    }

    /// Equivalent to `self.get(pos, Interp::Linear, Extrap::NaN)`.
    pub fn at(&self, pos: &Position) -> Result<Vec<f64>> {
        self.get(pos, Interp::default(), Extrap::default())
    }

    /// Multilinear interpolation at fractional subscript `frac`, which must
    /// lie within the grid.
    fn linear(&self, frac: &[f64]) -> Result<Vec<f64>> {
        let rank = frac.len();
        let output_dim = self.output_dim();
        let space = self.range.index_space();
        let low: Vec<usize> = frac.iter().map(|x| x.floor() as usize).collect();
        let high: Vec<usize> = frac.iter().map(|x| x.ceil() as usize).collect();
        let weight: Vec<f64> = frac.iter().zip(&low).map(|(x, &lo)| x - lo as f64).collect();

        // Gather the corners of the cell. Bit `d` of a corner number selects
        // `high[d]` rather than `low[d]`.
        let corners = 1usize << rank;
        let mut values = Vec::with_capacity(corners * output_dim);
        let mut sub = vec![0; rank];
        for corner in 0..corners {
            for d in 0..rank {
                sub[d] = if (corner >> d) & 1 == 0 { low[d] } else { high[d] };
            }
            let ind = space.sub_to_ind(&sub)?;
            values.extend(self.channels.iter().map(|c| c.as_ref()[ind]));
        }

        // Collapse one dimension per pass. Corners `2i` and `2i + 1` differ
        // only in the lowest remaining dimension.
        let mut count = corners;
        for &w in &weight {
            count /= 2;
            for i in 0..count {
                for k in 0..output_dim {
                    let v_low = values[(2 * i) * output_dim + k];
                    let v_high = values[(2 * i + 1) * output_dim + k];
                    // On a grid line `v_high` must not contribute, even if
                    // it is infinite.
                    values[i * output_dim + k] = if w == 0.0 { v_low } else { v_low * (1.0 - w) + v_high * w };
                }
            }
        }
        values.truncate(output_dim);
        Ok(values)
    }
}

/// The total number of samples in a `Lut`, if it is addressable.
pub(crate) fn sample_count(range: &Range, output_dim: usize) -> Result<usize> {
    range.numel().checked_mul(output_dim).ok_or_else(|| Error::OutOfRange(
        format!("{} grid points with {} outputs is too many samples", range.numel(), output_dim)
    ))
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{Format};

    fn square_1d() -> Lut {
        let range = Range::new([0.0], [10.0], [11]).unwrap();
        Lut::from_fn(range, 1, |x| [x[0] * x[0]]).unwrap()
    }

    fn corners_2d() -> Lut {
        let range = Range::new([0.0, 0.0], [1.0, 1.0], [2, 2]).unwrap();
        let mut lut = Lut::new(range, 1).unwrap();
        lut.set(&Position::Sub(vec![0, 0]), &[0.0]).unwrap();
        lut.set(&Position::Sub(vec![1, 0]), &[1.0]).unwrap();
        lut.set(&Position::Sub(vec![0, 1]), &[1.0]).unwrap();
        lut.set(&Position::Sub(vec![1, 1]), &[2.0]).unwrap();
        lut
    }

    #[test_log::test]
    fn linear_1d() {
        let lut = square_1d();
        assert_eq!(lut.get(&Position::Val(vec![3.5]), Interp::Linear, Extrap::NaN).unwrap(), [12.5]);
        assert_eq!(lut.at(&Position::Val(vec![10.0])).unwrap(), [100.0]);
        assert_eq!(lut.at(&Position::Val(vec![0.0])).unwrap(), [0.0]);
    }

    #[test_log::test]
    fn bilinear_2d() {
        let lut = corners_2d();
        assert_eq!(lut.get(&Position::Val(vec![0.5, 0.5]), Interp::Linear, Extrap::NaN).unwrap(), [1.0]);
        assert_eq!(lut.get(&Position::Val(vec![0.25, 0.0]), Interp::Linear, Extrap::NaN).unwrap(), [0.25]);
        assert_eq!(lut.get(&Position::Val(vec![1.0, 0.5]), Interp::Linear, Extrap::NaN).unwrap(), [1.5]);
    }

    #[test]
    fn nearest_interp() {
        let lut = square_1d();
        assert_eq!(lut.get(&Position::Val(vec![3.4]), Interp::Nearest, Extrap::NaN).unwrap(), [9.0]);
        // Halves round away from zero.
        assert_eq!(lut.get(&Position::Val(vec![3.5]), Interp::Nearest, Extrap::NaN).unwrap(), [16.0]);
    }

    #[test]
    fn extrapolation() {
        let lut = corners_2d();
        let outside = Position::Val(vec![0.5, -0.1]);
        let y = lut.get(&outside, Interp::Linear, Extrap::NaN).unwrap();
        assert_eq!(y.len(), 1);
        assert!(y[0].is_nan());
        assert_eq!(lut.get(&outside, Interp::Linear, Extrap::Nearest).unwrap(), [0.5]);
        let far = Position::Val(vec![5.0, 5.0]);
        assert_eq!(lut.get(&far, Interp::Nearest, Extrap::Nearest).unwrap(), [2.0]);
        assert!(matches!(
            lut.get(&Position::Val(vec![f64::NAN, 0.0]), Interp::Linear, Extrap::Nearest),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn set_snaps_to_grid() {
        let range = Range::new([0.0], [1.0], [3]).unwrap();
        let mut lut = Lut::new(range, 2).unwrap();
        lut.set(&Position::Val(vec![0.74]), &[1.0, -1.0]).unwrap();
        assert_eq!(lut.sample(1).unwrap(), [1.0, -1.0]);
        lut.set(&Position::Val(vec![0.76]), &[2.0, -2.0]).unwrap();
        assert_eq!(lut.sample(2).unwrap(), [2.0, -2.0]);
        assert!(matches!(lut.set(&Position::Ind(0), &[1.0]), Err(Error::SizeMismatch {..})));
        assert!(matches!(lut.set(&Position::Val(vec![1.3]), &[0.0, 0.0]), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn channels_are_independent() {
        let range = Range::new([0.0, 0.0], [2.0, 1.0], [3, 2]).unwrap();
        let lut = Lut::from_fn(range, 3, |v| vec![v[0], v[1], v[0] * v[1]]).unwrap();
        assert_eq!(lut.input_dim(), 2);
        assert_eq!(lut.output_dim(), 3);
        assert_eq!(lut.at(&Position::Val(vec![1.5, 0.5])).unwrap(), [1.5, 0.5, 0.75]);
        assert_eq!(lut.channel(2).unwrap().as_ref(), [0.0, 0.0, 0.0, 0.0, 1.0, 2.0]);
        assert!(lut.channel(3).is_none());
    }

    #[test]
    fn fill_visits_every_point_once() {
        let range = Range::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2, 3, 4]).unwrap();
        let mut calls = Vec::new();
        let lut = Lut::from_fn(range.clone(), 1, |v| {
            calls.push(v.to_vec());
            [calls.len() as f64]
        }).unwrap();
        assert_eq!(calls.len(), range.numel());
        for (ind, y) in lut.samples() {
            assert_eq!(y, [(ind + 1) as f64]);
            assert_eq!(calls[ind], range.to_val(&Position::Ind(ind)).unwrap());
        }
    }

    #[test]
    fn wrong_output_length() {
        let range = Range::new([0.0], [1.0], [2]).unwrap();
        assert!(matches!(Lut::from_fn(range.clone(), 2, |_| [0.0]), Err(Error::SizeMismatch {..})));
        assert!(matches!(Lut::new(range, 0), Err(Error::SizeMismatch {..})));
    }

    #[test]
    fn failed_fill_changes_nothing() {
        let mut lut = square_1d();
        let before = lut.clone();
        let mut calls = 0;
        let result = lut.set_func(|x| {
            calls += 1;
            if calls == 3 { vec![0.0, 0.0] } else { vec![-x[0]] }
        });
        assert!(matches!(result, Err(Error::SizeMismatch {expected: 1, actual: 2, ..})));
        assert_eq!(calls, 3);
        assert_eq!(lut, before);
    }

    #[test]
    fn too_many_outputs_is_an_error() {
        let range = Range::new([0.0], [0.0], [1]).unwrap();
        assert!(matches!(Lut::new(range.clone(), usize::MAX), Err(Error::Alloc(_))));
        let range = Range::new([0.0], [1.0], [3]).unwrap();
        assert!(matches!(Lut::new(range, usize::MAX), Err(Error::OutOfRange(_))));
    }

    #[test]
    fn infinite_neighbour_on_grid_line() {
        let range = Range::new([0.0], [2.0], [3]).unwrap();
        let lut = Lut::from_fn(range, 1, |x| [1.0 / x[0]]).unwrap();
        assert_eq!(lut.sample(0).unwrap(), [f64::INFINITY]);
        for pos in [Position::Sub(vec![1]), Position::Val(vec![1.0])] {
            assert_eq!(lut.get(&pos, Interp::Linear, Extrap::NaN).unwrap(), [1.0]);
        }
        let corner = Position::Sub(vec![0]);
        assert_eq!(lut.get(&corner, Interp::Linear, Extrap::NaN).unwrap(), [f64::INFINITY]);
        assert_eq!(
            lut.get(&corner, Interp::Linear, Extrap::NaN).unwrap(),
            lut.get(&corner, Interp::Nearest, Extrap::NaN).unwrap(),
        );
    }

    #[test]
    fn degenerate_axis() {
        let range = Range::new([0.0, 5.0], [1.0, 5.0], [2, 1]).unwrap();
        let lut = Lut::from_fn(range, 1, |v| [v[0] + v[1]]).unwrap();
        assert_eq!(lut.at(&Position::Val(vec![0.5, 5.0])).unwrap(), [5.5]);
        assert_eq!(lut.get(&Position::Val(vec![0.5, 6.0]), Interp::Linear, Extrap::Nearest).unwrap(), [5.5]);
    }

    #[test]
    fn every_format_reaches_the_same_sample() {
        let lut = square_1d();
        for pos in [Position::Ind(7), Position::Sub(vec![7]), Position::Val(vec![7.0])] {
            assert_eq!(lut.at(&pos).unwrap(), [49.0]);
        }
        let r = lut.range();
        assert_eq!(r.convert(&Position::Ind(7), Format::Val).unwrap(), Position::Val(vec![7.0]));
    }

    proptest! {
        #[test]
        fn exact_on_grid(a in 0usize..4, b in 0usize..3, c in 0usize..2) {
            let range = Range::new([-1.0, 0.0, 2.0], [1.0, 0.3, 7.0], [4, 3, 2]).unwrap();
            let lut = Lut::from_fn(range, 2, |v| [v[0].sin() + v[1], v[2].exp()]).unwrap();
            let pos = Position::Sub(vec![a, b, c]);
            let ind = lut.range().index_space().sub_to_ind(&[a, b, c]).unwrap();
            let stored = lut.sample(ind).unwrap();
            for extrap in [Extrap::NaN, Extrap::Nearest] {
                prop_assert_eq!(&lut.get(&pos, Interp::Linear, extrap).unwrap(), &stored);
                prop_assert_eq!(&lut.get(&pos, Interp::Nearest, extrap).unwrap(), &stored);
            }
        }

        #[test]
        fn clamped_matches_boundary(x in -5.0f64..15.0) {
            let lut = square_1d();
            let clamped = lut.range().limit(&[x]);
            let y = lut.get(&Position::Val(vec![x]), Interp::Linear, Extrap::Nearest).unwrap();
            prop_assert_eq!(y, lut.at(&Position::Val(clamped)).unwrap());
        }
    }
}

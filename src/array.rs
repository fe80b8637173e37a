use super::{Result, Position, IndexSpace, check_len};

/// A dense array of `T`s addressed by flat index or by subscript.
///
/// The `T` values are stored in a `Box<[T]>` in the order defined by the
/// array's [`IndexSpace`].
///
/// ```
/// use gridlut::{IndexSpace, DenseArray, Position};
/// let space = IndexSpace::new(vec![2, 3]).unwrap();
/// let mut a = DenseArray::new(space, vec![0, 1, 2, 3, 4, 5]).unwrap();
/// assert_eq!(*a.get(&Position::Sub(vec![1, 2])).unwrap(), 5);
/// a.set(&Position::Ind(2), 7).unwrap();
/// assert_eq!(*a.get(&Position::Sub(vec![0, 1])).unwrap(), 7);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DenseArray<T> {
    space: IndexSpace,
    items: Box<[T]>,
}

impl<T> DenseArray<T> {
    /// Constructs a `DenseArray` given its elements.
    ///
    /// Fails if the number of elements is not `space.numel()`.
    pub fn new(space: IndexSpace, items: impl Into<Box<[T]>>) -> Result<Self> {
        let items = items.into();
        check_len("array data", space.numel(), items.len())?;
        Ok(Self {space, items})
    }

    /// Constructs a `DenseArray` with every element equal to `value`.
    pub fn filled(space: IndexSpace, value: T) -> Self where T: Clone {
        let items = vec![value; space.numel()].into();
        Self {space, items}
    }

    /// Like [`Self::filled()`], but reports an allocation failure as
    /// [`Error::Alloc`] instead of aborting.
    ///
    /// [`Error::Alloc`]: super::Error::Alloc
    pub fn try_filled(space: IndexSpace, value: T) -> Result<Self> where T: Clone {
        let mut items = Vec::new();
        items.try_reserve_exact(space.numel())?;
        items.resize(space.numel(), value);
        Ok(Self {space, items: items.into()})
    }

    /// Constructs a `DenseArray` from a function of the subscripts.
    ///
    /// `f` is called once per element, in order of increasing flat index.
    ///
    /// ```
    /// use gridlut::{IndexSpace, DenseArray};
    /// let space = IndexSpace::new(vec![3, 2]).unwrap();
    /// let a = DenseArray::from_fn(space, |sub| 10 * sub[1] + sub[0]);
    /// assert_eq!(a.as_ref(), [0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn(space: IndexSpace, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let mut items = Vec::with_capacity(space.numel());
        space.each(|sub| items.push(f(sub)));
        Self {space, items: items.into()}
    }

    pub fn space(&self) -> &IndexSpace { &self.space }

    /// The number of elements.
    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Returns the raw array elements.
    pub fn to_raw(self) -> Box<[T]> { self.items }

    /// Returns the element at `pos`, which must be an `Ind` or a `Sub`.
    pub fn get(&self, pos: &Position) -> Result<&T> {
        Ok(&self.items[self.space.resolve(pos)?])
    }

    pub fn get_mut(&mut self, pos: &Position) -> Result<&mut T> {
        Ok(&mut self.items[self.space.resolve(pos)?])
    }

    /// Overwrites the element at `pos`.
    pub fn set(&mut self, pos: &Position, value: T) -> Result<()> {
        *self.get_mut(pos)? = value;
        Ok(())
    }
}

impl<T> std::convert::AsRef<[T]> for DenseArray<T> {
    fn as_ref(&self) -> &[T] { &self.items }
}

impl<T> std::convert::AsMut<[T]> for DenseArray<T> {
    fn as_mut(&mut self) -> &mut [T] { &mut self.items }
}

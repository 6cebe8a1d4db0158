use super::{Layout, Result};

/// Implemented by types that can address a single element of an
/// [`NdArray`].
///
/// Each component counts from the end of its axis if negative. The number of
/// components must equal the number of axes of the array.
///
/// [`NdArray`]: super::NdArray
///
/// ```
/// use numview::NdArray;
/// let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 4]).unwrap();
/// assert_eq!(a.get((1, 2)), Ok(6));
/// assert_eq!(a.get([-1, -1]), Ok(11));
/// assert_eq!(a.get(&[2isize, 0][..]), Ok(8));
/// ```
pub trait NdIndex {
    /// Returns the buffer position of `self` in `layout`.
    fn offset_in(self, layout: &Layout) -> Result<usize>;
}

impl NdIndex for isize {
    fn offset_in(self, layout: &Layout) -> Result<usize> { layout.offset_of(&[self]) }
}

impl NdIndex for (isize, isize) {
    fn offset_in(self, layout: &Layout) -> Result<usize> { layout.offset_of(&[self.0, self.1]) }
}

impl NdIndex for (isize, isize, isize) {
    fn offset_in(self, layout: &Layout) -> Result<usize> {
        layout.offset_of(&[self.0, self.1, self.2])
    }
}

impl<const N: usize> NdIndex for [isize; N] {
    fn offset_in(self, layout: &Layout) -> Result<usize> { layout.offset_of(&self) }
}

impl NdIndex for &[isize] {
    fn offset_in(self, layout: &Layout) -> Result<usize> { layout.offset_of(self) }
}

impl NdIndex for () {
    fn offset_in(self, layout: &Layout) -> Result<usize> { layout.offset_of(&[]) }
}

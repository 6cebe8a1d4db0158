use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use num_traits::{PrimInt};

use super::{Element, Error, NdArray, Result};
use super::int::{count_steps};

/// A basic slice along one axis: `start..end` taking every `step`th element.
///
/// Bounds follow the usual conventions: negative bounds count from the end of
/// the axis, out-of-range bounds are clamped, and a negative `step` walks
/// backwards. Missing bounds mean "from the beginning" and "to the end" in
/// the direction of `step`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Slice {
    start: Option<isize>,
    end: Option<isize>,
    step: isize,
}

impl Slice {
    /// Fails with [`Error::InvalidSlice`] if `step` is zero.
    pub fn new(start: Option<isize>, end: Option<isize>, step: isize) -> Result<Self> {
        if step == 0 { return Err(Error::InvalidSlice); }
        Ok(Self {start, end, step})
    }

    /// The whole axis, equivalent to `..`.
    pub fn full() -> Self { Self {start: None, end: None, step: 1} }

    pub fn step(&self) -> isize { self.step }

    /// Returns the first index selected on an axis of length `len`, and the
    /// number of indices selected.
    pub fn resolve(&self, len: usize) -> Result<(isize, usize)> {
        let n = len as isize;
        let clamp = |bound: isize, lo: isize, hi: isize| {
            let bound = if bound < 0 { bound + n } else { bound };
            bound.clamp(lo, hi)
        };
        match self.step {
            0 => Err(Error::InvalidSlice),
            step if step > 0 => {
                let start = self.start.map_or(0, |s| clamp(s, 0, n));
                let end = self.end.map_or(n, |e| clamp(e, 0, n));
                Ok((start, count_steps(end - start, step as usize)))
            },
            step => {
                let start = self.start.map_or(n - 1, |s| clamp(s, -1, n - 1));
                let end = self.end.map_or(-1, |e| clamp(e, -1, n - 1));
                Ok((start, count_steps(start - end, step.unsigned_abs())))
            },
        }
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self { Self::full() }
}

impl From<Range<isize>> for Slice {
    fn from(r: Range<isize>) -> Self { Self {start: Some(r.start), end: Some(r.end), step: 1} }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(r: RangeFrom<isize>) -> Self { Self {start: Some(r.start), end: None, step: 1} }
}

impl From<RangeTo<isize>> for Slice {
    fn from(r: RangeTo<isize>) -> Self { Self {start: None, end: Some(r.end), step: 1} }
}

// ----------------------------------------------------------------------------

/// The indices held by an array used as an index key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexArray {
    pub(crate) shape: Vec<usize>,
    pub(crate) values: Vec<isize>,
}

impl IndexArray {
    /// Values that do not fit in an `isize` can never be in bounds, and
    /// become `isize::MAX`.
    pub fn new<I: Element + PrimInt>(indices: &NdArray<I>) -> Self {
        Self {
            shape: indices.shape().to_vec(),
            values: indices.to_vec().into_iter().map(|i| i.to_isize().unwrap_or(isize::MAX)).collect(),
        }
    }

    pub fn shape(&self) -> &[usize] { &self.shape }
}

/// One component of a multi-axis index passed to [`NdArray::select()`].
///
/// `Index` and `Slice` keys are "basic": an index made only of them selects a
/// view. An `Array` key is "advanced", and forces a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single position; the axis is removed from the result.
    Index(isize),
    Slice(Slice),
    /// An array of positions, selected element-wise.
    Array(IndexArray),
}

impl Key {
    /// Uses `indices` as an advanced index.
    pub fn array<I: Element + PrimInt>(indices: &NdArray<I>) -> Self {
        Key::Array(IndexArray::new(indices))
    }

    pub fn is_advanced(&self) -> bool { matches!(self, Key::Array(_)) }
}

impl From<isize> for Key {
    fn from(i: isize) -> Self { Key::Index(i) }
}

impl From<Slice> for Key {
    fn from(s: Slice) -> Self { Key::Slice(s) }
}

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self { Key::Slice(Slice::full()) }
}

impl From<Range<isize>> for Key {
    fn from(r: Range<isize>) -> Self { Key::Slice(r.into()) }
}

impl<I: Element + PrimInt> From<&NdArray<I>> for Key {
    fn from(indices: &NdArray<I>) -> Self { Key::array(indices) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(start: Option<isize>, end: Option<isize>, step: isize, len: usize) -> (isize, usize) {
        Slice::new(start, end, step).unwrap().resolve(len).unwrap()
    }

    #[test]
    fn forwards() {
        assert_eq!(Slice::full().resolve(9), Ok((0, 9)));
        assert_eq!(resolve(Some(2), Some(5), 1, 9), (2, 3));
        assert_eq!(resolve(Some(-3), None, 1, 9), (6, 3));
        assert_eq!(resolve(None, Some(100), 2, 9), (0, 5));
        assert_eq!(resolve(Some(5), Some(2), 1, 9), (5, 0));
    }

    #[test]
    fn backwards() {
        assert_eq!(resolve(None, None, -1, 4), (3, 4));
        assert_eq!(resolve(Some(2), None, -1, 4), (2, 3));
        assert_eq!(resolve(None, Some(0), -2, 5), (4, 2));
        assert_eq!(resolve(Some(-100), None, -1, 4), (-1, 0));
    }

    #[test]
    fn huge_steps() {
        assert_eq!(resolve(None, None, isize::MAX, 5), (0, 1));
        assert_eq!(resolve(Some(isize::MIN), Some(isize::MAX), isize::MAX, 5), (0, 1));
        assert_eq!(resolve(None, None, isize::MIN, 5), (4, 1));
        assert_eq!(resolve(None, None, isize::MIN, 0), (-1, 0));
    }

    #[test]
    fn zero_step() {
        assert_eq!(Slice::new(None, None, 0), Err(Error::InvalidSlice));
    }

    #[test]
    fn ranges() {
        assert_eq!(Slice::from(1..3), Slice::new(Some(1), Some(3), 1).unwrap());
        assert_eq!(Slice::from(..), Slice::full());
        assert_eq!(Key::from(2), Key::Index(2));
        assert_eq!(Key::from(..), Key::Slice(Slice::full()));
    }

    #[test]
    fn index_arrays() {
        let i = NdArray::from_shape_vec(vec![2, 2], vec![0u8, 1, 1, 2]).unwrap();
        let key = Key::array(&i);
        assert!(key.is_advanced());
        assert_eq!(key, Key::Array(IndexArray {shape: vec![2, 2], values: vec![0, 1, 1, 2]}));
        assert!(!Key::Index(0).is_advanced());
    }
}

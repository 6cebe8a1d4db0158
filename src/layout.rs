use super::{Error, Result, Slice};
use super::int::{wrap_index};

/// Returns the strides of a C-ordered (last-axis-fastest) array of `shape`.
///
/// ```
/// use numview::layout::row_major_strides;
/// assert_eq!(row_major_strides(&[3, 4]), [4, 1]);
/// assert_eq!(row_major_strides(&[2, 3, 4]), [12, 4, 1]);
/// ```
pub fn row_major_strides(shape: &[usize]) -> Vec<isize> {
    let mut strides = vec![0; shape.len()];
    let mut step: usize = 1;
    for axis in (0..shape.len()).rev() {
        strides[axis] = step as isize;
        step = step.saturating_mul(shape[axis]).min(isize::MAX as usize);
    }
    strides
}

/// The number of elements of an array of `shape`, or `None` if it does not
/// fit in a `usize`.
pub(crate) fn checked_len(shape: &[usize]) -> Option<usize> {
    if shape.contains(&0) { return Some(0); }
    shape.iter().try_fold(1usize, |n, &d| n.checked_mul(d))
}

/// Calls `f` with every index of an array of `shape`, in row-major order.
///
/// A zero-dimensional shape has exactly one (empty) index. A shape with a
/// zero-length axis has none.
pub fn each_index(shape: &[usize], mut f: impl FnMut(&[usize])) {
    if shape.contains(&0) { return; }
    let mut index = vec![0; shape.len()];
    loop {
        f(&index);
        let mut axis = shape.len();
        loop {
            if axis == 0 { return; }
            axis -= 1;
            index[axis] += 1;
            if index[axis] < shape[axis] { break; }
            index[axis] = 0;
        }
    }
}

/// Resolves a requested shape against an array of `source` shape.
///
/// At most one axis may be `-1`; its length is inferred.
pub(crate) fn resolve_shape(dims: &[isize], source: &[usize]) -> Result<Vec<usize>> {
    let len: usize = source.iter().product();
    let mut inferred = None;
    for (axis, &d) in dims.iter().enumerate() {
        match d {
            -1 if inferred.is_none() => { inferred = Some(axis); },
            d if d >= 0 => {},
            _ => return Err(Error::InvalidShape(dims.to_vec())),
        }
    }
    let mut shape: Vec<usize> = dims.iter().map(|&d| d.max(0) as usize).collect();
    if let Some(axis) = inferred {
        shape[axis] = 1;
        let known = match checked_len(&shape) {
            Some(0) => return Err(Error::InvalidShape(dims.to_vec())),
            Some(known) => known,
            None => return Err(Error::ShapeMismatch(source.to_vec(), shape)),
        };
        shape[axis] = len / known;
    }
    if checked_len(&shape) != Some(len) {
        return Err(Error::ShapeMismatch(source.to_vec(), shape));
    }
    Ok(shape)
}

// ----------------------------------------------------------------------------

/// The mapping from a multi-dimensional index to a position in a buffer.
///
/// The element at `index` lives at `offset + sum(index[k] * strides[k])`.
/// Strides are measured in elements and may be zero or negative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
    shape: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
}

impl Layout {
    /// A C-contiguous layout of `shape` starting at the beginning of a buffer.
    pub fn contiguous(shape: Vec<usize>) -> Self {
        let strides = row_major_strides(&shape);
        Self {shape, strides, offset: 0}
    }

    pub(crate) fn from_parts(shape: Vec<usize>, strides: Vec<isize>, offset: usize) -> Self {
        assert_eq!(shape.len(), strides.len());
        Self {shape, strides, offset}
    }

    pub fn shape(&self) -> &[usize] { &self.shape }

    pub fn strides(&self) -> &[isize] { &self.strides }

    /// The buffer position of the first element.
    pub fn offset(&self) -> usize { self.offset }

    pub fn ndim(&self) -> usize { self.shape.len() }

    /// The number of elements addressed by this layout.
    pub fn len(&self) -> usize { self.shape.iter().product() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns `true` if row-major traversal visits consecutive buffer
    /// positions. Axes of length `1` may have any stride.
    pub fn is_contiguous(&self) -> bool {
        if self.is_empty() { return true; }
        let mut expected = 1isize;
        for axis in (0..self.ndim()).rev() {
            if self.shape[axis] == 1 { continue; }
            if self.strides[axis] != expected { return false; }
            expected *= self.shape[axis] as isize;
        }
        true
    }

    /// Returns the buffer position of the element at `index`, after negative
    /// wraparound.
    pub fn offset_of(&self, index: &[isize]) -> Result<usize> {
        if index.len() != self.ndim() {
            return Err(Error::DimensionMismatch {expected: self.ndim(), found: index.len()});
        }
        let mut position = self.offset as isize;
        for (axis, &i) in index.iter().enumerate() {
            let i = wrap_index(i, self.shape[axis], axis)?;
            position += i as isize * self.strides[axis];
        }
        Ok(position as usize)
    }

    /// Calls `f` with the buffer position of every element, in row-major
    /// order.
    pub fn each_offset(&self, mut f: impl FnMut(usize)) {
        each_index(&self.shape, |index| {
            let position = index.iter().zip(&self.strides)
                .fold(self.offset as isize, |p, (&i, &s)| p + i as isize * s);
            f(position as usize);
        });
    }

    /// The same buffer positions seen with a different shape, if this layout
    /// is contiguous. The element count of `shape` must equal `self.len()`.
    pub(crate) fn reshaped(&self, shape: Vec<usize>) -> Option<Self> {
        debug_assert_eq!(shape.iter().product::<usize>(), self.len());
        if !self.is_contiguous() { return None; }
        Some(Self {strides: row_major_strides(&shape), shape, offset: self.offset})
    }

    /// Reverses the order of the axes.
    pub fn reversed(&self) -> Self {
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.reverse();
        strides.reverse();
        Self {shape, strides, offset: self.offset}
    }

    /// Reorders the axes so that axis `k` of the result is axis `axes[k]` of
    /// `self`.
    pub fn permuted(&self, axes: &[usize]) -> Result<Self> {
        let mut seen = vec![false; self.ndim()];
        let valid = axes.len() == self.ndim() && axes.iter().all(|&a| {
            a < seen.len() && !std::mem::replace(&mut seen[a], true)
        });
        if !valid {
            return Err(Error::InvalidAxes {axes: axes.to_vec(), rank: self.ndim()});
        }
        Ok(Self {
            shape: axes.iter().map(|&a| self.shape[a]).collect(),
            strides: axes.iter().map(|&a| self.strides[a]).collect(),
            offset: self.offset,
        })
    }

    /// Applies one [`Slice`] per leading axis. Axes beyond `slices.len()` are
    /// kept whole.
    pub fn sliced(&self, slices: &[Slice]) -> Result<Self> {
        if slices.len() > self.ndim() {
            return Err(Error::DimensionMismatch {expected: self.ndim(), found: slices.len()});
        }
        let mut result = self.clone();
        for (axis, slice) in slices.iter().enumerate() {
            let (start, len) = slice.resolve(self.shape[axis])?;
            if len > 0 {
                result.offset = (result.offset as isize + start * self.strides[axis]) as usize;
            }
            result.shape[axis] = len;
            // The stride of an axis of length 0 or 1 is never used.
            result.strides[axis] = if len > 1 { self.strides[axis] * slice.step() } else { 0 };
        }
        Ok(result)
    }

    /// Removes `axis`, fixing its index to `index` (after wraparound).
    pub(crate) fn indexed(&self, axis: usize, index: isize) -> Result<Self> {
        let i = wrap_index(index, self.shape[axis], axis)?;
        let mut result = self.clone();
        result.offset = (self.offset as isize + i as isize * self.strides[axis]) as usize;
        result.shape.remove(axis);
        result.strides.remove(axis);
        Ok(result)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_order() {
        let mut seen = Vec::new();
        each_index(&[2, 3], |i| seen.push(i.to_vec()));
        assert_eq!(seen, [[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]);

        let mut count = 0;
        each_index(&[], |i| { assert!(i.is_empty()); count += 1; });
        assert_eq!(count, 1);
        each_index(&[3, 0], |_| panic!("no elements"));
    }

    #[test]
    fn contiguity() {
        let l = Layout::contiguous(vec![3, 4]);
        assert!(l.is_contiguous());
        assert!(!l.reversed().is_contiguous());
        assert!(Layout::contiguous(vec![9]).reversed().is_contiguous());
        assert!(Layout::contiguous(vec![9, 1]).reversed().is_contiguous());
        let every_other = l.sliced(&[Slice::full(), Slice::new(None, None, 2).unwrap()]).unwrap();
        assert!(!every_other.is_contiguous());
    }

    #[test]
    fn offsets() {
        let l = Layout::contiguous(vec![3, 4]);
        assert_eq!(l.offset_of(&[1, 2]), Ok(6));
        assert_eq!(l.offset_of(&[-1, -1]), Ok(11));
        assert_eq!(l.reversed().offset_of(&[2, 1]), Ok(6));
        assert!(matches!(l.offset_of(&[3, 0]), Err(Error::IndexOutOfBounds {axis: 0, ..})));
        assert!(matches!(l.offset_of(&[0]), Err(Error::DimensionMismatch {expected: 2, found: 1})));

        let mut positions = Vec::new();
        l.reversed().each_offset(|p| positions.push(p));
        assert_eq!(positions, [0, 4, 8, 1, 5, 9, 2, 6, 10, 3, 7, 11]);
    }

    #[test]
    fn negative_step() {
        let l = Layout::contiguous(vec![5]).sliced(&[Slice::new(None, None, -2).unwrap()]).unwrap();
        let mut positions = Vec::new();
        l.each_offset(|p| positions.push(p));
        assert_eq!(positions, [4, 2, 0]);
    }

    #[test]
    fn shapes() {
        assert_eq!(resolve_shape(&[9, -1], &[9]), Ok(vec![9, 1]));
        assert_eq!(resolve_shape(&[-1, 3], &[3, 3]), Ok(vec![3, 3]));
        assert_eq!(resolve_shape(&[2, 5], &[9]), Err(Error::ShapeMismatch(vec![9], vec![2, 5])));
        assert_eq!(resolve_shape(&[2, -1], &[9]), Err(Error::ShapeMismatch(vec![9], vec![2, 4])));
        assert_eq!(resolve_shape(&[-1, -1], &[9]), Err(Error::InvalidShape(vec![-1, -1])));
        assert_eq!(resolve_shape(&[-2, 3], &[6]), Err(Error::InvalidShape(vec![-2, 3])));
        assert!(matches!(resolve_shape(&[isize::MAX, 4], &[4]), Err(Error::ShapeMismatch(..))));
        assert!(matches!(resolve_shape(&[-1, isize::MAX, 4], &[4]), Err(Error::ShapeMismatch(..))));
        assert_eq!(resolve_shape(&[0, isize::MAX, 4], &[0]), Ok(vec![0, isize::MAX as usize, 4]));
        assert_eq!(checked_len(&[usize::MAX, 2]), None);
        assert_eq!(checked_len(&[usize::MAX, 0, 2]), Some(0));
    }

    #[test]
    fn huge_steps() {
        let l = Layout::contiguous(vec![5]);
        let first = l.sliced(&[Slice::new(None, None, isize::MAX).unwrap()]).unwrap();
        assert_eq!(first.shape(), [1]);
        assert_eq!(first.offset(), 0);
        let last = l.sliced(&[Slice::new(None, None, isize::MIN).unwrap()]).unwrap();
        assert_eq!(last.shape(), [1]);
        assert_eq!(last.offset(), 4);
        assert_eq!(row_major_strides(&[0, usize::MAX, 4]), [isize::MAX, 4, 1]);
    }

    #[test]
    fn permutations() {
        let l = Layout::contiguous(vec![2, 3, 4]);
        let p = l.permuted(&[2, 0, 1]).unwrap();
        assert_eq!(p.shape(), [4, 2, 3]);
        assert_eq!(p.strides(), [1, 12, 4]);
        assert!(l.permuted(&[0, 0, 1]).is_err());
        assert!(l.permuted(&[0, 1]).is_err());
        assert!(l.permuted(&[0, 1, 3]).is_err());
    }
}

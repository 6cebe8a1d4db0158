use num_traits::{PrimInt};

use super::{broadcast_shapes, Element, Error, Key, Layout, NdArray, Result, Slice};
use super::int::{wrap_index};
use super::layout::{each_index};

impl<T: Element> NdArray<T> {
    /// Indexes `self` with one [`Key`] per leading axis. Axes beyond
    /// `keys.len()` are kept whole.
    ///
    /// If every key is an `Index` or a `Slice` the result is a view. If any
    /// key is an `Array`, the selected elements are in general not a single
    /// strided pattern over the buffer, so the result is a copy.
    ///
    /// Array keys and `Index` keys are broadcast together to a common shape.
    /// If they are adjacent, that shape replaces their axes in place;
    /// otherwise it comes first, followed by the sliced axes.
    ///
    /// ```
    /// use numview::{Key, NdArray};
    /// let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 4]).unwrap();
    /// let row = a.select(&[Key::Index(1)]).unwrap();
    /// assert!(row.shares_memory(&a));
    /// assert_eq!(row.to_vec(), [4, 5, 6, 7]);
    ///
    /// let j = NdArray::from_vec(vec![3, 0]);
    /// let picked = a.select(&[Key::from(..), Key::array(&j)]).unwrap();
    /// assert!(!picked.shares_memory(&a));
    /// assert_eq!(picked.to_vec(), [3, 0, 7, 4, 11, 8]);
    /// ```
    pub fn select(&self, keys: &[Key]) -> Result<Self> {
        if keys.len() > self.ndim() {
            return Err(Error::DimensionMismatch {expected: self.ndim(), found: keys.len()});
        }
        if keys.iter().any(Key::is_advanced) {
            self.select_advanced(keys)
        } else {
            self.select_basic(keys)
        }
    }

    fn select_basic(&self, keys: &[Key]) -> Result<Self> {
        let slices: Vec<Slice> = keys.iter().map(|key| match key {
            Key::Slice(s) => *s,
            _ => Slice::full(),
        }).collect();
        let mut layout = self.layout().sliced(&slices)?;
        // Remove indexed axes from the back, so earlier axis numbers stay valid.
        for (axis, key) in keys.iter().enumerate().rev() {
            if let Key::Index(i) = key { layout = layout.indexed(axis, *i)?; }
        }
        Ok(self.with_layout(layout))
    }

    fn select_advanced(&self, keys: &[Key]) -> Result<Self> {
        let source = self.layout();
        let scalar = Layout::contiguous(vec![]);

        // Per advanced axis: its number, and its index layout and values.
        let mut advanced: Vec<(usize, Layout, &[isize])> = Vec::new();
        let mut sliced_shape = Vec::new();
        let mut sliced_strides = Vec::new();
        let mut offset = source.offset() as isize;
        for axis in 0..self.ndim() {
            let stride = source.strides()[axis];
            match keys.get(axis) {
                Some(Key::Array(a)) => {
                    advanced.push((axis, Layout::contiguous(a.shape.clone()), a.values.as_slice()));
                },
                Some(Key::Index(i)) => {
                    advanced.push((axis, scalar.clone(), std::slice::from_ref(i)));
                },
                key => {
                    let slice = match key { Some(Key::Slice(s)) => *s, _ => Slice::full() };
                    let (start, len) = slice.resolve(source.shape()[axis])?;
                    if len > 0 { offset += start * stride; }
                    sliced_shape.push(len);
                    sliced_strides.push(if len > 1 { stride * slice.step() } else { 0 });
                },
            }
        }

        let shapes: Vec<&[usize]> = advanced.iter().map(|(_, l, _)| l.shape()).collect();
        let indexed_shape = broadcast_shapes(&shapes)?;
        let indexed_len: usize = indexed_shape.iter().product();

        // The element offset contributed by the advanced axes, for each
        // position in `indexed_shape`.
        let mut indexed_offsets = vec![0isize; indexed_len];
        for (axis, layout, values) in &advanced {
            let size = source.shape()[*axis];
            let stride = source.strides()[*axis];
            let mut k = 0;
            let mut result = Ok(());
            layout.broadcast_to(&indexed_shape)?.each_offset(|p| {
                match wrap_index(values[p], size, *axis) {
                    Ok(i) => { indexed_offsets[k] += i as isize * stride; },
                    Err(e) => if result.is_ok() { result = Err(e); },
                }
                k += 1;
            });
            result?;
        }

        let axes: Vec<usize> = advanced.iter().map(|(axis, _, _)| *axis).collect();
        let adjacent = axes.windows(2).all(|w| w[1] == w[0] + 1);
        // Every axis before the first advanced one is sliced.
        let insert_at = if adjacent { axes[0] } else { 0 };

        let mut shape = sliced_shape;
        shape.splice(insert_at..insert_at, indexed_shape.iter().copied());
        let block = insert_at..insert_at + indexed_shape.len();
        let indexed_strides: Vec<usize> = Layout::contiguous(indexed_shape.clone())
            .strides().iter().map(|&s| s as usize).collect();

        let buffer = self.read();
        let mut items = Vec::with_capacity(shape.iter().product());
        each_index(&shape, |index| {
            let k: usize = index[block.clone()].iter().zip(&indexed_strides).map(|(i, s)| i * s).sum();
            let sliced = index[..block.start].iter().chain(&index[block.end..]);
            let position = sliced.zip(&sliced_strides)
                .fold(offset + indexed_offsets[k], |p, (&i, &s)| p + i as isize * s);
            items.push(buffer[position as usize]);
        });
        log::trace!("advanced index of {:?} selected shape {:?}", self.shape(), shape);
        Ok(Self::owned(shape, items))
    }

    /// Returns the array whose element `k` is `self[rows[k], cols[k]]`.
    ///
    /// `rows` and `cols` are broadcast to a common shape, which is the shape
    /// of the result (followed by any axes of `self` beyond the second). The
    /// result is always a copy.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 4]).unwrap();
    /// let i = NdArray::from_shape_vec(vec![2, 2], vec![0, 1, 1, 2]).unwrap();
    /// let j = NdArray::from_shape_vec(vec![2, 2], vec![2, 1, 3, 3]).unwrap();
    /// let b = a.index_by_arrays(&i, &j).unwrap();
    /// assert_eq!(b.shape(), [2, 2]);
    /// assert_eq!(b.to_vec(), [2, 5, 7, 11]);
    /// ```
    pub fn index_by_arrays<I: Element + PrimInt>(&self, rows: &NdArray<I>, cols: &NdArray<I>) -> Result<Self> {
        self.select(&[Key::array(rows), Key::array(cols)])
    }

    /// Returns `self[rows, col]`: the second axis is fixed at `col`, and the
    /// first is indexed by `rows`. The result is always a copy.
    pub fn index_by_array_and_scalar<I: Element + PrimInt>(&self, rows: &NdArray<I>, col: isize) -> Result<Self> {
        self.select(&[Key::array(rows), Key::Index(col)])
    }

    /// Returns `self[:, cols]`: every row is indexed by all of `cols`, so the
    /// result has shape `[rows] + cols.shape()`. The result is always a copy.
    pub fn index_on_free_axis<I: Element + PrimInt>(&self, cols: &NdArray<I>) -> Result<Self> {
        self.select(&[Key::from(..), Key::array(cols)])
    }

    /// Like [`index_by_arrays()`], but with the index arrays stacked along the
    /// first axis of `stacked`, one per axis of `self`.
    ///
    /// [`index_by_arrays()`]: Self::index_by_arrays()
    pub fn index_by_stacked_arrays<I: Element + PrimInt>(&self, stacked: &NdArray<I>) -> Result<Self> {
        let found = stacked.shape().first().copied().unwrap_or(0);
        if stacked.ndim() == 0 || found > self.ndim() {
            return Err(Error::DimensionMismatch {expected: self.ndim(), found});
        }
        let keys = (0..found as isize)
            .map(|k| Ok(Key::array(&stacked.index_axis(0, k)?)))
            .collect::<Result<Vec<_>>>()?;
        self.select(&keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example() -> (NdArray<i32>, NdArray<i32>, NdArray<i32>) {
        let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 4]).unwrap();
        let i = NdArray::from_shape_vec(vec![2, 2], vec![0, 1, 1, 2]).unwrap();
        let j = NdArray::from_shape_vec(vec![2, 2], vec![2, 1, 3, 3]).unwrap();
        (a, i, j)
    }

    #[test]
    fn pairs_are_element_wise() {
        let (a, i, j) = example();
        let b = a.index_by_arrays(&i, &j).unwrap();
        assert_eq!(b.to_string(), "[[ 2  5]\n [ 7 11]]");
        assert!(b.owns_data());
        assert!(!b.shares_memory(&a));
    }

    #[test]
    fn result_is_independent() {
        let (mut a, i, j) = example();
        let mut b = a.index_by_arrays(&i, &j).unwrap();
        b.set((0, 0), 100).unwrap();
        assert_eq!(a.get((0, 2)), Ok(2));
        a.set((1, 1), -5).unwrap();
        assert_eq!(b.get((0, 1)), Ok(5));
    }

    #[test]
    fn stacked_form_agrees() {
        let (a, i, j) = example();
        let s = crate::vstack(&[&i.reshape(&[1, 2, 2]).unwrap(), &j.reshape(&[1, 2, 2]).unwrap()]).unwrap();
        assert_eq!(s.shape(), [2, 2, 2]);
        let b = a.index_by_stacked_arrays(&s).unwrap();
        assert_eq!(b.to_vec(), a.index_by_arrays(&i, &j).unwrap().to_vec());
        let too_many = NdArray::<i32>::zeros(vec![3, 2]);
        assert!(matches!(
            a.index_by_stacked_arrays(&too_many),
            Err(Error::DimensionMismatch {expected: 2, found: 3}),
        ));
    }

    #[test]
    fn array_and_scalar() {
        let (a, i, _) = example();
        let b = a.index_by_array_and_scalar(&i, 2).unwrap();
        assert_eq!(b.to_string(), "[[ 2  6]\n [ 6 10]]");
        let last = a.index_by_array_and_scalar(&i, -1).unwrap();
        assert_eq!(last.to_vec(), [3, 7, 7, 11]);
    }

    #[test]
    fn free_axis() {
        let (a, _, j) = example();
        let b = a.index_on_free_axis(&j).unwrap();
        assert_eq!(b.shape(), [3, 2, 2]);
        assert_eq!(b.to_vec(), [2, 1, 3, 3, 6, 5, 7, 7, 10, 9, 11, 11]);
    }

    #[test]
    fn broadcasting_indices() {
        let (a, _, _) = example();
        let rows = NdArray::from_shape_vec(vec![3, 1], vec![0, 1, 2]).unwrap();
        let cols = NdArray::from_vec(vec![0, 3]);
        let b = a.index_by_arrays(&rows, &cols).unwrap();
        assert_eq!(b.shape(), [3, 2]);
        assert_eq!(b.to_vec(), [0, 3, 4, 7, 8, 11]);
        let bad = NdArray::from_vec(vec![0, 1, 2]);
        assert!(matches!(a.index_by_arrays(&bad, &cols), Err(Error::ShapeMismatch(..))));
    }

    #[test]
    fn out_of_bounds() {
        let (a, i, _) = example();
        let j = NdArray::from_shape_vec(vec![2, 2], vec![0, 4, 0, 0]).unwrap();
        assert_eq!(
            a.index_by_arrays(&i, &j).unwrap_err(),
            Error::IndexOutOfBounds {index: 4, axis: 1, size: 4},
        );
        let negative = NdArray::from_shape_vec(vec![2, 2], vec![-1, -2, -3, -4]).unwrap();
        assert_eq!(a.index_by_arrays(&i, &negative).unwrap().to_vec(), [3, 6, 5, 8]);
    }

    #[test]
    fn separated_advanced_axes_go_first() {
        let a = NdArray::arange(0, 24).unwrap().reshape(&[2, 3, 4]).unwrap();
        let i = NdArray::from_vec(vec![1, 0]);
        let b = a.select(&[Key::array(&i), Key::from(..), Key::Index(2)]).unwrap();
        assert_eq!(b.shape(), [2, 3]);
        assert_eq!(b.get((0, 1)), a.get((1, 1, 2)));
        let c = a.select(&[Key::from(..), Key::array(&i), Key::Index(0)]).unwrap();
        assert_eq!(c.shape(), [2, 2]);
        assert_eq!(c.get((1, 0)), a.get((1, 1, 0)));
    }

    #[test]
    fn basic_keys_are_views() {
        let (a, _, _) = example();
        let mut v = a.select(&[Key::from(1..3), Key::Index(-1)]).unwrap();
        assert_eq!(v.to_vec(), [7, 11]);
        v.fill(0);
        assert_eq!(a.get((2, 3)), Ok(0));
        assert!(a.select(&[Key::Index(0), Key::Index(0), Key::Index(0)]).is_err());
    }
}

use super::{Element, Error, NdArray, Result};
use super::layout::{each_index};

/// Concatenates `arrays` along `axis`.
///
/// All arrays must have the same number of axes, and the same length on every
/// axis except `axis`. The result is always a copy.
///
/// ```
/// use numview::{concatenate, NdArray};
/// let a = NdArray::arange(0, 4).unwrap().reshape(&[2, 2]).unwrap();
/// let b = NdArray::arange(4, 6).unwrap().reshape(&[2, 1]).unwrap();
/// let ab = concatenate(&[&a, &b], 1).unwrap();
/// assert_eq!(ab.to_vec(), [0, 1, 4, 2, 3, 5]);
/// ```
pub fn concatenate<T: Element>(arrays: &[&NdArray<T>], axis: usize) -> Result<NdArray<T>> {
    let first = arrays.first().ok_or(Error::EmptyStack)?;
    let rank = first.ndim();
    if axis >= rank {
        return Err(Error::InvalidAxes {axes: vec![axis], rank});
    }
    let mut shape = first.shape().to_vec();
    shape[axis] = 0;
    for a in arrays {
        let compatible = a.ndim() == rank && (0..rank).all(|k| k == axis || a.shape()[k] == shape[k]);
        if !compatible {
            return Err(Error::ShapeMismatch(first.shape().to_vec(), a.shape().to_vec()));
        }
        shape[axis] += a.shape()[axis];
    }

    // Where each position along `axis` comes from.
    let mut sources = Vec::with_capacity(shape[axis]);
    for (n, a) in arrays.iter().enumerate() {
        sources.extend((0..a.shape()[axis]).map(|i| (n, i as isize)));
    }

    let buffers: Vec<_> = arrays.iter().map(|a| a.read()).collect();
    let mut items = Vec::with_capacity(shape.iter().product());
    let mut source_index = vec![0isize; rank];
    let mut result = Ok(());
    each_index(&shape, |index| {
        for (s, &i) in source_index.iter_mut().zip(index) { *s = i as isize; }
        let (n, i) = sources[index[axis]];
        source_index[axis] = i;
        match arrays[n].layout().offset_of(&source_index) {
            Ok(p) => items.push(buffers[n][p]),
            Err(e) => if result.is_ok() { result = Err(e); },
        }
    });
    result?;
    log::trace!("concatenated {} arrays into shape {:?}", arrays.len(), shape);
    Ok(NdArray::owned(shape, items))
}

/// Stacks `arrays` vertically: row after row.
///
/// One-dimensional arrays are treated as single rows, and zero-dimensional
/// arrays as single elements. Otherwise, this is [`concatenate()`] along the
/// first axis. The result is always a copy, even if there is only one array.
///
/// ```
/// use numview::{vstack, NdArray};
/// let a = NdArray::arange(1, 4).unwrap();
/// let b = NdArray::arange(4, 7).unwrap();
/// let c = vstack(&[&a, &b]).unwrap();
/// assert_eq!(c.shape(), [2, 3]);
/// assert!(c.owns_data());
/// assert!(!c.shares_memory(&a));
/// ```
pub fn vstack<T: Element>(arrays: &[&NdArray<T>]) -> Result<NdArray<T>> {
    let rows = arrays.iter().map(|a| match a.ndim() {
        0 => a.reshape(&[1, 1]),
        1 => a.reshape(&[1, -1]),
        _ => Ok(a.view()),
    }).collect::<Result<Vec<_>>>()?;
    let rows: Vec<&NdArray<T>> = rows.iter().collect();
    concatenate(&rows, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_result_is_disjoint() {
        let mut a = NdArray::arange(1, 10).unwrap().reshape(&[3, 3]).unwrap();
        let mut b = NdArray::arange(11, 20).unwrap().reshape(&[3, 3]).unwrap();
        let c = vstack(&[&a, &b]).unwrap();
        assert_eq!(c.shape(), [6, 3]);
        assert!(c.owns_data());
        assert!(c.base().is_none());
        a.set((1, 1), 10).unwrap();
        b.set((1, 1), 20).unwrap();
        assert_eq!(c.to_vec(), (1..10).chain(11..20).collect::<Vec<_>>());
    }

    #[test]
    fn errors() {
        let a = NdArray::<i32>::zeros(vec![2, 3]);
        let b = NdArray::<i32>::zeros(vec![2, 4]);
        assert!(matches!(vstack(&[&a, &b]), Err(Error::ShapeMismatch(..))));
        assert!(matches!(concatenate(&[&a, &b], 1).map(|c| c.shape().to_vec()), Ok(s) if s == [2, 7]));
        assert!(matches!(concatenate(&[&a, &b], 2), Err(Error::InvalidAxes {rank: 2, ..})));
        assert!(matches!(vstack::<i32>(&[]), Err(Error::EmptyStack)));
        let v = NdArray::<i32>::zeros(vec![3]);
        assert!(matches!(concatenate(&[&a, &v], 0), Err(Error::ShapeMismatch(..))));
    }

    #[test]
    fn mixed_ranks_and_views() {
        let m = NdArray::arange(0, 6).unwrap().reshape(&[2, 3]).unwrap();
        let row = NdArray::from_vec(vec![6, 7, 8]);
        let c = vstack(&[&m.t().t(), &row]).unwrap();
        assert_eq!(c.to_string(), "[[0 1 2]\n [3 4 5]\n [6 7 8]]");
        let cols = concatenate(&[&m.t(), &m.t()], 0).unwrap();
        assert_eq!(cols.to_vec(), [0, 3, 1, 4, 2, 5, 0, 3, 1, 4, 2, 5]);
    }
}

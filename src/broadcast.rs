use super::{Error, Layout, Result};

/// Says what shape results when arrays of the given shapes are combined
/// element-wise.
///
/// Shapes are aligned at their last axis. Roughly speaking, each axis must
/// have the same length in every shape, or length `1`, or be missing. In the
/// latter cases, the array is replicated along that axis to fill out the
/// length of the longest. This is called "broadcasting".
///
/// ```
/// use numview::broadcast_shapes;
/// assert_eq!(broadcast_shapes(&[&[2, 2], &[2, 2]]), Ok(vec![2, 2]));
/// assert_eq!(broadcast_shapes(&[&[2, 2], &[]]), Ok(vec![2, 2]));
/// assert_eq!(broadcast_shapes(&[&[3, 1], &[4]]), Ok(vec![3, 4]));
/// assert!(broadcast_shapes(&[&[3], &[4]]).is_err());
/// ```
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Result<Vec<usize>> {
    let ndim = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result = vec![1; ndim];
    for shape in shapes {
        let skip = ndim - shape.len();
        for (axis, &len) in shape.iter().enumerate() {
            let r = &mut result[skip + axis];
            if *r == 1 {
                *r = len;
            } else if len != 1 && len != *r {
                return Err(Error::ShapeMismatch(shape.to_vec(), result));
            }
        }
    }
    Ok(result)
}

impl Layout {
    /// The same elements replicated to fill `shape`, using zero strides for
    /// the new and the stretched axes.
    pub(crate) fn broadcast_to(&self, shape: &[usize]) -> Result<Layout> {
        let mismatch = || Error::ShapeMismatch(self.shape().to_vec(), shape.to_vec());
        if shape.len() < self.ndim() { return Err(mismatch()); }
        let skip = shape.len() - self.ndim();
        let mut strides = vec![0; shape.len()];
        for axis in 0..self.ndim() {
            let len = self.shape()[axis];
            if len == shape[skip + axis] {
                strides[skip + axis] = self.strides()[axis];
            } else if len != 1 {
                return Err(mismatch());
            }
        }
        Ok(Layout::from_parts(shape.to_vec(), strides, self.offset()))
    }
}

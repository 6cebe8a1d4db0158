//! Index arithmetic on `isize`s, where negative values count from the end.

use super::{Error, Result};

/// Maps `index` into `0..size`, counting backwards from `size` if `index` is
/// negative.
pub(crate) fn wrap_index(index: isize, size: usize, axis: usize) -> Result<usize> {
    let wrapped = if index < 0 { index + size as isize } else { index };
    if wrapped < 0 || wrapped >= size as isize {
        return Err(Error::IndexOutOfBounds {index, axis, size});
    }
    Ok(wrapped as usize)
}

/// `ceil(a / b)` for `b > 0`, or `0` if `a <= 0`.
pub(crate) fn count_steps(a: isize, b: usize) -> usize {
    debug_assert!(b > 0);
    if a <= 0 { 0 } else { (a as usize - 1) / b + 1 }
}

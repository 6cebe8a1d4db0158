//! Text rendering of arrays, in the familiar nested-bracket style.
//!
//! ```
//! use numview::NdArray;
//! let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 4]).unwrap();
//! assert_eq!(a.to_string(), "\
//! [[ 0  1  2  3]
//!  [ 4  5  6  7]
//!  [ 8  9 10 11]]");
//! ```

use std::fmt::{self, Display, Formatter};

use super::{Base, Element, Layout, NdArray};
use super::layout::{each_index};

/// Writes the elements at `layout` in `buffer`.
///
/// Every element is right-aligned to the width of the widest. Sub-arrays are
/// separated by one newline per remaining axis, and indented by their depth.
fn write_array<T: Element>(f: &mut Formatter<'_>, buffer: &[T], layout: &Layout) -> fmt::Result {
    if layout.ndim() > 0 && layout.is_empty() { return write!(f, "[]"); }
    let mut cells = Vec::with_capacity(layout.len());
    layout.each_offset(|p| cells.push(buffer[p].to_string()));
    let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    let shape = layout.shape();
    let ndim = shape.len();
    if ndim == 0 { return write!(f, "{}", cells[0]); }
    let mut cells = cells.iter();
    let mut text = String::new();
    each_index(shape, |index| {
        // Brackets open for every trailing axis whose index is zero.
        let opening = index.iter().rev().take_while(|&&i| i == 0).count();
        if opening == 0 {
            text.push(' ');
        } else if opening < ndim {
            text.push_str(&"\n".repeat(opening));
            text.push_str(&" ".repeat(ndim - opening));
        }
        text.push_str(&"[".repeat(opening));
        let cell = cells.next().map_or("", String::as_str);
        text.push_str(&format!("{:>width$}", cell));
        let closing = index.iter().zip(shape).rev().take_while(|&(&i, &n)| i + 1 == n).count();
        text.push_str(&"]".repeat(closing));
    });
    f.write_str(&text)
}

impl<T: Element> Display for NdArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_array(f, &self.read(), self.layout())
    }
}

impl<'a, T: Element> Display for Base<'a, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_array(f, &self.read(), self.layout())
    }
}

#[cfg(test)]
mod tests {
    use crate::NdArray;

    #[test]
    fn one_dimensional() {
        assert_eq!(NdArray::arange(1, 10).unwrap().to_string(), "[1 2 3 4 5 6 7 8 9]");
        assert_eq!(NdArray::from_vec(vec![1, 10, 3]).to_string(), "[ 1 10  3]");
        assert_eq!(NdArray::from_vec(vec![-1, 2]).to_string(), "[-1  2]");
        assert_eq!(NdArray::<i32>::from_vec(vec![]).to_string(), "[]");
    }

    #[test]
    fn column() {
        let mut a = NdArray::arange(1, 4).unwrap();
        a.set_shape(&[3, 1]).unwrap();
        assert_eq!(a.to_string(), "[[1]\n [2]\n [3]]");
    }

    #[test]
    fn three_dimensional() {
        let a = NdArray::arange(0, 12).unwrap().reshape(&[3, 2, 2]).unwrap();
        assert_eq!(a.to_string(), "\
[[[ 0  1]
  [ 2  3]]

 [[ 4  5]
  [ 6  7]]

 [[ 8  9]
  [10 11]]]");
    }

    #[test]
    fn scalar_and_views() {
        let a = NdArray::from_shape_vec(vec![], vec![42]).unwrap();
        assert_eq!(a.to_string(), "42");
        let b = NdArray::arange(0, 4).unwrap().reshape(&[2, 2]).unwrap();
        assert_eq!(b.t().to_string(), "[[0 2]\n [1 3]]");
        assert_eq!(b.base().unwrap().to_string(), "[0 1 2 3]");
        assert_eq!(NdArray::<u8>::zeros(vec![2, 0]).to_string(), "[]");
    }
}

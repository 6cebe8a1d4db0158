use std::cell::{Ref, RefCell};
use std::fmt::{Debug, Display};
use std::rc::{Rc};

use num_traits::{Num, NumCast};

use super::{Error, Result, Layout, NdIndex, Slice};
use super::layout::{checked_len, each_index, resolve_shape};

/// Implemented by the fixed-width numeric types that an [`NdArray`] can hold.
pub trait Element: Num + NumCast + Copy + PartialOrd + Debug + Display {}

impl<T: Num + NumCast + Copy + PartialOrd + Debug + Display> Element for T {}

/// The values `start + i * step` before `stop`, or `None` if there are too
/// many to count or one of them cannot be represented as a `T`.
///
/// Values that are exact integers are counted in `i128`, and anything else
/// in `f64`.
fn range_values<T: Element>(start: T, stop: T, step: T) -> Option<Vec<T>> {
    let exact = |x: T| x.to_i128().filter(|&i| <T as NumCast>::from(i) == Some(x));
    if let (Some(a), Some(b), Some(s)) = (exact(start), exact(stop), exact(step)) {
        let span = b.checked_sub(a)?.checked_abs()?;
        let n = if span == 0 { 0 } else { (span - 1) / s.checked_abs()? + 1 };
        if n > isize::MAX as i128 { return None; }
        return (0..n).map(|i| <T as NumCast>::from(a + i * s)).collect();
    }
    let (a, b, s) = (start.to_f64()?, stop.to_f64()?, step.to_f64()?);
    let n = ((b - a) / s).ceil();
    if !(n >= 0.0 && n <= isize::MAX as f64) { return None; }
    (0..n as usize).map(|i| <T as NumCast>::from(a + i as f64 * s)).collect()
}

// ----------------------------------------------------------------------------

/// A dense array of `T`s with a run-time shape.
///
/// The `T`s are stored in a reference-counted buffer that may be shared by
/// several `NdArray`s. Exactly one of them owns the buffer: the one that
/// allocated it. The others are *views*, created by operations such as
/// [`reshape()`], [`t()`] and [`slice()`]; each has its own [`Layout`] over
/// the same buffer, and writing through a view writes through the owner and
/// every other view.
///
/// Operations that cannot express their result as a layout over the original
/// buffer, such as [`flatten()`], [`vstack()`] and [`select()`] with an array
/// key, allocate a fresh buffer. Their result is a *copy*, and owns its
/// buffer.
///
/// `NdArray` does not implement `Clone`, since a clone would be a second owner.
/// Call [`view()`] or [`copy()`] to say which one you mean.
///
/// ```
/// use numview::NdArray;
/// let a = NdArray::arange(0, 6).unwrap();
/// let mut b = a.reshape(&[2, 3]).unwrap();
/// b.set((1, 1), 40).unwrap();
/// assert_eq!(a.to_vec(), [0, 1, 2, 3, 40, 5]);
/// assert!(a.owns_data());
/// assert!(!b.owns_data());
/// ```
///
/// [`reshape()`]: Self::reshape()
/// [`t()`]: Self::t()
/// [`slice()`]: Self::slice()
/// [`flatten()`]: Self::flatten()
/// [`vstack()`]: super::vstack()
/// [`select()`]: Self::select()
/// [`view()`]: Self::view()
/// [`copy()`]: Self::copy()
#[derive(Debug)]
pub struct NdArray<T> {
    buffer: Rc<RefCell<Vec<T>>>,
    layout: Layout,
    /// The current layout of the owner of `buffer`, shared by the owner and
    /// all its views.
    owner: Rc<RefCell<Layout>>,
    owns_data: bool,
}

impl<T: Element> NdArray<T> {
    /// Allocates a buffer holding `items` and returns its owner.
    pub(crate) fn owned(shape: Vec<usize>, items: Vec<T>) -> Self {
        let layout = Layout::contiguous(shape);
        assert_eq!(layout.len(), items.len());
        log::trace!("allocating buffer of {} elements with shape {:?}", items.len(), layout.shape());
        let owner = Rc::new(RefCell::new(layout.clone()));
        Self {buffer: Rc::new(RefCell::new(items)), layout, owner, owns_data: true}
    }

    /// Returns a non-owning `NdArray` over the buffer of `self`.
    fn new_view(&self, layout: Layout) -> Self {
        log::trace!("creating view with shape {:?} and strides {:?}", layout.shape(), layout.strides());
        Self {buffer: Rc::clone(&self.buffer), layout, owner: Rc::clone(&self.owner), owns_data: false}
    }

    /// Constructs an `NdArray` of shape `shape` given its elements in
    /// row-major order.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(a.get((1, 0)), Ok(3.0));
    /// assert!(NdArray::from_shape_vec(vec![3], vec![1, 2]).is_err());
    /// ```
    pub fn from_shape_vec(shape: Vec<usize>, items: Vec<T>) -> Result<Self> {
        if checked_len(&shape) != Some(items.len()) {
            return Err(Error::ShapeMismatch(shape, vec![items.len()]));
        }
        Ok(Self::owned(shape, items))
    }

    /// Constructs a one-dimensional `NdArray`.
    pub fn from_vec(items: Vec<T>) -> Self { Self::owned(vec![items.len()], items) }

    /// Constructs an `NdArray` of shape `shape` from a function of the index.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::from_fn(vec![2, 3], |i| (10 * i[0] + i[1]) as i32);
    /// assert_eq!(a.to_vec(), [0, 1, 2, 10, 11, 12]);
    /// ```
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let mut items = Vec::with_capacity(shape.iter().product());
        each_index(&shape, |i| items.push(f(i)));
        Self::owned(shape, items)
    }

    pub fn zeros(shape: Vec<usize>) -> Self { Self::from_fn(shape, |_| T::zero()) }

    /// Constructs a one-dimensional `NdArray` of consecutive values from
    /// `start` (inclusive) to `stop` (exclusive).
    ///
    /// Fails with [`Error::InvalidRange`] if `stop < start`.
    ///
    /// ```
    /// use numview::NdArray;
    /// assert_eq!(NdArray::arange(1, 5).unwrap().to_vec(), [1, 2, 3, 4]);
    /// assert!(NdArray::arange(3, 3).unwrap().is_empty());
    /// assert!(NdArray::arange(5, 1).is_err());
    /// ```
    pub fn arange(start: T, stop: T) -> Result<Self> { Self::arange_step(start, stop, T::one()) }

    /// Like [`arange()`], but counting in steps of `step`, which may be
    /// negative.
    ///
    /// Fails with [`Error::InvalidRange`] if `step` is zero, if it points
    /// away from `stop`, or if the values cannot be counted or represented.
    ///
    /// [`arange()`]: Self::arange()
    pub fn arange_step(start: T, stop: T, step: T) -> Result<Self> {
        let zero = T::zero();
        let invalid = || Error::InvalidRange {
            start: start.to_string(),
            stop: stop.to_string(),
            step: step.to_string(),
        };
        if step == zero || (step > zero && stop < start) || (step < zero && stop > start) {
            return Err(invalid());
        }
        let items = range_values(start, stop, step).ok_or_else(invalid)?;
        Ok(Self::from_vec(items))
    }

    // ------------------------------------------------------------------------

    pub fn shape(&self) -> &[usize] { self.layout.shape() }

    /// The strides of each axis, in elements.
    pub fn strides(&self) -> &[isize] { self.layout.strides() }

    pub fn layout(&self) -> &Layout { &self.layout }

    pub fn ndim(&self) -> usize { self.layout.ndim() }

    /// The number of elements in `self`.
    pub fn len(&self) -> usize { self.layout.len() }

    pub fn is_empty(&self) -> bool { self.layout.is_empty() }

    /// Returns `true` if `self` is laid out in row-major order with no gaps.
    pub fn is_contiguous(&self) -> bool { self.layout.is_contiguous() }

    /// Returns `true` if `self` allocated its buffer, i.e. it is not a view.
    pub fn owns_data(&self) -> bool { self.owns_data }

    /// The array that owns the buffer of `self`, if `self` is a view.
    ///
    /// For a view of a view this is still the owner, never the intermediate
    /// view. The base has the owner's current shape, even if the owner was
    /// reshaped in place after the view was taken.
    pub fn base(&self) -> Option<Base<'_, T>> {
        if self.owns_data { return None; }
        Some(Base {buffer: &self.buffer, layout: self.owner.borrow().clone()})
    }

    /// Returns `true` if `self` and `other` use the same buffer.
    pub fn shares_memory(&self, other: &Self) -> bool { Rc::ptr_eq(&self.buffer, &other.buffer) }

    pub(crate) fn read(&self) -> Ref<'_, Vec<T>> { self.buffer.borrow() }

    // ------------------------------------------------------------------------

    /// Returns the element at `index`.
    pub fn get(&self, index: impl NdIndex) -> Result<T> {
        let position = index.offset_in(&self.layout)?;
        Ok(self.read()[position])
    }

    /// Overwrites the element at `index`. The change is visible through every
    /// array that shares the buffer.
    pub fn set(&mut self, index: impl NdIndex, value: T) -> Result<()> {
        let position = index.offset_in(&self.layout)?;
        self.buffer.borrow_mut()[position] = value;
        Ok(())
    }

    /// Overwrites every element of `self` with `value`.
    pub fn fill(&mut self, value: T) {
        let mut buffer = self.buffer.borrow_mut();
        self.layout.each_offset(|p| buffer[p] = value);
    }

    /// Returns the elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        let buffer = self.read();
        let mut items = Vec::with_capacity(self.len());
        self.layout.each_offset(|p| items.push(buffer[p]));
        items
    }

    /// Returns a new array holding `f` of each element.
    pub fn map<U: Element>(&self, f: impl FnMut(T) -> U) -> NdArray<U> {
        NdArray::owned(self.shape().to_vec(), self.to_vec().into_iter().map(f).collect())
    }

    // ------------------------------------------------------------------------

    /// Returns a view of all of `self`, like `a[:]`.
    pub fn view(&self) -> Self { self.new_view(self.layout.clone()) }

    /// Returns an independent array with its own buffer, whatever the
    /// aliasing status of `self`.
    pub fn copy(&self) -> Self { Self::owned(self.shape().to_vec(), self.to_vec()) }

    /// Copies `self` if `force_copy`, otherwise returns a view.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::arange(0, 4).unwrap().reshape(&[2, 2]).unwrap();
    /// let at = a.t().duplicate(true);
    /// assert!(at.owns_data());
    /// assert!(at.base().is_none());
    /// assert!(!at.shares_memory(&a));
    /// assert!(a.duplicate(false).shares_memory(&a));
    /// ```
    pub fn duplicate(&self, force_copy: bool) -> Self {
        if force_copy { self.copy() } else { self.view() }
    }

    /// Returns an array of shape `dims` with the same elements in row-major
    /// order. One axis may be `-1`, meaning "whatever length is left".
    ///
    /// The result is a view if `self` is contiguous, and a copy otherwise.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::arange(1, 10).unwrap();
    /// let b = a.reshape(&[3, -1]).unwrap();
    /// assert_eq!(b.shape(), [3, 3]);
    /// assert!(b.shares_memory(&a));
    /// assert!(a.reshape(&[2, 4]).is_err());
    /// ```
    pub fn reshape(&self, dims: &[isize]) -> Result<Self> {
        let shape = resolve_shape(dims, self.shape())?;
        Ok(match self.layout.reshaped(shape.clone()) {
            Some(layout) => self.new_view(layout),
            None => {
                log::debug!("reshape of non-contiguous {:?} to {:?} copies", self.shape(), shape);
                Self::owned(shape, self.to_vec())
            },
        })
    }

    /// Changes the shape of `self` in place, without moving any elements.
    ///
    /// This never allocates, so `owns_data()` and `base()` are unchanged. It
    /// fails with [`Error::NotContiguous`] if `self` is not contiguous.
    ///
    /// ```
    /// use numview::NdArray;
    /// let mut a = NdArray::arange(1, 10).unwrap();
    /// a.set_shape(&[9, -1]).unwrap();
    /// assert_eq!(a.shape(), [9, 1]);
    /// assert!(a.owns_data());
    /// assert!(a.base().is_none());
    /// ```
    pub fn set_shape(&mut self, dims: &[isize]) -> Result<()> {
        let shape = resolve_shape(dims, self.shape())?;
        self.layout = self.layout.reshaped(shape).ok_or(Error::NotContiguous)?;
        if self.owns_data { *self.owner.borrow_mut() = self.layout.clone(); }
        Ok(())
    }

    /// Returns a one-dimensional array of the elements in row-major order.
    ///
    /// The result is a view if `self` is contiguous, and a copy otherwise.
    pub fn ravel(&self) -> Self {
        let len = self.len();
        match self.layout.reshaped(vec![len]) {
            Some(layout) => self.new_view(layout),
            None => {
                log::debug!("ravel of non-contiguous {:?} copies", self.shape());
                self.flatten()
            },
        }
    }

    /// Returns a one-dimensional copy of the elements in row-major order.
    pub fn flatten(&self) -> Self { Self::owned(vec![self.len()], self.to_vec()) }

    /// Returns a view with the axes in reverse order.
    ///
    /// ```
    /// use numview::NdArray;
    /// let a = NdArray::arange(0, 6).unwrap().reshape(&[2, 3]).unwrap();
    /// let at = a.t();
    /// assert_eq!(at.shape(), [3, 2]);
    /// assert_eq!(at.to_vec(), [0, 3, 1, 4, 2, 5]);
    /// assert!(at.shares_memory(&a));
    /// ```
    pub fn t(&self) -> Self { self.new_view(self.layout.reversed()) }

    /// Same as [`t()`].
    ///
    /// [`t()`]: Self::t()
    pub fn transpose(&self) -> Self { self.t() }

    /// Returns a view in which axis `k` is axis `axes[k]` of `self`.
    pub fn permute_axes(&self, axes: &[usize]) -> Result<Self> {
        Ok(self.new_view(self.layout.permuted(axes)?))
    }

    /// Returns a view selecting a [`Slice`] of each leading axis.
    ///
    /// ```
    /// use numview::{NdArray, Slice};
    /// let a = NdArray::arange(0, 10).unwrap();
    /// let mut odd = a.slice(&[Slice::new(Some(1), None, 2).unwrap()]).unwrap();
    /// assert_eq!(odd.to_vec(), [1, 3, 5, 7, 9]);
    /// odd.fill(0);
    /// assert_eq!(a.to_vec(), [0, 0, 2, 0, 4, 0, 6, 0, 8, 0]);
    /// ```
    pub fn slice(&self, slices: &[Slice]) -> Result<Self> {
        Ok(self.new_view(self.layout.sliced(slices)?))
    }

    /// Returns a view of position `index` along `axis`, which is removed.
    pub fn index_axis(&self, axis: usize, index: isize) -> Result<Self> {
        if axis >= self.ndim() {
            return Err(Error::InvalidAxes {axes: vec![axis], rank: self.ndim()});
        }
        Ok(self.new_view(self.layout.indexed(axis, index)?))
    }

    pub(crate) fn with_layout(&self, layout: Layout) -> Self { self.new_view(layout) }
}

// ----------------------------------------------------------------------------

/// The owner of the buffer of a view, as returned by [`NdArray::base()`].
pub struct Base<'a, T> {
    buffer: &'a RefCell<Vec<T>>,
    layout: Layout,
}

impl<'a, T: Element> Base<'a, T> {
    pub fn shape(&self) -> &[usize] { self.layout.shape() }

    /// Returns the owner's elements in row-major order.
    pub fn to_vec(&self) -> Vec<T> {
        let buffer = self.buffer.borrow();
        let mut items = Vec::with_capacity(self.layout.len());
        self.layout.each_offset(|p| items.push(buffer[p]));
        items
    }

    pub(crate) fn layout(&self) -> &Layout { &self.layout }

    pub(crate) fn read(&self) -> Ref<'_, Vec<T>> { self.buffer.borrow() }
}

impl<'a, T: Debug> Debug for Base<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base").field("layout", &self.layout).finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------

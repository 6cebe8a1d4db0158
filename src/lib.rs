//! A pure-Rust library of dense, strided, multi-dimensional numeric arrays,
//! with an explicit contract about which operations share memory.
//!
//! [`NdArray<T>`] represents an array of `T` with a run-time shape. The `T`
//! values are stored in a reference-counted [`Vec<T>`], which is a dense
//! 1-dimensional representation, and a [`Layout`] maps multi-dimensional
//! indices to positions in it. Several `NdArray`s may share one buffer, each
//! with its own `Layout`.
//!
//! Every operation is documented as returning either a *view* or a *copy*:
//!
//!  - Views share the buffer of the array they were made from. Examples are
//!    [`NdArray::reshape()`] of a contiguous array, [`NdArray::ravel()`],
//!    [`NdArray::t()`] and [`NdArray::slice()`]. Writing through a view
//!    writes through the original.
//!  - Copies allocate a new buffer. Examples are [`NdArray::flatten()`],
//!    [`vstack()`] and [`NdArray::select()`] with an index array.
//!
//! [`NdArray::owns_data()`] and [`NdArray::base()`] tell you which kind of
//! array you have, and [`NdArray::shares_memory()`] tells you whether two
//! arrays alias.
//!
//! Separately, [`Registry`] models importable units, each with exactly one
//! global [`Namespace`] shared by everything that imports it.

mod error;
pub use error::{Error, Result};

mod int;

mod index;
pub use index::{NdIndex};

mod slice;
pub use slice::{Slice, Key, IndexArray};

pub mod layout;
pub use layout::{Layout};

mod broadcast;
pub use broadcast::{broadcast_shapes};

mod array;
pub use array::{Element, NdArray, Base};

mod display;

mod fancy;

mod stack;
pub use stack::{concatenate, vstack};

mod unit;
pub use unit::{Value, UnitDescriptor, Namespace, Unit, UnitFunction, Registry};

pub mod demos;

/// Errors returned by array operations and by the unit [`Registry`].
///
/// [`Registry`]: super::Registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Element counts or axis lengths do not agree.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// A requested shape is malformed, e.g. it has two `-1` axes.
    #[error("invalid shape {0:?}")]
    InvalidShape(Vec<isize>),

    /// An index lies outside its axis after negative wraparound.
    #[error("index {index} is out of bounds for axis {axis} with size {size}")]
    IndexOutOfBounds { index: isize, axis: usize, size: usize },

    /// The number of indices differs from the number of axes.
    #[error("expected {expected} indices, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A range constructor was given bounds it cannot honour.
    #[error("invalid range: start {start}, stop {stop}, step {step}")]
    InvalidRange { start: String, stop: String, step: String },

    #[error("slice step must not be zero")]
    InvalidSlice,

    /// Axes are not a permutation, or an axis is out of range.
    #[error("invalid axes {axes:?} for rank {rank}")]
    InvalidAxes { axes: Vec<usize>, rank: usize },

    /// In-place shape assignment needs a contiguous array.
    #[error("incompatible shape for in-place modification: array is not contiguous")]
    NotContiguous,

    #[error("need at least one array to stack")]
    EmptyStack,

    #[error("no unit named {0:?}")]
    UnitNotFound(String),

    /// A unit was imported while it was still being initialised.
    #[error("circular import of unit {0:?}")]
    ImportCycle(String),

    #[error("unit {unit:?} has no global named {name:?}")]
    NameNotFound { unit: String, name: String },
}

/// Result type for array and registry operations.
pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Errors raised when the caller hands the engine inputs that break its contract.
///
/// Degenerate data (no seeds, a seed too small for the grid to resolve) is not an
/// error; those cases produce absent cells instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A box dimension is not a finite, strictly positive number.
    #[error("invalid box dimension on axis {axis}: {value}")]
    InvalidDimension { axis: usize, value: f64 },

    /// The grid density is not a finite number of at least one cell.
    #[error("invalid grid density: {0}")]
    InvalidDensity(f64),

    /// A grid was requested with no cells along an axis.
    #[error("degenerate grid on axis {axis}: {cells} cells")]
    DegenerateGrid { axis: usize, cells: usize },

    /// An assignment field was paired with a grid of a different size.
    #[error("assignment field has {actual} values, grid expects {expected}")]
    FieldMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

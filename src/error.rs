use thiserror::Error;

/// Problems with the shape or content of a float dataset, or with a float
/// or cycle typed by the user.
///
/// Every load variant is fatal for the load that produced it; there is no
/// partial-load mode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("required column '{0}' is missing")]
    MissingColumn(String),
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric {
        row: usize,
        column: String,
        value: String,
    },
    #[error("malformed dataset: {0}")]
    Malformed(String),
    /// A float id or cycle number given as text that is not a finite number.
    #[error("'{0}' is not a valid float number or cycle number")]
    InvalidSelection(String),
}

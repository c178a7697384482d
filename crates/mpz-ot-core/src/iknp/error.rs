use mpz_core::BitError;

/// Errors that can occur in the IKNP protocol.
///
/// None of these are recoverable: the party which returned the error has been consumed and
/// the matrices it held are discarded.
#[derive(Debug, thiserror::Error)]
pub enum IknpError {
    /// Vector or matrix dimensions do not agree.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    /// A value does not fit into the available width.
    #[error("width exceeded: {0}")]
    WidthExceeded(String),
    /// The random number generator failed.
    #[error("randomness failure: {0}")]
    RandomnessFailure(#[source] rand_core::Error),
    /// A selection refers to a candidate which does not exist.
    #[error("index out of range: {index} >= {max}")]
    IndexOutOfRange {
        /// The selected index, saturated at `u64::MAX`.
        index: u64,
        /// The number of candidates.
        max: usize,
    },
    /// The base OT provider failed.
    #[error("base OT error: {0}")]
    BaseOt(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl From<BitError> for IknpError {
    fn from(err: BitError) -> Self {
        match err {
            BitError::Overflow { .. } => IknpError::WidthExceeded(err.to_string()),
            BitError::Rng(err) => IknpError::RandomnessFailure(err),
            err => IknpError::DimensionMismatch(err.to_string()),
        }
    }
}

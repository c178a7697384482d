//! Core primitives shared by the oblivious transfer crates.
//!
//! This crate provides the bit-level algebra used by the OT extension protocol
//! ([`BitVector`], [`BitMatrix`]) and an AES-based PRG.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

pub mod bits;
pub mod matrix;
pub mod prg;

pub use bits::BitVector;
pub use matrix::BitMatrix;

/// Errors that can occur in bit vector and bit matrix algebra.
#[derive(Debug, thiserror::Error)]
pub enum BitError {
    /// Two operands were expected to have the same length.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A value does not fit into the requested number of bits.
    #[error("value requires {required} bits, but width is {width}")]
    Overflow {
        /// The requested width.
        width: usize,
        /// The number of bits the value requires.
        required: usize,
    },
    /// A matrix was constructed from no vectors, or from empty vectors.
    #[error("matrix must have at least one non-empty row and column")]
    EmptyMatrix,
    /// A matrix was constructed from vectors of differing lengths.
    #[error("jagged matrix: vector {index} has length {actual}, expected {expected}")]
    JaggedMatrix {
        /// Index of the offending vector.
        index: usize,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// The random number generator failed.
    #[error("randomness failure: {0}")]
    Rng(#[from] rand_core::Error),
}

//! Random oracle used to mask payloads.

use itybity::ToBits;
use mpz_core::BitVector;
use sha2::{Digest, Sha256};

use crate::iknp::IknpError;

/// SHA-256 digest width, in bits.
const DIGEST_BITS: usize = 256;

/// Random oracle `H` mapping matrix rows to payload masks.
///
/// A row is interpreted as an integer and its minimal big-endian encoding is hashed with
/// SHA-256, so the zero row hashes the empty string. The mask is the low `output_bits` bits of
/// the digest.
#[derive(Debug, Clone, Copy)]
pub struct RandomOracle {
    output_bits: usize,
}

impl RandomOracle {
    /// Creates a new oracle with the given output width.
    pub fn new(output_bits: usize) -> Result<Self, IknpError> {
        if output_bits > DIGEST_BITS {
            return Err(IknpError::WidthExceeded(format!(
                "oracle output of {output_bits} bits exceeds the {DIGEST_BITS} bit digest"
            )));
        }

        Ok(Self { output_bits })
    }

    /// Returns the output width.
    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    /// Computes the mask for `row`.
    pub fn mask(&self, row: &BitVector) -> BitVector {
        let bytes = row.to_bytes_be();
        let start = bytes
            .iter()
            .position(|&byte| byte != 0)
            .unwrap_or(bytes.len());
        let digest = Sha256::digest(&bytes[start..]);

        digest
            .as_slice()
            .iter_msb0()
            .skip(DIGEST_BITS - self.output_bits)
            .collect()
    }
}

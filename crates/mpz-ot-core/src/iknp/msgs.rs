//! Messages for the IKNP protocol.

use mpz_core::{BitMatrix, BitVector};
use serde::{Deserialize, Serialize};

/// The receiver's inputs to the base OTs.
///
/// Holds one pair `(T column j, U column j)` per matrix column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseOtOffer {
    /// The column pairs.
    pub columns: Vec<[BitVector; 2]>,
}

impl BaseOtOffer {
    pub(crate) fn new(t: &BitMatrix, u: &BitMatrix) -> Self {
        Self {
            columns: t
                .columns()
                .iter()
                .zip(u.columns())
                .map(|(t, u)| [t.clone(), u.clone()])
                .collect(),
        }
    }
}

/// The sender's masked payloads, `2^l` per instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ciphertexts {
    /// The ciphertexts, indexed by instance then candidate.
    pub ciphertexts: Vec<Vec<u64>>,
}

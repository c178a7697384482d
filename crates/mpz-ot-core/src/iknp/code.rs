//! Correlation-robust code.
//!
//! The code is defined as
//!
//! `C(x) = H(AES_k(1 || x)) || H(AES_k(2 || x)) || H(AES_k(3 || x)) || H(AES_k(4 || x))`
//!
//! truncated to the requested width, where `H` is BLAKE3 with a 128-bit output and `k` is the
//! fixed [`CodeKey`].

use aes::Aes128;
use cipher::{BlockEncrypt, KeyInit};
use mpz_core::BitVector;

use crate::iknp::{config::CodeKey, IknpError};

/// Number of cipher-then-hash rounds.
const ROUNDS: u8 = 4;
/// Digest bytes produced per round.
const DIGEST_LEN: usize = 16;
/// AES block length, in bytes.
const BLOCK_LEN: usize = 16;

/// Maximum output width of the code, in bits.
pub const CODE_BITS: usize = ROUNDS as usize * DIGEST_LEN * 8;

/// The correlation-robust code `C`.
#[derive(Clone)]
pub struct CrCode {
    aes: Aes128,
}

opaque_debug::implement!(CrCode);

impl CrCode {
    /// Creates a new code from its key.
    pub fn new(key: &CodeKey) -> Self {
        Self {
            aes: Aes128::new(&(*key.as_bytes()).into()),
        }
    }

    /// Encodes a selection vector into `width` bits.
    ///
    /// # Arguments
    ///
    /// * `selection` - The selection vector, which must fit in one cipher block beside the
    ///   round counter.
    /// * `width` - The output width, at most [`CODE_BITS`].
    pub fn encode(&self, selection: &BitVector, width: usize) -> Result<BitVector, IknpError> {
        if width > CODE_BITS {
            return Err(IknpError::WidthExceeded(format!(
                "code width {width} exceeds {CODE_BITS} bits"
            )));
        }

        let selection_bytes = selection.to_bytes_be();
        if selection_bytes.len() >= BLOCK_LEN {
            return Err(IknpError::WidthExceeded(format!(
                "selection of {} bits does not fit in a cipher block",
                selection.len()
            )));
        }

        let mut output = [0u8; CODE_BITS / 8];
        for (ctr, chunk) in (1..=ROUNDS).zip(output.chunks_exact_mut(DIGEST_LEN)) {
            let mut block = padded_block(ctr, &selection_bytes);
            self.aes.encrypt_block(&mut block);

            let mut hasher = blake3::Hasher::new();
            hasher.update(&block);
            hasher.finalize_xof().fill(chunk);
        }

        Ok(BitVector::from_msb0_bytes(&output, width)?)
    }
}

/// Lays out `ctr || bytes` in a single block with PKCS#7 padding.
///
/// `bytes` must be shorter than `BLOCK_LEN`.
fn padded_block(ctr: u8, bytes: &[u8]) -> aes::Block {
    let len = 1 + bytes.len();

    let mut block = aes::Block::default();
    block[0] = ctr;
    block[1..len].copy_from_slice(bytes);
    block[len..].fill((BLOCK_LEN - len) as u8);
    block
}

//! Fixed-width bit vectors.
//!
//! Bits are stored most significant first, so the vector `[1, 0, 1]` encodes the integer `5`.

use itybity::{FromBitIterator, ToBits};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::BitError;

/// A fixed-width vector of bits in big-endian (msb0) order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitVector(Vec<bool>);

impl BitVector {
    /// Creates a new bit vector.
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// Creates an all-zero bit vector of the given length.
    pub fn zeros(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Samples a uniformly random bit vector of the given length.
    ///
    /// # Arguments
    ///
    /// * `rng` - The source of randomness.
    /// * `len` - The number of bits.
    pub fn random<R: RngCore + CryptoRng + ?Sized>(
        rng: &mut R,
        len: usize,
    ) -> Result<Self, BitError> {
        let mut bytes = vec![0u8; len.div_ceil(8)];
        rng.try_fill_bytes(&mut bytes)?;
        Self::from_msb0_bytes(&bytes, len)
    }

    /// Takes the first `len` bits of `bytes`, most significant bit of each byte first.
    pub fn from_msb0_bytes(bytes: &[u8], len: usize) -> Result<Self, BitError> {
        if len > bytes.len() * 8 {
            return Err(BitError::LengthMismatch {
                expected: len,
                actual: bytes.len() * 8,
            });
        }

        Ok(Self(bytes.iter_msb0().take(len).collect()))
    }

    /// Encodes `value` into exactly `width` bits, zero-padded on the left.
    ///
    /// Returns an error if `value` requires more than `width` bits.
    pub fn from_biguint(value: &BigUint, width: usize) -> Result<Self, BitError> {
        let required = value.bits() as usize;
        if required > width {
            return Err(BitError::Overflow { width, required });
        }

        Ok(Self(
            (0..width)
                .map(|i| value.bit((width - 1 - i) as u64))
                .collect(),
        ))
    }

    /// Encodes `value` into exactly `width` bits, zero-padded on the left.
    ///
    /// Returns an error if `value` requires more than `width` bits.
    pub fn from_u64(value: u64, width: usize) -> Result<Self, BitError> {
        let required = (u64::BITS - value.leading_zeros()) as usize;
        if required > width {
            return Err(BitError::Overflow { width, required });
        }

        let pad = width.saturating_sub(u64::BITS as usize);
        let skip = (u64::BITS as usize).saturating_sub(width);

        Ok(Self(
            std::iter::repeat(false)
                .take(pad)
                .chain(value.iter_msb0().skip(skip))
                .collect(),
        ))
    }

    /// Returns the integer value of the vector.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes_be())
    }

    /// Returns the integer value of the vector.
    ///
    /// Returns an error if the value does not fit in a `u64`.
    pub fn to_u64(&self) -> Result<u64, BitError> {
        let required = self.significant_bits();
        if required > 64 {
            return Err(BitError::Overflow {
                width: 64,
                required,
            });
        }

        let len = self.0.len();
        let pad = (u64::BITS as usize).saturating_sub(len);
        let skip = len.saturating_sub(u64::BITS as usize);

        Ok(u64::from_msb0_iter(
            std::iter::repeat(false)
                .take(pad)
                .chain(self.0.iter().copied().skip(skip)),
        ))
    }

    /// Packs the integer value of the vector into `ceil(len / 8)` big-endian bytes.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let pad = self.0.len().div_ceil(8) * 8 - self.0.len();
        let padded: Vec<bool> = std::iter::repeat(false)
            .take(pad)
            .chain(self.0.iter().copied())
            .collect();

        padded
            .chunks_exact(8)
            .map(|byte| u8::from_msb0_iter(byte.iter().copied()))
            .collect()
    }

    /// Returns the number of bits needed to represent the integer value of the vector.
    pub fn significant_bits(&self) -> usize {
        self.0
            .iter()
            .position(|&bit| bit)
            .map_or(0, |pos| self.0.len() - pos)
    }

    /// Computes the element-wise XOR of two vectors of equal length.
    pub fn xor(&self, other: &Self) -> Result<Self, BitError> {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Computes the element-wise AND of two vectors of equal length.
    pub fn and(&self, other: &Self) -> Result<Self, BitError> {
        self.zip_with(other, |a, b| a & b)
    }

    fn zip_with(&self, other: &Self, f: impl Fn(bool, bool) -> bool) -> Result<Self, BitError> {
        if self.0.len() != other.0.len() {
            return Err(BitError::LengthMismatch {
                expected: self.0.len(),
                actual: other.0.len(),
            });
        }

        Ok(Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        ))
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the bit at `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Returns the bits as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Returns an iterator over the bits.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Returns the inner bits.
    pub fn into_inner(self) -> Vec<bool> {
        self.0
    }
}

impl From<Vec<bool>> for BitVector {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

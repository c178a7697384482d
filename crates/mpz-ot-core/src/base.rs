//! Base oblivious transfer.
//!
//! The IKNP sender obtains its matrix `Q` by acting as the *receiver* of `k` base 1-out-of-2 OTs,
//! one per matrix column. The IKNP receiver offers the pair `(T column j, U column j)` and the
//! sender chooses with bit `j` of its global secret.

use mpz_core::BitVector;

/// A provider of base 1-out-of-2 oblivious transfers, seen from the choosing party.
///
/// Implementations are either a live base OT protocol (e.g. Chou-Orlandi) or, in trusted test
/// harnesses, [`IdealBaseOt`](crate::ideal::ot::IdealBaseOt).
pub trait BaseOtProvider {
    /// The error type returned by the provider.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Receives one column per choice bit.
    ///
    /// For every `j`, the returned column is the first of the offered pair if `choices[j]` is
    /// `false`, and the second otherwise.
    ///
    /// # Arguments
    ///
    /// * `choices` - The choice bits, one per base OT.
    fn receive_columns(&mut self, choices: &[bool]) -> Result<Vec<BitVector>, Self::Error>;
}

impl<T: BaseOtProvider + ?Sized> BaseOtProvider for &mut T {
    type Error = T::Error;

    fn receive_columns(&mut self, choices: &[bool]) -> Result<Vec<BitVector>, Self::Error> {
        (**self).receive_columns(choices)
    }
}

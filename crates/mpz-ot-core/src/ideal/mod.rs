//! Ideal functionalities.
//!
//! These functionalities see the inputs of both parties. They stand in for real protocols in
//! tests and must never be used where the parties do not trust each other.

pub mod ot;

use mpz_core::{BitMatrix, BitVector};

use crate::iknp::IknpError;

/// Computes the sender's matrix `Q` directly from the receiver's matrices.
///
/// Column `j` of `Q` is column `j` of `T` if `s[j]` is unset, and column `j` of `U` otherwise.
/// This is the outcome of `k` base OTs in which the sender chooses with `s`.
///
/// # Arguments
///
/// * `s` - The sender's global secret, one bit per column.
/// * `t` - The receiver's matrix `T`.
/// * `u` - The receiver's matrix `U`.
pub fn combine(s: &BitVector, t: &BitMatrix, u: &BitMatrix) -> Result<BitMatrix, IknpError> {
    if t.num_rows() != u.num_rows() || t.num_cols() != u.num_cols() {
        return Err(IknpError::DimensionMismatch(format!(
            "T is {}x{} but U is {}x{}",
            t.num_rows(),
            t.num_cols(),
            u.num_rows(),
            u.num_cols()
        )));
    }

    if s.len() != t.num_cols() {
        return Err(IknpError::DimensionMismatch(format!(
            "secret has {} bits, matrices have {} columns",
            s.len(),
            t.num_cols()
        )));
    }

    let columns = s
        .iter()
        .zip(t.columns().iter().zip(u.columns()))
        .map(|(choice, (t, u))| if choice { u.clone() } else { t.clone() })
        .collect();

    Ok(BitMatrix::from_columns(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_matrix(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> BitMatrix {
        BitMatrix::from_rows(
            (0..rows)
                .map(|_| BitVector::random(&mut *rng, cols).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_combine_selects_columns() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let t = random_matrix(&mut rng, 8, 4);
        let u = random_matrix(&mut rng, 8, 4);
        let s = BitVector::from_u64(0b1010, 4).unwrap();

        let q = combine(&s, &t, &u).unwrap();

        assert_eq!(q.column(0), u.column(0));
        assert_eq!(q.column(1), t.column(1));
        assert_eq!(q.column(2), u.column(2));
        assert_eq!(q.column(3), t.column(3));
    }

    #[test]
    fn test_combine_shape_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let s = BitVector::zeros(4);
        let t = random_matrix(&mut rng, 8, 4);

        for u in [random_matrix(&mut rng, 7, 4), random_matrix(&mut rng, 8, 5)] {
            assert!(matches!(
                combine(&s, &t, &u),
                Err(IknpError::DimensionMismatch(_))
            ));
        }
    }

    #[test]
    fn test_combine_secret_width_mismatch() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let t = random_matrix(&mut rng, 8, 4);
        let u = random_matrix(&mut rng, 8, 4);

        for width in [3, 5] {
            assert!(matches!(
                combine(&BitVector::zeros(width), &t, &u),
                Err(IknpError::DimensionMismatch(_))
            ));
        }
    }
}

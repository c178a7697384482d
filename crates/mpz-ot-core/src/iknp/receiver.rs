//! IKNP receiver.

use mpz_core::{BitMatrix, BitVector};
use rand_core::{CryptoRng, RngCore};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::iknp::{
    code::CrCode,
    msgs::{BaseOtOffer, Ciphertexts},
    oracle::RandomOracle,
    IknpConfig, IknpError,
};

/// IKNP receiver.
#[derive(Debug)]
pub struct Receiver<T: state::State = state::Initialized> {
    config: IknpConfig,
    state: T,
}

impl<T: state::State> Receiver<T> {
    /// Returns the receiver's configuration.
    pub fn config(&self) -> &IknpConfig {
        &self.config
    }
}

impl Receiver {
    /// Creates a new Receiver.
    pub fn new(config: IknpConfig) -> Self {
        Receiver {
            config,
            state: state::Initialized {},
        }
    }

    /// Completes the setup phase of the protocol.
    ///
    /// Samples the matrices `T` and `U` and returns the offer the receiver inputs into the base
    /// OTs.
    ///
    /// # Arguments
    ///
    /// * `rng` - The source of randomness for `T`.
    /// * `selections` - One selection vector of `l` bits per instance.
    #[instrument(level = "debug", skip_all, fields(count = selections.len()), err)]
    pub fn setup<R: RngCore + CryptoRng + ?Sized>(
        self,
        rng: &mut R,
        selections: Vec<BitVector>,
    ) -> Result<(Receiver<state::Setup>, BaseOtOffer), IknpError> {
        let choice_bits = self.config.choice_bits();
        if let Some((i, selection)) = selections
            .iter()
            .enumerate()
            .find(|(_, selection)| selection.len() != choice_bits)
        {
            return Err(IknpError::DimensionMismatch(format!(
                "selection {i} has {} bits, expected {choice_bits}",
                selection.len()
            )));
        }

        let code = CrCode::new(self.config.code_key());
        let (t, u) = gen_matrix_tu(
            &code,
            self.config.count(),
            self.config.width(),
            &selections,
            rng,
        )?;

        let offer = BaseOtOffer::new(&t, &u);

        debug!(width = t.num_cols(), "generated correlated matrices");

        Ok((
            Receiver {
                config: self.config,
                state: state::Setup { selections, t, u },
            },
            offer,
        ))
    }
}

impl Receiver<state::Setup> {
    /// Returns the receiver's selection vectors.
    pub fn selections(&self) -> &[BitVector] {
        &self.state.selections
    }

    /// Returns the matrix `T`.
    pub fn matrix_t(&self) -> &BitMatrix {
        &self.state.t
    }

    /// Returns the matrix `U`.
    pub fn matrix_u(&self) -> &BitMatrix {
        &self.state.u
    }

    /// Recovers the selected payload of every instance.
    ///
    /// Consumes the receiver: the matrices authorise a single batch.
    ///
    /// # Arguments
    ///
    /// * `ciphertexts` - The ciphertexts received from the sender.
    #[instrument(level = "debug", skip_all, err)]
    pub fn decode(self, ciphertexts: Ciphertexts) -> Result<Vec<u64>, IknpError> {
        let oracle = RandomOracle::new(self.config.payload_bits())?;

        retrieve(
            &ciphertexts.ciphertexts,
            &self.state.selections,
            &self.state.t,
            self.config.choice_bits(),
            &oracle,
        )
    }
}

/// Samples the matrices `T` and `U` such that `U[i] = T[i] ^ C(selections[i])`.
///
/// # Arguments
///
/// * `code` - The correlation-robust code.
/// * `count` - The number of rows, `m`.
/// * `width` - The number of columns, `k`.
/// * `selections` - One selection vector per row.
/// * `rng` - The source of randomness for `T`.
pub fn gen_matrix_tu<R: RngCore + CryptoRng + ?Sized>(
    code: &CrCode,
    count: usize,
    width: usize,
    selections: &[BitVector],
    rng: &mut R,
) -> Result<(BitMatrix, BitMatrix), IknpError> {
    if selections.len() != count {
        return Err(IknpError::DimensionMismatch(format!(
            "expected {count} selections, got {}",
            selections.len()
        )));
    }

    let t_rows = (0..count)
        .map(|_| BitVector::random(&mut *rng, width))
        .collect::<Result<Vec<_>, _>>()?;

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = t_rows.par_iter().zip(selections.par_iter());
        } else {
            let iter = t_rows.iter().zip(selections.iter());
        }
    }

    let u_rows = iter
        .map(|(t, selection)| -> Result<BitVector, IknpError> {
            Ok(t.xor(&code.encode(selection, width)?)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((BitMatrix::from_rows(t_rows)?, BitMatrix::from_rows(u_rows)?))
}

/// Recovers the selected payloads using the rows of `T`.
///
/// # Arguments
///
/// * `ciphertexts` - The sender's ciphertexts, `2^l` per instance.
/// * `selections` - One selection vector per instance.
/// * `t` - The receiver's matrix `T`.
/// * `choice_bits` - The number of choice bits, `l`.
/// * `oracle` - The random oracle.
pub fn retrieve(
    ciphertexts: &[Vec<u64>],
    selections: &[BitVector],
    t: &BitMatrix,
    choice_bits: usize,
    oracle: &RandomOracle,
) -> Result<Vec<u64>, IknpError> {
    if ciphertexts.len() != selections.len() || selections.len() != t.num_rows() {
        return Err(IknpError::DimensionMismatch(format!(
            "got {} ciphertext sets and {} selections for {} rows",
            ciphertexts.len(),
            selections.len(),
            t.num_rows()
        )));
    }

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = ciphertexts
                .par_iter()
                .zip(selections.par_iter())
                .zip(t.rows().par_iter());
        } else {
            let iter = ciphertexts
                .iter()
                .zip(selections.iter())
                .zip(t.rows().iter());
        }
    }

    iter.map(|((ciphertexts, selection), row)| -> Result<u64, IknpError> {
        // Values wider than 64 bits saturate to `u64::MAX`.
        let index = selection.to_u64().unwrap_or(u64::MAX);
        let ciphertext = usize::try_from(index)
            .ok()
            .and_then(|index| ciphertexts.get(index))
            .ok_or(IknpError::IndexOutOfRange {
                index,
                max: ciphertexts.len(),
            })?;

        if selection.len() != choice_bits {
            return Err(IknpError::DimensionMismatch(format!(
                "selection has {} bits, expected {choice_bits}",
                selection.len()
            )));
        }

        let masked = BitVector::from_u64(*ciphertext, oracle.output_bits())?;
        Ok(masked.xor(&oracle.mask(row))?.to_u64()?)
    })
    .collect()
}

/// The receiver's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Setup {}
    }

    /// The receiver's state.
    pub trait State: sealed::Sealed {}

    /// The receiver's initial state.
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The receiver's state after the setup phase.
    ///
    /// In this state the receiver waits for the sender's ciphertexts.
    pub struct Setup {
        /// Receiver's selection vectors.
        pub(super) selections: Vec<BitVector>,
        /// Receiver's matrix T.
        pub(super) t: BitMatrix,
        /// Receiver's matrix U.
        pub(super) u: BitMatrix,
    }

    impl State for Setup {}

    opaque_debug::implement!(Setup);
}

#[cfg(test)]
mod tests {
    use super::*;

    use mpz_core::prg::Prg;
    use rand::SeedableRng;

    use crate::{iknp::config::CodeKey, test::random_selections};

    #[test]
    fn test_setup_invariant() {
        let mut prg = Prg::from_seed([0u8; 16]);
        let config = IknpConfig::builder()
            .count(64)
            .width(40)
            .choice_bits(5)
            .build()
            .unwrap();
        let selections = random_selections(&mut prg, 64, 5);

        let (receiver, offer) = Receiver::new(config.clone())
            .setup(&mut prg, selections.clone())
            .unwrap();

        let code = CrCode::new(config.code_key());
        let t = receiver.matrix_t();
        let u = receiver.matrix_u();

        assert_eq!(t.num_rows(), 64);
        assert_eq!(t.num_cols(), 40);
        for (i, selection) in selections.iter().enumerate() {
            let expected = t
                .row(i)
                .unwrap()
                .xor(&code.encode(selection, 40).unwrap())
                .unwrap();
            assert_eq!(u.row(i).unwrap(), &expected);
        }

        assert_eq!(offer.columns.len(), 40);
        for (j, [t_col, u_col]) in offer.columns.iter().enumerate() {
            assert_eq!(t.column(j).unwrap(), t_col);
            assert_eq!(u.column(j).unwrap(), u_col);
        }
    }

    #[test]
    fn test_setup_wrong_selection_count() {
        let mut prg = Prg::from_seed([1u8; 16]);
        let config = IknpConfig::builder()
            .count(4)
            .choice_bits(2)
            .build()
            .unwrap();
        let selections = random_selections(&mut prg, 3, 2);

        assert!(matches!(
            Receiver::new(config).setup(&mut prg, selections),
            Err(IknpError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_setup_wrong_selection_width() {
        let mut prg = Prg::from_seed([2u8; 16]);
        let config = IknpConfig::builder()
            .count(4)
            .choice_bits(2)
            .build()
            .unwrap();
        let mut selections = random_selections(&mut prg, 4, 2);
        selections[2] = BitVector::zeros(3);

        assert!(matches!(
            Receiver::new(config).setup(&mut prg, selections),
            Err(IknpError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_rows_depend_on_key() {
        let selections = vec![BitVector::from_u64(1, 2).unwrap()];
        let setup = |key: CodeKey| {
            let config = IknpConfig::builder()
                .count(1)
                .choice_bits(2)
                .code_key(key)
                .build()
                .unwrap();
            let (receiver, _) = Receiver::new(config)
                .setup(&mut Prg::from_seed([3u8; 16]), selections.clone())
                .unwrap();
            receiver
        };

        let a = setup(CodeKey::default());
        let b = setup(CodeKey::new([9u8; 16]));

        assert_eq!(a.matrix_t(), b.matrix_t());
        assert_ne!(a.matrix_u(), b.matrix_u());
    }

    #[test]
    fn test_retrieve_index_out_of_range() {
        let mut prg = Prg::from_seed([4u8; 16]);
        let config = IknpConfig::builder()
            .count(1)
            .choice_bits(2)
            .build()
            .unwrap();
        let selections = vec![BitVector::from_u64(3, 2).unwrap()];

        let (receiver, _) = Receiver::new(config).setup(&mut prg, selections).unwrap();

        let err = receiver
            .decode(Ciphertexts {
                ciphertexts: vec![vec![0, 1]],
            })
            .unwrap_err();

        assert!(matches!(
            err,
            IknpError::IndexOutOfRange { index: 3, max: 2 }
        ));
    }

    #[test]
    fn test_retrieve_dimension_mismatch() {
        let mut prg = Prg::from_seed([5u8; 16]);
        let config = IknpConfig::builder()
            .count(2)
            .choice_bits(1)
            .build()
            .unwrap();
        let selections = random_selections(&mut prg, 2, 1);

        let (receiver, _) = Receiver::new(config).setup(&mut prg, selections).unwrap();

        assert!(matches!(
            receiver.decode(Ciphertexts {
                ciphertexts: vec![vec![0, 1]],
            }),
            Err(IknpError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_retrieve_oversized_selection() {
        let mut prg = Prg::from_seed([6u8; 16]);
        let t = BitMatrix::from_rows(vec![BitVector::random(&mut prg, 16).unwrap()]).unwrap();
        let oracle = RandomOracle::new(8).unwrap();

        let mut wide = vec![false; 70];
        wide[0] = true;

        let err = retrieve(&[vec![0; 4]], &[BitVector::new(wide)], &t, 2, &oracle).unwrap_err();

        assert!(matches!(
            err,
            IknpError::IndexOutOfRange {
                index: u64::MAX,
                max: 4
            }
        ));
    }

    #[test]
    fn test_retrieve_wrong_selection_width() {
        let mut prg = Prg::from_seed([7u8; 16]);
        let t = BitMatrix::from_rows(vec![BitVector::random(&mut prg, 16).unwrap()]).unwrap();
        let oracle = RandomOracle::new(8).unwrap();
        let selection = BitVector::from_u64(1, 3).unwrap();

        assert!(matches!(
            retrieve(&[vec![0; 4]], &[selection], &t, 2, &oracle),
            Err(IknpError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_decode_ciphertext_too_wide() {
        let mut prg = Prg::from_seed([8u8; 16]);
        let config = IknpConfig::builder()
            .count(1)
            .choice_bits(2)
            .payload_bits(8)
            .build()
            .unwrap();
        let selections = vec![BitVector::from_u64(1, 2).unwrap()];

        let (receiver, _) = Receiver::new(config).setup(&mut prg, selections).unwrap();

        assert!(matches!(
            receiver.decode(Ciphertexts {
                ciphertexts: vec![vec![0, 256, 0, 0]],
            }),
            Err(IknpError::WidthExceeded(_))
        ));
    }
}

//! IKNP sender.

use mpz_core::{BitMatrix, BitVector};
use rand_core::{CryptoRng, RngCore};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    base::BaseOtProvider,
    iknp::{
        code::CrCode, config::MAX_CHOICE_BITS, msgs::Ciphertexts, oracle::RandomOracle,
        IknpConfig, IknpError,
    },
};

/// IKNP sender.
#[derive(Debug)]
pub struct Sender<T: state::State = state::Initialized> {
    config: IknpConfig,
    state: T,
}

impl<T: state::State> Sender<T> {
    /// Returns the sender's configuration.
    pub fn config(&self) -> &IknpConfig {
        &self.config
    }
}

impl Sender {
    /// Creates a new Sender.
    pub fn new(config: IknpConfig) -> Self {
        Sender {
            config,
            state: state::Initialized {},
        }
    }

    /// Completes the setup phase of the protocol with a freshly sampled global secret.
    ///
    /// # Arguments
    ///
    /// * `base` - The base OT provider.
    /// * `rng` - The source of randomness for the global secret.
    pub fn setup_random<B, R>(
        self,
        base: &mut B,
        rng: &mut R,
    ) -> Result<Sender<state::Extension>, IknpError>
    where
        B: BaseOtProvider + ?Sized,
        R: RngCore + CryptoRng + ?Sized,
    {
        let secret = BitVector::random(rng, self.config.width())?;
        self.setup(base, secret)
    }

    /// Completes the setup phase of the protocol.
    ///
    /// Obtains the matrix `Q` by choosing column `j` of `T` or `U` with bit `j` of the global
    /// secret, through `k` base OTs.
    ///
    /// # Arguments
    ///
    /// * `base` - The base OT provider.
    /// * `secret` - The sender's global secret, `s`.
    #[instrument(level = "debug", skip_all, err)]
    pub fn setup<B: BaseOtProvider + ?Sized>(
        self,
        base: &mut B,
        secret: BitVector,
    ) -> Result<Sender<state::Extension>, IknpError> {
        if secret.len() != self.config.width() {
            return Err(IknpError::DimensionMismatch(format!(
                "secret has {} bits, expected {}",
                secret.len(),
                self.config.width()
            )));
        }

        let q = combine_via_base_ot(base, &secret)?;

        if q.num_rows() != self.config.count() {
            return Err(IknpError::DimensionMismatch(format!(
                "base OT columns have {} rows, expected {}",
                q.num_rows(),
                self.config.count()
            )));
        }

        debug!(count = q.num_rows(), "received matrix Q");

        Ok(Sender {
            config: self.config,
            state: state::Extension { secret, q },
        })
    }
}

impl Sender<state::Extension> {
    /// Returns the global secret, `s`.
    pub fn secret(&self) -> &BitVector {
        &self.state.secret
    }

    /// Returns the matrix `Q`.
    pub fn matrix_q(&self) -> &BitMatrix {
        &self.state.q
    }

    /// Masks the payloads of every instance.
    ///
    /// Consumes the sender: the matrices authorise a single batch.
    ///
    /// # Arguments
    ///
    /// * `payloads` - `2^l` payloads per instance.
    #[instrument(level = "debug", skip_all, fields(count = payloads.len()), err)]
    pub fn encode(self, payloads: &[Vec<u64>]) -> Result<Ciphertexts, IknpError> {
        let code = CrCode::new(self.config.code_key());
        let oracle = RandomOracle::new(self.config.payload_bits())?;

        let ciphertexts = encrypt(
            payloads,
            &self.state.q,
            &self.state.secret,
            self.config.choice_bits(),
            &code,
            &oracle,
        )?;

        Ok(Ciphertexts { ciphertexts })
    }
}

/// Builds `Q` from the columns chosen with `secret` in `k` base OTs.
///
/// # Arguments
///
/// * `base` - The base OT provider.
/// * `secret` - The global secret, one choice bit per column.
pub fn combine_via_base_ot<B: BaseOtProvider + ?Sized>(
    base: &mut B,
    secret: &BitVector,
) -> Result<BitMatrix, IknpError> {
    let columns = base
        .receive_columns(secret.as_slice())
        .map_err(|err| IknpError::BaseOt(Box::new(err)))?;

    if columns.len() != secret.len() {
        return Err(IknpError::DimensionMismatch(format!(
            "received {} columns, expected {}",
            columns.len(),
            secret.len()
        )));
    }

    Ok(BitMatrix::from_columns(columns)?)
}

/// Masks every candidate payload of every instance.
///
/// Candidate `j` of instance `i` is masked with `H(Q[i] ^ (C(j) & s))`.
///
/// # Arguments
///
/// * `payloads` - `2^l` payloads per instance.
/// * `q` - The sender's matrix `Q`.
/// * `secret` - The global secret, `s`.
/// * `choice_bits` - The number of choice bits, `l`.
/// * `code` - The correlation-robust code.
/// * `oracle` - The random oracle.
pub fn encrypt(
    payloads: &[Vec<u64>],
    q: &BitMatrix,
    secret: &BitVector,
    choice_bits: usize,
    code: &CrCode,
    oracle: &RandomOracle,
) -> Result<Vec<Vec<u64>>, IknpError> {
    if payloads.len() != q.num_rows() {
        return Err(IknpError::DimensionMismatch(format!(
            "got {} payload sets for {} rows",
            payloads.len(),
            q.num_rows()
        )));
    }

    if secret.len() != q.num_cols() {
        return Err(IknpError::DimensionMismatch(format!(
            "secret has {} bits, Q has {} columns",
            secret.len(),
            q.num_cols()
        )));
    }

    if choice_bits > MAX_CHOICE_BITS {
        return Err(IknpError::WidthExceeded(format!(
            "{choice_bits} choice bits exceeds the maximum of {MAX_CHOICE_BITS}"
        )));
    }

    let candidates = 1u64 << choice_bits;
    if let Some((i, set)) = payloads
        .iter()
        .enumerate()
        .find(|(_, set)| set.len() as u64 != candidates)
    {
        return Err(IknpError::DimensionMismatch(format!(
            "payload set {i} has {} candidates, expected {candidates}",
            set.len()
        )));
    }

    // C(j) & s does not depend on the instance.
    let correlations = (0..candidates)
        .map(|j| -> Result<BitVector, IknpError> {
            let selection = BitVector::from_u64(j, choice_bits)?;
            Ok(code.encode(&selection, q.num_cols())?.and(secret)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            let iter = payloads.par_iter().zip(q.rows().par_iter());
        } else {
            let iter = payloads.iter().zip(q.rows().iter());
        }
    }

    iter.map(|(set, row)| -> Result<Vec<u64>, IknpError> {
        set.iter()
            .zip(&correlations)
            .map(|(&payload, correlation)| -> Result<u64, IknpError> {
                let mask = oracle.mask(&row.xor(correlation)?);
                let payload = BitVector::from_u64(payload, oracle.output_bits())?;
                Ok(payload.xor(&mask)?.to_u64()?)
            })
            .collect()
    })
    .collect()
}

/// The sender's state.
pub mod state {
    use super::*;

    mod sealed {
        pub trait Sealed {}

        impl Sealed for super::Initialized {}
        impl Sealed for super::Extension {}
    }

    /// The sender's state.
    pub trait State: sealed::Sealed {}

    /// The sender's initial state.
    pub struct Initialized {}

    impl State for Initialized {}

    opaque_debug::implement!(Initialized);

    /// The sender's state after the setup phase.
    ///
    /// In this state the sender encodes a single batch of payloads.
    pub struct Extension {
        /// Sender's global secret.
        pub(super) secret: BitVector,
        /// Sender's matrix Q.
        pub(super) q: BitMatrix,
    }

    impl State for Extension {}

    opaque_debug::implement!(Extension);
}

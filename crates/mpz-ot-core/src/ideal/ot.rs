//! Ideal Chosen-Message Oblivious Transfer functionality.

use mpz_core::BitVector;

use crate::{
    base::BaseOtProvider, iknp::msgs::BaseOtOffer, OTReceiverOutput, OTSenderOutput, TransferId,
};

/// The ideal OT functionality.
#[derive(Debug, Default)]
pub struct IdealOT {
    transfer_id: TransferId,
    counter: usize,
    /// Log of choices made by the receiver.
    choices: Vec<bool>,
}

impl IdealOT {
    /// Creates a new ideal OT functionality.
    pub fn new() -> Self {
        IdealOT {
            transfer_id: TransferId::default(),
            counter: 0,
            choices: Vec::new(),
        }
    }

    /// Returns the current transfer id.
    pub fn transfer_id(&self) -> TransferId {
        self.transfer_id
    }

    /// Returns the number of OTs executed.
    pub fn count(&self) -> usize {
        self.counter
    }

    /// Returns the choices made by the receiver.
    pub fn choices(&self) -> &[bool] {
        &self.choices
    }

    /// Executes chosen-message oblivious transfers.
    ///
    /// # Arguments
    ///
    /// * `choices` - The choices made by the receiver.
    /// * `msgs` - The sender's messages.
    pub fn chosen<T>(
        &mut self,
        choices: &[bool],
        msgs: Vec<[T; 2]>,
    ) -> (OTSenderOutput, OTReceiverOutput<T>) {
        let chosen = choices
            .iter()
            .zip(msgs)
            .map(|(&choice, [zero, one])| if choice { one } else { zero })
            .collect();

        self.counter += choices.len();
        self.choices.extend_from_slice(choices);
        let id = self.transfer_id.next_id();

        (OTSenderOutput { id }, OTReceiverOutput { id, msgs: chosen })
    }
}

/// Errors returned by [`IdealBaseOt`].
#[derive(Debug, thiserror::Error)]
pub enum IdealBaseOtError {
    /// The offer was already used by an earlier transfer.
    #[error("base OT offer has already been consumed")]
    Consumed,
    /// The number of choices does not match the number of offered pairs.
    #[error("expected {expected} choices, got {actual}")]
    CountMismatch {
        /// Number of offered pairs.
        expected: usize,
        /// Number of choices.
        actual: usize,
    },
}

/// A [`BaseOtProvider`] backed by the ideal OT functionality.
///
/// The provider holds the receiver's offer and hands the chosen columns to the sender. An offer
/// authorises exactly one transfer.
#[derive(Debug)]
pub struct IdealBaseOt {
    ot: IdealOT,
    offer: Option<BaseOtOffer>,
}

impl IdealBaseOt {
    /// Creates a new provider from the IKNP receiver's offer.
    pub fn new(offer: BaseOtOffer) -> Self {
        Self {
            ot: IdealOT::new(),
            offer: Some(offer),
        }
    }

    /// Returns the underlying functionality.
    pub fn functionality(&self) -> &IdealOT {
        &self.ot
    }
}

impl BaseOtProvider for IdealBaseOt {
    type Error = IdealBaseOtError;

    fn receive_columns(&mut self, choices: &[bool]) -> Result<Vec<BitVector>, Self::Error> {
        let BaseOtOffer { columns } = self.offer.take().ok_or(IdealBaseOtError::Consumed)?;

        if columns.len() != choices.len() {
            return Err(IdealBaseOtError::CountMismatch {
                expected: columns.len(),
                actual: choices.len(),
            });
        }

        let (_, OTReceiverOutput { msgs, .. }) = self.ot.chosen(choices, columns);

        Ok(msgs)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn test_ideal_ot() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut choices = vec![false; 100];
        rng.fill(&mut choices[..]);

        let msgs: Vec<[u64; 2]> = (0..100).map(|_| [rng.gen(), rng.gen()]).collect();

        let mut ideal = IdealOT::default();
        let (OTSenderOutput { .. }, OTReceiverOutput { msgs: chosen, .. }) =
            ideal.chosen(&choices, msgs.clone());

        assert!(choices.iter().zip(msgs.into_iter().zip(chosen)).all(
            |(&choice, (msg, chosen))| {
                if choice {
                    chosen == msg[1]
                } else {
                    chosen == msg[0]
                }
            }
        ));
        assert_eq!(ideal.count(), 100);
        assert_eq!(ideal.choices(), &choices[..]);
    }

    #[test]
    fn test_ideal_base_ot() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let columns: Vec<[BitVector; 2]> = (0..8)
            .map(|_| {
                [
                    BitVector::random(&mut rng, 16).unwrap(),
                    BitVector::random(&mut rng, 16).unwrap(),
                ]
            })
            .collect();
        let choices = [true, false, false, true, true, true, false, false];

        let mut base = IdealBaseOt::new(BaseOtOffer {
            columns: columns.clone(),
        });
        let received = base.receive_columns(&choices).unwrap();

        for ((column, pair), &choice) in received.iter().zip(&columns).zip(&choices) {
            assert_eq!(column, &pair[choice as usize]);
        }
        assert_eq!(base.functionality().transfer_id(), TransferId(1));
    }

    #[test]
    fn test_ideal_base_ot_single_use() {
        let mut base = IdealBaseOt::new(BaseOtOffer {
            columns: vec![[BitVector::zeros(4), BitVector::zeros(4)]],
        });

        base.receive_columns(&[true]).unwrap();

        assert!(matches!(
            base.receive_columns(&[true]),
            Err(IdealBaseOtError::Consumed)
        ));
    }

    #[test]
    fn test_ideal_base_ot_count_mismatch() {
        let mut base = IdealBaseOt::new(BaseOtOffer {
            columns: vec![[BitVector::zeros(4), BitVector::zeros(4)]],
        });

        assert!(matches!(
            base.receive_columns(&[true, false]),
            Err(IdealBaseOtError::CountMismatch {
                expected: 1,
                actual: 2
            })
        ));
    }
}

//! Low-level crate containing core functionalities for oblivious transfer extension.
//!
//! The protocols in this crate are implemented sans-IO: each party is a state machine which
//! consumes and produces the messages in [`iknp::msgs`], leaving transport to the caller.
//!
//! # ⚠️ Warning ⚠️
//!
//! Some implementations make assumptions about invariants which may not be checked if using these
//! low-level APIs naively. Failing to uphold these invariants may result in security vulnerabilities.
//! In particular, the helpers in [`ideal`] see the inputs of both parties and must only be used in
//! trusted test harnesses.
//!
//! USE AT YOUR OWN RISK.

#![deny(
    unsafe_code,
    missing_docs,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all
)]

use serde::{Deserialize, Serialize};

pub mod base;
pub mod ideal;
pub mod iknp;

/// An oblivious transfer identifier.
///
/// Multiple transfers may be batched together under the same transfer ID.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TransferId(u64);

impl std::fmt::Display for TransferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TransferId({})", self.0)
    }
}

impl TransferId {
    /// Returns the current transfer ID, incrementing `self` in-place.
    pub fn next_id(&mut self) -> Self {
        let id = *self;
        self.0 += 1;
        id
    }
}

/// The output the sender receives from the OT functionality.
#[derive(Debug)]
pub struct OTSenderOutput {
    /// The transfer id.
    pub id: TransferId,
}

/// The output the receiver receives from the OT functionality.
#[derive(Debug)]
pub struct OTReceiverOutput<T> {
    /// The transfer id.
    pub id: TransferId,
    /// The chosen messages.
    pub msgs: Vec<T>,
}

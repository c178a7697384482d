//! An implementation of the [`IKNP`](https://www.iacr.org/archive/crypto2003/27290145/27290145.pdf)
//! OT extension, generalized to 1-out-of-`2^l` transfers with a correlation-robust code.
//!
//! The receiver samples a random matrix `T` and sets `U[i] = T[i] ^ C(r_i)`, where `r_i` is the
//! selection of instance `i`. Through `k` base OTs, the sender learns column `j` of `U` if bit
//! `j` of its global secret `s` is set, and column `j` of `T` otherwise. The resulting matrix `Q`
//! satisfies `Q[i] ^ (C(r_i) & s) = T[i]`, so only the selected candidate is masked with a key
//! the receiver knows.

pub mod code;
pub mod config;
mod error;
pub mod msgs;
pub mod oracle;
pub mod receiver;
pub mod sender;

pub use config::{CodeKey, IknpConfig, IknpConfigBuilder};
pub use error::IknpError;
pub use receiver::Receiver;
pub use sender::Sender;

//! FROST Threshold Signing Protocol, signer side
//!
//! Building blocks of the protocol that [`Session`](crate::Session) drives. They can be used directly,
//! but then it's on the caller to make sure that nonces are never reused.
//!
//! 1. [round1::commit] samples [round1::SecretNonces] that must be kept secret, and
//!    [round1::PublicCommitments] that are sent to the aggregator.
//! 2. The aggregator chooses a set of signers and relays their commitments. Signer collects them into
//!    [commitments::CommitmentList] in ascending order of identifiers.
//! 3. Signer issues a [round2::SigShare] via [round2::sign], consuming the secret nonces.

pub mod commitments;
pub mod round1;
pub mod round2;
mod utils;

//! Participant-side FROST signing engine for constrained signing devices
//!
//! The crate implements the signer half of the FROST threshold Schnorr protocol as it runs on a device
//! that holds one long-lived key share. The device never talks to other signers directly: an untrusted
//! aggregator relays commitments between them and collects the resulting signature shares.
//!
//! Signing goes through one [`Session`] per attempt:
//! 1. [`Session::commit`] samples a fresh (hiding, binding) nonce pair bound to the secret share and
//!    outputs the public commitments that need to be sent to the aggregator.
//! 2. [`Session::commitment`] is called once per signer (including this device) in strictly ascending
//!    identifier order, with commitments relayed by the aggregator.
//! 3. [`Session::sign`] derives binding factors, the group commitment, the Lagrange coefficient and
//!    the Schnorr challenge, and outputs the [signature share](signing::round2::SigShare). The nonce
//!    pair is consumed, the session needs a [reset](Session::reset) before it can be used again.
//!
//! Storage is bounded: the session keeps at most `N` commitments in a fixed-capacity table, where `N`
//! is a const generic parameter of the session.
//!
//! Key generation is not part of this crate. The key share is expected to be provisioned beforehand,
//! see [`DeviceConfig`].

#![no_std]
#![forbid(unsafe_code, unused_crate_dependencies)]
#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "std")]
extern crate std;

pub use generic_ec;

pub mod ciphersuite;
pub mod config;
pub mod session;
pub mod signing;

/// Key share
///
/// This module re-exports type definitions from [`key_share`](::key_share) crate. Threshold key
/// shares can be turned into a [`DeviceConfig`] to provision a device.
pub mod key_share {
    #[doc(inline)]
    pub use key_share::{
        CoreKeyShare as KeyShare, DirtyCoreKeyShare as DirtyKeyShare, DirtyKeyInfo, KeyInfo,
        Validate, VssSetup,
    };
}

/// Trusted dealer
///
/// Generates threshold key shares in one place. It creates a single point of failure, and is meant
/// to be used in tests and for importing an existing key onto a set of devices.
#[cfg(feature = "spof")]
pub mod trusted_dealer {
    pub use key_share::trusted_dealer::*;
}

pub use self::{
    ciphersuite::Ciphersuite,
    config::DeviceConfig,
    session::{ErrorKind, Session, SessionError, SessionState},
};

/// Signer identifier
///
/// Identifiers are single bytes embedded as the low byte of a scalar. Zero is never a valid identifier.
pub type Identifier = u8;

/// Session capacity used when the const generic parameter of [`Session`] is left out
pub const DEFAULT_MAX_SIGNERS: usize = 16;

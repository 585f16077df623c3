//! Signing session
//!
//! [`Session`] owns all the state of one signing attempt on the device and enforces its lifecycle:
//!
//! ```text
//! Idle --commit--> NonceCommitted --commitment--> CollectingCommitments --sign--> Signed
//!                    |    ^                         |    ^
//!                    +----+ commit                  +----+ commitment
//! ```
//!
//! `Signed` is terminal: the nonces are consumed, and only [reset](Session::reset) brings the session
//! back to `Idle`. A failed call never changes the session. If the session got stuck (e.g. commitments
//! were submitted in the wrong order), it needs to be reset.

use core::fmt;

use rand_core::{CryptoRng, RngCore};

use crate::{
    ciphersuite::Ciphersuite,
    config::{DeviceConfig, InvalidConfig},
    signing::{
        commitments::{CommitmentList, PushError},
        round1::{self, NonceCommitments, SecretNonces},
        round2::{self, SigShare, SigningError},
    },
    Identifier, DEFAULT_MAX_SIGNERS,
};

/// Lifecycle state of a [`Session`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No nonces, no commitments
    Idle,
    /// Nonces are committed, no commitments accepted yet
    NonceCommitted,
    /// At least one commitment is accepted
    CollectingCommitments,
    /// Signature share was issued, nonces are consumed
    Signed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::NonceCommitted => "nonce committed",
            Self::CollectingCommitments => "collecting commitments",
            Self::Signed => "signed",
        })
    }
}

/// Signing session
///
/// Holds at most `N` commitments. Session is independently constructible, a device that processes
/// one signing at a time keeps one session and [resets](Self::reset) it between signings.
pub struct Session<C: Ciphersuite, const N: usize = DEFAULT_MAX_SIGNERS> {
    config: DeviceConfig<C::Curve>,
    state: SessionState,
    nonces: Option<SecretNonces<C::Curve>>,
    own_commitments: Option<NonceCommitments<C>>,
    commitments: CommitmentList<C, N>,
}

impl<C: Ciphersuite, const N: usize> Session<C, N> {
    /// Constructs an idle session
    ///
    /// Returns error if `config` allows more signers than the session can hold.
    pub fn new(config: DeviceConfig<C::Curve>) -> Result<Self, InvalidConfig> {
        if usize::from(config.max_signers()) > N {
            return Err(InvalidConfig::capacity_exceeded(config.max_signers(), N));
        }
        Ok(Self {
            config,
            state: SessionState::Idle,
            nonces: None,
            own_commitments: None,
            commitments: CommitmentList::new(),
        })
    }

    /// Commits nonces
    ///
    /// Samples a fresh pair of nonces and returns commitments to them, which need to be sent to the
    /// aggregator. Nonces committed previously (if any) are discarded. Not allowed once commitments
    /// are being collected.
    pub fn commit(
        &mut self,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<NonceCommitments<C>, SessionError> {
        match self.state {
            SessionState::Idle | SessionState::NonceCommitted => (),
            SessionState::CollectingCommitments | SessionState::Signed => {
                return Err(self.invalid_state(Operation::Commit))
            }
        }

        let (nonces, commitments) = round1::commit::<C>(rng, self.config.secret_share());
        let commitments = commitments.encode::<C>();

        // Replaced nonces are zeroized on drop
        self.nonces = Some(nonces);
        self.own_commitments = Some(commitments);
        self.state = SessionState::NonceCommitted;

        tracing::debug!(identifier = self.config.identifier(), "nonces committed");
        Ok(commitments)
    }

    /// Accepts commitments of signer `identifier`
    ///
    /// Commitments must be submitted in strictly ascending order of identifiers, including the
    /// device's own commitments returned by [commit](Self::commit). Points are not validated here,
    /// they are decoded at [signing](Self::sign).
    pub fn commitment(
        &mut self,
        identifier: Identifier,
        commitments: NonceCommitments<C>,
    ) -> Result<(), SessionError> {
        match self.state {
            SessionState::NonceCommitted | SessionState::CollectingCommitments => (),
            SessionState::Idle | SessionState::Signed => {
                return Err(self.invalid_state(Operation::Commitment))
            }
        }

        let max_signers = usize::from(self.config.max_signers());
        let rejected = |err: PushError| {
            tracing::warn!(identifier, %err, "commitment rejected");
            SessionError(Reason::Commitment(err))
        };

        self.commitments
            .check(identifier, max_signers)
            .map_err(rejected)?;
        if identifier == self.config.identifier()
            && self.own_commitments.as_ref() != Some(&commitments)
        {
            tracing::warn!(identifier, "own commitments don't match committed nonces");
            return Err(Reason::CommitmentMismatch.into());
        }

        let position = self
            .commitments
            .push(
                commitments.with_identifier(identifier),
                self.config.identifier(),
                max_signers,
            )
            .map_err(rejected)?;
        self.state = SessionState::CollectingCommitments;

        tracing::debug!(identifier, position, "commitment accepted");
        Ok(())
    }

    /// Issues a signature share on `msg`
    ///
    /// Requires at least `min_signers` accepted commitments, including the device's own. Consumes
    /// the nonces: the session must be [reset](Self::reset) before the next signing.
    pub fn sign(&mut self, msg: &[u8]) -> Result<SigShare<C::Curve>, SessionError> {
        let nonces = match (&self.state, &self.nonces) {
            (SessionState::NonceCommitted | SessionState::CollectingCommitments, Some(nonces)) => {
                nonces
            }
            _ => return Err(self.invalid_state(Operation::Sign)),
        };

        let sig_share =
            round2::sign_with_borrowed_nonces(&self.config, nonces, msg, &self.commitments)
                .map_err(|err| {
                    tracing::warn!(%err, "signing failed");
                    SessionError(Reason::Signing(err))
                })?;

        // Consumed nonces are zeroized on drop
        self.nonces = None;
        self.state = SessionState::Signed;

        tracing::debug!(
            identifier = self.config.identifier(),
            signers = self.commitments.len(),
            "signature share issued"
        );
        Ok(sig_share)
    }

    /// Resets the session
    ///
    /// Unconditionally discards nonces (zeroizing them) and all accepted commitments. Session
    /// returns to [`SessionState::Idle`].
    pub fn reset(&mut self) {
        self.nonces = None;
        self.own_commitments = None;
        self.commitments.clear();
        self.state = SessionState::Idle;

        tracing::debug!(identifier = self.config.identifier(), "session reset");
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Device config
    pub fn config(&self) -> &DeviceConfig<C::Curve> {
        &self.config
    }

    /// Encoded group public key
    pub fn group_public_key(&self) -> C::PointBytes {
        C::serialize_point(&self.config.group_public_key())
    }

    /// Accepted commitments
    pub fn commitments(&self) -> &CommitmentList<C, N> {
        &self.commitments
    }

    /// Position of the device's own commitments among accepted commitments
    pub fn own_position(&self) -> Option<usize> {
        self.commitments.own_position()
    }

    fn invalid_state(&self, operation: Operation) -> SessionError {
        tracing::warn!(%operation, state = %self.state, "operation not allowed");
        SessionError(Reason::InvalidState {
            operation,
            state: self.state,
        })
    }
}

impl<C: Ciphersuite, const N: usize> fmt::Debug for Session<C, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("commitments", &self.commitments)
            .finish_non_exhaustive()
    }
}

/// Kind of [`SessionError`]
///
/// Lets the caller map errors onto status codes without inspecting error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Session already holds the maximum amount of commitments
    TooManyCommitments,
    /// Commitment identifier is not strictly greater than the previous one
    IdentifierOrdering,
    /// Less than `min_signers` commitments were accepted
    NotEnoughCommitments,
    /// Device's own commitments were never accepted
    IdentifierNotIncluded,
    /// Operation is not allowed in the current session state
    InvalidState,
    /// Submitted own commitments don't match the committed nonces
    CommitmentMismatch,
    /// Commitment is not a valid point, or group commitment is point at infinity
    InvalidCommitment,
    /// Bug occurred
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Commit,
    Commitment,
    Sign,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Commit => "commit",
            Self::Commitment => "commitment",
            Self::Sign => "sign",
        })
    }
}

/// Session error
#[derive(Debug)]
pub struct SessionError(Reason);

#[derive(Debug)]
enum Reason {
    InvalidState {
        operation: Operation,
        state: SessionState,
    },
    CommitmentMismatch,
    Commitment(PushError),
    Signing(SigningError),
}

impl SessionError {
    /// Kind of the error
    pub fn kind(&self) -> ErrorKind {
        match &self.0 {
            Reason::InvalidState { .. } => ErrorKind::InvalidState,
            Reason::CommitmentMismatch => ErrorKind::CommitmentMismatch,
            Reason::Commitment(PushError::TooManyCommitments { .. }) => {
                ErrorKind::TooManyCommitments
            }
            Reason::Commitment(PushError::IdentifierOrdering { .. }) => {
                ErrorKind::IdentifierOrdering
            }
            Reason::Signing(err) => err.kind(),
        }
    }
}

impl From<Reason> for SessionError {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Reason::InvalidState { operation, state } => {
                write!(f, "`{operation}` is not allowed in state `{state}`")
            }
            Reason::CommitmentMismatch => {
                f.write_str("own commitments don't match committed nonces")
            }
            Reason::Commitment(_) => f.write_str("commitment rejected"),
            Reason::Signing(_) => f.write_str("signing failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::InvalidState { .. } | Reason::CommitmentMismatch => None,
            Reason::Commitment(err) => Some(err),
            Reason::Signing(err) => Some(err),
        }
    }
}

//! Round 2 - Signing
//!
//! In the second round, each signer signs a message and obtains a [signature share](SigShare).
//!
//! Signing is split into two steps: [derive] computes all public per-signing values from the list
//! of commitments and the message, and [sign] combines them with the secret nonces and the secret
//! share.

use core::fmt;

use arrayvec::ArrayVec;
use generic_ec::{Curve, Point, Scalar};

use crate::{ciphersuite::Ciphersuite, session::ErrorKind, DeviceConfig, Identifier};

use super::{commitments::CommitmentList, round1::SecretNonces, utils};

/// Partial signature
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(bound = "")
)]
pub struct SigShare<E: Curve>(pub Scalar<E>);

impl<E: Curve> SigShare<E> {
    /// Serializes the signature share following ciphersuite `C`
    pub fn to_bytes<C: Ciphersuite<Curve = E>>(&self) -> C::ScalarBytes {
        C::serialize_scalar(&self.0)
    }
}

/// Public values derived for one signing
///
/// Derivation is deterministic: the same config, list of commitments and message always result in
/// the same values.
#[derive(Debug, Clone)]
pub struct Derivation<E: Curve, const N: usize> {
    /// Binding factors of all signers, aligned with the list of commitments
    pub binding_factors: ArrayVec<Scalar<E>, N>,
    /// Position of this signer in the list of commitments
    pub own_position: usize,
    /// Group commitment $R$
    pub group_commitment: Point<E>,
    /// Lagrange coefficient $\lambda_i$ of this signer
    pub lambda: Scalar<E>,
    /// Schnorr challenge $c$
    pub challenge: Scalar<E>,
}

impl<E: Curve, const N: usize> Derivation<E, N> {
    /// Binding factor of this signer
    pub fn own_binding_factor(&self) -> Option<&Scalar<E>> {
        self.binding_factors.get(self.own_position)
    }
}

/// Derives binding factors, group commitment, Lagrange coefficient and challenge
///
/// Checks that the list contains at least `min_signers` commitments and that this signer's
/// commitment is in the list.
pub fn derive<C: Ciphersuite, const N: usize>(
    config: &DeviceConfig<C::Curve>,
    msg: &[u8],
    commitment_list: &CommitmentList<C, N>,
) -> Result<Derivation<C::Curve, N>, SigningError> {
    // --- Retrieve and Validate Data
    if commitment_list.len() < usize::from(config.min_signers()) {
        return Err(Reason::TooFewSigners {
            min_signers: config.min_signers(),
            n: commitment_list.len(),
        }
        .into());
    }
    let own_position = commitment_list
        .own_position()
        .ok_or(Reason::SignerNotInList)?;

    // --- Binding factors and group commitment
    let binding_factors = utils::compute_binding_factors::<C, N>(commitment_list, msg);
    let group_commitment =
        utils::compute_group_commitment(commitment_list.as_slice(), &binding_factors)
            .map_err(Reason::InvalidCommitment)?;
    if group_commitment.is_zero() {
        return Err(Reason::ZeroGroupCommitment.into());
    }

    // --- Lagrange coefficient
    let signers_list = commitment_list
        .identifiers()
        .map(crate::ciphersuite::identifier_to_scalar::<C::Curve>)
        .collect::<Option<ArrayVec<_, N>>>()
        .ok_or(Bug::ZeroIdentifier)?;
    let x_i = signers_list.get(own_position).ok_or(Bug::OwnIdentifier)?;
    let lambda =
        utils::derive_interpolating_value(&signers_list, x_i).ok_or(Bug::InterpolationValue)?;

    // --- Challenge
    let challenge =
        C::compute_challenge(&group_commitment, &config.group_public_key(), msg);

    Ok(Derivation {
        binding_factors,
        own_position,
        group_commitment,
        lambda,
        challenge,
    })
}

/// Issues a partial signature on the `msg`
///
/// Inputs:
/// * Device `config` that holds the secret share
/// * Secret `nonces` from [round 1](super::round1)
/// * `msg` to be signed
/// * List of commitments of all signers, including this one
///
/// Outputs a partial signature $z_i = d_i + e_i \rho_i + \lambda_i c s_i$.
///
/// Nonces are taken by value and dropped (zeroized) before returning, whether signing succeeded or
/// not. **Never reuse nonces!** Using the same nonce to sign two different messages leaks the secret
/// share.
pub fn sign<C: Ciphersuite, const N: usize>(
    config: &DeviceConfig<C::Curve>,
    nonces: SecretNonces<C::Curve>,
    msg: &[u8],
    commitment_list: &CommitmentList<C, N>,
) -> Result<SigShare<C::Curve>, SigningError> {
    sign_with_borrowed_nonces(config, &nonces, msg, commitment_list)
}

/// Same as [sign], but leaves nonces to the caller
///
/// Used by [`Session`](crate::Session) which keeps nonces if signing fails, and discards them
/// otherwise.
pub(crate) fn sign_with_borrowed_nonces<C: Ciphersuite, const N: usize>(
    config: &DeviceConfig<C::Curve>,
    nonces: &SecretNonces<C::Curve>,
    msg: &[u8],
    commitment_list: &CommitmentList<C, N>,
) -> Result<SigShare<C::Curve>, SigningError> {
    let derivation = derive(config, msg, commitment_list)?;

    let own_commitments = commitment_list
        .own_commitments()
        .ok_or(Bug::OwnCommitments)?;
    if nonces.public_commitments().encode::<C>() != *own_commitments {
        return Err(Reason::NoncesDontMatchComm.into());
    }
    let binding_factor = *derivation
        .own_binding_factor()
        .ok_or(Bug::OwnBindingFactor)?;

    Ok(combine(config, nonces, binding_factor, &derivation))
}

fn combine<E: Curve, const N: usize>(
    config: &DeviceConfig<E>,
    nonces: &SecretNonces<E>,
    binding_factor: Scalar<E>,
    derivation: &Derivation<E, N>,
) -> SigShare<E> {
    let hiding_nonce: &Scalar<E> = nonces.hiding_nonce.as_ref();
    let binding_nonce: &Scalar<E> = nonces.binding_nonce.as_ref();
    let secret_share: &Scalar<E> = config.secret_share().as_ref();

    SigShare(
        *hiding_nonce
            + (*binding_nonce * binding_factor)
            + (derivation.lambda * derivation.challenge * *secret_share),
    )
}

/// Signing error
#[derive(Debug)]
pub struct SigningError(Reason);

#[derive(Debug)]
enum Reason {
    TooFewSigners { min_signers: u16, n: usize },
    SignerNotInList,
    NoncesDontMatchComm,
    InvalidCommitment(Identifier),
    ZeroGroupCommitment,
    Bug(Bug),
}

#[derive(Debug)]
enum Bug {
    ZeroIdentifier,
    OwnIdentifier,
    OwnCommitments,
    OwnBindingFactor,
    InterpolationValue,
}

impl SigningError {
    /// Kind of the error
    pub fn kind(&self) -> ErrorKind {
        match self.0 {
            Reason::TooFewSigners { .. } => ErrorKind::NotEnoughCommitments,
            Reason::SignerNotInList => ErrorKind::IdentifierNotIncluded,
            Reason::NoncesDontMatchComm => ErrorKind::CommitmentMismatch,
            Reason::InvalidCommitment(_) | Reason::ZeroGroupCommitment => {
                ErrorKind::InvalidCommitment
            }
            Reason::Bug(_) => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for SigningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Reason::TooFewSigners { min_signers, n } => write!(
                f,
                "commitments list contains {n} signers, although at \
                least {min_signers} must take part in the signing"
            ),
            Reason::SignerNotInList => f.write_str("signer not in the list of commitments"),
            Reason::NoncesDontMatchComm => f.write_str("nonces don't match signer commitments"),
            Reason::InvalidCommitment(j) => {
                write!(f, "commitment of signer {j} is not a valid point")
            }
            Reason::ZeroGroupCommitment => f.write_str("group commitment is point at infinity"),
            Reason::Bug(_) => f.write_str("bug occurred"),
        }
    }
}

impl fmt::Display for Bug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bug::ZeroIdentifier => f.write_str("zero identifier in the list of commitments"),
            Bug::OwnIdentifier => f.write_str("retrieve own identifier"),
            Bug::OwnCommitments => f.write_str("retrieve own commitments"),
            Bug::OwnBindingFactor => f.write_str("retrieve own binding factor"),
            Bug::InterpolationValue => f.write_str("derive interpolation value"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SigningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.0 {
            Reason::TooFewSigners { .. }
            | Reason::SignerNotInList
            | Reason::NoncesDontMatchComm
            | Reason::InvalidCommitment(_)
            | Reason::ZeroGroupCommitment => None,
            Reason::Bug(bug) => Some(bug),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Bug {}

impl From<Reason> for SigningError {
    fn from(err: Reason) -> Self {
        SigningError(err)
    }
}
impl From<Bug> for SigningError {
    fn from(err: Bug) -> Self {
        SigningError(Reason::Bug(err))
    }
}

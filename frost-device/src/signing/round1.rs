//! Round 1 - Commitment
//!
//! Signer samples a hiding and a binding nonce, and commits to them by multiplying each nonce by the
//! curve generator. Secret nonces are kept locally, public commitments are sent to the aggregator.

use core::fmt;

use generic_ec::{Curve, Point, SecretScalar};
use rand_core::{CryptoRng, RngCore};

use crate::{
    ciphersuite::{generate_nonce, Ciphersuite},
    Identifier,
};

/// Secret nonces
///
/// Nonces are zeroized on drop. **Never reuse nonces!** Two signature shares over different
/// messages issued with the same nonces reveal the secret share.
#[derive(Clone)]
pub struct SecretNonces<E: Curve> {
    /// Hiding nonce
    pub hiding_nonce: SecretScalar<E>,
    /// Binding nonce
    pub binding_nonce: SecretScalar<E>,
}

impl<E: Curve> SecretNonces<E> {
    /// Computes public commitments to the nonces
    pub fn public_commitments(&self) -> PublicCommitments<E> {
        PublicCommitments {
            hiding_comm: Point::generator() * &self.hiding_nonce,
            binding_comm: Point::generator() * &self.binding_nonce,
        }
    }
}

impl<E: Curve> fmt::Debug for SecretNonces<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretNonces")
    }
}

/// Public commitments to the nonces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicCommitments<E: Curve> {
    /// Commitment to the hiding nonce
    pub hiding_comm: Point<E>,
    /// Commitment to the binding nonce
    pub binding_comm: Point<E>,
}

impl<E: Curve> PublicCommitments<E> {
    /// Encodes commitments following ciphersuite `C`
    pub fn encode<C: Ciphersuite<Curve = E>>(&self) -> NonceCommitments<C> {
        NonceCommitments {
            hiding: C::serialize_point(&self.hiding_comm),
            binding: C::serialize_point(&self.binding_comm),
        }
    }
}

/// Encoded public commitments, `hiding || binding`
///
/// Wire format of the commitments: two fixed-width encoded points. Nothing is validated at
/// construction, points are decoded when they're used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceCommitments<C: Ciphersuite> {
    /// Encoded commitment to the hiding nonce
    pub hiding: C::PointBytes,
    /// Encoded commitment to the binding nonce
    pub binding: C::PointBytes,
}

impl<C: Ciphersuite> NonceCommitments<C> {
    /// Size of serialized commitments in bytes
    pub const fn serialized_len() -> usize {
        2 * C::POINT_SIZE
    }

    /// Parses `hiding || binding`
    ///
    /// Returns error if `bytes` is not exactly [`serialized_len()`](Self::serialized_len) long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidLength> {
        if bytes.len() != Self::serialized_len() {
            return Err(InvalidLength {
                expected: Self::serialized_len(),
                actual: bytes.len(),
            });
        }
        let (hiding, binding) = bytes.split_at(C::POINT_SIZE);
        let invalid_length = || InvalidLength {
            expected: Self::serialized_len(),
            actual: bytes.len(),
        };
        let hiding = <C::PointBytes as TryFrom<&[u8]>>::try_from(hiding)
            .map_err(|_| invalid_length())?;
        let binding = <C::PointBytes as TryFrom<&[u8]>>::try_from(binding)
            .map_err(|_| invalid_length())?;
        Ok(Self { hiding, binding })
    }

    /// Writes `hiding || binding` into `out`, returns amount of written bytes
    ///
    /// Returns error if `out` is shorter than [`serialized_len()`](Self::serialized_len).
    pub fn write_to_slice(&self, out: &mut [u8]) -> Result<usize, InvalidLength> {
        let len = Self::serialized_len();
        let actual = out.len();
        let out = out.get_mut(..len).ok_or(InvalidLength {
            expected: len,
            actual,
        })?;
        let (hiding, binding) = out.split_at_mut(C::POINT_SIZE);
        hiding.copy_from_slice(self.hiding.as_ref());
        binding.copy_from_slice(self.binding.as_ref());
        Ok(len)
    }

    /// Decodes the points
    pub fn decode(&self) -> Result<PublicCommitments<C::Curve>, generic_ec::errors::InvalidPoint> {
        Ok(PublicCommitments {
            hiding_comm: C::deserialize_point(self.hiding.as_ref())?,
            binding_comm: C::deserialize_point(self.binding.as_ref())?,
        })
    }

    /// Tags commitments with a signer identifier
    pub fn with_identifier(self, identifier: Identifier) -> Commitment<C> {
        Commitment {
            identifier,
            commitments: self,
        }
    }
}

/// Commitments of one signer tagged with its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment<C: Ciphersuite> {
    /// Signer identifier
    pub identifier: Identifier,
    /// Signer commitments
    pub commitments: NonceCommitments<C>,
}

/// Commits nonces
///
/// Each nonce is derived from 32 bytes of randomness and the signer's `secret_share`, see
/// [generate_nonce]. Returns secret nonces and public commitments to them.
pub fn commit<C: Ciphersuite>(
    rng: &mut (impl RngCore + CryptoRng),
    secret_share: &SecretScalar<C::Curve>,
) -> (SecretNonces<C::Curve>, PublicCommitments<C::Curve>) {
    let nonces = SecretNonces {
        hiding_nonce: generate_nonce::<C>(rng, secret_share),
        binding_nonce: generate_nonce::<C>(rng, secret_share),
    };
    let commitments = nonces.public_commitments();
    (nonces, commitments)
}

/// Byte string has unexpected length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidLength {
    expected: usize,
    actual: usize,
}

impl fmt::Display for InvalidLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid length: expected {} bytes, got {}",
            self.expected, self.actual
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidLength {}

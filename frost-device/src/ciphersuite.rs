//! FROST Ciphersuite
//!
//! Ciphersuite specifies which curve and hash primitives to use during the signing.
//!
//! Out of the box, we provide [Secp256k1] ciphersuite (requires `ciphersuite-secp256k1` feature,
//! enabled by default).

use core::fmt;

use generic_ec::{
    errors::{InvalidPoint, InvalidScalar},
    Curve, NonZero, Point, Scalar, SecretScalar,
};
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

#[cfg(feature = "ciphersuite-secp256k1")]
mod secp256k1;

#[cfg(feature = "ciphersuite-secp256k1")]
pub use secp256k1::Secp256k1;

/// Ciphersuite determines an underlying curve and set of cryptographic primitives
/// used in the protocol
///
/// All encodings are fixed-width: a device stores commitments as raw bytes of
/// [`POINT_SIZE`](Self::POINT_SIZE) and only decodes them when the signature share is computed.
pub trait Ciphersuite: Sized + Clone + Copy + fmt::Debug + PartialEq + Eq {
    /// Name of the ciphersuite, also known as `contextString`
    const NAME: &'static str;

    /// Underlying curve on which signatures will be produced
    type Curve: Curve;

    /// Digest that's used to feed data into [H4](Self::h4) and [H5](Self::h5) hash functions
    type Digest: digest::Update + digest::FixedOutput + Clone;

    /// `H1` hash function, used to derive binding factors
    ///
    /// Accepts a list of bytestring, that'll be concatenated before hashing.
    /// Returns `H1(data[0] || data[1] || ... || data[data.len() - 1])`.
    fn h1(msg: &[&[u8]]) -> Scalar<Self::Curve>;
    /// Computes the challenge according to Schnorr scheme
    ///
    /// Implementation should be based on `H2` hash function applied to
    /// `encode(group_commitment) || encode(group_public_key) || msg`.
    fn compute_challenge(
        group_commitment: &Point<Self::Curve>,
        group_public_key: &NonZero<Point<Self::Curve>>,
        msg: &[u8],
    ) -> Scalar<Self::Curve>;
    /// `H3` hash function, used to derive nonces
    ///
    /// Accepts a list of bytestring, that'll be concatenated before hashing.
    /// Returns `H3(data[0] || data[1] || ... || data[data.len() - 1])`.
    fn h3(msg: &[&[u8]]) -> Scalar<Self::Curve>;

    /// `H4` hash function, digests the message being signed
    fn h4() -> Self::Digest;
    /// `H5` hash function, digests the encoded list of commitments
    fn h5() -> Self::Digest;

    /// Byte array that contains bytes representation of the point
    type PointBytes: AsRef<[u8]> + Copy + PartialEq + Eq + fmt::Debug + for<'a> TryFrom<&'a [u8]>;
    /// Size of serialized point in bytes
    const POINT_SIZE: usize;
    /// Serializes point
    fn serialize_point(point: &Point<Self::Curve>) -> Self::PointBytes;
    /// Deserializes point
    fn deserialize_point(bytes: &[u8]) -> Result<Point<Self::Curve>, InvalidPoint>;

    /// Byte array that contains bytes representation of the scalar
    type ScalarBytes: AsRef<[u8]> + Zeroize;
    /// Size of serialized scalar in bytes
    const SCALAR_SIZE: usize;
    /// Serializes scalar
    fn serialize_scalar(scalar: &Scalar<Self::Curve>) -> Self::ScalarBytes;
    /// Deserializes scalar
    fn deserialize_scalar(bytes: &[u8]) -> Result<Scalar<Self::Curve>, InvalidScalar>;
    /// Deserializes secret scalar
    fn deserialize_secret_scalar(bytes: &[u8]) -> Result<SecretScalar<Self::Curve>, InvalidScalar> {
        let mut scalar = Self::deserialize_scalar(bytes)?;
        Ok(SecretScalar::new(&mut scalar))
    }
}

/// Nonce generation
///
/// Hashes 32 bytes of fresh randomness together with the secret share via [H3](Ciphersuite::h3).
pub fn generate_nonce<C: Ciphersuite>(
    rng: &mut (impl RngCore + CryptoRng),
    secret: &SecretScalar<C::Curve>,
) -> SecretScalar<C::Curve> {
    let mut random_bytes = Zeroizing::new([0u8; 32]);
    rng.fill_bytes(random_bytes.as_mut_slice());

    let secret_bytes = Zeroizing::new(C::serialize_scalar(secret.as_ref()));

    let mut hash = C::h3(&[random_bytes.as_slice(), (*secret_bytes).as_ref()]);

    SecretScalar::new(&mut hash)
}

/// Embeds a signer identifier into a scalar
///
/// Returns `None` if identifier is zero.
pub fn identifier_to_scalar<E: Curve>(identifier: crate::Identifier) -> Option<NonZero<Scalar<E>>> {
    NonZero::from_scalar(Scalar::from(u16::from(identifier)))
}

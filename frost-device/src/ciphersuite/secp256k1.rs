use digest::Digest;

use crate::Ciphersuite;

/// FROST(secp256k1, SHA-256) ciphersuite
///
/// Points are SEC1-compressed (33 bytes), scalars are 32 bytes big-endian. Point at infinity
/// is serialized as 33 zero bytes, which is rejected by [deserialize_point](Ciphersuite::deserialize_point).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1;

impl Ciphersuite for Secp256k1 {
    const NAME: &'static str = "FROST-secp256k1-SHA256-v10";

    type Curve = generic_ec::curves::Secp256k1;
    type Digest = sha2::Sha256;

    fn h1(msg: &[&[u8]]) -> generic_ec::Scalar<Self::Curve> {
        hash_to_scalar(msg, &[Self::NAME.as_bytes(), b"rho"])
    }

    fn compute_challenge(
        group_commitment: &generic_ec::Point<Self::Curve>,
        group_public_key: &generic_ec::NonZero<generic_ec::Point<Self::Curve>>,
        msg: &[u8],
    ) -> generic_ec::Scalar<Self::Curve> {
        let r = Self::serialize_point(group_commitment);
        let pk = Self::serialize_point(group_public_key.as_ref());
        hash_to_scalar(
            &[r.as_slice(), pk.as_slice(), msg],
            &[Self::NAME.as_bytes(), b"chal"],
        )
    }

    fn h3(msg: &[&[u8]]) -> generic_ec::Scalar<Self::Curve> {
        hash_to_scalar(msg, &[Self::NAME.as_bytes(), b"nonce"])
    }

    fn h4() -> Self::Digest {
        sha2::Sha256::new()
            .chain_update(Self::NAME)
            .chain_update(b"msg")
    }

    fn h5() -> Self::Digest {
        sha2::Sha256::new()
            .chain_update(Self::NAME)
            .chain_update(b"com")
    }

    type PointBytes = [u8; 33];
    const POINT_SIZE: usize = 33;
    fn serialize_point(point: &generic_ec::Point<Self::Curve>) -> Self::PointBytes {
        let mut out = [0u8; 33];
        if !point.is_zero() {
            out.copy_from_slice(point.to_bytes(true).as_ref());
        }
        out
    }
    fn deserialize_point(
        bytes: &[u8],
    ) -> Result<generic_ec::Point<Self::Curve>, generic_ec::errors::InvalidPoint> {
        if bytes.len() != Self::POINT_SIZE {
            return Err(generic_ec::errors::InvalidPoint);
        }
        generic_ec::Point::from_bytes(bytes)
    }

    type ScalarBytes = [u8; 32];
    const SCALAR_SIZE: usize = 32;
    fn serialize_scalar(scalar: &generic_ec::Scalar<Self::Curve>) -> Self::ScalarBytes {
        let mut out = [0u8; 32];
        out.copy_from_slice(scalar.to_be_bytes().as_ref());
        out
    }
    fn deserialize_scalar(
        bytes: &[u8],
    ) -> Result<generic_ec::Scalar<Self::Curve>, generic_ec::errors::InvalidScalar> {
        if bytes.len() != Self::SCALAR_SIZE {
            return Err(generic_ec::errors::InvalidScalar);
        }
        generic_ec::Scalar::from_be_bytes(bytes)
    }
}

fn hash_to_scalar(
    msgs: &[&[u8]],
    dsts: &[&[u8]],
) -> generic_ec::Scalar<<Secp256k1 as Ciphersuite>::Curve> {
    use generic_ec::as_raw::FromRaw;
    use k256::elliptic_curve::{
        generic_array::typenum::Unsigned,
        hash2curve::{ExpandMsgXmd, FromOkm, GroupDigest as _},
    };

    // `k256::Secp256k1::hash_to_scalar` returns error if:
    // * dst.is_empty()
    // * len_in_bytes == 0
    // * len_in_bytes > u16::MAX
    // * len_in_bytes > 255 * HashT::OutputSize
    // where len_in_bytes = <Self::FieldElement as FromOkm>::Length
    //
    // `dst` always starts with the context string, which is never empty
    debug_assert!(
        dsts.iter().map(|part| part.len()).sum::<usize>() > 0,
        "dst must not be empty"
    );

    #[allow(dead_code)]
    {
        const LENGTH_IN_BYTES: usize = <<k256::Scalar as FromOkm>::Length as Unsigned>::USIZE;
        const SHA256_OUTPUT_SIZE: usize =
            <<sha2::Sha256 as digest::OutputSizeUser>::OutputSize as Unsigned>::USIZE;
        use static_assertions as sa;

        sa::const_assert!(LENGTH_IN_BYTES > 0);
        sa::const_assert!(LENGTH_IN_BYTES <= u16::MAX as _);
        sa::const_assert!(LENGTH_IN_BYTES <= 255 * SHA256_OUTPUT_SIZE);
    }

    #[allow(clippy::expect_used)]
    let scalar_raw = k256::Secp256k1::hash_to_scalar::<ExpandMsgXmd<sha2::Sha256>>(msgs, dsts)
        .expect("should never fail");
    generic_ec::Scalar::from_raw(generic_ec::curves::Secp256k1::scalar(scalar_raw))
}

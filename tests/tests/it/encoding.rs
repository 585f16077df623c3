use frost_device::{
    ciphersuite::{generate_nonce, identifier_to_scalar, Secp256k1},
    generic_ec::{curves::Secp256k1 as Curve, Point, Scalar},
    signing::round1::NonceCommitments,
    Ciphersuite, Session,
};
use frost_device_tests::{generate_configs, mocked_randomness, reference, secret_share_bytes};
use hex_literal::hex;
use rand::RngCore;

const GENERATOR: [u8; 33] =
    hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");

#[test]
fn generator_is_compressed_sec1() {
    assert_eq!(Secp256k1::serialize_point(&Point::<Curve>::generator().to_point()), GENERATOR);
    assert_eq!(
        Secp256k1::deserialize_point(&GENERATOR).unwrap(),
        Point::<Curve>::generator().to_point()
    );
    assert_eq!(Secp256k1::serialize_point(&Point::zero()), [0u8; 33]);
}

#[test]
fn points_survive_encoding() {
    let mut rng = rand_dev::DevRng::new();

    for _ in 0..20 {
        let point = Point::generator() * Scalar::<Curve>::random(&mut rng);
        let bytes = Secp256k1::serialize_point(&point);
        assert!(matches!(bytes[0], 0x02 | 0x03));
        assert_eq!(Secp256k1::deserialize_point(&bytes).unwrap(), point);
    }
}

#[test_case::case(&GENERATOR[..32]; "too short")]
#[test_case::case(&[0x02; 34]; "too long")]
#[test_case::case(&[0x04; 33]; "uncompressed tag")]
#[test_case::case(
    &hex!("02ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
    "x is not a field element"
)]
fn malformed_points_are_rejected(bytes: &[u8]) {
    Secp256k1::deserialize_point(bytes).unwrap_err();
}

#[test]
fn identifier_is_encoded_as_big_endian_scalar() {
    let id = identifier_to_scalar::<Curve>(7).unwrap();
    assert_eq!(
        Secp256k1::serialize_scalar(&id),
        hex!("0000000000000000000000000000000000000000000000000000000000000007")
    );
    assert_eq!(identifier_to_scalar::<Curve>(0), None);
}

#[test]
fn scalar_encoding_rejects_wrong_length() {
    Secp256k1::deserialize_scalar(&[1u8; 31]).unwrap_err();
    Secp256k1::deserialize_scalar(&[1u8; 33]).unwrap_err();
    // Group order
    Secp256k1::deserialize_scalar(&hex!(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
    ))
    .unwrap_err();
}

#[test]
fn context_string() {
    assert_eq!(Secp256k1::NAME, "FROST-secp256k1-SHA256-v10");
    assert_eq!(reference::CONTEXT_STRING, Secp256k1::NAME.as_bytes());
}

#[test]
fn nonce_matches_reference() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);

    let mut randomness = [0u8; 32];
    rng.fill_bytes(&mut randomness);

    let nonce = generate_nonce::<Secp256k1>(
        &mut mocked_randomness(&randomness),
        configs[0].secret_share(),
    );
    let expected = reference::nonce(&randomness, &secret_share_bytes(&configs[0]));
    assert_eq!(
        Secp256k1::serialize_scalar(nonce.as_ref()),
        reference::scalar_to_bytes(&expected)
    );

    // Same randomness, different secret share
    let other = generate_nonce::<Secp256k1>(
        &mut mocked_randomness(&randomness),
        configs[1].secret_share(),
    );
    assert_ne!(
        Secp256k1::serialize_scalar(nonce.as_ref()),
        Secp256k1::serialize_scalar(other.as_ref())
    );
}

#[test]
fn commitments_wire_format() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let commitments = session.commit(&mut rng).unwrap();
    assert_eq!(NonceCommitments::<Secp256k1>::serialized_len(), 66);

    let mut bytes = [0u8; 70];
    let written = commitments.write_to_slice(&mut bytes).unwrap();
    assert_eq!(written, 66);
    assert_eq!(&bytes[..33], &commitments.hiding);
    assert_eq!(&bytes[33..66], &commitments.binding);
    assert_eq!(&bytes[66..], &[0u8; 4]);

    let parsed = NonceCommitments::<Secp256k1>::from_slice(&bytes[..66]).unwrap();
    assert_eq!(parsed, commitments);
    let decoded = parsed.decode().unwrap();
    assert!(!decoded.hiding_comm.is_zero());
    assert!(!decoded.binding_comm.is_zero());

    NonceCommitments::<Secp256k1>::from_slice(&bytes[..65]).unwrap_err();
    NonceCommitments::<Secp256k1>::from_slice(&bytes[..67]).unwrap_err();
    let err = commitments.write_to_slice(&mut [0u8; 65]).unwrap_err();
    assert_eq!(err.to_string(), "invalid length: expected 66 bytes, got 65");
}

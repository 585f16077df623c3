use frost_device::{
    ciphersuite::Secp256k1, generic_ec::curves::Secp256k1 as Curve, signing::round1::NonceCommitments,
    DeviceConfig, ErrorKind, Session, SessionState,
};
use frost_device_tests::generate_configs;
use rand::{CryptoRng, RngCore};

/// Commitments of some other device
fn foreign_commitments(
    config: &DeviceConfig<Curve>,
    rng: &mut (impl RngCore + CryptoRng),
) -> NonceCommitments<Secp256k1> {
    Session::<Secp256k1>::new(config.clone())
        .unwrap()
        .commit(rng)
        .unwrap()
}

#[test]
fn identifiers_must_be_strictly_ascending() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, c1).unwrap();

    // Repeated identifier
    let err = session.commitment(1, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierOrdering);
    assert_eq!(session.state(), SessionState::CollectingCommitments);
    assert_eq!(session.commitments().len(), 1);

    session.commitment(2, own).unwrap();

    // Descending identifier
    let err = session.commitment(1, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierOrdering);
    assert_eq!(session.commitments().len(), 2);
    assert_eq!(session.commitments().last_identifier(), 2);
}

#[test]
fn zero_identifier_is_rejected() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    session.commit(&mut rng).unwrap();

    let err = session.commitment(0, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierOrdering);
    assert_eq!(session.state(), SessionState::NonceCommitted);
    assert!(session.commitments().is_empty());
}

#[test]
fn at_most_max_signers_commitments_are_accepted() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);
    let c3 = foreign_commitments(&configs[2], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    assert_eq!(session.config().max_signers(), 3);
    let own = session.commit(&mut rng).unwrap();

    session.commitment(1, c1).unwrap();
    session.commitment(2, own).unwrap();
    session.commitment(3, c3).unwrap();

    let err = session.commitment(4, c3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyCommitments);
    assert_eq!(session.commitments().len(), 3);

    // Session is still able to sign
    session.sign(b"msg").unwrap();
}

#[test]
fn capacity_of_the_session_bounds_max_signers() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);

    let err = Session::<Secp256k1, 2>::new(configs[0].clone()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "max_signers (3) exceeds session capacity (2)"
    );
    Session::<Secp256k1, 3>::new(configs[0].clone()).unwrap();
}

#[test]
fn not_enough_commitments() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(3, 3, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);
    let c3 = foreign_commitments(&configs[2], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();

    // Only own commitment
    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughCommitments);

    session.commitment(1, own).unwrap();
    session.commitment(2, c2).unwrap();
    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotEnoughCommitments);
    assert_eq!(session.state(), SessionState::CollectingCommitments);

    // Nonces survived the failed attempts
    session.commitment(3, c3).unwrap();
    session.sign(b"msg").unwrap();
    assert_eq!(session.state(), SessionState::Signed);
}

#[test]
fn own_commitment_must_be_included() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);
    let c3 = foreign_commitments(&configs[2], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    session.commit(&mut rng).unwrap();
    session.commitment(1, c1).unwrap();
    session.commitment(3, c3).unwrap();
    assert_eq!(session.own_position(), None);

    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierNotIncluded);
    assert_eq!(session.state(), SessionState::CollectingCommitments);
}

#[test]
fn operations_out_of_order() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    assert_eq!(session.state(), SessionState::Idle);

    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = session.commitment(2, c2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(session.state(), SessionState::Idle);

    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, own).unwrap();

    // Nonces can't be replaced once commitments are being collected
    let err = session.commit(&mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(session.state(), SessionState::CollectingCommitments);
    assert_eq!(session.commitments().own_commitments(), Some(&own));
}

#[test]
fn nonces_are_single_use() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, own).unwrap();
    session.commitment(2, c2).unwrap();
    session.sign(b"first message").unwrap();
    assert_eq!(session.state(), SessionState::Signed);

    let err = session.sign(b"second message").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = session.commit(&mut rng).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = session.commitment(3, c2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(session.state(), SessionState::Signed);

    session.reset();
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.commitments().is_empty());
    assert_eq!(session.own_position(), None);

    let new_own = session.commit(&mut rng).unwrap();
    assert_ne!(own, new_own);
    session.commitment(1, new_own).unwrap();
    session.commitment(2, c2).unwrap();
    session.sign(b"second message").unwrap();
}

#[test]
fn reset_discards_nonces() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, own).unwrap();
    session.reset();

    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let err = session.commitment(1, own).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn recommitting_replaces_nonces() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let stale = session.commit(&mut rng).unwrap();
    let fresh = session.commit(&mut rng).unwrap();
    assert_eq!(session.state(), SessionState::NonceCommitted);

    let err = session.commitment(1, stale).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommitmentMismatch);
    assert_eq!(session.state(), SessionState::NonceCommitted);

    session.commitment(1, fresh).unwrap();
    session.commitment(2, c2).unwrap();
    session.sign(b"msg").unwrap();
}

#[test]
fn foreign_commitment_under_own_identifier() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    session.commit(&mut rng).unwrap();
    let err = session.commitment(2, c2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CommitmentMismatch);
    assert!(session.commitments().is_empty());
}

#[test_case::case([0x05; 33]; "unknown tag")]
#[test_case::case(hex_literal::hex!(
    "02ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
); "x is not a field element")]
#[test_case::case([0; 33]; "zero bytes")]
fn malformed_commitment_is_rejected_at_signing(malformed: [u8; 33]) {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);
    let c2 = foreign_commitments(&configs[1], &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, own).unwrap();
    session
        .commitment(
            2,
            NonceCommitments {
                hiding: c2.hiding,
                binding: malformed,
            },
        )
        .unwrap();

    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCommitment);
    assert_eq!(session.state(), SessionState::CollectingCommitments);
}

#[test]
fn group_public_key_is_encoded() {
    use frost_device::Ciphersuite;

    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let session = Session::<Secp256k1>::new(configs[2].clone()).unwrap();

    let expected = Secp256k1::serialize_point(&configs[0].group_public_key());
    assert_eq!(session.group_public_key(), expected);
    assert!(matches!(expected[0], 0x02 | 0x03));
}

#[test]
fn errors_are_descriptive() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 2, &mut rng);

    let mut session = Session::<Secp256k1>::new(configs[0].clone()).unwrap();
    let err = session.sign(b"msg").unwrap_err();
    assert_eq!(err.to_string(), "`sign` is not allowed in state `idle`");

    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, own).unwrap();
    let err = session.commitment(1, own).unwrap_err();
    assert_eq!(err.to_string(), "commitment rejected");
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(
        source.to_string(),
        "identifier 1 is not greater than previous identifier 1"
    );
}

#[test]
fn ordering_is_checked_before_own_commitments() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);
    let c3 = foreign_commitments(&configs[2], &mut rng);

    // Repeated own identifier with foreign points
    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    let own = session.commit(&mut rng).unwrap();
    session.commitment(1, c1).unwrap();
    session.commitment(2, own).unwrap();
    let err = session.commitment(2, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierOrdering);

    // Own identifier after a greater one
    let mut session = Session::<Secp256k1>::new(configs[1].clone()).unwrap();
    session.commit(&mut rng).unwrap();
    session.commitment(3, c3).unwrap();
    let err = session.commitment(2, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentifierOrdering);
    assert_eq!(session.commitments().len(), 1);
}

#[test]
fn capacity_is_checked_before_own_commitments() {
    let mut rng = rand_dev::DevRng::new();
    let configs = generate_configs(2, 3, &mut rng);
    let c1 = foreign_commitments(&configs[0], &mut rng);

    let config = DeviceConfig::new(
        2,
        configs[1].secret_share().clone(),
        configs[1].group_public_key(),
        1,
        1,
    )
    .unwrap();
    let mut session = Session::<Secp256k1>::new(config).unwrap();
    session.commit(&mut rng).unwrap();
    session.commitment(1, c1).unwrap();

    let err = session.commitment(2, c1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TooManyCommitments);
    assert_eq!(session.commitments().len(), 1);
}

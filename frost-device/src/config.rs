//! Device configuration
//!
//! Everything a device needs to take part in signing, provisioned ahead of time: its identifier, its
//! secret share, the group public key and the range of signers the group expects.

use core::fmt;

use generic_ec::{Curve, NonZero, Point, SecretScalar};

use crate::{key_share::KeyShare, Ciphersuite, Identifier};

/// Provisioned device configuration
///
/// Constructed via [`DeviceConfig::new`], [`DeviceConfig::from_bytes`] or
/// [`DeviceConfig::from_key_share`]. Any successfully constructed config satisfies:
/// * identifier is non-zero
/// * secret share is non-zero
/// * `1 <= min_signers <= max_signers`
#[derive(Clone)]
pub struct DeviceConfig<E: Curve> {
    identifier: Identifier,
    secret_share: SecretScalar<E>,
    group_public_key: NonZero<Point<E>>,
    min_signers: u16,
    max_signers: u16,
}

impl<E: Curve> DeviceConfig<E> {
    /// Validates and constructs a config
    pub fn new(
        identifier: Identifier,
        secret_share: SecretScalar<E>,
        group_public_key: NonZero<Point<E>>,
        min_signers: u16,
        max_signers: u16,
    ) -> Result<Self, InvalidConfig> {
        if identifier == 0 {
            return Err(Reason::ZeroIdentifier.into());
        }
        if secret_share.as_ref().is_zero() {
            return Err(Reason::ZeroSecretShare.into());
        }
        if min_signers == 0 {
            return Err(Reason::ZeroThreshold.into());
        }
        if min_signers > max_signers {
            return Err(Reason::ThresholdExceedsSigners {
                min_signers,
                max_signers,
            }
            .into());
        }

        Ok(Self {
            identifier,
            secret_share,
            group_public_key,
            min_signers,
            max_signers,
        })
    }

    /// Parses a config from its encoded form
    ///
    /// `secret_share` must be an encoded scalar and `group_public_key` an encoded point, both
    /// following [ciphersuite `C`](Ciphersuite).
    pub fn from_bytes<C: Ciphersuite<Curve = E>>(
        identifier: Identifier,
        secret_share: &[u8],
        group_public_key: &[u8],
        min_signers: u16,
        max_signers: u16,
    ) -> Result<Self, InvalidConfig> {
        let secret_share =
            C::deserialize_secret_scalar(secret_share).map_err(|_| Reason::InvalidSecretShare)?;
        let group_public_key = C::deserialize_point(group_public_key)
            .ok()
            .and_then(NonZero::from_point)
            .ok_or(Reason::InvalidGroupPublicKey)?;
        Self::new(
            identifier,
            secret_share,
            group_public_key,
            min_signers,
            max_signers,
        )
    }

    /// Derives a config from a threshold key share
    ///
    /// The key share must have a VSS setup (i.e. it must be a threshold key share) and the share
    /// preimage of this signer must be a small integer that fits into [`Identifier`]. The maximum
    /// number of signers is set to the number of key holders.
    pub fn from_key_share(key_share: &KeyShare<E>) -> Result<Self, InvalidConfig> {
        let vss_setup = key_share
            .vss_setup
            .as_ref()
            .ok_or(Reason::NotThresholdKeyShare)?;
        let preimage = key_share
            .share_preimage(key_share.i)
            .ok_or(Reason::NotThresholdKeyShare)?;
        let identifier = (1..=Identifier::MAX)
            .find(|id| crate::ciphersuite::identifier_to_scalar::<E>(*id) == Some(preimage))
            .ok_or(Reason::PreimageTooLarge)?;
        let max_signers =
            u16::try_from(key_share.public_shares.len()).map_err(|_| Reason::TooManyKeyHolders)?;
        let secret_share: &SecretScalar<E> = key_share.x.as_ref();

        Self::new(
            identifier,
            secret_share.clone(),
            key_share.shared_public_key,
            vss_setup.min_signers,
            max_signers,
        )
    }

    /// Identifier of this device
    pub fn identifier(&self) -> Identifier {
        self.identifier
    }
    /// Secret share of this device
    pub fn secret_share(&self) -> &SecretScalar<E> {
        &self.secret_share
    }
    /// Group public key
    pub fn group_public_key(&self) -> NonZero<Point<E>> {
        self.group_public_key
    }
    /// Minimal number of signers required to issue a signature
    pub fn min_signers(&self) -> u16 {
        self.min_signers
    }
    /// Maximal number of signers that may take part in the signing
    pub fn max_signers(&self) -> u16 {
        self.max_signers
    }
}

impl<E: Curve> fmt::Debug for DeviceConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("identifier", &self.identifier)
            .field("secret_share", &"<hidden>")
            .field("group_public_key", &self.group_public_key)
            .field("min_signers", &self.min_signers)
            .field("max_signers", &self.max_signers)
            .finish()
    }
}

/// Config is invalid
#[derive(Debug)]
pub struct InvalidConfig(Reason);

#[derive(Debug)]
enum Reason {
    ZeroIdentifier,
    ZeroSecretShare,
    InvalidSecretShare,
    InvalidGroupPublicKey,
    ZeroThreshold,
    ThresholdExceedsSigners { min_signers: u16, max_signers: u16 },
    CapacityExceeded { max_signers: u16, capacity: usize },
    NotThresholdKeyShare,
    PreimageTooLarge,
    TooManyKeyHolders,
}

impl InvalidConfig {
    pub(crate) fn capacity_exceeded(max_signers: u16, capacity: usize) -> Self {
        Self(Reason::CapacityExceeded {
            max_signers,
            capacity,
        })
    }
}

impl From<Reason> for InvalidConfig {
    fn from(err: Reason) -> Self {
        Self(err)
    }
}

impl fmt::Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Reason::ZeroIdentifier => f.write_str("identifier must be non-zero"),
            Reason::ZeroSecretShare => f.write_str("secret share must be non-zero"),
            Reason::InvalidSecretShare => f.write_str("invalid secret share encoding"),
            Reason::InvalidGroupPublicKey => {
                f.write_str("group public key is invalid or point at infinity")
            }
            Reason::ZeroThreshold => f.write_str("min_signers must be at least 1"),
            Reason::ThresholdExceedsSigners {
                min_signers,
                max_signers,
            } => write!(
                f,
                "min_signers ({min_signers}) exceeds max_signers ({max_signers})"
            ),
            Reason::CapacityExceeded {
                max_signers,
                capacity,
            } => write!(
                f,
                "max_signers ({max_signers}) exceeds session capacity ({capacity})"
            ),
            Reason::NotThresholdKeyShare => f.write_str("key share is not a threshold key share"),
            Reason::PreimageTooLarge => {
                f.write_str("share preimage doesn't fit into one-byte identifier")
            }
            Reason::TooManyKeyHolders => f.write_str("too many key holders"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidConfig {}

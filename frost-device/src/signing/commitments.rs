//! Fixed-capacity list of signers' commitments
//!
//! Commitments must be submitted in strictly ascending order of signer identifiers. The list never
//! sorts: out-of-order submissions are rejected, which also rules out duplicates.

use core::fmt;

use arrayvec::ArrayVec;

use crate::{Ciphersuite, Identifier};

use super::round1::{Commitment, NonceCommitments};

/// Accepted commitments, at most `N` of them
///
/// Slots are indexed by insertion order, which matches ascending order of identifiers.
#[derive(Debug, Clone)]
pub struct CommitmentList<C: Ciphersuite, const N: usize> {
    list: ArrayVec<Commitment<C>, N>,
    own_position: Option<usize>,
}

impl<C: Ciphersuite, const N: usize> CommitmentList<C, N> {
    /// Constructs an empty list
    pub fn new() -> Self {
        Self {
            list: ArrayVec::new(),
            own_position: None,
        }
    }

    /// Appends a commitment to the list
    ///
    /// * `max_signers` limits amount of accepted commitments, it's capped by list capacity `N`
    /// * `own_identifier` is identifier of the signer that owns the list. If it matches
    ///   `commitment.identifier`, the slot is remembered as own position.
    ///
    /// Returns an error if list is full or if identifier isn't greater than the previously
    /// accepted one. Identifier `0` is always rejected. List is left unchanged on error.
    pub fn push(
        &mut self,
        commitment: Commitment<C>,
        own_identifier: Identifier,
        max_signers: usize,
    ) -> Result<usize, PushError> {
        self.check(commitment.identifier, max_signers)?;
        let capacity = max_signers.min(N);

        let position = self.list.len();
        self.list
            .try_push(commitment)
            .map_err(|_| PushError::TooManyCommitments { capacity })?;
        if commitment.identifier == own_identifier {
            self.own_position = Some(position);
        }
        Ok(position)
    }

    /// Checks whether a commitment of signer `identifier` would be accepted by [push](Self::push)
    ///
    /// Capacity is checked first, then ordering.
    pub fn check(&self, identifier: Identifier, max_signers: usize) -> Result<(), PushError> {
        let capacity = max_signers.min(N);
        if self.list.len() >= capacity {
            return Err(PushError::TooManyCommitments { capacity });
        }
        let previous = self.last_identifier();
        if identifier <= previous {
            return Err(PushError::IdentifierOrdering {
                previous,
                received: identifier,
            });
        }
        Ok(())
    }

    /// Identifier of the most recently accepted commitment, or `0` if the list is empty
    pub fn last_identifier(&self) -> Identifier {
        self.list.last().map(|c| c.identifier).unwrap_or(0)
    }

    /// Position of the owner's commitment in the list, if it was accepted
    pub fn own_position(&self) -> Option<usize> {
        self.own_position
    }

    /// Commitments of the owner of the list, if they were accepted
    pub fn own_commitments(&self) -> Option<&NonceCommitments<C>> {
        self.own_position
            .and_then(|i| self.list.get(i))
            .map(|c| &c.commitments)
    }

    /// Amount of accepted commitments
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Checks whether list is empty
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Accepted commitments in ascending order of identifiers
    pub fn as_slice(&self) -> &[Commitment<C>] {
        &self.list
    }

    /// Identifiers of accepted commitments in ascending order
    pub fn identifiers(&self) -> impl Iterator<Item = Identifier> + '_ {
        self.list.iter().map(|c| c.identifier)
    }

    /// Removes all commitments
    pub fn clear(&mut self) {
        self.list.clear();
        self.own_position = None;
    }
}

impl<C: Ciphersuite, const N: usize> Default for CommitmentList<C, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Commitment was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushError {
    /// List already holds the maximum amount of commitments
    TooManyCommitments {
        /// Maximum amount of commitments
        capacity: usize,
    },
    /// Identifier is not strictly greater than the previously accepted one
    IdentifierOrdering {
        /// Previously accepted identifier (`0` if none)
        previous: Identifier,
        /// Rejected identifier
        received: Identifier,
    },
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyCommitments { capacity } => {
                write!(f, "too many commitments: at most {capacity} are accepted")
            }
            Self::IdentifierOrdering { previous, received } => write!(
                f,
                "identifier {received} is not greater than previous identifier {previous}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PushError {}

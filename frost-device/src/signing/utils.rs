use arrayvec::ArrayVec;
use digest::{FixedOutput, Update};
use generic_ec::{Curve, NonZero, Point, Scalar};

use crate::{ciphersuite::Ciphersuite, Identifier};

use super::{commitments::CommitmentList, round1::Commitment};

/// Encodes a list of commitments: each signer contributes `serialize_scalar(id) || hiding || binding`
///
/// Instead of returning encoded data as a string, it feeds it directly into the hash
pub fn encode_group_commitment_list<C: Ciphersuite>(
    mut output: C::Digest,
    commitment_list: &[Commitment<C>],
) -> C::Digest {
    for Commitment {
        identifier,
        commitments,
    } in commitment_list
    {
        output.update(C::serialize_scalar(&Scalar::from(u16::from(*identifier))).as_ref());
        output.update(commitments.hiding.as_ref());
        output.update(commitments.binding.as_ref());
    }
    output
}

/// Computes binding factors
///
/// `rho_j = H1(H4(msg) || H5(encoded commitment list) || serialize_scalar(id_j))`
///
/// Output list is aligned with the commitment list: `i`-th binding factor belongs to `i`-th signer.
pub fn compute_binding_factors<C: Ciphersuite, const N: usize>(
    commitment_list: &CommitmentList<C, N>,
    msg: &[u8],
) -> ArrayVec<Scalar<C::Curve>, N> {
    let msg_hash = C::h4().chain(msg).finalize_fixed();
    let encoded_commitment_hash =
        encode_group_commitment_list::<C>(C::h5(), commitment_list.as_slice()).finalize_fixed();

    commitment_list
        .identifiers()
        .map(|j| {
            C::h1(&[
                &msg_hash,
                &encoded_commitment_hash,
                C::serialize_scalar(&Scalar::from(u16::from(j))).as_ref(),
            ])
        })
        .collect()
}

/// Computes a group commitment `R = sum_j (D_j + rho_j * E_j)`
///
/// Assumes that commitments and binding factors come in the same order. Returns identifier of the
/// signer whose commitment can't be decoded or is point at infinity.
pub fn compute_group_commitment<'a, C: Ciphersuite + 'a>(
    commitment_list: impl IntoIterator<Item = &'a Commitment<C>>,
    binding_factor_list: impl IntoIterator<Item = &'a Scalar<C::Curve>>,
) -> Result<Point<C::Curve>, Identifier> {
    commitment_list.into_iter().zip(binding_factor_list).try_fold(
        Point::zero(),
        |acc, (comm, binding_factor)| {
            let decoded = comm
                .commitments
                .decode()
                .map_err(|_| comm.identifier)?;
            if decoded.hiding_comm.is_zero() || decoded.binding_comm.is_zero() {
                return Err(comm.identifier);
            }
            Ok(acc + decoded.hiding_comm + decoded.binding_comm * *binding_factor)
        },
    )
}

/// Computes an interpolation value, i.e. Lagrange coefficient of `x_i` evaluated at zero
///
/// `lambda_i = prod_{j != i} x_j / prod_{j != i} (x_j - x_i)`
///
/// List of signers **must be** sorted, which allows iterating over it only once. Returns `None`
/// if `x_i` is not in the list or some signer appears in the list more than once.
pub fn derive_interpolating_value<E: Curve>(
    signers_list: &[NonZero<Scalar<E>>],
    x_i: &NonZero<Scalar<E>>,
) -> Option<Scalar<E>> {
    debug_assert!(is_sorted(signers_list), "signers list must be sorted");

    let mut x_i_observed = false;

    let mut num = Scalar::one();
    let mut denom = NonZero::<Scalar<E>>::one();

    for (x_j, x_j_minus_one) in signers_list
        .iter()
        .zip(core::iter::once(None).chain(signers_list.iter().map(Some)))
    {
        if Some(x_j) == x_j_minus_one {
            return None;
        }
        let Some(substraction) = NonZero::from_scalar(x_j - x_i) else {
            // x_i equals to x_j
            x_i_observed = true;
            continue;
        };
        num *= x_j.as_ref();
        denom *= substraction;
    }

    if !x_i_observed {
        return None;
    }

    Some(num * denom.invert())
}

pub fn is_sorted<T: Ord>(slice: &[T]) -> bool {
    slice.windows(2).all(|win| win[0] <= win[1])
}

//! Shamir secret sharing over a [`PrimeField`](super::PrimeField): polynomial evaluation for
//! `share`, Lagrange interpolation at `x = 0` for `reconstruct`.

use std::collections::HashSet;

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::PrimeField;
use crate::error::{CoreError, Result};

/// One point `(i, f(i))` on the sharing polynomial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub index: u64,
    pub value: BigUint,
}

/// Splits `secret` into `n` shares of a `(n, t)` threshold scheme.
///
/// Requires `0 <= secret < p` and `1 <= t <= n < p`. Samples `t - 1` uniform coefficients and
/// evaluates the resulting degree-`(t-1)` polynomial at `x = 1..=n` by Horner's method.
pub fn share(
    field: &PrimeField,
    secret: &BigUint,
    n: u64,
    t: u64,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Vec<Share>> {
    if !field.contains(secret) {
        return Err(CoreError::FieldOverflow);
    }
    if t == 0 || t > n {
        return Err(CoreError::MalformedTopology(format!(
            "threshold t={t} must satisfy 1 <= t <= n={n}"
        )));
    }

    let mut coefficients = Vec::with_capacity(t as usize);
    coefficients.push(secret.clone());
    for _ in 1..t {
        coefficients.push(field.sample_uniform(rng));
    }

    let shares = (1..=n)
        .map(|i| {
            let x = BigUint::from(i);
            let value = horner(field, &coefficients, &x);
            Share { index: i, value }
        })
        .collect();
    Ok(shares)
}

/// Evaluates `sum(coefficients[k] * x^k)` via Horner's method, highest-degree coefficient first.
fn horner(field: &PrimeField, coefficients: &[BigUint], x: &BigUint) -> BigUint {
    coefficients
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, c| field.add(&field.mul(&acc, x), c))
}

/// Reconstructs the secret from any `>= t` distinct shares via Lagrange interpolation at `x = 0`.
pub fn reconstruct(field: &PrimeField, shares: &[Share], t: u64) -> Result<BigUint> {
    if (shares.len() as u64) < t {
        return Err(CoreError::InsufficientShares {
            needed: t,
            got: shares.len() as u64,
        });
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for s in shares {
        if !seen.insert(s.index) {
            return Err(CoreError::DuplicateIndex(s.index));
        }
    }

    // Only the first t shares are needed; any larger subset still reconstructs (and any
    // distinct t-subset gives the same answer), but we take a canonical prefix.
    let subset = &shares[..t as usize];

    let mut secret = BigUint::zero();
    for (j, share_j) in subset.iter().enumerate() {
        let x_j = BigUint::from(share_j.index);
        let mut numerator = BigUint::from(1u32);
        let mut denominator = BigUint::from(1u32);
        for (m, share_m) in subset.iter().enumerate() {
            if m == j {
                continue;
            }
            let x_m = BigUint::from(share_m.index);
            numerator = field.mul(&numerator, &x_m);
            denominator = field.mul(&denominator, &field.sub(&x_m, &x_j));
        }
        let inv_denominator = field.inv(&denominator)?;
        let lagrange_coeff = field.mul(&numerator, &inv_denominator);
        let term = field.mul(&share_j.value, &lagrange_coeff);
        secret = field.add(&secret, &term);
    }
    Ok(secret)
}

/// Number of bytes a field element can hold: `floor(log2(p) / 8)`.
fn chunk_size_bytes(field: &PrimeField) -> usize {
    (field.modulus().bits() / 8) as usize
}

/// Splits a byte string into field-sized chunks (with a length prefix) and shares each chunk
/// independently under the same `(n, t)`. Returns one `Vec<Share>` per share-holder, each
/// holding one `Share` per chunk (same relative order).
pub fn share_bytes(
    field: &PrimeField,
    message: &[u8],
    n: u64,
    t: u64,
    rng: &mut (impl RngCore + CryptoRng),
) -> Result<Vec<Vec<Share>>> {
    let chunk_len = chunk_size_bytes(field);
    if chunk_len == 0 {
        return Err(CoreError::FieldOverflow);
    }

    let mut framed = Vec::with_capacity(4 + message.len());
    framed.extend_from_slice(&(message.len() as u32).to_be_bytes());
    framed.extend_from_slice(message);
    let padded_len = framed.len().div_ceil(chunk_len) * chunk_len;
    framed.resize(padded_len, 0);

    let chunks: Vec<BigUint> = framed
        .chunks(chunk_len)
        .map(BigUint::from_bytes_be)
        .collect();

    let mut per_holder: Vec<Vec<Share>> = (0..n).map(|_| Vec::with_capacity(chunks.len())).collect();
    for chunk in &chunks {
        let chunk_shares = share(field, chunk, n, t, rng)?;
        for (holder, s) in per_holder.iter_mut().zip(chunk_shares.into_iter()) {
            holder.push(s);
        }
    }
    Ok(per_holder)
}

/// Reconstructs the original byte string from `>= t` holders' chunk-share vectors.
///
/// `chunk_shares` is indexed `[holder][chunk_index]`; every holder must carry the same number
/// of chunks. The leading 4-byte big-endian length prefix is stripped before returning.
pub fn reconstruct_bytes(field: &PrimeField, chunk_shares: &[Vec<Share>], t: u64) -> Result<Vec<u8>> {
    if (chunk_shares.len() as u64) < t {
        return Err(CoreError::InsufficientShares {
            needed: t,
            got: chunk_shares.len() as u64,
        });
    }
    let num_chunks = chunk_shares[0].len();
    if chunk_shares.iter().any(|h| h.len() != num_chunks) {
        return Err(CoreError::MalformedTopology(
            "all holders must supply the same number of chunk shares".into(),
        ));
    }

    let chunk_len = chunk_size_bytes(field);
    let mut framed = Vec::with_capacity(num_chunks * chunk_len);
    for chunk_index in 0..num_chunks {
        let shares_for_chunk: Vec<Share> = chunk_shares
            .iter()
            .map(|holder| holder[chunk_index].clone())
            .collect();
        let value = reconstruct(field, &shares_for_chunk, t)?;
        let mut bytes = value.to_bytes_be();
        while bytes.len() < chunk_len {
            bytes.insert(0, 0);
        }
        framed.extend_from_slice(&bytes);
    }

    if framed.len() < 4 {
        return Err(CoreError::MalformedTopology("reconstructed frame too short".into()));
    }
    let len = u32::from_be_bytes(framed[0..4].try_into().unwrap()) as usize;
    let body = &framed[4..];
    if body.len() < len {
        return Err(CoreError::MalformedTopology("reconstructed frame shorter than its length prefix".into()));
    }
    Ok(body[..len].to_vec())
}

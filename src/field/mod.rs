//! Arithmetic modulo a configurable prime `p`.
//!
//! The default modulus is the Mersenne prime `2^127 - 1`. Unlike the scalar fields used by
//! elliptic-curve schemes, `p` here is a runtime value (configuration, §6), not a compile-time
//! constant, so field elements are plain `BigUint`s and arithmetic goes through a `PrimeField`
//! context value rather than a modulus-parameterized type.

mod primality;
pub mod share;

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_traits::{One, Signed, Zero};
use rand::{CryptoRng, RngCore};

use crate::error::{CoreError, Result};

pub use share::{reconstruct, reconstruct_bytes, share, share_bytes, Share};

/// A prime field `GF(p)`, carrying its modulus as a runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeField {
    p: BigUint,
}

impl PrimeField {
    /// Builds a field over `p`, rejecting a non-prime or sub-2 modulus with [`CoreError::InvalidPrime`].
    pub fn new(p: BigUint) -> Result<Self> {
        if p < BigUint::from(2u32) || !primality::is_probable_prime(&p) {
            return Err(CoreError::InvalidPrime(p.to_string()));
        }
        Ok(PrimeField { p })
    }

    /// The default modulus, the Mersenne prime `2^127 - 1`.
    pub fn default_mersenne() -> Self {
        let p = (BigUint::one() << 127u32) - BigUint::one();
        PrimeField { p }
    }

    /// The modulus `p`.
    pub fn modulus(&self) -> &BigUint {
        &self.p
    }

    /// `0` in this field.
    pub fn zero(&self) -> BigUint {
        BigUint::zero()
    }

    /// `(a + b) mod p`.
    pub fn add(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a + b) % &self.p
    }

    /// `(a - b) mod p`.
    pub fn sub(&self, a: &BigUint, b: &BigUint) -> BigUint {
        if a >= b {
            (a - b) % &self.p
        } else {
            &self.p - ((b - a) % &self.p)
        }
    }

    /// `(a * b) mod p`.
    pub fn mul(&self, a: &BigUint, b: &BigUint) -> BigUint {
        (a * b) % &self.p
    }

    /// `a^e mod p`.
    pub fn pow(&self, a: &BigUint, e: &BigUint) -> BigUint {
        a.modpow(e, &self.p)
    }

    /// The multiplicative inverse of `a` modulo `p`, via the extended Euclidean algorithm.
    ///
    /// `p` is prime, so every nonzero `a` is invertible; callers must never pass `a == 0`.
    pub fn inv(&self, a: &BigUint) -> Result<BigUint> {
        if a.is_zero() {
            return Err(CoreError::FieldOverflow);
        }
        let (gcd, x, _) = extended_gcd(&BigInt::from(a.clone()), &BigInt::from(self.p.clone()));
        debug_assert!(gcd.is_one(), "p is prime, gcd(a, p) must be 1");
        let p_signed = BigInt::from(self.p.clone());
        let x = ((x % &p_signed) + &p_signed) % &p_signed;
        Ok(x.to_biguint().expect("reduced mod p is non-negative"))
    }

    /// Samples an element uniformly in `[0, p)`.
    pub fn sample_uniform(&self, rng: &mut (impl RngCore + CryptoRng)) -> BigUint {
        rng.gen_biguint_below(&self.p)
    }

    /// `true` if `x < p`, i.e. `x` is a valid field element.
    pub fn contains(&self, x: &BigUint) -> bool {
        x < &self.p
    }
}

/// Extended Euclidean algorithm: returns `(gcd, x, y)` with `a*x + b*y == gcd`.
fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }
    let (g, x1, y1) = extended_gcd(b, &(a % b));
    let x = y1.clone();
    let y = x1 - (a / b) * y1;
    (g, x, y)
}

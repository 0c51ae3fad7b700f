//! Miller-Rabin primality testing over arbitrary-precision integers.
//!
//! No crate in our dependency stack offers a primality test over `BigUint` (`primal` only
//! sieves machine-word-sized primes), so this is implemented directly against `num-bigint`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::RngCore;

/// Number of Miller-Rabin rounds. False-positive probability is bounded by `4^-ROUNDS`.
const ROUNDS: u32 = 40;

/// Returns `true` if `n` is probably prime (false-positive probability `<= 4^-40`).
pub fn is_probable_prime(n: &BigUint) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if *n < two {
        return false;
    }
    if *n == two || *n == three {
        return true;
    }
    if (n % &two).is_zero() {
        return false;
    }

    // n - 1 = 2^r * d with d odd.
    let n_minus_one = n - BigUint::one();
    let mut d = n_minus_one.clone();
    let mut r = 0u32;
    while (&d % &two).is_zero() {
        d /= &two;
        r += 1;
    }

    let mut rng = rand::thread_rng();
    'witness: for _ in 0..ROUNDS {
        let a = random_in_range(&mut rng, &two, &(n - &two));
        let mut x = a.modpow(&d, n);
        if x == BigUint::one() || x == n_minus_one {
            continue;
        }
        for _ in 0..r.saturating_sub(1) {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

/// Samples a uniform `BigUint` in `[lo, hi]` using rejection sampling over the bit-length of `hi`.
fn random_in_range(rng: &mut impl RngCore, lo: &BigUint, hi: &BigUint) -> BigUint {
    let bits = hi.bits();
    let bytes = ((bits + 7) / 8).max(1) as usize;
    loop {
        let mut buf = vec![0u8; bytes];
        rng.fill_bytes(&mut buf);
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate >= *lo && candidate <= *hi {
            return candidate;
        }
    }
}

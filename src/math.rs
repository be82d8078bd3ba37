//! Modular arithmetic primitives backing the RSA engine.

use crate::error::{Result, StegoError};

/// Trial division up to the integer square root. Deterministic.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2;
    while i * i <= n {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// All primes in `[start, end)`, in ascending order. Callers index into
/// the returned vector, so this is materialized rather than lazy.
pub fn find_primes(start: u64, end: u64) -> Vec<u64> {
    (start..end).filter(|&p| is_prime(p)).collect()
}

/// Iterative Euclidean algorithm.
pub fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Modular multiplicative inverse of `e` mod `phi` via the extended
/// Euclidean algorithm, normalized into `[0, phi)`.
///
/// Fails when `gcd(e, phi) != 1`; key generation treats that as a
/// recoverable rejection and resamples `e`.
pub fn mod_inverse(e: u64, phi: u64) -> Result<u64> {
    let (g, x, _) = extended_gcd(e as i128, phi as i128);
    if g != 1 {
        return Err(StegoError::NoModularInverse {
            value: e,
            modulus: phi,
        });
    }
    Ok(x.rem_euclid(phi as i128) as u64)
}

fn extended_gcd(a: i128, b: i128) -> (i128, i128, i128) {
    if a == 0 {
        (b, 0, 1)
    } else {
        let (g, x, y) = extended_gcd(b % a, a);
        (g, y - (b / a) * x, x)
    }
}

/// Square-and-multiply modular exponentiation.
///
/// Textbook and non-constant-time; fine for the toy key sizes here,
/// unsuitable for real confidentiality.
pub fn mod_pow(base: u64, exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut base = base as u128 % m;
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        base = base * base % m;
        exp >>= 1;
    }
    result as u64
}

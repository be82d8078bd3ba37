//! Textbook RSA key generation and per-character encryption.
//!
//! No padding scheme and deterministic per-character ciphertexts: this
//! preserves the round-trip contract of the tool but offers no real
//! confidentiality. Keys live only for the duration of one session.

use log::debug;
use rand::Rng;

use crate::error::{Result, StegoError};
use crate::math::{find_primes, gcd, is_prime, mod_inverse, mod_pow};

/// Primes are drawn from `[PRIME_RANGE_START, PRIME_RANGE_END)`.
pub const PRIME_RANGE_START: u64 = 100;
pub const PRIME_RANGE_END: u64 = 500;

/// Encryption key `(e, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    pub exponent: u64,
    pub modulus: u64,
}

/// Decryption key `(d, n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivateKey {
    pub exponent: u64,
    pub modulus: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

/// Generate a keypair from randomly drawn primes.
///
/// `p` comes from the lower half of the prime table and `q` from the upper
/// half, so usually `p < q`, though that is not an invariant callers may
/// rely on. Not reproducible; pin primes via
/// [`generate_keypair_from_primes`] when determinism matters.
pub fn generate_keypair() -> Result<KeyPair> {
    let primes = find_primes(PRIME_RANGE_START, PRIME_RANGE_END);
    let mut rng = rand::thread_rng();

    let p = primes[rng.gen_range(0..=primes.len() / 2)];
    let q = primes[rng.gen_range(primes.len() / 2..primes.len())];

    generate_keypair_from_primes(p, q)
}

/// Generate a keypair from two pinned primes.
pub fn generate_keypair_from_primes(p: u64, q: u64) -> Result<KeyPair> {
    if !is_prime(p) {
        return Err(StegoError::NotPrime(p));
    }
    if !is_prime(q) {
        return Err(StegoError::NotPrime(q));
    }

    let n = p * q;
    let phi = (p - 1) * (q - 1);

    // Rejection-sample e until it is coprime with phi. A failed draw is
    // an expected, recoverable event, not an error for the caller.
    let mut rng = rand::thread_rng();
    let mut e = rng.gen_range(1..phi);
    while gcd(e, phi) != 1 {
        e = rng.gen_range(1..phi);
    }

    let d = mod_inverse(e, phi)?;
    debug!("generated keypair: n={}, e={}, d={}", n, e, d);

    Ok(KeyPair {
        public: PublicKey {
            exponent: e,
            modulus: n,
        },
        private: PrivateKey {
            exponent: d,
            modulus: n,
        },
    })
}

/// Encrypt a message character by character: `c = m^e mod n`.
///
/// Every code point must be below the modulus; anything larger could not
/// be mapped back unambiguously, so it is rejected up front.
pub fn encrypt(message: &str, key: &PublicKey) -> Result<Vec<u64>> {
    message
        .chars()
        .map(|ch| {
            let code = ch as u32;
            if code as u64 >= key.modulus {
                return Err(StegoError::CodePointOutOfRange {
                    ch,
                    code,
                    modulus: key.modulus,
                });
            }
            Ok(mod_pow(code as u64, key.exponent, key.modulus))
        })
        .collect()
}

/// Decrypt a cipher vector back to text: `m = c^d mod n`.
///
/// A mismatched key does not fail algebraically; it either produces an
/// out-of-range value (caught here) or silently wrong characters.
pub fn decrypt(cipher: &[u64], key: &PrivateKey) -> Result<String> {
    cipher
        .iter()
        .map(|&c| {
            let m = mod_pow(c, key.exponent, key.modulus);
            u32::try_from(m)
                .ok()
                .and_then(char::from_u32)
                .ok_or(StegoError::InvalidCodePoint(m))
        })
        .collect()
}

//! Error taxonomy for the steganography and RSA pipeline.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StegoError {
    /// The framed payload does not fit in the carrier image.
    #[error("message too large for this image: need {needed} bytes but only {available} available")]
    MessageTooLarge { needed: usize, available: usize },

    /// The message exceeds what the 16-bit length header can describe.
    #[error("message length {0} exceeds the frame limit of 65535 characters")]
    MessageTooLong(usize),

    /// The carrier was exhausted before the end-of-frame marker appeared.
    #[error("terminator not found in extracted bitstream")]
    TerminatorNotFound,

    /// The length header promises more payload bits than the frame holds.
    #[error("frame declares {declared} characters but only {available_bits} payload bits present")]
    TruncatedFrame {
        declared: usize,
        available_bits: usize,
    },

    /// gcd(e, phi) != 1, so no decryption exponent exists.
    #[error("modular inverse of {value} mod {modulus} does not exist")]
    NoModularInverse { value: u64, modulus: u64 },

    /// Keypair construction was given a composite where a prime is required.
    #[error("{0} is not prime")]
    NotPrime(u64),

    /// A plaintext character cannot be represented under the key's modulus.
    #[error("character {ch:?} has code point {code}, which is not below the modulus {modulus}")]
    CodePointOutOfRange { ch: char, code: u32, modulus: u64 },

    /// Decryption produced a value that is not a valid character.
    #[error("decrypted value {0} is not a valid code point")]
    InvalidCodePoint(u64),

    /// The recovered text is not a comma-separated list of integers.
    #[error("recovered payload is not a valid cipher sequence: {0:?}")]
    MalformedCipherText(String),
}

pub type Result<T> = std::result::Result<T, StegoError>;

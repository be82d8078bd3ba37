//! End-to-end encode/decode pipelines.
//!
//! Pure compositions of the codec, embedding, and RSA layers. Image
//! loading and saving stay with the callers; everything here operates on
//! in-memory pixel grids.

use image::RgbImage;
use log::info;

use crate::bitstream::{pack, unpack};
use crate::embedding::{embed, extract};
use crate::error::{Result, StegoError};
use crate::rsa::{decrypt, encrypt, PrivateKey, PublicKey};

/// Hide plaintext in the image without encryption.
pub fn encode_plain(image: &RgbImage, text: &str) -> Result<RgbImage> {
    let stego = embed(image, &pack(text)?)?;
    info!("encoded {} characters", text.chars().count());
    Ok(stego)
}

/// Recover plaintext hidden by [`encode_plain`].
pub fn decode_plain(image: &RgbImage) -> Result<String> {
    unpack(&extract(image)?)
}

/// RSA-encrypt the text, then hide the cipher vector in the image.
///
/// The cipher vector is serialized as comma-separated decimal integers
/// before framing, since the codec is character-oriented.
pub fn encode_encrypted(image: &RgbImage, text: &str, key: &PublicKey) -> Result<RgbImage> {
    let cipher = encrypt(text, key)?;
    let stego = embed(image, &pack(&stringify_cipher(&cipher))?)?;
    info!("encoded {} encrypted characters", cipher.len());
    Ok(stego)
}

/// Extract and decrypt a message hidden by [`encode_encrypted`].
pub fn decode_encrypted(image: &RgbImage, key: &PrivateKey) -> Result<String> {
    let recovered = unpack(&extract(image)?)?;
    decrypt(&parse_cipher(&recovered)?, key)
}

fn stringify_cipher(cipher: &[u64]) -> String {
    cipher
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_cipher(text: &str) -> Result<Vec<u64>> {
    text.split(',')
        .map(|part| {
            part.parse()
                .map_err(|_| StegoError::MalformedCipherText(text.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::generate_keypair_from_primes;
    use image::Rgb;

    fn test_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x + y) as u8, (x * 2 + y) as u8, (x + y * 2) as u8])
        })
    }

    #[test]
    fn test_plain_roundtrip_hi() {
        // 10x10 image holds 37 bytes; "HI" frames into 48 bits = 6 bytes.
        let image = test_image(10, 10);
        let stego = encode_plain(&image, "HI").unwrap();
        assert_eq!(decode_plain(&stego).unwrap(), "HI");
    }

    #[test]
    fn test_plain_message_too_large() {
        // 40 characters frame into (16 + 320 + 16) bits = 44 bytes > 37.
        let image = test_image(10, 10);
        let err = encode_plain(&image, &"x".repeat(40)).unwrap_err();
        assert_eq!(
            err,
            StegoError::MessageTooLarge {
                needed: 44,
                available: 37,
            }
        );
    }

    #[test]
    fn test_plain_exact_capacity() {
        // 33 characters frame into exactly 296 bits = 37 bytes.
        let image = test_image(10, 10);
        let message = "m".repeat(33);
        let stego = encode_plain(&image, &message).unwrap();
        assert_eq!(decode_plain(&stego).unwrap(), message);

        assert!(encode_plain(&image, &"m".repeat(34)).is_err());
    }

    #[test]
    fn test_encrypted_roundtrip() {
        let image = test_image(64, 64);
        let pair = generate_keypair_from_primes(101, 103).unwrap();

        let stego = encode_encrypted(&image, "Attack at dawn", &pair.public).unwrap();
        assert_eq!(
            decode_encrypted(&stego, &pair.private).unwrap(),
            "Attack at dawn"
        );
    }

    #[test]
    fn test_decode_encrypted_rejects_plain_payload() {
        let image = test_image(32, 32);
        let pair = generate_keypair_from_primes(101, 103).unwrap();

        let stego = encode_plain(&image, "not a cipher").unwrap();
        let err = decode_encrypted(&stego, &pair.private).unwrap_err();
        assert!(matches!(err, StegoError::MalformedCipherText(_)));
    }

    #[test]
    fn test_decode_blank_image_fails_closed() {
        let image = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
        assert_eq!(decode_plain(&image), Err(StegoError::TerminatorNotFound));
    }

    #[test]
    fn test_cipher_serialization() {
        assert_eq!(stringify_cipher(&[12, 345, 6]), "12,345,6");
        assert_eq!(parse_cipher("12,345,6").unwrap(), vec![12, 345, 6]);
        assert!(parse_cipher("12,abc").is_err());
        assert!(parse_cipher("").is_err());
    }
}

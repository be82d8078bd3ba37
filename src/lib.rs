pub mod bitstream;
pub mod config;
pub mod embedding;
pub mod error;
pub mod math;
pub mod pipeline;
pub mod rsa;

pub use error::StegoError;
pub use pipeline::{decode_encrypted, decode_plain, encode_encrypted, encode_plain};
pub use rsa::{generate_keypair, KeyPair, PrivateKey, PublicKey};

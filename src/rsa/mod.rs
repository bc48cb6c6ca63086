// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod keygen;
pub mod message;
pub mod prime;
pub mod recipient;
pub mod sender;

pub use keygen::{KeyPair, PrivateKey, PublicKey, PUBLIC_EXPONENT};
pub use message::{Ciphertext, Plaintext, Signature};
pub use prime::generate_prime;
pub use recipient::{Recipient, Verdict};
pub use sender::Sender;

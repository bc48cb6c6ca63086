// Error Types
// Failures of the RSA core and of the input gate

use std::io;

use thiserror::Error;

/// Result type for the RSA core
pub type RsaResult<T> = Result<T, RsaError>;

/// Errors raised by key generation and the sender/recipient protocol
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("modular inverse does not exist: gcd(a, m) != 1")]
    NotInvertible,

    #[error("prime bit length must be at least 2, got {0}")]
    InvalidPrimeBits(u64),

    #[error("at least one Miller-Rabin round is required")]
    InvalidRounds,

    #[error("no {bits}-bit prime found after {attempts} candidates")]
    PrimeGeneration { bits: u64, attempts: u64 },

    #[error("modulus bit length must be at least {min}, got {bits}")]
    InvalidModulusBits { bits: u64, min: u64 },

    #[error("key generation for a {modulus_bits}-bit modulus failed after {attempts} attempts")]
    KeyGeneration {
        modulus_bits: u64,
        attempts: u32,
        #[source]
        source: Option<Box<RsaError>>,
    },

    #[error("message must be between 1 and n (exclusive)")]
    MessageOutOfRange,
}

/// Errors raised while collecting the integers to process
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input must be a list of integers: token {position} ({token:?}) is not a decimal integer")]
    InvalidToken { position: usize, token: String },

    #[error("no integers were supplied")]
    EmptyInput,

    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

//! Textbook RSA over arbitrary-precision integers: key generation,
//! unpadded encryption and decryption, and signatures, plus the batch
//! driver behind the `textbook-rsa` binary.
//!
//! This is the bare RSA primitive with no padding. It is deterministic and
//! malleable and must not protect real data.

pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod rsa;
pub mod util;

pub use config::{RangePolicy, RunConfig};
pub use errors::{InputError, RsaError};

// RSA Key Generation
// Implements RSA key pair generation (public and private keys)

use std::fmt;

use rand::{thread_rng, Rng};
use tracing::{debug, warn};

use super::bigint::{from_u64, mod_inverse, RsaBigInt, MILLER_RABIN_ROUNDS};
use super::prime::generate_prime_with_rng;
use crate::errors::{RsaError, RsaResult};

/// Public exponent shared by every generated key
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Modulus size used when none is configured
pub const DEFAULT_MODULUS_BITS: u64 = 1024;

/// Smallest modulus accepted; keeps φ(n) well above the public exponent
pub const MIN_MODULUS_BITS: u64 = 64;

/// Prime pairs tried before key generation gives up
pub const KEYGEN_MAX_ATTEMPTS: u32 = 64;

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    modulus: RsaBigInt,
    public_exponent: RsaBigInt,
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    modulus: RsaBigInt,
    private_exponent: RsaBigInt,
}

/// RSA Key Pair
///
/// The two keys are views of one generation event and share the same
/// modulus. The primes and the totient never leave this module.
#[derive(Debug, Clone)]
pub struct KeyPair {
    public_key: PublicKey,
    private_key: PrivateKey,
    p: RsaBigInt,
    q: RsaBigInt,
    totient: RsaBigInt,
    modulus_bits: u64,
}

impl PublicKey {
    /// Modulus n
    pub fn modulus(&self) -> &RsaBigInt {
        &self.modulus
    }

    /// Public exponent e
    pub fn public_exponent(&self) -> &RsaBigInt {
        &self.public_exponent
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }
}

impl PrivateKey {
    /// Modulus n
    pub fn modulus(&self) -> &RsaBigInt {
        &self.modulus
    }

    /// Private exponent d
    pub fn private_exponent(&self) -> &RsaBigInt {
        &self.private_exponent
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.modulus.bits()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(n={}, e={})", self.modulus, self.public_exponent)
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(n={}, d={})", self.modulus, self.private_exponent)
    }
}

impl KeyPair {
    /// Generate a key pair with a `modulus_bits`-bit modulus using the
    /// thread-local RNG
    pub fn generate(modulus_bits: u64) -> RsaResult<Self> {
        Self::generate_with_rng(&mut thread_rng(), modulus_bits, MILLER_RABIN_ROUNDS)
    }

    /// Generate a key pair with a `modulus_bits`-bit modulus
    ///
    /// Each prime gets half the modulus length. A prime pair is discarded
    /// and redrawn when p == q, when p*q falls one bit short, or when
    /// e has no inverse mod φ(n). A prime generation failure is reported
    /// as [`RsaError::KeyGeneration`] with the prime error as its source.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        rng: &mut R,
        modulus_bits: u64,
        rounds: u32,
    ) -> RsaResult<Self> {
        debug!("generateKey begin");

        if modulus_bits < MIN_MODULUS_BITS {
            return Err(RsaError::InvalidModulusBits {
                bits: modulus_bits,
                min: MIN_MODULUS_BITS,
            });
        }
        if rounds == 0 {
            return Err(RsaError::InvalidRounds);
        }

        Self::from_primes(modulus_bits, |bits| generate_prime_with_rng(rng, bits, rounds))
    }

    /// Build a key pair from primes drawn out of `next_prime`, which is
    /// called with the bit length each prime must have
    fn from_primes<F>(modulus_bits: u64, mut next_prime: F) -> RsaResult<Self>
    where
        F: FnMut(u64) -> RsaResult<RsaBigInt>,
    {
        let e = from_u64(PUBLIC_EXPONENT);
        let p_bits = modulus_bits - modulus_bits / 2;
        let q_bits = modulus_bits / 2;

        for attempt in 1..=KEYGEN_MAX_ATTEMPTS {
            let exhausted = |err: RsaError| RsaError::KeyGeneration {
                modulus_bits,
                attempts: attempt,
                source: Some(Box::new(err)),
            };

            // Step 1: Generate two random primes p and q
            let p = next_prime(p_bits).map_err(exhausted)?;
            let q = next_prime(q_bits).map_err(exhausted)?;

            if p == q {
                debug!(attempt, "p == q, redrawing primes");
                continue;
            }

            // Step 2: Compute n = p * q
            let n = &p * &q;
            if n.bits() != modulus_bits {
                debug!(attempt, bits = n.bits(), "modulus too short, redrawing primes");
                continue;
            }

            // Step 3: Compute φ(n) = (p-1)(q-1)
            let phi = (&p - 1u8) * (&q - 1u8);

            // Step 4: Compute d = e^(-1) mod φ(n); fails when gcd(e, φ(n)) != 1
            let d = match mod_inverse(&e, &phi) {
                Ok(d) => d,
                Err(err) => {
                    warn!(attempt, "{}, redrawing primes", err);
                    continue;
                }
            };

            debug!("k: {}", modulus_bits);
            debug!("e: {}", e);
            debug!("p: {}", p);
            debug!("q: {}", q);
            debug!("n: {}", n);
            debug!("phi: {}", phi);
            debug!("d: {}", d);
            debug!("generateKey end");

            return Ok(KeyPair {
                public_key: PublicKey {
                    modulus: n.clone(),
                    public_exponent: e,
                },
                private_key: PrivateKey {
                    modulus: n,
                    private_exponent: d,
                },
                p,
                q,
                totient: phi,
                modulus_bits,
            });
        }

        Err(RsaError::KeyGeneration {
            modulus_bits,
            attempts: KEYGEN_MAX_ATTEMPTS,
            source: None,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Split into the two keys, dropping the primes
    pub fn into_keys(self) -> (PublicKey, PrivateKey) {
        (self.public_key, self.private_key)
    }

    /// Get the bit length of the key
    pub fn modulus_bits(&self) -> u64 {
        self.modulus_bits
    }
}

// RSA Sender
// Encrypts for a recipient and signs with its own private key

use tracing::{debug, warn};

use super::bigint::{mod_pow, RsaBigInt};
use super::keygen::{KeyPair, PrivateKey, PublicKey};
use super::message::{Ciphertext, Plaintext, Signature};
use crate::config::RangePolicy;
use crate::errors::{RsaError, RsaResult};

/// The encrypting and signing side of an exchange
#[derive(Debug, Clone)]
pub struct Sender {
    public_key: PublicKey,
    private_key: PrivateKey,
    range_policy: RangePolicy,
}

impl Sender {
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        debug!(
            "Sender initialized w/ publicKey={} privateKey={}",
            public_key, private_key
        );
        Self {
            public_key,
            private_key,
            range_policy: RangePolicy::default(),
        }
    }

    pub fn from_key_pair(keys: &KeyPair) -> Self {
        Self::new(keys.public_key().clone(), keys.private_key().clone())
    }

    /// Choose what happens to messages outside [1, n)
    pub fn with_range_policy(mut self, policy: RangePolicy) -> Self {
        self.range_policy = policy;
        self
    }

    /// The sender's own public key, for recipients to verify against
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Encrypt `message` for the holder of `recipient`: c = m^e mod n
    ///
    /// A message outside [1, n) is reduced mod n by the exponentiation and
    /// will not survive the round trip. Under [`RangePolicy::Warn`] that is
    /// logged and encryption goes ahead; under [`RangePolicy::Reject`] it
    /// fails with [`RsaError::MessageOutOfRange`].
    pub fn encrypt(&self, recipient: &PublicKey, message: &Plaintext) -> RsaResult<Ciphertext> {
        debug!("encrypt begin");
        let m = message.as_biguint();
        let n = recipient.modulus();

        if m < &RsaBigInt::from(1u8) || m >= n {
            match self.range_policy {
                RangePolicy::Warn => warn!("m must be between 1 and n"),
                RangePolicy::Reject => return Err(RsaError::MessageOutOfRange),
            }
        }

        // c = (m^e) mod n
        let c = mod_pow(m, recipient.public_exponent(), n);

        debug!("r_n: {}", n);
        debug!("r_e: {}", recipient.public_exponent());
        debug!("m: {}", m);
        debug!("c: {}", c);
        debug!("encrypt end");

        Ok(Ciphertext::new(c))
    }

    /// Sign `message` with the sender's private key: s = m^d mod n
    pub fn sign(&self, message: &Plaintext) -> Signature {
        debug!("digitalSign begin");
        let n = self.private_key.modulus();
        let d = self.private_key.private_exponent();
        let m = message.as_biguint();

        let s = mod_pow(m, d, n);

        debug!("n: {}", n);
        debug!("d: {}", d);
        debug!("m: {}", m);
        debug!("s: {}", s);
        debug!("digitalSign end");

        Signature::new(s)
    }
}

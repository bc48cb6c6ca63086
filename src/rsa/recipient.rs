// RSA Recipient
// Decrypts with its own private key and verifies a sender's signature

use std::fmt;

use tracing::debug;

use super::bigint::mod_pow;
use super::keygen::{KeyPair, PrivateKey, PublicKey};
use super::message::{Ciphertext, Plaintext, Signature};

/// Outcome of a signature check. A mismatch is a normal result, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }
}

impl From<bool> for Verdict {
    fn from(valid: bool) -> Self {
        if valid {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => f.write_str("Signature is valid"),
            Verdict::Invalid => f.write_str("Signature is invalid"),
        }
    }
}

/// The decrypting and verifying side of an exchange
#[derive(Debug, Clone)]
pub struct Recipient {
    public_key: PublicKey,
    private_key: PrivateKey,
}

impl Recipient {
    pub fn new(public_key: PublicKey, private_key: PrivateKey) -> Self {
        debug!(
            "Recipient initialized w/ publicKey={} privateKey={}",
            public_key, private_key
        );
        Self {
            public_key,
            private_key,
        }
    }

    pub fn from_key_pair(keys: &KeyPair) -> Self {
        Self::new(keys.public_key().clone(), keys.private_key().clone())
    }

    /// The recipient's public key, for senders to encrypt to
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Decrypt with the recipient's private key: m = c^d mod n
    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Plaintext {
        debug!("decrypt start");
        let n = self.private_key.modulus();
        let d = self.private_key.private_exponent();
        let c = ciphertext.as_biguint();

        let m = mod_pow(c, d, n);

        debug!("n: {}", n);
        debug!("d: {}", d);
        debug!("c: {}", c);
        debug!("m: {}", m);
        debug!("decrypt end");

        Plaintext::new(m)
    }

    /// Check that `signature` is `message` signed by the holder of `sender`:
    /// valid iff s^e mod n == m
    pub fn verify_signature(
        &self,
        sender: &PublicKey,
        message: &Plaintext,
        signature: &Signature,
    ) -> bool {
        debug!("signatureVerify start");
        let s = signature.as_biguint();
        let v = mod_pow(s, sender.public_exponent(), sender.modulus());
        let valid = &v == message.as_biguint();

        debug!("s: {}", s);
        debug!("s_n: {}", sender.modulus());
        debug!("s_e: {}", sender.public_exponent());
        debug!("m: {}", message);
        debug!("v: {}", v);
        debug!(valid, "signatureVerify end");

        valid
    }
}

// Message Roles
// Plaintext, ciphertext and signature values as distinct types

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::bigint::RsaBigInt;

macro_rules! integer_role {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(RsaBigInt);

        impl $name {
            pub fn new(value: RsaBigInt) -> Self {
                Self(value)
            }

            pub fn as_biguint(&self) -> &RsaBigInt {
                &self.0
            }

            pub fn into_inner(self) -> RsaBigInt {
                self.0
            }
        }

        impl From<RsaBigInt> for $name {
            fn from(value: RsaBigInt) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

integer_role!(
    /// A message in the clear, before encryption or after decryption
    Plaintext
);

integer_role!(
    /// A message encrypted under a recipient's public key
    Ciphertext
);

integer_role!(
    /// A message exponentiated with the signer's private exponent
    Signature
);

/// Error returned when a plaintext token is not a decimal integer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("plaintext must consist of decimal digits only")]
pub struct ParsePlaintextError;

impl FromStr for Plaintext {
    type Err = ParsePlaintextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // BigUint::from_str would also accept a leading '+' and underscores
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParsePlaintextError);
        }
        RsaBigInt::parse_bytes(s.as_bytes(), 10)
            .map(Plaintext)
            .ok_or(ParsePlaintextError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plaintext() {
        let m: Plaintext = "42".parse().unwrap();
        assert_eq!(m.as_biguint(), &RsaBigInt::from(42u8));
        assert_eq!(m.to_string(), "42");

        let big: Plaintext = "123456789012345678901234567890123456789".parse().unwrap();
        assert_eq!(big.to_string(), "123456789012345678901234567890123456789");
    }

    #[test]
    fn test_parse_rejects_non_digits() {
        for bad in ["", "12a", "-5", "+5", "1_000", " 7", "4.2", "٣"] {
            assert_eq!(bad.parse::<Plaintext>(), Err(ParsePlaintextError), "{:?}", bad);
        }
        assert_eq!(
            ParsePlaintextError.to_string(),
            "plaintext must consist of decimal digits only"
        );
    }

    #[test]
    fn test_roles_keep_value() {
        let value = RsaBigInt::from(99u8);
        let c = Ciphertext::from(value.clone());
        let s = Signature::new(value.clone());
        assert_eq!(c.as_biguint(), s.as_biguint());
        assert_eq!(c.into_inner(), value);
    }
}

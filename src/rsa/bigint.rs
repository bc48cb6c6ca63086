// RSA Big Integer Operations
// Modular arithmetic and primality testing on top of num-bigint

use num_bigint::{BigInt, BigUint, RandBigInt, ToBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, Rng};

use crate::errors::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Miller-Rabin rounds used by default. Each round lets a composite through
/// with probability at most 1/4, so 64 rounds bound the error by 2^-128.
pub const MILLER_RABIN_ROUNDS: u32 = 64;

/// Primes below 100, used for trial division before Miller-Rabin
const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Modular exponentiation: base^exp mod modulus
///
/// Montgomery ladder: every exponent bit costs exactly one multiplication
/// and one squaring, whichever way the bit falls.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_pow(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut r0 = RsaBigInt::one();
    let mut r1 = base % modulus;

    for i in (0..exp.bits()).rev() {
        if exp.bit(i) {
            r0 = (&r0 * &r1) % modulus;
            r1 = (&r1 * &r1) % modulus;
        } else {
            r1 = (&r0 * &r1) % modulus;
            r0 = (&r0 * &r0) % modulus;
        }
    }

    r0
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut old_r, mut r) = (a.clone(), b.clone());
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &quotient * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    (old_r, old_x, old_y)
}

/// Compute modular inverse: a^(-1) mod m, reduced into [0, m)
pub fn mod_inverse(a: &RsaBigInt, m: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if m <= &RsaBigInt::one() {
        return Err(RsaError::NotInvertible);
    }

    let a_signed = (a % m).to_bigint().ok_or(RsaError::NotInvertible)?;
    let m_signed = m.to_bigint().ok_or(RsaError::NotInvertible)?;
    let (gcd, x, _) = extended_gcd(&a_signed, &m_signed);

    if !gcd.is_one() {
        return Err(RsaError::NotInvertible);
    }

    x.mod_floor(&m_signed)
        .to_biguint()
        .ok_or(RsaError::NotInvertible)
}

/// Miller-Rabin primality test using the thread-local RNG for witnesses
/// Returns true if n is probably prime
pub fn is_probable_prime(n: &RsaBigInt, rounds: u32) -> bool {
    is_probable_prime_with_rng(n, rounds, &mut thread_rng())
}

/// Miller-Rabin primality test drawing witnesses from `rng`
///
/// Small factors are ruled out by trial division first; the remaining odd
/// candidates get `rounds` witnesses drawn uniformly from [2, n-2].
pub fn is_probable_prime_with_rng<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    if n < &from_u64(2) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        if n == &RsaBigInt::from(p) {
            return true;
        }
        if (n % p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    let two = from_u64(2);

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_pow(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    // Probably prime
    true
}

/// Random odd value of exactly `bits` bits (top bit forced on)
pub fn random_odd_with_bits<R: Rng + ?Sized>(rng: &mut R, bits: u64) -> RsaBigInt {
    let mask = (RsaBigInt::one() << (bits - 1)) | RsaBigInt::one();
    let mut candidate = rng.gen_biguint(bits);
    candidate |= &mask;
    candidate
}

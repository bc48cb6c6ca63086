// Prime Generation
// Random odd primes of an exact bit length

use rand::{thread_rng, Rng};
use tracing::{debug, trace};

use super::bigint::{is_probable_prime_with_rng, random_odd_with_bits, RsaBigInt, MILLER_RABIN_ROUNDS};
use crate::errors::{RsaError, RsaResult};

/// Candidates tried per bit of the requested length before giving up.
/// Primes near 2^b have density about 1/(0.69 b) among odd numbers, so a
/// healthy RNG never comes close to this.
const CANDIDATES_PER_BIT: u64 = 100;

/// Floor on the candidate budget for very short primes
const MIN_CANDIDATES: u64 = 1000;

/// Generate a random prime of exactly `bits` bits using the thread-local RNG
pub fn generate_prime(bits: u64) -> RsaResult<RsaBigInt> {
    generate_prime_with_rng(&mut thread_rng(), bits, MILLER_RABIN_ROUNDS)
}

/// Generate a random prime of exactly `bits` bits
///
/// Candidates are odd with the top bit set; each is tested with `rounds`
/// Miller-Rabin rounds. `rounds` must be at least 1, otherwise trial
/// division alone would pass composites ([`RsaError::InvalidRounds`]).
/// Fails with [`RsaError::PrimeGeneration`] if the candidate budget runs
/// out, which only a broken RNG should cause.
pub fn generate_prime_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    bits: u64,
    rounds: u32,
) -> RsaResult<RsaBigInt> {
    if bits < 2 {
        return Err(RsaError::InvalidPrimeBits(bits));
    }
    if rounds == 0 {
        return Err(RsaError::InvalidRounds);
    }

    let budget = (bits * CANDIDATES_PER_BIT).max(MIN_CANDIDATES);

    for attempt in 1..=budget {
        let candidate = random_odd_with_bits(rng, bits);
        trace!(bits, attempt, "testing prime candidate");

        if is_probable_prime_with_rng(&candidate, rounds, rng) {
            debug!("prime found: bits={} attempts={} p={}", bits, attempt, candidate);
            return Ok(candidate);
        }
    }

    Err(RsaError::PrimeGeneration {
        bits,
        attempts: budget,
    })
}

use num_bigint::{BigInt, Sign};
use num_integer::Integer as _;
use num_traits::{One, Signed, Zero};
use rand::{rngs::OsRng, RngCore};
use rug::integer::{IsPrime, Order};
use rug::Integer;
use tracing::{debug, trace};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::random::RandomState;

/// Miller-Rabin rounds used for every primality check.
pub const MILLER_RABIN_REPS: u32 = 40;

/// Converts a `BigInt` into a GMP integer.
pub(crate) fn to_rug(x: &BigInt) -> Integer {
    let (sign, bytes) = x.to_bytes_be();
    let magnitude = Integer::from_digits(&bytes, Order::Msf);
    if sign == Sign::Minus {
        -magnitude
    } else {
        magnitude
    }
}

pub(crate) fn from_rug(x: &Integer) -> BigInt {
    let sign = if x.cmp0() == std::cmp::Ordering::Less { Sign::Minus } else { Sign::Plus };
    BigInt::from_bytes_be(sign, &x.as_abs().to_digits::<u8>(Order::Msf))
}

/// Reads `bits` bits from the operating system entropy source.
pub fn seed_from_entropy(bits: usize) -> Result<Integer> {
    if bits == 0 {
        return Err(Error::InvalidBitLength(bits));
    }
    let mut bytes = vec![0u8; (bits + 7) / 8];
    let read = OsRng.try_fill_bytes(&mut bytes);
    if let Err(e) = read {
        bytes.zeroize();
        return Err(Error::Entropy(e));
    }
    let mut seed = Integer::from_digits(&bytes, Order::Msf);
    bytes.zeroize();
    let bits = u32::try_from(bits).map_err(|_| Error::InvalidBitLength(bits))?;
    seed.keep_bits_mut(bits);
    Ok(seed)
}

/// Samples a safe prime `p = 2p' + 1` of exactly `bits` bits and returns
/// `(p, p')`. Gives up with [`Error::Keygen`] after `max_attempts`
/// candidates for `p'`.
pub fn random_safe_prime(
    rng: &mut RandomState,
    bits: usize,
    max_attempts: usize,
) -> Result<(BigInt, BigInt)> {
    if bits < 3 {
        return Err(Error::InvalidBitLength(bits));
    }
    let sub_bits = u32::try_from(bits - 1).map_err(|_| Error::InvalidBitLength(bits))?;

    for attempt in 0..max_attempts {
        let mut q = Integer::from(Integer::random_bits(sub_bits, rng.state_mut()));
        q.set_bit(sub_bits - 1, true);
        q.next_prime_mut();
        if q.significant_bits() != sub_bits {
            continue;
        }
        // 2q + 1 is a multiple of 3 whenever q = 1 (mod 3).
        if q.mod_u(3) == 1 {
            continue;
        }
        let p = Integer::from(&q << 1u32) + 1u32;
        if p.is_probably_prime(MILLER_RABIN_REPS) != IsPrime::No {
            debug!(bits, attempts = attempt + 1, "found safe prime");
            return Ok((from_rug(&p), from_rug(&q)));
        }
    }
    trace!(bits, max_attempts, "safe prime search exhausted");
    Err(Error::Keygen {
        attempts: max_attempts,
    })
}

pub fn is_probable_prime(x: &BigInt) -> bool {
    x.is_positive() && to_rug(x).is_probably_prime(MILLER_RABIN_REPS) != IsPrime::No
}

/// Uniform sample from `Z_n* = { x : 1 <= x < n, gcd(x, n) = 1 }`.
pub fn random_in_mult_group(rng: &mut RandomState, n: &BigInt) -> Result<BigInt> {
    if n <= &BigInt::one() {
        return Err(Error::Internal("multiplicative group modulus must exceed 1"));
    }
    let bound = to_rug(n);
    loop {
        let candidate = rng.below(&bound);
        if candidate != 0 && Integer::from(candidate.gcd_ref(&bound)) == 1 {
            return Ok(from_rug(&candidate));
        }
    }
}

/// Uniform sample from `[0, n)`.
pub fn random_below(rng: &mut RandomState, n: &BigInt) -> Result<BigInt> {
    if !n.is_positive() {
        return Err(Error::Internal("sampling bound must be positive"));
    }
    Ok(from_rug(&rng.below(&to_rug(n))))
}

/// Two-modulus CRT: the unique `x` in `[0, m1 * m2)` with `x = a1 (mod m1)`
/// and `x = a2 (mod m2)`. The moduli must be coprime.
pub fn crt2(a1: &BigInt, m1: &BigInt, a2: &BigInt, m2: &BigInt) -> Result<BigInt> {
    if !m1.is_positive() || !m2.is_positive() {
        return Err(Error::Internal("CRT moduli must be positive"));
    }
    let m1_inv = m1
        .modinv(m2)
        .ok_or(Error::Internal("CRT moduli are not coprime"))?;
    let a1 = a1.mod_floor(m1);
    let t = ((a2 - &a1) * m1_inv).mod_floor(m2);
    Ok(a1 + m1 * t)
}

/// The Paillier decoder `L(u) = (u - 1) / n`, reduced modulo `n`.
pub fn l_function(u: &BigInt, n: &BigInt) -> BigInt {
    ((u - BigInt::one()) / n).mod_floor(n)
}

pub fn factorial(n: u64) -> BigInt {
    let mut result = BigInt::from(1);
    for i in 1..=n {
        result *= BigInt::from(i);
    }
    result
}

/// Overwrites each value with zero in place.
pub fn zeroize_bigints<'a>(values: impl IntoIterator<Item = &'a mut BigInt>) {
    for value in values {
        value.set_zero();
    }
}

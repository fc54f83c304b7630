use std::fmt;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, instrument, trace};
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::functions::{crt2, is_probable_prime, random_safe_prime, zeroize_bigints};
use crate::pub_key::PublicKey;
use crate::random::RandomState;

/// Smallest modulus size accepted by [`generate_keypair`].
pub const MIN_MODULUS_BITS: usize = 64;

/// Default bound on candidates tried by each safe-prime search.
pub const DEFAULT_MAX_PRIME_ATTEMPTS: usize = 1 << 20;

/// Key generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeygenConfig {
    /// Bit length of the modulus `n`.
    pub bits: usize,
    /// Threshold: authorities needed to decrypt.
    pub w: usize,
    /// Total number of authorities.
    pub l: usize,
    /// Bound on each safe-prime search and on redraws of equal primes.
    pub max_prime_attempts: usize,
    /// Additionally require `w > l / 2`.
    pub require_majority: bool,
}

impl KeygenConfig {
    pub fn new(bits: usize, w: usize, l: usize) -> Self {
        KeygenConfig {
            bits,
            w,
            l,
            max_prime_attempts: DEFAULT_MAX_PRIME_ATTEMPTS,
            require_majority: false,
        }
    }

    pub fn with_max_prime_attempts(mut self, attempts: usize) -> Self {
        self.max_prime_attempts = attempts;
        self
    }

    pub fn with_majority_threshold(mut self, require: bool) -> Self {
        self.require_majority = require;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.bits < MIN_MODULUS_BITS {
            return Err(Error::InvalidBitLength(self.bits));
        }
        check_threshold(self.w, self.l)?;
        if self.require_majority && self.w <= self.l / 2 {
            return Err(Error::InvalidThreshold {
                w: self.w,
                l: self.l,
            });
        }
        Ok(())
    }
}

fn check_threshold(w: usize, l: usize) -> Result<()> {
    if w == 0 || w > l {
        return Err(Error::InvalidThreshold { w, l });
    }
    Ok(())
}

/// The two safe primes `p = 2p' + 1`, `q = 2q' + 1` behind a modulus.
pub struct SafePrimes {
    p: BigInt,
    p1: BigInt,
    q: BigInt,
    q1: BigInt,
}

impl SafePrimes {
    /// Validates caller-supplied primes: both safe, distinct, and with
    /// `gcd(pq, p'q') = 1`.
    pub fn new(p: BigInt, q: BigInt) -> Result<Self> {
        let p1 = &p >> 1;
        let q1 = &q >> 1;
        let primes = SafePrimes { p, p1, q, q1 };
        primes.validate()?;
        Ok(primes)
    }

    pub fn validate(&self) -> Result<()> {
        let odd = |x: &BigInt| x.bit(0);
        if !odd(&self.p) || !odd(&self.q) {
            return Err(Error::InvalidPrimes("primes must be odd"));
        }
        if !is_probable_prime(&self.p) || !is_probable_prime(&self.q) {
            return Err(Error::InvalidPrimes("p and q must be prime"));
        }
        if !is_probable_prime(&self.p1) || !is_probable_prime(&self.q1) {
            return Err(Error::InvalidPrimes("(p - 1) / 2 and (q - 1) / 2 must be prime"));
        }
        if self.p == self.q {
            return Err(Error::InvalidPrimes("p and q must be distinct"));
        }
        if self.p == self.q1 || self.q == self.p1 {
            return Err(Error::InvalidPrimes("n and p'q' must be coprime"));
        }
        Ok(())
    }
}

impl Zeroize for SafePrimes {
    fn zeroize(&mut self) {
        zeroize_bigints([&mut self.p, &mut self.p1, &mut self.q, &mut self.q1]);
    }
}

impl Drop for SafePrimes {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for SafePrimes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafePrimes").finish_non_exhaustive()
    }
}

/// Dealer-side secret key. It exists only between key generation and share
/// issuance and is zeroized when dropped.
pub struct PrivateKey {
    n: BigInt,
    n2: BigInt,
    nm: BigInt,
    d: BigInt,
    w: usize,
    l: usize,
    // Per-authority verification values; allocated but not computed.
    vi: Vec<BigInt>,
}

impl PrivateKey {
    pub fn n(&self) -> &BigInt {
        &self.n
    }

    pub fn n_squared(&self) -> &BigInt {
        &self.n2
    }

    pub fn w(&self) -> usize {
        self.w
    }

    pub fn l(&self) -> usize {
        self.l
    }

    /// `n * p' * q'`, the modulus the sharing polynomial lives in.
    pub(crate) fn nm(&self) -> &BigInt {
        &self.nm
    }

    /// The decryption exponent: `d = 1 (mod n)` and `d = 0 (mod p'q')`.
    pub(crate) fn d(&self) -> &BigInt {
        &self.d
    }

    pub fn verification_slots(&self) -> &[BigInt] {
        &self.vi
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        zeroize_bigints([&mut self.n, &mut self.n2, &mut self.nm, &mut self.d]);
        zeroize_bigints(self.vi.iter_mut());
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("w", &self.w)
            .field("l", &self.l)
            .finish_non_exhaustive()
    }
}

/// Generates a key pair with an `bits`-bit modulus for a `w`-of-`l` quorum.
pub fn generate_keypair(
    rng: &mut RandomState,
    bits: usize,
    w: usize,
    l: usize,
) -> Result<(PublicKey, PrivateKey)> {
    generate_keypair_with_config(rng, &KeygenConfig::new(bits, w, l))
}

#[instrument(level = "debug", skip_all, fields(bits = config.bits, w = config.w, l = config.l))]
pub fn generate_keypair_with_config(
    rng: &mut RandomState,
    config: &KeygenConfig,
) -> Result<(PublicKey, PrivateKey)> {
    config.validate()?;
    let prime_bits = 1 + (config.bits - 1) / 2;

    for attempt in 0..config.max_prime_attempts {
        let (p, _) = random_safe_prime(rng, prime_bits, config.max_prime_attempts)?;
        let (q, _) = random_safe_prime(rng, prime_bits, config.max_prime_attempts)?;
        match SafePrimes::new(p, q) {
            Ok(primes) => {
                debug!(attempts = attempt + 1, "sampled safe prime pair");
                return keypair_from_safe_primes(&primes, config.w, config.l);
            }
            Err(Error::InvalidPrimes(reason)) => trace!(reason, "rejected safe prime pair"),
            Err(e) => return Err(e),
        }
    }
    Err(Error::Keygen {
        attempts: config.max_prime_attempts,
    })
}

/// Builds a key pair from known safe primes.
pub fn keypair_from_safe_primes(
    primes: &SafePrimes,
    w: usize,
    l: usize,
) -> Result<(PublicKey, PrivateKey)> {
    check_threshold(w, l)?;

    let n = &primes.p * &primes.q;
    let mut m = &primes.p1 * &primes.q1;
    let nm = &n * &m;
    let d = crt2(&BigInt::one(), &n, &BigInt::zero(), &m);
    m.set_zero();
    let d = d?;

    let mut vi = Vec::new();
    vi.try_reserve_exact(l)?;
    vi.resize(l, BigInt::zero());

    let pk = PublicKey::new(n.clone(), w, l)?;
    let sk = PrivateKey {
        n2: pk.n_squared().clone(),
        n,
        nm,
        d,
        w,
        l,
        vi,
    };
    Ok((pk, sk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{fixture_primes, P, Q};
    use crate::functions::factorial;
    use num_integer::Integer as _;

    #[test]
    fn test_config_validate() {
        assert!(KeygenConfig::new(128, 3, 5).validate().is_ok());
        assert!(matches!(
            KeygenConfig::new(32, 3, 5).validate(),
            Err(Error::InvalidBitLength(32))
        ));
        assert!(matches!(
            KeygenConfig::new(128, 0, 5).validate(),
            Err(Error::InvalidThreshold { w: 0, l: 5 })
        ));
        assert!(matches!(
            KeygenConfig::new(128, 6, 5).validate(),
            Err(Error::InvalidThreshold { w: 6, l: 5 })
        ));

        let minority = KeygenConfig::new(128, 2, 5);
        assert!(minority.validate().is_ok());
        assert!(minority.with_majority_threshold(true).validate().is_err());
        assert!(KeygenConfig::new(128, 3, 5)
            .with_majority_threshold(true)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_safe_primes_validation() {
        assert!(SafePrimes::new(BigInt::from(P), BigInt::from(Q)).is_ok());
        // 13 is prime but 6 is not.
        assert!(SafePrimes::new(BigInt::from(13), BigInt::from(Q)).is_err());
        assert!(SafePrimes::new(BigInt::from(P), BigInt::from(P)).is_err());
        assert!(SafePrimes::new(BigInt::from(1000), BigInt::from(Q)).is_err());
        // q = 11 = 2 * 5 + 1 with p = 23 = 2 * 11 + 1 shares a factor with p'q'.
        assert!(matches!(
            SafePrimes::new(BigInt::from(23), BigInt::from(11)),
            Err(Error::InvalidPrimes(_))
        ));
    }

    #[test]
    fn test_keypair_from_safe_primes() {
        let (pk, sk) = keypair_from_safe_primes(&fixture_primes(), 3, 5).unwrap();
        let n = BigInt::from(P * Q);
        let m = BigInt::from((P - 1) / 2 * ((Q - 1) / 2));

        assert_eq!(pk.n(), &n);
        assert_eq!(sk.n(), &n);
        assert_eq!(sk.n_squared(), pk.n_squared());
        assert_eq!(pk.g(), &(&n + 1));
        assert_eq!(pk.delta(), &factorial(5));
        assert_eq!(sk.nm(), &(&n * &m));
        assert_eq!(sk.d().mod_floor(&n), BigInt::one());
        assert_eq!(sk.d().mod_floor(&m), BigInt::zero());
        assert_eq!((pk.w(), pk.l()), (3, 5));
        assert_eq!((sk.w(), sk.l()), (3, 5));
        assert_eq!(sk.verification_slots().len(), 5);
        assert!(sk.verification_slots().iter().all(Zero::is_zero));
    }

    #[test]
    fn test_keypair_invalid_threshold() {
        assert!(matches!(
            keypair_from_safe_primes(&fixture_primes(), 4, 3),
            Err(Error::InvalidThreshold { w: 4, l: 3 })
        ));
    }

    #[test]
    fn test_generate_keypair_invariants() {
        let mut rng = RandomState::from_seed_insecure(2024);
        let (pk, sk) = generate_keypair(&mut rng, 128, 3, 5).unwrap();
        let n = pk.n().clone();

        assert!(n.bits() == 127 || n.bits() == 128, "n has {} bits", n.bits());
        assert_eq!(pk.g(), &(&n + 1));
        assert_eq!(pk.delta(), &BigInt::from(120));
        assert_eq!(sk.d().mod_floor(&n), BigInt::one());

        // nm / n = p'q' and d must vanish modulo it.
        let m = sk.nm() / &n;
        assert_eq!(sk.nm(), &(&n * &m));
        assert_eq!(sk.d().mod_floor(&m), BigInt::zero());
        assert!(n.gcd(&m).is_one());
    }

    #[test]
    fn test_generate_keypair_rejects_bad_config() {
        let mut rng = RandomState::from_seed_insecure(1);
        assert!(matches!(
            generate_keypair(&mut rng, 128, 0, 5),
            Err(Error::InvalidThreshold { .. })
        ));
        let config = KeygenConfig::new(128, 3, 5).with_max_prime_attempts(0);
        assert!(matches!(
            generate_keypair_with_config(&mut rng, &config),
            Err(Error::Keygen { attempts: 0 })
        ));
    }

    #[test]
    fn test_private_key_zeroize() {
        let (_, mut sk) = keypair_from_safe_primes(&fixture_primes(), 2, 3).unwrap();
        sk.zeroize();
        assert!(sk.n().is_zero());
        assert!(sk.nm().is_zero());
        assert!(sk.d().is_zero());
        assert_eq!((sk.w(), sk.l()), (2, 3));

        let debug_output = format!("{:?}", sk);
        assert!(debug_output.contains("PrivateKey"));
        assert!(!debug_output.contains("nm"));
    }
}

use num_bigint::BigInt;
use num_integer::Integer as _;
use num_traits::{One, Signed};

use crate::error::{Error, Result};
use crate::functions::{factorial, random_in_mult_group};
use crate::random::RandomState;

/// Public encryption key: `n`, the cached `n^2`, `g = n + 1` and `Δ = l!`,
/// plus the threshold parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    n: BigInt,
    n2: BigInt,
    g: BigInt,
    delta: BigInt,
    w: usize,
    l: usize,
}

impl PublicKey {
    /// Rebuilds a public key from its modulus and threshold parameters.
    pub fn new(n: BigInt, w: usize, l: usize) -> Result<Self> {
        if w == 0 || w > l {
            return Err(Error::InvalidThreshold { w, l });
        }
        if n <= BigInt::from(2) {
            return Err(Error::Internal("public modulus must exceed 2"));
        }
        let n2 = &n * &n;
        let g = &n + BigInt::one();
        let delta = factorial(l as u64);
        Ok(PublicKey {
            n,
            n2,
            g,
            delta,
            w,
            l,
        })
    }

    pub fn n(&self) -> &BigInt {
        &self.n
    }

    pub fn n_squared(&self) -> &BigInt {
        &self.n2
    }

    pub fn g(&self) -> &BigInt {
        &self.g
    }

    /// `Δ = l!`.
    pub fn delta(&self) -> &BigInt {
        &self.delta
    }

    /// Number of authorities required to decrypt.
    pub fn w(&self) -> usize {
        self.w
    }

    /// Total number of authorities.
    pub fn l(&self) -> usize {
        self.l
    }

    pub(crate) fn check_ciphertext(&self, c: &BigInt) -> Result<()> {
        if !c.is_positive() {
            return Err(Error::InvalidCiphertext("ciphertext must be positive"));
        }
        if c >= &self.n2 {
            return Err(Error::InvalidCiphertext("ciphertext must be below n^2"));
        }
        Ok(())
    }

    fn reduce(&self, m: &BigInt) -> BigInt {
        m.mod_floor(&self.n)
    }

    /// `c = g^m * r^n mod n^2` for a fresh `r` in `Z_n*`.
    pub fn encrypt(&self, rng: &mut RandomState, m: &BigInt) -> Result<BigInt> {
        let r = random_in_mult_group(rng, &self.n)?;
        self.encrypt_r(&r, m)
    }

    /// Deterministic encryption with caller-supplied randomness `r` in `Z_n*`.
    pub fn encrypt_r(&self, r: &BigInt, m: &BigInt) -> Result<BigInt> {
        if !r.is_positive() || r >= &self.n || !r.gcd(&self.n).is_one() {
            return Err(Error::InvalidRandomness);
        }
        let r_n = r.modpow(&self.n, &self.n2);
        let g_m = self.g.modpow(&self.reduce(m), &self.n2);
        Ok((r_n * g_m) % &self.n2)
    }

    /// Multiplies by a fresh `n`-th power; the plaintext is unchanged.
    pub fn reencrypt(&self, rng: &mut RandomState, c: &BigInt) -> Result<BigInt> {
        self.check_ciphertext(c)?;
        let r = random_in_mult_group(rng, &self.n)?;
        let r_n = r.modpow(&self.n, &self.n2);
        Ok((c * r_n) % &self.n2)
    }

    /// Adds the plaintext `m` to the plaintext of `c`.
    pub fn ep_add(&self, c: &BigInt, m: &BigInt) -> Result<BigInt> {
        self.check_ciphertext(c)?;
        let g_m = self.g.modpow(&self.reduce(m), &self.n2);
        Ok((c * g_m) % &self.n2)
    }

    /// Adds the plaintexts of two ciphertexts.
    pub fn ee_add(&self, c1: &BigInt, c2: &BigInt) -> Result<BigInt> {
        self.check_ciphertext(c1)?;
        self.check_ciphertext(c2)?;
        Ok((c1 * c2) % &self.n2)
    }

    /// Multiplies the plaintext of `c` by the scalar `k`.
    pub fn ep_mul(&self, c: &BigInt, k: &BigInt) -> Result<BigInt> {
        self.check_ciphertext(c)?;
        Ok(c.modpow(&self.reduce(k), &self.n2))
    }

    /// Homomorphic sum of a non-empty list of ciphertexts.
    pub fn sum(&self, c_list: &[BigInt]) -> Result<BigInt> {
        let (first, rest) = c_list.split_first().ok_or(Error::EmptyCiphertextList)?;
        self.check_ciphertext(first)?;
        let mut sum = first.clone();
        for ci in rest {
            sum = self.ee_add(&sum, ci)?;
        }
        Ok(sum)
    }
}

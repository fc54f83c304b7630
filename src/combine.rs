//! Share combination: Lagrange interpolation in the exponent followed by
//! the Paillier decoder and the `(4Δ²)^{-1}` normalization.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, instrument};

use crate::decryption_share::DecryptionShare;
use crate::error::{Error, Result};
use crate::functions::l_function;
use crate::pub_key::PublicKey;

impl PublicKey {
    /// Recovers the plaintext from index-tagged partial decryptions. Every
    /// index must lie in `1..=l`, appear once, and at least `w` shares must
    /// be present. The order of `shares` does not matter.
    #[instrument(level = "debug", skip_all, fields(shares = shares.len(), w = self.w()))]
    pub fn combine_shares(&self, shares: &[DecryptionShare]) -> Result<BigInt> {
        let mut participants = BTreeMap::new();
        for share in shares {
            if share.index == 0 || share.index > self.l() {
                return Err(Error::InvalidShareIndex {
                    index: share.index,
                    l: self.l(),
                });
            }
            if participants.insert(share.index, &share.ci).is_some() {
                return Err(Error::RepeatedShareIndex(share.index));
            }
        }
        self.combine_participants(&participants)
    }

    /// Dense variant: `shares[i]` is the partial decryption of the authority
    /// with 0-based index `i`, or zero when that authority is absent.
    #[instrument(level = "debug", skip_all, fields(w = self.w()))]
    pub fn combine_dense(&self, shares: &[BigInt]) -> Result<BigInt> {
        if shares.len() != self.l() {
            return Err(Error::InvalidShareCount {
                expected: self.l(),
                actual: shares.len(),
            });
        }
        let participants: BTreeMap<usize, &BigInt> = shares
            .iter()
            .enumerate()
            .filter(|(_, ci)| !ci.is_zero())
            .map(|(i, ci)| (i + 1, ci))
            .collect();
        self.combine_participants(&participants)
    }

    // Keys are 1-based authority indices.
    fn combine_participants(&self, participants: &BTreeMap<usize, &BigInt>) -> Result<BigInt> {
        if participants.len() < self.w() {
            return Err(Error::InsufficientShares {
                provided: participants.len(),
                required: self.w(),
            });
        }
        debug!(participants = participants.len(), "combining partial decryptions");

        let n2 = self.n_squared();
        let mut c_prime = BigInt::one();
        for (&i, &ci) in participants {
            self.check_ciphertext(ci)?;
            let (lambda, negative) = self.lagrange_coefficient(i, participants.keys().copied());
            let mut t = ci.modpow(&(lambda * 2u32), n2);
            if negative {
                t = t
                    .modinv(n2)
                    .ok_or(Error::NonInvertibleShare { index: i })?;
            }
            c_prime = (c_prime * t) % n2;
        }

        let decoded = l_function(&c_prime, self.n());
        let four_delta_squared = BigInt::from(4u32) * self.delta() * self.delta();
        let constant = four_delta_squared
            .modinv(self.n())
            .ok_or(Error::Combine)?;
        Ok((decoded * constant) % self.n())
    }

    /// `|λ_i| = Δ · Π j / |j - i|` over the other participants `j`, and
    /// whether `λ_i` is negative. Every division is exact because `Δ = l!`.
    fn lagrange_coefficient(
        &self,
        i: usize,
        participants: impl Iterator<Item = usize>,
    ) -> (BigInt, bool) {
        let mut lambda = self.delta().clone();
        let mut negative = false;
        for j in participants.filter(|&j| j != i) {
            lambda /= j.abs_diff(i);
            if j < i {
                negative = !negative;
            }
            lambda *= j;
        }
        (lambda, negative)
    }
}

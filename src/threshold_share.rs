use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::decryption_share::DecryptionShare;
use crate::error::Result;
use crate::pub_key::PublicKey;

/// The secret share `s_i = f(i)` held by one authority. Immutable once
/// issued; rekeying requires a new share.
#[derive(Clone)]
pub struct AuthorityShare {
    index: usize,
    si: BigInt,
}

impl AuthorityShare {
    /// Stores `si` for the authority at 0-based `position`; the share
    /// records the 1-based index `position + 1`.
    pub fn new(position: usize, si: BigInt) -> Self {
        AuthorityShare {
            index: position + 1,
            si,
        }
    }

    /// 1-based authority index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Partial decryption `c^{2 Δ s_i} mod n^2`.
    pub fn share_decrypt(&self, pk: &PublicKey, c: &BigInt) -> Result<DecryptionShare> {
        pk.check_ciphertext(c)?;
        let exponent = BigInt::from(2) * pk.delta() * &self.si;
        Ok(DecryptionShare {
            index: self.index,
            ci: c.modpow(&exponent, pk.n_squared()),
        })
    }
}

impl Zeroize for AuthorityShare {
    fn zeroize(&mut self) {
        self.si.set_zero();
        // The index is public.
    }
}

impl Drop for AuthorityShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for AuthorityShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorityShare")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

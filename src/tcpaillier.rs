use num_bigint::BigInt;
use tracing::{debug, instrument};

use crate::decryption_share::DecryptionShare;
use crate::error::{Error, Result};
use crate::keygen::{generate_keypair_with_config, KeygenConfig, PrivateKey};
use crate::polynomial::Polynomial;
use crate::pub_key::PublicKey;
use crate::random::RandomState;
use crate::threshold_share::AuthorityShare;

/// Trusted-dealer share issuance. Consumes the private key: the sharing
/// polynomial and `sk` are both zeroized before this returns, on success
/// and on error.
#[instrument(level = "debug", skip_all, fields(w = sk.w(), l = sk.l()))]
pub fn deal_shares(sk: PrivateKey, rng: &mut RandomState) -> Result<Vec<AuthorityShare>> {
    let poly = Polynomial::new_random(&sk, rng)?;
    let mut shares = Vec::new();
    shares.try_reserve_exact(sk.l())?;
    for position in 0..sk.l() {
        shares.push(AuthorityShare::new(position, poly.evaluate(position)));
    }
    debug!(shares = shares.len(), "issued authority shares");
    Ok(shares)
}

/// A freshly dealt `w`-of-`l` system: the public key and one share per
/// authority. The private key no longer exists once this is constructed.
#[derive(Debug)]
pub struct ThresholdPaillier {
    pub pub_key: PublicKey,
    pub key_shares: Vec<AuthorityShare>,
}

impl ThresholdPaillier {
    pub fn new(rng: &mut RandomState, bits: usize, w: usize, l: usize) -> Result<Self> {
        Self::with_config(rng, &KeygenConfig::new(bits, w, l))
    }

    pub fn with_config(rng: &mut RandomState, config: &KeygenConfig) -> Result<Self> {
        let (pub_key, sk) = generate_keypair_with_config(rng, config)?;
        Self::from_private_key(pub_key, sk, rng)
    }

    pub fn from_private_key(
        pub_key: PublicKey,
        sk: PrivateKey,
        rng: &mut RandomState,
    ) -> Result<Self> {
        let key_shares = deal_shares(sk, rng)?;
        Ok(ThresholdPaillier {
            pub_key,
            key_shares,
        })
    }

    /// Runs partial decryption for every authority in `positions` (0-based).
    pub fn partial_decrypt(
        &self,
        positions: &[usize],
        c: &BigInt,
    ) -> Result<Vec<DecryptionShare>> {
        positions
            .iter()
            .map(|&i| {
                let share = self.key_shares.get(i).ok_or(Error::InvalidShareIndex {
                    index: i + 1,
                    l: self.key_shares.len(),
                })?;
                share.share_decrypt(&self.pub_key, c)
            })
            .collect()
    }
}

//! Small fixed keys shared by the unit tests.

use num_bigint::BigInt;

use crate::keygen::{keypair_from_safe_primes, SafePrimes};
use crate::pub_key::PublicKey;
use crate::random::RandomState;
use crate::tcpaillier::deal_shares;
use crate::threshold_share::AuthorityShare;

// 1019 = 2 * 509 + 1 and 983 = 2 * 491 + 1.
pub(crate) const P: u64 = 1019;
pub(crate) const Q: u64 = 983;

pub(crate) fn fixture_primes() -> SafePrimes {
    SafePrimes::new(BigInt::from(P), BigInt::from(Q)).unwrap()
}

pub(crate) fn fixture(w: usize, l: usize) -> (PublicKey, Vec<AuthorityShare>, RandomState) {
    let mut rng = RandomState::from_seed_insecure(42);
    let (pk, sk) = keypair_from_safe_primes(&fixture_primes(), w, l).unwrap();
    let shares = deal_shares(sk, &mut rng).unwrap();
    (pk, shares, rng)
}

/// Decrypts with the first `w` authorities.
pub(crate) fn decrypt(pk: &PublicKey, shares: &[AuthorityShare], c: &BigInt) -> BigInt {
    let partials: Vec<_> = shares[..pk.w()]
        .iter()
        .map(|s| s.share_decrypt(pk, c).unwrap())
        .collect();
    pk.combine_shares(&partials).unwrap()
}

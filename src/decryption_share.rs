use num_bigint::BigInt;

/// Partial decryption `c^{2 Δ s_i} mod n^2` produced by authority `index`
/// (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionShare {
    pub index: usize,
    pub ci: BigInt,
}

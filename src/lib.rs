//! This crate implements a threshold variant of the Paillier cryptosystem.
//!
//! Based on:
//! [Damgård and Jurik, 2001](https://people.csail.mit.edu/rivest/voting/papers/DamgardJurikNielsen-AGeneralizationOfPailliersPublicKeySystemWithApplicationsToElectronicVoting.pdf),
//! specialized to `s = 1`. A trusted dealer generates a public key and `l`
//! authority shares; any `w` authorities can jointly decrypt, while fewer
//! learn nothing. Ciphertexts are additively homomorphic modulo `n`.
//!
//! # Example
//! ```
//! use num_bigint::BigInt;
//! use paillier_threshold::{RandomState, ThresholdPaillier};
//!
//! let mut rng = RandomState::new()?;
//! let tp = ThresholdPaillier::new(&mut rng, 128, 2, 3)?;
//! let pk = &tp.pub_key;
//!
//! let c1 = pk.encrypt(&mut rng, &BigInt::from(15))?;
//! let c2 = pk.encrypt(&mut rng, &BigInt::from(27))?;
//! let sum = pk.ee_add(&c1, &c2)?;
//!
//! let partials = tp.partial_decrypt(&[0, 2], &sum)?;
//! assert_eq!(pk.combine_shares(&partials)?, BigInt::from(42));
//! # Ok::<(), paillier_threshold::Error>(())
//! ```

#[cfg(all(feature = "insecure-deterministic-rng", not(debug_assertions)))]
compile_error!("the `insecure-deterministic-rng` feature must not be enabled in release builds");

mod combine;
pub mod decryption_share;
pub mod error;
pub mod functions;
pub mod keygen;
pub mod polynomial;
pub mod pub_key;
pub mod random;
pub mod tcpaillier;
pub mod threshold_share;

#[cfg(test)]
mod fixtures;

pub use decryption_share::DecryptionShare;
pub use error::{Error, Result};
pub use keygen::{
    generate_keypair, generate_keypair_with_config, keypair_from_safe_primes, KeygenConfig,
    PrivateKey, SafePrimes,
};
pub use polynomial::Polynomial;
pub use pub_key::PublicKey;
pub use random::{RandomState, RAND_SEED_BITS};
pub use tcpaillier::{deal_shares, ThresholdPaillier};
pub use threshold_share::AuthorityShare;

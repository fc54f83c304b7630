//! Error type shared by every operation in the crate.

use std::collections::TryReserveError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("operating system entropy source failed: {0}")]
    Entropy(#[from] rand::Error),
    #[error("invalid threshold: w = {w}, l = {l}")]
    InvalidThreshold { w: usize, l: usize },
    #[error("invalid bit length: {0}")]
    InvalidBitLength(usize),
    #[error("safe prime search exhausted after {attempts} attempts")]
    Keygen { attempts: usize },
    #[error("invalid safe primes: {0}")]
    InvalidPrimes(&'static str),
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(&'static str),
    #[error("randomness is not a unit modulo n")]
    InvalidRandomness,
    #[error("empty ciphertext list")]
    EmptyCiphertextList,
    #[error("share index {index} out of range 1..={l}")]
    InvalidShareIndex { index: usize, l: usize },
    #[error("repeated share index: {0}")]
    RepeatedShareIndex(usize),
    #[error("insufficient shares: got {provided}, need {required}")]
    InsufficientShares { provided: usize, required: usize },
    #[error("expected {expected} share slots, got {actual}")]
    InvalidShareCount { expected: usize, actual: usize },
    #[error("partial share of authority {index} is not invertible modulo n^2")]
    NonInvertibleShare { index: usize },
    #[error("4 * delta^2 is not invertible modulo n")]
    Combine,
    #[error("internal error: {0}")]
    Internal(&'static str),
}

use num_bigint::BigInt;
use num_traits::Zero;
use zeroize::Zeroize;

use crate::error::Result;
use crate::functions::{random_below, zeroize_bigints};
use crate::keygen::PrivateKey;
use crate::random::RandomState;

/// The dealer's sharing polynomial `f(x) = a_0 + a_1 x + ... + a_{w-1} x^{w-1}`
/// over `Z_{nm}`, with `a_0 = d`. Zeroized on drop.
pub struct Polynomial {
    coefficients: Vec<BigInt>,
    modulus: BigInt,
}

impl Polynomial {
    /// Samples `a_1 .. a_{w-1}` uniformly from `[0, nm)`.
    pub fn new_random(sk: &PrivateKey, rng: &mut RandomState) -> Result<Self> {
        let mut coefficients = Vec::new();
        coefficients.try_reserve_exact(sk.w())?;
        let mut poly = Polynomial {
            coefficients,
            modulus: sk.nm().clone(),
        };
        poly.coefficients.push(sk.d().clone());
        for _ in 1..sk.w() {
            let coeff = random_below(rng, &poly.modulus)?;
            poly.coefficients.push(coeff);
        }
        Ok(poly)
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial for the authority with 0-based index
    /// `index`, i.e. at the point `index + 1`, modulo `nm`.
    pub fn evaluate(&self, index: usize) -> BigInt {
        let x = BigInt::from(index) + 1;
        let mut result = BigInt::zero();
        for coeff in self.coefficients.iter().rev() {
            result = (result * &x + coeff) % &self.modulus;
        }
        result
    }
}

impl Zeroize for Polynomial {
    fn zeroize(&mut self) {
        zeroize_bigints(self.coefficients.iter_mut());
        self.modulus.set_zero();
    }
}

impl Drop for Polynomial {
    fn drop(&mut self) {
        self.zeroize();
    }
}

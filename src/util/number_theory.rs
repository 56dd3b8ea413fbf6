use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{Error, Result};

pub fn gcd(x: &BigUint, y: &BigUint) -> BigUint {
    x.gcd(y)
}

pub fn are_coprime(x: &BigUint, y: &BigUint) -> bool {
    gcd(x, y).is_one()
}

pub fn multiply_mod(x: &BigUint, y: &BigUint, modulus: &BigUint) -> BigUint {
    (x * y) % modulus
}

/// Computes `base^exponent mod modulus`. The modulus must be greater than one.
pub fn exponentiate_mod(base: &BigUint, exponent: &BigUint, modulus: &BigUint) -> BigUint {
    debug_assert!(modulus > &BigUint::one(), "[Invalid argument] Modulus must exceed one.");
    base.modpow(exponent, modulus)
}

/// Plain integer division of non-negative operands.
pub fn floor_div(x: &BigUint, y: &BigUint) -> Result<BigUint> {
    if y.is_zero() {
        return Err(Error::InvalidModulus("division by zero"));
    }
    Ok(x.div_floor(y))
}

/// Inverse of `value` modulo `modulus`, if `gcd(value, modulus) = 1`.
pub fn try_invert_mod(value: &BigUint, modulus: &BigUint) -> Result<BigUint> {
    let not_invertible = || Error::NotInvertible { modulus: modulus.to_string() };
    if modulus <= &BigUint::one() {
        return Err(not_invertible());
    }
    value.modinv(modulus).ok_or_else(not_invertible)
}

use num_bigint::BigUint;
use num_traits::One;

use crate::{util, Ciphertext, EncryptedInstance, PublicKey};

/// Provide methods for checking the validity of objects against a public key.
pub trait ValCheck {
    /// Check whether the object belongs to the key's spaces.
    fn is_valid_for(&self, public_key: &PublicKey) -> bool;
}

impl ValCheck for PublicKey {

    fn is_valid_for(&self, public_key: &PublicKey) -> bool {
        if self.n() != public_key.n() {return false;}
        if self.n() <= &BigUint::one() {return false;}
        if self.n_squared() != &(self.n() * self.n()) {return false;}
        self.has_standard_generator()
    }

}

impl ValCheck for Ciphertext {

    /// A valid ciphertext lies in `[0, n^2)` and is a unit modulo `n`;
    /// every honest encryption is.
    fn is_valid_for(&self, public_key: &PublicKey) -> bool {
        self.value() < public_key.n_squared() && util::are_coprime(self.value(), public_key.n())
    }

}

impl ValCheck for [Ciphertext] {
    fn is_valid_for(&self, public_key: &PublicKey) -> bool {
        self.iter().all(|c| c.is_valid_for(public_key))
    }
}

impl ValCheck for EncryptedInstance {
    fn is_valid_for(&self, public_key: &PublicKey) -> bool {
        self.user.is_valid_for(public_key)
            && self.cloud.iter().all(|row| row.is_valid_for(public_key))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{Encryptor, KeyGenerator, plain_vector, plain_matrix};

    use super::*;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    #[test]
    fn test_public_key_valid() {
        let pk = KeyGenerator::from_u64(7, 11).unwrap().create_public_key();
        assert!(pk.is_valid_for(&pk));
        let other = KeyGenerator::from_u64(7, 13).unwrap().create_public_key();
        assert!(!other.is_valid_for(&pk));
        let bad_generator = PublicKey::from_members(big(77), big(14)).unwrap();
        assert!(!bad_generator.is_valid_for(&pk));
        let too_large = PublicKey::from_members(big(77), big(5929)).unwrap();
        assert!(!too_large.is_valid_for(&pk));
        // A unit generator other than n + 1 is still rejected.
        let unit_generator = PublicKey::from_members(big(77), big(5)).unwrap();
        assert!(!unit_generator.is_valid_for(&unit_generator));
    }

    #[test]
    fn test_ciphertext_valid() {
        let pk = Arc::new(KeyGenerator::from_u64(7, 11).unwrap().create_public_key());
        let encryptor = Encryptor::new(pk.clone());
        let encrypted = encryptor
            .encrypt(&plain_vector(&[4, 9]), &plain_matrix(&[vec![2, 3], vec![10, 1]]), &big(2))
            .unwrap();
        assert!(encrypted.is_valid_for(&pk));
        assert!(encrypted.user.is_valid_for(&pk));
        assert!(!Ciphertext::new(big(5929)).is_valid_for(&pk));
        assert!(!Ciphertext::new(big(0)).is_valid_for(&pk));
        assert!(!Ciphertext::new(big(14)).is_valid_for(&pk));
        assert!(Ciphertext::new(big(1)).is_valid_for(&pk));
    }
}

use num_bigint::BigUint;
use num_traits::One;
use tracing::info;

use crate::{util, Error, Result};

/// Struct to store a public key.
///
/// Holds the modulus `n = p*q` and the generator `g = n + 1`. The square of
/// the modulus is cached since every ciphertext operation reduces by it.
/// Safe to disclose to any party that encrypts or evaluates.
///
/// - See [KeyGenerator] for the class that generates the public key.
/// - See [SecretKey] for the class that stores the secret key.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PublicKey {
    n: BigUint,
    g: BigUint,
    n_squared: BigUint,
}

impl PublicKey {

    /// Create a public key with the standard generator `g = n + 1`.
    pub fn from_modulus(n: BigUint) -> Result<Self> {
        let g = &n + BigUint::one();
        Self::from_members(n, g)
    }

    /// Create a public key from raw members. The modulus must exceed one.
    pub fn from_members(n: BigUint, g: BigUint) -> Result<Self> {
        if n <= BigUint::one() {
            return Err(Error::InvalidModulus("modulus must exceed one"));
        }
        let n_squared = &n * &n;
        Ok(Self { n, g, n_squared })
    }

    /// The modulus `n`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// The generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// The ciphertext modulus `n^2`.
    pub fn n_squared(&self) -> &BigUint {
        &self.n_squared
    }

    /// Is the generator the standard `n + 1`?
    pub fn has_standard_generator(&self) -> bool {
        self.g == &self.n + BigUint::one()
    }

    /// A SHA-256 digest of the public members, usable to identify the key in logs.
    pub fn fingerprint(&self) -> util::hash::HashBlock {
        let mut bytes = self.n.to_bytes_le();
        bytes.extend(self.g.to_bytes_le());
        util::hash::hash(&bytes)
    }

}

/// Struct to store a secret key.
///
/// Holds `lambda = (p-1)(q-1)` and the modulus. It is never serialized by
/// this crate and its [Debug] output hides lambda.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    lambda: BigUint,
    n: BigUint,
}

impl SecretKey {

    /// Create a secret key from raw members.
    pub fn from_members(lambda: BigUint, n: BigUint) -> Self {
        Self { lambda, n }
    }

    /// The decryption exponent.
    pub fn lambda(&self) -> &BigUint {
        &self.lambda
    }

    /// The modulus the key belongs to.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("lambda", &"<redacted>")
            .field("n", &self.n)
            .finish()
    }
}

/// Generates matching public and secret keys from a prime pair.
///
/// Primality is not checked: the caller supplies genuine primes. Composite
/// inputs produce a key pair for which decryption does not invert
/// encryption. Only pairs that can never form a modulus are rejected
/// (a value below two, or `p == q`).
/// ```rust
/// use hyperplane::*;
/// let keygen = KeyGenerator::new(&BigUint::from(7u64), &BigUint::from(11u64)).unwrap();
/// let public_key = keygen.create_public_key();
/// assert_eq!(public_key.n(), &BigUint::from(77u64));
/// assert_eq!(keygen.secret_key().lambda(), &BigUint::from(60u64));
/// ```
pub struct KeyGenerator {
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl KeyGenerator {

    /// Derive the key pair from primes `p` and `q`.
    pub fn new(p: &BigUint, q: &BigUint) -> Result<Self> {
        let two = BigUint::from(2u64);
        if p < &two || q < &two {
            return Err(Error::InvalidModulus("primes must be at least two"));
        }
        if p == q {
            return Err(Error::InvalidModulus("primes must be distinct"));
        }
        let n = p * q;
        let lambda = (p - BigUint::one()) * (q - BigUint::one());
        let public_key = PublicKey::from_modulus(n.clone())?;
        info!(
            modulus_bits = n.bits(),
            fingerprint = %util::hash::short_hex(&public_key.fingerprint()),
            "generated key pair"
        );
        Ok(Self {
            public_key,
            secret_key: SecretKey::from_members(lambda, n),
        })
    }

    /// Shortcut for machine-sized primes.
    pub fn from_u64(p: u64, q: u64) -> Result<Self> {
        Self::new(&BigUint::from(p), &BigUint::from(q))
    }

    /// Creates the [PublicKey] to hand to encrypting and evaluating parties.
    pub fn create_public_key(&self) -> PublicKey {
        self.public_key.clone()
    }

    /// The [SecretKey]. Keep it with the decrypting party.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Consume the generator, returning both keys.
    pub fn into_keys(self) -> (PublicKey, SecretKey) {
        (self.public_key, self.secret_key)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keygen() {
        let keygen = KeyGenerator::from_u64(7, 11).unwrap();
        let pk = keygen.create_public_key();
        assert_eq!(pk.n(), &BigUint::from(77u64));
        assert_eq!(pk.g(), &BigUint::from(78u64));
        assert_eq!(pk.n_squared(), &BigUint::from(5929u64));
        assert!(pk.has_standard_generator());
        let sk = keygen.secret_key();
        assert_eq!(sk.lambda(), &BigUint::from(60u64));
        assert_eq!(sk.n(), pk.n());

        let keygen = KeyGenerator::from_u64(1000003, 1000033).unwrap();
        let (pk, sk) = keygen.into_keys();
        assert_eq!(pk.n(), &BigUint::from(1000036000099u64));
        assert_eq!(sk.lambda(), &BigUint::from(1000002u64 * 1000032));
    }

    #[test]
    fn test_keygen_rejects_degenerate_pairs() {
        assert!(matches!(KeyGenerator::from_u64(7, 7), Err(Error::InvalidModulus(_))));
        assert!(matches!(KeyGenerator::from_u64(1, 11), Err(Error::InvalidModulus(_))));
        assert!(matches!(KeyGenerator::from_u64(7, 0), Err(Error::InvalidModulus(_))));
        // Composite values are the caller's responsibility.
        assert!(KeyGenerator::from_u64(4, 9).is_ok());
    }

    #[test]
    fn test_public_key_members() {
        assert!(PublicKey::from_modulus(BigUint::from(1u64)).is_err());
        let pk = PublicKey::from_members(BigUint::from(77u64), BigUint::from(5u64)).unwrap();
        assert!(!pk.has_standard_generator());
        let other = PublicKey::from_modulus(BigUint::from(77u64)).unwrap();
        assert_ne!(pk.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_secret_key_debug_redacted() {
        let keygen = KeyGenerator::from_u64(7, 11).unwrap();
        let printed = format!("{:?}", keygen.secret_key());
        assert!(printed.contains("redacted"));
        assert!(!printed.contains("60"));
    }
}

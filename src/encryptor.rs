use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::{One, Zero};
use tracing::debug;

use crate::{
    util,
    Ciphertext, PublicKey, SecretKey, ScoreVector, ValCheck,
    Error, Result,
};

/// Both ciphertext sets produced by one encryption session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedInstance {
    /// `E(x[j] + r)` for each user feature.
    pub user: Vec<Ciphertext>,
    /// `E(W[i][j])` for each class row and feature.
    pub cloud: Vec<Vec<Ciphertext>>,
}

/// Encrypts plaintext integers into [Ciphertext] objects.
///
/// Encryption of `m` under blinding factor `r` is `g^m * r^n mod n^2`.
/// The user vector is encrypted with the blinding factor also added to the
/// message, `E(x + r)`, while the cloud matrix is encrypted as is. Both use
/// the same `r`, so `r^n mod n^2` is computed once per session.
///
/// ## Generator shortcut
/// With the standard generator `g = n + 1` the power `g^m mod n^2` equals
/// `1 + (m mod n) * n`, which avoids one exponentiation per value. Any other
/// generator goes through modular exponentiation. Both give the same result.
///
/// ```rust
/// use std::sync::Arc;
/// use hyperplane::*;
/// let keygen = KeyGenerator::from_u64(7, 11).unwrap();
/// let public_key = Arc::new(keygen.create_public_key());
/// let encryptor = Encryptor::new(public_key.clone());
/// let decryptor = Decryptor::new(public_key, keygen.secret_key().clone()).unwrap();
/// let r = BigUint::from(2u64);
/// let cipher = encryptor.encrypt_value(&BigUint::from(5u64), &r);
/// assert_eq!(decryptor.decrypt(&cipher).unwrap(), BigUint::from(5u64));
/// ```
pub struct Encryptor {
    public_key: Arc<PublicKey>,
}

impl Encryptor {

    /// Creates a new Encryptor for the given public key.
    pub fn new(public_key: Arc<PublicKey>) -> Self {
        Self { public_key }
    }

    /// Get the public key used by the encryptor.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    fn generator_power(&self, m: &BigUint) -> BigUint {
        let pk = &self.public_key;
        if pk.has_standard_generator() {
            (BigUint::one() + (m % pk.n()) * pk.n()) % pk.n_squared()
        } else {
            util::exponentiate_mod(pk.g(), m, pk.n_squared())
        }
    }

    fn blinding_power(&self, r: &BigUint) -> BigUint {
        util::exponentiate_mod(r, self.public_key.n(), self.public_key.n_squared())
    }

    fn encrypt_internal(&self, m: &BigUint, blinding_power: &BigUint) -> Ciphertext {
        let gm = self.generator_power(m);
        Ciphertext::new(util::multiply_mod(&gm, blinding_power, self.public_key.n_squared()))
    }

    /// Encrypt a single value: `g^m * r^n mod n^2`.
    pub fn encrypt_value(&self, m: &BigUint, r: &BigUint) -> Ciphertext {
        self.encrypt_internal(m, &self.blinding_power(r))
    }

    /// Encrypt the user's vector, each entry shifted by the blinding factor: `E(x[j] + r)`.
    pub fn encrypt_user(&self, x: &[BigUint], r: &BigUint) -> Vec<Ciphertext> {
        let rn = self.blinding_power(r);
        x.iter().map(|xj| self.encrypt_internal(&(xj + r), &rn)).collect()
    }

    /// Encrypt the cloud's weight matrix: `E(W[i][j])`. All rows must have equal length.
    pub fn encrypt_cloud(&self, w: &[Vec<BigUint>], r: &BigUint) -> Result<Vec<Vec<Ciphertext>>> {
        let dims = w.first().map_or(0, |row| row.len());
        check_rectangular(w, dims)?;
        let rn = self.blinding_power(r);
        Ok(w.iter()
            .map(|row| row.iter().map(|wij| self.encrypt_internal(wij, &rn)).collect())
            .collect())
    }

    /// Encrypt the user vector and the cloud matrix under one blinding factor.
    /// Every row of `w` must have the length of `x`.
    pub fn encrypt(&self, x: &[BigUint], w: &[Vec<BigUint>], r: &BigUint) -> Result<EncryptedInstance> {
        check_rectangular(w, x.len())?;
        let user = self.encrypt_user(x, r);
        let cloud = self.encrypt_cloud(w, r)?;
        debug!(classes = cloud.len(), dims = user.len(), "encrypted instance");
        Ok(EncryptedInstance { user, cloud })
    }

}

pub(crate) fn check_rectangular<T>(rows: &[Vec<T>], dims: usize) -> Result<()> {
    if rows.iter().any(|row| row.len() != dims) {
        return Err(Error::InvalidDimension {
            classes: rows.len(),
            dims,
            reason: "row length differs from vector length",
        });
    }
    Ok(())
}

/// Decrypts [Ciphertext] objects into plaintext integers.
///
/// For a ciphertext `c`, computes `u = (c^lambda mod n^2) - 1`,
/// `L = floor(u / n)` and returns `L * lambda^-1 mod n`. The inverse of
/// lambda is computed once on construction.
pub struct Decryptor {
    public_key: Arc<PublicKey>,
    secret_key: SecretKey,
    lambda_inverse: BigUint,
}

impl Decryptor {

    /// Creates a new Decryptor. Fails with [Error::NotInvertible] if lambda
    /// has no inverse modulo `n`, which only happens for malformed keys.
    ///
    /// Decryption by `lambda^-1` is only correct for the generator `n + 1`;
    /// any other public key fails with [Error::InvalidPublicKey].
    pub fn new(public_key: Arc<PublicKey>, secret_key: SecretKey) -> Result<Self> {
        if !public_key.is_valid_for(&public_key) {
            return Err(Error::InvalidPublicKey("generator must be n + 1"));
        }
        if secret_key.n() != public_key.n() {
            return Err(Error::InvalidModulus("secret key does not match public key"));
        }
        let lambda_inverse = util::try_invert_mod(secret_key.lambda(), public_key.n())?;
        Ok(Self { public_key, secret_key, lambda_inverse })
    }

    /// Get the public key used by the decryptor.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Decrypt one ciphertext.
    pub fn decrypt(&self, encrypted: &Ciphertext) -> Result<BigUint> {
        let n = self.public_key.n();
        let n_squared = self.public_key.n_squared();
        if encrypted.value() >= n_squared {
            return Err(Error::InvalidCiphertext("value outside [0, n^2)"));
        }
        let x = util::exponentiate_mod(encrypted.value(), self.secret_key.lambda(), n_squared);
        if x.is_zero() {
            return Err(Error::InvalidCiphertext("not a unit modulo n"));
        }
        let l = util::floor_div(&(x - BigUint::one()), n)?;
        Ok(util::multiply_mod(&l, &self.lambda_inverse, n))
    }

    /// Decrypt every ciphertext, in order.
    pub fn decrypt_all(&self, encrypted: &[Ciphertext]) -> Result<ScoreVector> {
        let scores = encrypted.iter()
            .map(|c| self.decrypt(c))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = scores.len(), "decrypted scores");
        Ok(scores)
    }

}

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::One;
use tracing::debug;

use crate::{
    encryptor::check_rectangular,
    util, Ciphertext, PublicKey, ValCheck, Error, Result,
};

/// Combines ciphertexts without access to the secret key.
///
/// The classification step raises each user ciphertext to the integer value
/// of the matching cloud ciphertext and multiplies the results across a row:
///
/// `C[i] = prod_j UserCipher[j] ^ CloudCipher[i][j] mod n^2`
///
/// The exponent is a ciphertext representative, not a plaintext, so this is
/// not the textbook encrypted dot product. Decrypting `C[i]` yields
/// `sum_j (x[j] + r) * CloudCipher[i][j] mod n`. Every intermediate value is
/// reduced modulo `n^2`, which gives the same result as reducing once at the
/// end.
pub struct Evaluator {
    public_key: Arc<PublicKey>,
}

impl Evaluator {

    /// Creates a new Evaluator for the given public key.
    pub fn new(public_key: Arc<PublicKey>) -> Self {
        Self { public_key }
    }

    /// Get the public key used by the evaluator.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// `base ^ exponent mod n^2`, using the exponent's integer value.
    pub fn exponentiate(&self, base: &Ciphertext, exponent: &Ciphertext) -> Ciphertext {
        Ciphertext::new(util::exponentiate_mod(base.value(), exponent.value(), self.public_key.n_squared()))
    }

    /// `a * b mod n^2`. Decrypts to the sum of the two plaintexts.
    pub fn multiply(&self, a: &Ciphertext, b: &Ciphertext) -> Ciphertext {
        Ciphertext::new(util::multiply_mod(a.value(), b.value(), self.public_key.n_squared()))
    }

    /// Combine one class row with the user ciphertexts.
    pub fn combine_row(&self, user: &[Ciphertext], row: &[Ciphertext]) -> Result<Ciphertext> {
        if user.len() != row.len() {
            return Err(Error::InvalidDimension {
                classes: 1,
                dims: user.len(),
                reason: "row length differs from vector length",
            });
        }
        let n_squared = self.public_key.n_squared();
        let combined = user.iter().zip(row)
            .map(|(u, c)| util::exponentiate_mod(u.value(), c.value(), n_squared))
            .fold(BigUint::one(), |acc, term| util::multiply_mod(&acc, &term, n_squared));
        Ok(Ciphertext::new(combined))
    }

    /// Combine every class row, producing one ciphertext per class.
    pub fn evaluate(&self, user: &[Ciphertext], cloud: &[Vec<Ciphertext>]) -> Result<Vec<Ciphertext>> {
        check_rectangular(cloud, user.len())?;
        let pk = self.public_key.as_ref();
        if !user.is_valid_for(pk) || !cloud.iter().all(|row| row.is_valid_for(pk)) {
            return Err(Error::InvalidCiphertext("operand not valid for public key"));
        }
        let combined = cloud.iter()
            .map(|row| self.combine_row(user, row))
            .collect::<Result<Vec<_>>>()?;
        debug!(classes = combined.len(), dims = user.len(), "combined class ciphertexts");
        Ok(combined)
    }

}

use num_bigint::BigUint;

/// The user's feature vector: `d` non-negative integers.
pub type PlainVector = Vec<BigUint>;

/// The cloud's weights: `l` rows of `d` non-negative integers, one row per class.
pub type PlainMatrix = Vec<Vec<BigUint>>;

/// Decrypted per-class scores.
pub type ScoreVector = Vec<BigUint>;

/// Build a [PlainVector] from machine integers.
pub fn plain_vector(values: &[u64]) -> PlainVector {
    values.iter().map(|&x| BigUint::from(x)).collect()
}

/// Build a [PlainMatrix] from rows of machine integers.
pub fn plain_matrix(rows: &[Vec<u64>]) -> PlainMatrix {
    rows.iter().map(|row| plain_vector(row)).collect()
}

/// Struct to store one encrypted scalar.
///
/// The value is an integer in `[0, n^2)` for the public key it was produced
/// under. Ciphertexts carry no ordering: comparing two of them says nothing
/// about the plaintexts. Only decryption or further homomorphic combination
/// is meaningful.
///
/// See [crate::ValCheck] to verify that a ciphertext received from
/// elsewhere lies in the ciphertext space of a key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ciphertext {
    value: BigUint,
}

impl Ciphertext {

    /// Wrap a raw integer. No range check is performed.
    pub fn new(value: BigUint) -> Self {
        Self { value }
    }

    /// The integer representative.
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    /// Number of significant bits of the representative.
    pub fn bits(&self) -> u64 {
        self.value.bits()
    }

}

impl From<BigUint> for Ciphertext {
    fn from(value: BigUint) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

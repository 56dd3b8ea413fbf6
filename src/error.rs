use thiserror::Error;

/// Errors raised by the classification pipeline.
///
/// None of these are recovered internally: each one means the run would
/// otherwise produce a wrong class without noticing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Number of classes or dimensions below the minimum, or ragged input.
    #[error("invalid dimension: {classes} classes x {dims} dims ({reason})")]
    InvalidDimension {
        /// Number of classes (rows) seen.
        classes: usize,
        /// Number of dimensions (columns) seen.
        dims: usize,
        /// What was wrong with the shape.
        reason: &'static str,
    },

    /// A modular inverse does not exist. Indicates a malformed key.
    #[error("value is not invertible modulo {modulus}")]
    NotInvertible {
        /// Decimal rendering of the modulus.
        modulus: String,
    },

    /// The classifier received no scores.
    #[error("empty score vector")]
    EmptyInput,

    /// The prime pair cannot form a modulus (p or q below 2, or p == q),
    /// or an arithmetic helper was given a zero divisor.
    #[error("invalid modulus: {0}")]
    InvalidModulus(&'static str),

    /// The public key cannot be used for decryption: its generator is not
    /// `n + 1` or its cached members are inconsistent.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(&'static str),

    /// A run parameter is out of range, such as a zero-bit blinding bound.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// A ciphertext lies outside [0, n^2) or is not a unit modulo n.
    #[error("invalid ciphertext: {0}")]
    InvalidCiphertext(&'static str),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

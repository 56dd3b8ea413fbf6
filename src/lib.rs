//! Hyperplane classification over Paillier ciphertexts.
//!
//! A user holds a feature vector `x`, a cloud holds one weight vector per
//! class `W[i]`. Both are encrypted under the same public key and blinding
//! factor, combined class by class without the secret key, and only the
//! per-class scores are decrypted. The decision is the index of the largest
//! score.
//!
//! The pipeline, leaf-first:
//! - [KeyGenerator] derives a [PublicKey] and [SecretKey] from two primes.
//! - [BlindingSource] draws a blinding factor invertible modulo `n`.
//! - [Encryptor] encrypts the user vector and the cloud matrix.
//! - [Evaluator] combines them into one [Ciphertext] per class.
//! - [Decryptor] recovers the scores, and [argmax] picks the class.
//!
//! [Protocol] runs all of the above in order.
//!
//! ```rust
//! use hyperplane::*;
//! let parms = ProtocolParameters::new(3, 4).unwrap();
//! let mut rng = BlakeRNGFactory::from_seed(PRNGSeed::from_u64(7)).get_rng();
//! let (user, cloud) = shortcut::random_instance(&parms, &mut rng);
//! let protocol = Protocol::from_primes(1009, 1013, parms).unwrap();
//! let transcript = protocol.run(&user, &cloud, &mut rng).unwrap();
//! assert_eq!(transcript.combined_cipher.len(), 3);
//! assert!(transcript.class < 3);
//! ```
//!
//! Primality of the input primes is the caller's responsibility, and so is
//! the quality of the entropy behind the random generator.

#![warn(missing_docs)]

mod error;
mod key;
mod text;
mod encryptor;
mod evaluator;
mod valcheck;
mod serialize_serde;

pub mod classifier;
pub mod perf_utils;
pub mod protocol;
pub mod shortcut;
pub mod util;

pub use num_bigint::BigUint;

pub use error::{Error, Result};
pub use key::{KeyGenerator, PublicKey, SecretKey};
pub use text::{Ciphertext, PlainMatrix, PlainVector, ScoreVector, plain_matrix, plain_vector};
pub use encryptor::{Decryptor, EncryptedInstance, Encryptor};
pub use evaluator::Evaluator;
pub use valcheck::ValCheck;
pub use classifier::argmax;
pub use protocol::{Protocol, ProtocolParameters, Transcript};
pub use util::{BlakeRNG, BlakeRNGFactory, BlindingSource, PRNGSeed};

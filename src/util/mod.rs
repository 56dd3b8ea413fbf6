//! Provide arithmetic and randomness utilities.
//!
//! The utility objects in this submodule are not documented.
//! Use at your own risk.
#![allow(missing_docs)]

mod number_theory;
mod random_generator;
pub mod hash;

// gather utilities in this module
pub use number_theory::*;
pub use random_generator::{
    BlakeRNGFactory, BlakeRNG, PRNGSeed, BlindingSource,
    DEFAULT_BLINDING_BOUND_BITS, PRNG_SEED_BYTES,
};

//! Convenience constructors for the two parties and a random instance source.

use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::{
    Decryptor, Encryptor, Evaluator, KeyGenerator, PublicKey,
    PlainMatrix, PlainVector, ProtocolParameters, Result,
};

/// Inclusive range of the generated feature and weight values.
pub const INSTANCE_VALUE_RANGE: std::ops::RangeInclusive<u64> = 1..=100;

/// Create the utilities suite for the key-owning (encrypting/decrypting) party.
pub fn create_decryptor_suite(keygen: KeyGenerator) -> Result<(Arc<PublicKey>, Encryptor, Decryptor)> {
    let (public_key, secret_key) = keygen.into_keys();
    let public_key = Arc::new(public_key);
    let encryptor = Encryptor::new(public_key.clone());
    let decryptor = Decryptor::new(public_key.clone(), secret_key)?;
    Ok((public_key, encryptor, decryptor))
}

/// Create the utilities suite for the HE evaluation party.
pub fn create_evaluator_suite(public_key: Arc<PublicKey>) -> Evaluator {
    Evaluator::new(public_key)
}

/// Sample a user vector and a cloud matrix of the configured shape, with
/// entries drawn uniformly from [INSTANCE_VALUE_RANGE].
pub fn random_instance<R: RngCore + ?Sized>(parms: &ProtocolParameters, rng: &mut R) -> (PlainVector, PlainMatrix) {
    let sample_row = |rng: &mut R| -> Vec<u64> {
        (0..parms.dims()).map(|_| rng.gen_range(INSTANCE_VALUE_RANGE)).collect()
    };
    let user = sample_row(rng);
    let cloud = (0..parms.classes()).map(|_| sample_row(rng)).collect::<Vec<_>>();
    (crate::plain_vector(&user), crate::plain_matrix(&cloud))
}

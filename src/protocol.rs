//! End-to-end classification run: blind, encrypt, evaluate, decrypt, decide.

use std::sync::Arc;

use num_bigint::BigUint;
use rand::RngCore;
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::{
    classifier, encryptor::check_rectangular, serialize_serde::decimal_seq, shortcut,
    util::{self, BlindingSource, DEFAULT_BLINDING_BOUND_BITS},
    Ciphertext, Decryptor, Encryptor, Evaluator, KeyGenerator, PublicKey, ScoreVector,
    Error, Result,
};

/// Smallest accepted number of classes.
pub const MIN_CLASSES: usize = 2;
/// Smallest accepted vector dimension.
pub const MIN_DIMS: usize = 2;

/// Shape of a classification instance and the blinding bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    classes: usize,
    dims: usize,
    blinding_bound_bits: u64,
}

impl ProtocolParameters {

    /// Creates parameters for `classes` hyperplanes over `dims` features.
    pub fn new(classes: usize, dims: usize) -> Result<Self> {
        check_dimensions(classes, dims)?;
        Ok(Self { classes, dims, blinding_bound_bits: DEFAULT_BLINDING_BOUND_BITS })
    }

    /// Set the bit bound of blinding factor candidates. Zero bits fail with
    /// [Error::InvalidParameter].
    pub fn set_blinding_bound_bits(mut self, bits: u64) -> Result<Self> {
        self.blinding_bound_bits = BlindingSource::new(bits)?.bound_bits();
        Ok(self)
    }

    /// Number of classes `l`.
    pub fn classes(&self) -> usize {self.classes}

    /// Vector dimension `d`.
    pub fn dims(&self) -> usize {self.dims}

    /// Bit bound of blinding factor candidates.
    pub fn blinding_bound_bits(&self) -> u64 {self.blinding_bound_bits}

    /// Blinding source for the configured bound. Parameters loaded through
    /// serde are checked here.
    pub fn blinding_source(&self) -> Result<BlindingSource> {
        check_dimensions(self.classes, self.dims)?;
        BlindingSource::new(self.blinding_bound_bits)
    }

}

fn check_dimensions(classes: usize, dims: usize) -> Result<()> {
    if classes < MIN_CLASSES {
        return Err(Error::InvalidDimension { classes, dims, reason: "need at least two classes" });
    }
    if dims < MIN_DIMS {
        return Err(Error::InvalidDimension { classes, dims, reason: "need at least two dimensions" });
    }
    Ok(())
}

/// Everything a run produces, in the order the parties see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// The encrypted, blinded user vector.
    pub user_cipher: Vec<Ciphertext>,
    /// One combined ciphertext per class.
    pub combined_cipher: Vec<Ciphertext>,
    /// Decrypted per-class scores.
    #[serde(with = "decimal_seq")]
    pub scores: ScoreVector,
    /// Index of the chosen class.
    pub class: usize,
}

/// Runs the classification pipeline for one key pair.
///
/// ```rust
/// use hyperplane::*;
/// use rand::SeedableRng;
/// let parms = ProtocolParameters::new(2, 2).unwrap();
/// let protocol = Protocol::from_primes(7, 11, parms).unwrap();
/// let mut rng = BlakeRNG::from_seed(PRNGSeed::from_u64(1));
/// let transcript = protocol.run(
///     &plain_vector(&[4, 9]),
///     &plain_matrix(&[vec![2, 3], vec![10, 1]]),
///     &mut rng,
/// ).unwrap();
/// assert_eq!(transcript.class, 0);
/// ```
pub struct Protocol {
    parms: ProtocolParameters,
    public_key: Arc<PublicKey>,
    encryptor: Encryptor,
    evaluator: Evaluator,
    decryptor: Decryptor,
    blinding: BlindingSource,
}

impl Protocol {

    /// Set up both parties from a key generator. Instances passed to
    /// [Protocol::run] must have the shape given by `parms`.
    pub fn new(parms: ProtocolParameters, keygen: KeyGenerator) -> Result<Self> {
        let blinding = parms.blinding_source()?;
        let (public_key, encryptor, decryptor) = shortcut::create_decryptor_suite(keygen)?;
        let evaluator = shortcut::create_evaluator_suite(public_key.clone());
        Ok(Self { parms, public_key, encryptor, evaluator, decryptor, blinding })
    }

    /// Shortcut for machine-sized primes.
    pub fn from_primes(p: u64, q: u64, parms: ProtocolParameters) -> Result<Self> {
        Self::new(parms, KeyGenerator::from_u64(p, q)?)
    }

    /// The parameters the protocol was set up with.
    pub fn parameters(&self) -> &ProtocolParameters {
        &self.parms
    }

    /// The public key shared by both parties.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Draw a fresh blinding factor from `rng` and run the pipeline.
    /// Dimensions are checked before any randomness is consumed.
    pub fn run<R: RngCore + ?Sized>(&self, user: &[BigUint], cloud: &[Vec<BigUint>], rng: &mut R) -> Result<Transcript> {
        self.check_instance(user, cloud)?;
        let r = self.blinding.sample(self.public_key.n(), rng);
        self.run_blinded(user, cloud, &r)
    }

    /// Run the pipeline with a caller-chosen blinding factor, which must be
    /// invertible modulo `n`.
    pub fn run_with_blinding(&self, user: &[BigUint], cloud: &[Vec<BigUint>], r: &BigUint) -> Result<Transcript> {
        self.check_instance(user, cloud)?;
        if !util::are_coprime(r, self.public_key.n()) {
            return Err(Error::NotInvertible { modulus: self.public_key.n().to_string() });
        }
        self.run_blinded(user, cloud, r)
    }

    fn check_instance(&self, user: &[BigUint], cloud: &[Vec<BigUint>]) -> Result<()> {
        check_dimensions(cloud.len(), user.len())?;
        check_rectangular(cloud, user.len())?;
        if cloud.len() != self.parms.classes() || user.len() != self.parms.dims() {
            return Err(Error::InvalidDimension {
                classes: cloud.len(),
                dims: user.len(),
                reason: "instance shape differs from parameters",
            });
        }
        Ok(())
    }

    fn run_blinded(&self, user: &[BigUint], cloud: &[Vec<BigUint>], r: &BigUint) -> Result<Transcript> {
        let encrypted = self.encryptor.encrypt(user, cloud, r)?;
        let combined_cipher = self.evaluator.evaluate(&encrypted.user, &encrypted.cloud)?;
        let scores = self.decryptor.decrypt_all(&combined_cipher)?;
        let class = classifier::argmax(&scores)?;
        info!(class, classes = cloud.len(), dims = user.len(), "classification complete");
        Ok(Transcript { user_cipher: encrypted.user, combined_cipher, scores, class })
    }

}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use crate::{plain_vector, plain_matrix, util::{BlakeRNG, PRNGSeed}};

    use super::*;

    fn big(x: u64) -> BigUint {
        BigUint::from(x)
    }

    fn toy_protocol() -> Protocol {
        Protocol::from_primes(7, 11, ProtocolParameters::new(2, 2).unwrap()).unwrap()
    }

    #[test]
    fn test_parameters() {
        let parms = ProtocolParameters::new(2, 3).unwrap().set_blinding_bound_bits(64).unwrap();
        assert_eq!((parms.classes(), parms.dims(), parms.blinding_bound_bits()), (2, 3, 64));
        assert_eq!(parms.blinding_source().unwrap().bound_bits(), 64);
        assert!(matches!(ProtocolParameters::new(1, 3), Err(Error::InvalidDimension { .. })));
        assert!(matches!(ProtocolParameters::new(2, 1), Err(Error::InvalidDimension { .. })));
        let text = serde_json::to_string(&parms).unwrap();
        assert_eq!(serde_json::from_str::<ProtocolParameters>(&text).unwrap(), parms);
    }

    #[test]
    fn test_zero_blinding_bound_rejected() {
        let parms = ProtocolParameters::new(2, 2).unwrap();
        assert!(matches!(parms.set_blinding_bound_bits(0), Err(Error::InvalidParameter(_))));
        // Deserialized parameters skip the setter and are checked on use.
        let loaded: ProtocolParameters =
            serde_json::from_str(r#"{"classes":2,"dims":2,"blinding_bound_bits":0}"#).unwrap();
        assert!(matches!(loaded.blinding_source(), Err(Error::InvalidParameter(_))));
        let keygen = KeyGenerator::from_u64(7, 11).unwrap();
        assert!(matches!(Protocol::new(loaded, keygen), Err(Error::InvalidParameter(_))));
        let loaded: ProtocolParameters =
            serde_json::from_str(r#"{"classes":1,"dims":2,"blinding_bound_bits":8}"#).unwrap();
        assert!(matches!(Protocol::from_primes(7, 11, loaded), Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_instance_shape_follows_parameters() {
        let protocol = Protocol::from_primes(7, 11, ProtocolParameters::new(3, 2).unwrap()).unwrap();
        assert_eq!(protocol.parameters().classes(), 3);
        let mut rng = BlakeRNG::from_seed(PRNGSeed::from_u64(4));
        let result = protocol.run(&plain_vector(&[4, 9]), &plain_matrix(&[vec![2, 3], vec![10, 1]]), &mut rng);
        assert!(matches!(result, Err(Error::InvalidDimension { classes: 2, dims: 2, .. })));
        let result = protocol.run_with_blinding(
            &plain_vector(&[4, 9, 1]),
            &plain_matrix(&[vec![2, 3, 1], vec![10, 1, 1], vec![5, 5, 5]]),
            &big(2),
        );
        assert!(matches!(result, Err(Error::InvalidDimension { classes: 3, dims: 3, .. })));
        let transcript = protocol.run(
            &plain_vector(&[4, 9]),
            &plain_matrix(&[vec![2, 3], vec![10, 1], vec![5, 5]]),
            &mut rng,
        ).unwrap();
        assert_eq!(transcript.scores.len(), 3);
    }

    #[test]
    fn test_known_transcript() {
        let protocol = toy_protocol();
        let transcript = protocol.run_with_blinding(
            &plain_vector(&[4, 9]),
            &plain_matrix(&[vec![2, 3], vec![10, 1]]),
            &big(2),
        ).unwrap();
        assert_eq!(transcript.user_cipher, vec![Ciphertext::new(big(249)), Ciphertext::new(big(1250))]);
        assert_eq!(transcript.combined_cipher, vec![Ciphertext::new(big(751)), Ciphertext::new(big(2025))]);
        assert_eq!(transcript.scores, vec![big(75), big(75)]);
        assert_eq!(transcript.class, 0);
    }

    #[test]
    fn test_class_independent_of_blinding() {
        let protocol = toy_protocol();
        let user = plain_vector(&[4, 9]);
        let cloud = plain_matrix(&[vec![2, 3], vec![10, 1]]);
        let factory = util::BlakeRNGFactory::new();
        let mut ciphertexts = vec![];
        for _ in 0..20 {
            let mut rng = factory.get_rng();
            let transcript = protocol.run(&user, &cloud, &mut rng).unwrap();
            assert_eq!(transcript.class, 0);
            // Every cloud ciphertext is congruent to r^n modulo n, so all classes score alike.
            assert!(transcript.scores.iter().all(|s| s == &transcript.scores[0]));
            ciphertexts.push(transcript.user_cipher);
        }
        ciphertexts.sort_by(|a, b| a[0].value().cmp(b[0].value()));
        ciphertexts.dedup();
        assert!(ciphertexts.len() > 1);
    }

    #[test]
    fn test_seeded_run_is_reproducible() {
        let protocol = Protocol::from_primes(7, 11, ProtocolParameters::new(3, 3).unwrap()).unwrap();
        let user = plain_vector(&[17, 3, 58]);
        let cloud = plain_matrix(&[vec![2, 3, 4], vec![10, 1, 7], vec![5, 5, 5]]);
        let mut rng1 = BlakeRNG::from_seed(PRNGSeed::from_u64(42));
        let mut rng2 = BlakeRNG::from_seed(PRNGSeed::from_u64(42));
        let t1 = protocol.run(&user, &cloud, &mut rng1).unwrap();
        let t2 = protocol.run(&user, &cloud, &mut rng2).unwrap();
        assert_eq!(t1, t2);
        assert_eq!(t1.combined_cipher.len(), 3);
    }

    #[test]
    fn test_dimension_checked_before_blinding() {
        let protocol = toy_protocol();
        let mut rng = BlakeRNG::from_seed(PRNGSeed::from_u64(3));
        let mut untouched = BlakeRNG::from_seed(PRNGSeed::from_u64(3));
        let result = protocol.run(&plain_vector(&[4]), &plain_matrix(&[vec![1], vec![2]]), &mut rng);
        assert!(matches!(result, Err(Error::InvalidDimension { classes: 2, dims: 1, .. })));
        let result = protocol.run(&plain_vector(&[4, 9]), &plain_matrix(&[vec![1, 2]]), &mut rng);
        assert!(matches!(result, Err(Error::InvalidDimension { classes: 1, dims: 2, .. })));
        let result = protocol.run(&plain_vector(&[4, 9]), &plain_matrix(&[vec![1, 2], vec![3]]), &mut rng);
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
        // No candidate was drawn.
        assert_eq!(rng.next_u64(), untouched.next_u64());
    }

    #[test]
    fn test_non_coprime_blinding_rejected() {
        let protocol = toy_protocol();
        let result = protocol.run_with_blinding(
            &plain_vector(&[4, 9]),
            &plain_matrix(&[vec![2, 3], vec![10, 1]]),
            &big(14),
        );
        assert!(matches!(result, Err(Error::NotInvertible { .. })));
    }

    #[test]
    fn test_transcript_json() {
        let protocol = toy_protocol();
        let transcript = protocol.run_with_blinding(
            &plain_vector(&[4, 9]),
            &plain_matrix(&[vec![2, 3], vec![10, 1]]),
            &big(2),
        ).unwrap();
        let text = serde_json::to_string(&transcript).unwrap();
        assert_eq!(
            text,
            r#"{"user_cipher":["249","1250"],"combined_cipher":["751","2025"],"scores":["75","75"],"class":0}"#
        );
        assert_eq!(serde_json::from_str::<Transcript>(&text).unwrap(), transcript);
    }
}

use itertools::Itertools;
use sha2::Digest;

const HASH_BLOCK_BYTES: usize = 32;

pub type HashBlock = [u8; HASH_BLOCK_BYTES];

#[inline]
pub fn hash(input: &[u8]) -> HashBlock {
    let mut hasher = sha2::Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Short hex rendering of a hash block, for log lines.
pub fn short_hex(block: &HashBlock) -> String {
    block[..8].iter().map(|b| format!("{:02x}", b)).join("")
}

//! Arg-max decision over decrypted class scores.

use tracing::debug;

use crate::{Error, Result};

/// Index of the largest score. Ties go to the first maximum in scan order.
pub fn argmax<T: Ord>(scores: &[T]) -> Result<usize> {
    let mut best: Option<(usize, &T)> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((i, score)),
        }
    }
    let (index, _) = best.ok_or(Error::EmptyInput)?;
    debug!(class = index, classes = scores.len(), "selected class");
    Ok(index)
}

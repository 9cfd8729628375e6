//! Queue navigation
//!
//! Pure index arithmetic over the active queue. Kept free of engine state
//! so the zero- and one-length boundaries can be tested in isolation; naive
//! modulo pickers in this domain are a classic source of out-of-range
//! indices and infinite loops on empty queues.

use rand::Rng;

/// Next index in sequential order, or `None` at the end of the queue.
pub fn sequential_next(len: usize, index: usize) -> Option<usize> {
    if index + 1 < len { Some(index + 1) } else { None }
}

/// Previous index in sequential order, or `None` at the start.
pub fn sequential_previous(index: usize) -> Option<usize> {
    index.checked_sub(1)
}

/// Uniformly random index different from `index`.
///
/// Contract:
/// - `len == 0` returns `None` (nothing to pick)
/// - `len == 1` returns `Some(index)` (only choice)
/// - otherwise a uniform pick over the other `len - 1` indices, never
///   equal to `index`
pub fn random_other<R: Rng>(len: usize, index: usize, rng: &mut R) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(index),
        _ => {
            let pick = rng.gen_range(0..len - 1);
            // Skip over the current index so the distribution stays uniform
            Some(if pick >= index { pick + 1 } else { pick })
        }
    }
}

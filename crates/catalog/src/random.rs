//! Injectable randomness for candidate sampling.
//!
//! Discovery picks a random page and a random record from it. Routing those
//! draws through [`RandomSource`] keeps the client itself deterministic
//! under test: production wires in [`ThreadRandom`], tests wire in
//! [`SequenceRandom`] with a scripted draw order.

use std::collections::VecDeque;

use rand::Rng;

/// Character set for generated tokens (lowercase base-36)
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// A source of uniform random draws
pub trait RandomSource: Send {
    /// Pick an index uniformly from `0..len`. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Pick a value uniformly from `low..=high`
    fn pick_in_range(&mut self, low: u32, high: u32) -> u32;
}

/// Generate a short lowercase alphanumeric token from any source
pub fn alphanumeric_token(rng: &mut dyn RandomSource, len: usize) -> String {
    (0..len)
        .map(|_| TOKEN_ALPHABET[rng.pick_index(TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Production source backed by the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn pick_in_range(&mut self, low: u32, high: u32) -> u32 {
        rand::rng().random_range(low..=high)
    }
}

/// Deterministic source that replays a queue of prepared draws.
///
/// Each draw consumes one queued value, reduced into the requested range.
/// An exhausted queue keeps yielding zero, which maps to the first index
/// or the low end of the range.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: VecDeque<usize>,
}

impl SequenceRandom {
    /// Create a source that replays `values` in order
    pub fn new(values: impl IntoIterator<Item = usize>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    fn next_value(&mut self) -> usize {
        self.values.pop_front().unwrap_or(0)
    }
}

impl RandomSource for SequenceRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_value() % len
    }

    fn pick_in_range(&mut self, low: u32, high: u32) -> u32 {
        let span = u64::from(high) - u64::from(low) + 1;
        low + (self.next_value() as u64 % span) as u32
    }
}

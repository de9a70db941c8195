use crate::Generator;
use std::sync::atomic::{AtomicU64, Ordering};
use tinylink_core::shortcode::MIN_LENGTH;
use tinylink_core::ShortCode;

/// A deterministic generator producing sequential codes like "tl0000",
/// "tl0001", ..., "tl000z", "tl0010".
///
/// The counter is written in base62 and left-padded so that prefix plus
/// counter is at least six characters. The prefix must be alphanumeric and
/// short enough to keep codes within eight characters; this is not checked.
#[derive(Debug)]
pub struct SeqGenerator {
    counter: AtomicU64,
    prefix: String,
}

impl Clone for SeqGenerator {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGenerator {
    /// Creates a sequential generator with a custom prefix, starting at zero.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self::with_offset(prefix, 0)
    }

    /// Creates a sequential generator starting from a specific counter value.
    pub fn with_offset(prefix: impl Into<String>, offset: u64) -> Self {
        Self {
            counter: AtomicU64::new(offset),
            prefix: prefix.into(),
        }
    }
}

const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

fn encode_base62(mut value: u64, width: usize) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 62) as usize]);
        value /= 62;
    }
    while digits.len() < width {
        digits.push(b'0');
    }
    digits.iter().rev().map(|&b| b as char).collect()
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        let width = MIN_LENGTH.saturating_sub(self.prefix.len());
        ShortCode::new_unchecked(format!("{}{}", self.prefix, encode_base62(count, width)))
    }
}

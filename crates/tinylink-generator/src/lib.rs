pub mod random;
pub mod seq;

pub use random::RandomGenerator;
pub use seq::SeqGenerator;

use tinylink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// collision checks against existing records belong to the caller.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Draws the next candidate code.
    fn generate(&self) -> Self::Output;
}

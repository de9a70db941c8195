use crate::Generator;
use rand::Rng;
use tinylink_core::shortcode::ALPHABET;
use tinylink_core::ShortCode;

/// Length of the codes drawn by [`RandomGenerator`].
pub const RANDOM_CODE_LENGTH: usize = 6;

/// Draws codes uniformly from the 62-character alphanumeric alphabet.
///
/// Each character is an independent uniform draw, giving 62^6 possible codes.
/// Uniqueness is not guaranteed; callers are expected to check for
/// collisions and retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator;

impl RandomGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..RANDOM_CODE_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generates_valid_six_character_codes() {
        let generator = RandomGenerator::new();

        for _ in 0..1000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), RANDOM_CODE_LENGTH);
            assert!(ShortCode::is_valid_format(code.as_str()), "{code}");
        }
    }

    #[test]
    fn codes_are_not_constant() {
        let generator = RandomGenerator::new();
        let codes: HashSet<_> = (0..100).map(|_| generator.generate()).collect();

        // 100 draws from 62^6 colliding down to a handful would mean a broken rng
        assert!(codes.len() > 90);
    }

    #[test]
    fn draws_cover_the_whole_alphabet() {
        let generator = RandomGenerator::new();
        let mut seen = HashSet::new();

        for _ in 0..2000 {
            seen.extend(generator.generate().as_str().bytes());
        }

        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}

//! Random password generation and entropy estimation.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::CodecError;

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;
pub const MAX_COUNT: usize = 50;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>?/";
const AMBIGUOUS: &str = "il1Lo0O";

/// Which character classes a generated password draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
    /// Drop look-alike characters such as `l`, `1` and `O`.
    pub exclude_ambiguous: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            length: 16,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

impl PasswordPolicy {
    fn classes(&self) -> Vec<Vec<char>> {
        [
            (self.lowercase, LOWERCASE),
            (self.uppercase, UPPERCASE),
            (self.digits, DIGITS),
            (self.symbols, SYMBOLS),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, set)| {
            set.chars()
                .filter(|c| !self.exclude_ambiguous || !AMBIGUOUS.contains(*c))
                .collect()
        })
        .collect()
    }

    /// Generates one password containing at least one character of every
    /// enabled class.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, CodecError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.length) {
            return Err(CodecError::InvalidLength {
                length: self.length,
                min: MIN_LENGTH,
                max: MAX_LENGTH,
            });
        }

        let classes = self.classes();
        if classes.is_empty() {
            return Err(CodecError::EmptyCharset);
        }
        let pool: Vec<char> = classes.iter().flatten().copied().collect();

        let mut chars: Vec<char> = Vec::with_capacity(self.length);
        for class in &classes {
            chars.extend(class.choose(rng));
        }
        while chars.len() < self.length {
            chars.extend(pool.choose(rng));
        }
        chars.shuffle(rng);

        Ok(chars.into_iter().collect())
    }

    /// Generates `count` passwords; `count` is clamped to `1..=MAX_COUNT`.
    pub fn generate_many<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<String>, CodecError> {
        (0..count.clamp(1, MAX_COUNT))
            .map(|_| self.generate(rng))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    fn from_bits(bits: f64) -> Self {
        if bits < 36.0 {
            StrengthLevel::Weak
        } else if bits < 60.0 {
            StrengthLevel::Fair
        } else if bits < 128.0 {
            StrengthLevel::Strong
        } else {
            StrengthLevel::VeryStrong
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLevel::Weak => "weak",
            StrengthLevel::Fair => "fair",
            StrengthLevel::Strong => "strong",
            StrengthLevel::VeryStrong => "very strong",
        }
    }
}

/// Estimated strength of a password.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Strength {
    pub entropy_bits: f64,
    pub level: StrengthLevel,
}

impl Strength {
    /// `length × log2(pool)`, where the pool is the union of the character
    /// classes that appear in `password`.
    pub fn of(password: &str) -> Self {
        let has = |f: fn(&char) -> bool| password.chars().any(|c| f(&c));

        let mut pool = 0u32;
        if has(char::is_ascii_lowercase) {
            pool += 26;
        }
        if has(char::is_ascii_uppercase) {
            pool += 26;
        }
        if has(char::is_ascii_digit) {
            pool += 10;
        }
        if has(|c| c.is_ascii() && !c.is_ascii_alphanumeric()) {
            pool += 33;
        }
        if has(|c| !c.is_ascii()) {
            pool += 100;
        }

        let length = password.chars().count() as f64;
        let entropy_bits = if pool == 0 {
            0.0
        } else {
            (length * f64::from(pool).log2() * 100.0).round() / 100.0
        };

        Self {
            entropy_bits,
            level: StrengthLevel::from_bits(entropy_bits),
        }
    }
}

/// Shorthand for [`Strength::of`].
pub fn strength(password: &str) -> Strength {
    Strength::of(password)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_policy_covers_every_class() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let pw = PasswordPolicy::default().generate(&mut rng).unwrap();
            assert_eq!(pw.chars().count(), 16);
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()));
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
            assert!(pw.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn test_exclude_ambiguous() {
        let policy = PasswordPolicy {
            length: 128,
            exclude_ambiguous: true,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let pw = policy.generate(&mut rng).unwrap();
            assert!(!pw.chars().any(|c| AMBIGUOUS.contains(c)), "{}", pw);
        }
    }

    #[test]
    fn test_policy_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let short = PasswordPolicy {
            length: 3,
            ..Default::default()
        };
        assert_eq!(
            short.generate(&mut rng),
            Err(CodecError::InvalidLength {
                length: 3,
                min: MIN_LENGTH,
                max: MAX_LENGTH
            })
        );

        let empty = PasswordPolicy {
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
            ..Default::default()
        };
        assert_eq!(empty.generate(&mut rng), Err(CodecError::EmptyCharset));
    }

    #[test]
    fn test_generate_many_clamps_count() {
        let mut rng = StdRng::seed_from_u64(3);
        let policy = PasswordPolicy::default();
        assert_eq!(policy.generate_many(0, &mut rng).unwrap().len(), 1);
        assert_eq!(policy.generate_many(500, &mut rng).unwrap().len(), MAX_COUNT);
    }

    #[test]
    fn test_strength_levels() {
        assert_eq!(Strength::of("").entropy_bits, 0.0);
        assert_eq!(Strength::of("").level, StrengthLevel::Weak);
        // 6 × log2(10) ≈ 19.93
        assert_eq!(Strength::of("123456").level, StrengthLevel::Weak);
        // 10 × log2(62) ≈ 59.54
        assert_eq!(Strength::of("Passw0rdXy").level, StrengthLevel::Fair);
        // 16 × log2(95) ≈ 105.1
        assert_eq!(Strength::of("aB3$aB3$aB3$aB3$").level, StrengthLevel::Strong);
        assert_eq!(
            Strength::of(&"aB3$".repeat(8)).level,
            StrengthLevel::VeryStrong
        );
    }

    proptest! {
        #[test]
        fn prop_generated_length_matches_policy(seed in any::<u64>(), length in MIN_LENGTH..=MAX_LENGTH) {
            let mut rng = StdRng::seed_from_u64(seed);
            let policy = PasswordPolicy { length, ..Default::default() };
            let pw = policy.generate(&mut rng).unwrap();
            prop_assert_eq!(pw.chars().count(), length);
        }
    }
}

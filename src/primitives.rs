//! Leaf generators for primitive types.

use crate::error::GeneratorError;
use crate::generator::Generator;
use crate::shrink::{IntShrinker, Shrinker};

/// Generator for boolean values.
///
/// `true` shrinks to `false`; `false` is minimal.
#[derive(Debug, Clone)]
pub struct BoolGenerator;

impl Generator<bool> for BoolGenerator {
    fn sample(&self, rng: &mut dyn rand::RngCore, _size: usize) -> bool {
        use rand::Rng;
        rng.gen_bool(0.5)
    }

    fn shrink(&self, value: &bool) -> Box<dyn Iterator<Item = bool>> {
        if *value {
            Box::new(std::iter::once(false))
        } else {
            Box::new(std::iter::empty())
        }
    }
}

/// Create a generator for boolean values.
pub fn boolean() -> BoolGenerator {
    BoolGenerator
}

/// Generator for integers in `[min, max]`, with the sampled range clamped
/// by the size parameter: values are drawn uniformly from
/// `[min, min(max, min + size)]`.
#[derive(Debug, Clone)]
pub struct IntGenerator<T> {
    min: T,
    max: T,
}

impl<T> IntGenerator<T>
where
    T: Copy + PartialOrd + std::fmt::Display,
{
    /// Create a new integer generator, validating the range bounds.
    pub fn new(min: T, max: T) -> Result<Self, GeneratorError> {
        if min > max {
            return Err(GeneratorError::invalid_range(min, max));
        }
        Ok(Self { min, max })
    }
}

macro_rules! impl_int_generator {
    ($($t:ty),* $(,)?) => {
        $(
            impl Generator<$t> for IntGenerator<$t> {
                fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> $t {
                    use rand::Rng;
                    let reach = <$t>::try_from(size)
                        .ok()
                        .and_then(|s| self.min.checked_add(s))
                        .unwrap_or(self.max);
                    let upper = if reach < self.max { reach } else { self.max };
                    rng.gen_range(self.min..=upper)
                }

                fn shrink(&self, value: &$t) -> Box<dyn Iterator<Item = $t>> {
                    let min = self.min;
                    let max = self.max;
                    let candidates: Vec<$t> = IntShrinker
                        .shrink(value)
                        .filter(|c| min <= *c && *c <= max)
                        .collect();
                    Box::new(candidates.into_iter())
                }
            }
        )*
    };
}

impl_int_generator!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Create a generator for integers in `[min, max]`.
pub fn integer<T>(min: T, max: T) -> Result<IntGenerator<T>, GeneratorError>
where
    T: Copy + PartialOrd + std::fmt::Display,
{
    IntGenerator::new(min, max)
}

/// Generator for floating-point values in `[min, max]`, with the upper
/// bound scaled by `min(1, size / 100)`.
#[derive(Debug, Clone)]
pub struct FloatGenerator<T> {
    min: T,
    max: T,
}

macro_rules! impl_float_generator {
    ($($t:ty),* $(,)?) => {
        $(
            impl FloatGenerator<$t> {
                /// Create a new float generator, validating the range bounds.
                pub fn new(min: $t, max: $t) -> Result<Self, GeneratorError> {
                    if !min.is_finite() || !max.is_finite() || min > max {
                        return Err(GeneratorError::invalid_range(min, max));
                    }
                    Ok(Self { min, max })
                }
            }

            impl Generator<$t> for FloatGenerator<$t> {
                fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> $t {
                    use rand::Rng;
                    let scale = (size as $t / 100.0).min(1.0);
                    let upper = (self.max * scale).max(self.min);
                    rng.gen_range(self.min..=upper)
                }

                fn shrink(&self, value: &$t) -> Box<dyn Iterator<Item = $t>> {
                    let value = *value;
                    // Below this magnitude the value counts as already zero.
                    if value.abs() < 1e-9 {
                        return Box::new(std::iter::empty());
                    }

                    let mut candidates = Vec::new();
                    let half = value / 2.0;
                    if self.min <= half && half <= self.max {
                        candidates.push(half);
                    }
                    if self.min <= 0.0 && 0.0 <= self.max {
                        candidates.push(0.0);
                    }
                    Box::new(candidates.into_iter())
                }
            }
        )*
    };
}

impl_float_generator!(f32, f64);

/// Create a generator for floats in `[min, max]`.
pub fn float(min: f64, max: f64) -> Result<FloatGenerator<f64>, GeneratorError> {
    FloatGenerator::<f64>::new(min, max)
}

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generator for strings of random ASCII letters.
///
/// Length is `max(1, min(max_len, size))`, so even at `size == 0` the
/// generator produces a one-character string. Shrinking drops the trailing
/// character, one candidate per step.
#[derive(Debug, Clone)]
pub struct StringGenerator {
    max_len: usize,
}

impl StringGenerator {
    /// Create a new string generator, validating the maximum length.
    pub fn new(max_len: usize) -> Result<Self, GeneratorError> {
        if max_len == 0 {
            return Err(GeneratorError::InvalidLength { max_len });
        }
        Ok(Self { max_len })
    }
}

impl Generator<String> for StringGenerator {
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> String {
        use rand::Rng;
        let length = self.max_len.min(size).max(1);
        (0..length)
            .map(|_| LETTERS[rng.gen_range(0..LETTERS.len())] as char)
            .collect()
    }

    fn shrink(&self, value: &String) -> Box<dyn Iterator<Item = String>> {
        if value.is_empty() {
            return Box::new(std::iter::empty());
        }
        let mut shorter = value.clone();
        shorter.pop();
        Box::new(std::iter::once(shorter))
    }
}

/// Create a generator for strings of up to `max_len` random letters.
pub fn string(max_len: usize) -> Result<StringGenerator, GeneratorError> {
    StringGenerator::new(max_len)
}

//! # Minicheck - a property-based testing core
//!
//! Minicheck provides the engine underneath a property-based test harness:
//! composable generators that pair random sampling with shrinking, standalone
//! shrinkers for types without a generator at hand, and a shrink-to-fixpoint
//! search that minimizes a failing input to a locally-minimal counterexample.
//!
//! ## Quick Start
//!
//! ```rust
//! use minicheck::{Generator, Minimizer, create_seeded_rng, integer};
//!
//! let generator = integer(-1000i64, 1000).unwrap();
//! let mut rng = create_seeded_rng(42);
//!
//! // Sample a value; `size` scales the magnitude of what gets produced.
//! let value = generator.sample(&mut rng, 100);
//! assert!((-1000..=1000).contains(&value));
//!
//! // Minimize a failing input against a property.
//! let result = Minimizer::new()
//!     .minimize_with_generator(-738, |i: &i64| *i > -2, &generator)
//!     .unwrap();
//! assert_eq!(result.minimal, -2);
//! ```
//!
//! The harness wrapping user test functions, run counting, and reporting are
//! external concerns: this crate only produces sampled values and minimized
//! counterexamples.

pub mod combinators;
pub mod error;
pub mod generator;
pub mod primitives;
pub mod rng;
pub mod shrink;

pub use combinators::{
    FrequencyGenerator, Map2Generator, OneOfGenerator, Tuple2Generator, Tuple3Generator,
    VecGenerator, frequency, list_of, map2, one_of, tuple3_of, tuple_of,
};
pub use error::{GeneratorError, MinimizeError};
pub use generator::{FlatMap, Generator, Map};
pub use primitives::{
    BoolGenerator, FloatGenerator, IntGenerator, StringGenerator, boolean, float, integer, string,
};
pub use rng::{DefaultRngProvider, RngProvider, create_rng, create_seeded_rng};
pub use shrink::{
    Counterexample, IntShrinker, ListShrinker, MinimizeConfig, Minimizer, Shrinker, minimize,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimize_config_defaults() {
        let config = MinimizeConfig::default();
        assert_eq!(config.max_iterations, 1000);
        assert!(!config.verbose);
    }

    #[test]
    fn public_api_integration() {
        let generator = tuple_of(integer(1i64, 100).unwrap(), string(5).unwrap());
        let mut rng = create_seeded_rng(9);

        let (number, text) = generator.sample(&mut rng, 50);
        assert!((1..=51).contains(&number));
        assert!(!text.is_empty() && text.len() <= 5);
    }

    #[test]
    fn generator_composition_public_api() {
        let generator = list_of(integer(0i64, 20).unwrap().map(|v| v * 2), 1, 6).unwrap();
        let mut rng = create_rng();

        let value = generator.sample(&mut rng, 10);
        assert!((1..=6).contains(&value.len()));
        assert!(value.iter().all(|v| v % 2 == 0));
    }
}

//! Standalone shrinkers and the shrink-to-fixpoint minimization search.

use crate::error::MinimizeError;
use crate::generator::Generator;

/// A reduction capability independent of sampling.
///
/// Shrinkers exist so that a shrinking strategy for a type can be composed
/// from the strategies of its parts without needing full generators, e.g. a
/// list shrinker parameterized by an element shrinker.
///
/// The same well-foundedness rules as [`Generator::shrink`] apply: finite
/// output, never the input itself, every candidate strictly simpler.
pub trait Shrinker<T> {
    /// Produce the shrink candidates for a value.
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>>;
}

/// Shrinker for primitive integers: a truncating halving chain toward zero.
///
/// For `-738` the candidates are `-369, -184, ..., -5, -2, -1, 0`; each has
/// strictly smaller magnitude than the input and zero is terminal.
#[derive(Debug, Clone)]
pub struct IntShrinker;

impl<T> Shrinker<T> for IntShrinker
where
    T: Copy
        + PartialEq
        + std::ops::Div<Output = T>
        + num_traits::Zero
        + num_traits::One
        + 'static,
{
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        let zero = T::zero();
        if *value == zero {
            return Box::new(std::iter::empty());
        }

        let two = T::one() + T::one();
        let mut candidates = Vec::new();
        let mut current = *value;
        loop {
            current = current / two;
            candidates.push(current);
            if current == zero {
                break;
            }
        }
        Box::new(candidates.into_iter())
    }
}

/// Shrinker for `Vec<T>`, composed from an element shrinker.
///
/// Candidates are the empty list, every single-element deletion (scanned
/// from the end of the list), the first half of the list when it has more
/// than one element, and every single-element in-place substitution from
/// the element shrinker. Duplicates and the original value are filtered
/// out, and the survivors are ordered ascending by
/// `(length, lexicographic value)`: shorter failing lists are easier to
/// read, so the search explores size reduction before element refinement.
#[derive(Debug, Clone)]
pub struct ListShrinker<S> {
    element: S,
}

impl<S> ListShrinker<S> {
    /// Compose a list shrinker from an element shrinker.
    pub fn new(element: S) -> Self {
        Self { element }
    }
}

impl<T, S> Shrinker<Vec<T>> for ListShrinker<S>
where
    T: Clone + Ord + 'static,
    S: Shrinker<T>,
{
    fn shrink(&self, value: &Vec<T>) -> Box<dyn Iterator<Item = Vec<T>>> {
        if value.is_empty() {
            return Box::new(std::iter::empty());
        }

        let mut candidates = Vec::new();
        candidates.push(Vec::new());

        for index in (0..value.len()).rev() {
            let mut shorter = value.clone();
            shorter.remove(index);
            candidates.push(shorter);
        }

        if value.len() > 1 {
            candidates.push(value[..value.len() / 2].to_vec());
        }

        for index in 0..value.len() {
            for element in self.element.shrink(&value[index]) {
                let mut replaced = value.clone();
                replaced[index] = element;
                candidates.push(replaced);
            }
        }

        candidates.retain(|candidate| candidate != value);
        candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        candidates.dedup();
        Box::new(candidates.into_iter())
    }
}

/// A minimized counterexample together with its provenance.
#[derive(Debug, Clone)]
pub struct Counterexample<T> {
    /// The failing value the search started from
    pub original: T,
    /// The locally-minimal failing value
    pub minimal: T,
    /// Number of accepted shrink steps
    pub steps: usize,
}

/// Configuration for the minimization search.
#[derive(Debug, Clone)]
pub struct MinimizeConfig {
    /// Safety bound on accepted shrink steps. A well-founded shrink source
    /// terminates long before any reasonable bound; exceeding it is
    /// reported as an error rather than looping forever.
    pub max_iterations: usize,
    /// Emit progress on stderr while shrinking
    pub verbose: bool,
}

impl Default for MinimizeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            verbose: false,
        }
    }
}

impl MinimizeConfig {
    /// Create a configuration with a custom iteration bound.
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }

    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}

/// The shrink-to-fixpoint search: given a failing value and a shrink
/// source, repeatedly replace the value with the first simpler candidate
/// that still fails, until no candidate fails.
///
/// This is a greedy first-improvement hill-climb, not an exhaustive search:
/// it finds a local minimum reachable by single shrink steps, not
/// necessarily the globally smallest counterexample. Candidates are
/// evaluated in the order the shrink source produces them, and values
/// already evaluated during the search are skipped.
pub struct Minimizer {
    config: MinimizeConfig,
}

impl Minimizer {
    /// Create a minimizer with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MinimizeConfig::default(),
        }
    }

    /// Create a minimizer with a custom configuration.
    pub fn with_config(config: MinimizeConfig) -> Self {
        Self { config }
    }

    /// Minimize a failing value using an arbitrary shrink source.
    ///
    /// `property` returns `true` for passing inputs; only `false` counts as
    /// a failure. If `initial` does not fail the property, it is returned
    /// unchanged with zero steps.
    pub fn minimize<T, P, S>(
        &self,
        initial: T,
        property: P,
        shrink: S,
    ) -> Result<Counterexample<T>, MinimizeError>
    where
        T: Clone + PartialEq,
        P: Fn(&T) -> bool,
        S: Fn(&T) -> Box<dyn Iterator<Item = T>>,
    {
        let mut current = initial.clone();
        let mut steps = 0;

        if property(&current) {
            return Ok(Counterexample {
                original: initial,
                minimal: current,
                steps,
            });
        }

        // Every value evaluated so far, including the original; candidates
        // equal to one of these are skipped.
        let mut tried = vec![initial.clone()];

        loop {
            if steps >= self.config.max_iterations {
                return Err(MinimizeError::IterationLimit {
                    limit: self.config.max_iterations,
                });
            }

            let mut advanced = false;
            for candidate in shrink(&current) {
                if tried.contains(&candidate) {
                    continue;
                }
                let failed = !property(&candidate);
                tried.push(candidate.clone());
                if failed {
                    current = candidate;
                    steps += 1;
                    advanced = true;
                    if self.config.verbose {
                        eprintln!("Shrink step {}: found simpler failing value", steps);
                    }
                    break;
                }
            }

            if !advanced {
                if self.config.verbose {
                    eprintln!("Shrinking completed after {} steps", steps);
                }
                return Ok(Counterexample {
                    original: initial,
                    minimal: current,
                    steps,
                });
            }
        }
    }

    /// Minimize using a generator's shrink function as the shrink source.
    pub fn minimize_with_generator<T, G, P>(
        &self,
        initial: T,
        property: P,
        generator: &G,
    ) -> Result<Counterexample<T>, MinimizeError>
    where
        T: Clone + PartialEq,
        G: Generator<T> + ?Sized,
        P: Fn(&T) -> bool,
    {
        self.minimize(initial, property, |value| generator.shrink(value))
    }

    /// Minimize using a standalone shrinker as the shrink source.
    pub fn minimize_with_shrinker<T, S, P>(
        &self,
        initial: T,
        property: P,
        shrinker: &S,
    ) -> Result<Counterexample<T>, MinimizeError>
    where
        T: Clone + PartialEq,
        S: Shrinker<T> + ?Sized,
        P: Fn(&T) -> bool,
    {
        self.minimize(initial, property, |value| shrinker.shrink(value))
    }
}

impl Default for Minimizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimize a failing value with the default configuration, returning only
/// the locally-minimal counterexample.
pub fn minimize<T, P, S>(initial: T, property: P, shrink: S) -> Result<T, MinimizeError>
where
    T: Clone + PartialEq,
    P: Fn(&T) -> bool,
    S: Fn(&T) -> Box<dyn Iterator<Item = T>>,
{
    Minimizer::new()
        .minimize(initial, property, shrink)
        .map(|counterexample| counterexample.minimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::integer;

    #[test]
    fn int_shrinker_is_well_founded() {
        for &value in &[1i64, -1, 2, 17, -17, 1024, -738, i64::from(i32::MAX)] {
            let candidates: Vec<i64> = IntShrinker.shrink(&value).collect();
            assert!(!candidates.is_empty());
            assert!(candidates.iter().all(|&c| c != value));
            assert!(candidates.iter().all(|&c| c.abs() < value.abs()));
            assert_eq!(candidates.last(), Some(&0));
        }

        let at_zero: Vec<i64> = IntShrinker.shrink(&0).collect();
        assert!(at_zero.is_empty());
    }

    #[test]
    fn int_shrinker_chain_passes_through_small_values() {
        let candidates: Vec<i64> = IntShrinker.shrink(&-738).collect();
        assert_eq!(
            candidates,
            vec![-369, -184, -92, -46, -23, -11, -5, -2, -1, 0]
        );
    }

    #[test]
    fn int_shrinker_handles_unsigned_values() {
        let candidates: Vec<u32> = IntShrinker.shrink(&100u32).collect();
        assert_eq!(candidates, vec![50, 25, 12, 6, 3, 1, 0]);
    }

    #[test]
    fn list_shrinker_emits_empty_list_first() {
        let shrinker = ListShrinker::new(IntShrinker);
        let candidates: Vec<Vec<i64>> = shrinker.shrink(&vec![3, 1, 4, 1, 5]).collect();
        assert_eq!(candidates[0], Vec::<i64>::new());
    }

    #[test]
    fn list_shrinker_orders_by_length_then_value() {
        let shrinker = ListShrinker::new(IntShrinker);
        let candidates: Vec<Vec<i64>> = shrinker.shrink(&vec![3, 1, 4, 1, 5]).collect();

        for pair in candidates.windows(2) {
            let ordered = pair[0].len() < pair[1].len()
                || (pair[0].len() == pair[1].len() && pair[0] <= pair[1]);
            assert!(ordered, "{:?} should sort before {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn list_shrinker_filters_original_and_duplicates() {
        let shrinker = ListShrinker::new(IntShrinker);
        let original = vec![1i64, 1];
        let candidates: Vec<Vec<i64>> = shrinker.shrink(&original).collect();

        assert!(candidates.iter().all(|c| *c != original));
        for (index, candidate) in candidates.iter().enumerate() {
            assert!(!candidates[..index].contains(candidate));
        }
    }

    #[test]
    fn list_shrinker_empty_input_is_minimal() {
        let shrinker = ListShrinker::new(IntShrinker);
        let candidates: Vec<Vec<i64>> = shrinker.shrink(&Vec::new()).collect();
        assert!(candidates.is_empty());
    }

    #[test]
    fn minimizes_integer_to_smallest_failure() {
        let generator = integer(-1000i64, 1000).unwrap();
        let result = Minimizer::new()
            .minimize_with_generator(-738, |i: &i64| *i > -2, &generator)
            .unwrap();
        assert_eq!(result.minimal, -2);
        assert_eq!(result.original, -738);
        assert!(result.steps > 0);
    }

    #[test]
    fn minimizes_list_containing_one_to_singleton() {
        let shrinker = ListShrinker::new(IntShrinker);
        let result = Minimizer::new()
            .minimize_with_shrinker(vec![7i64, 1, -3], |l: &Vec<i64>| !l.contains(&1), &shrinker)
            .unwrap();
        assert_eq!(result.minimal, vec![1]);
    }

    #[test]
    fn passing_initial_value_is_returned_unchanged() {
        let generator = integer(-1000i64, 1000).unwrap();
        let result = Minimizer::new()
            .minimize_with_generator(500, |_: &i64| true, &generator)
            .unwrap();
        assert_eq!(result.minimal, 500);
        assert_eq!(result.steps, 0);
    }

    #[test]
    fn iteration_limit_catches_ill_founded_shrinking() {
        // A shrink source that always offers a new failing candidate.
        let result = Minimizer::new().minimize(
            10_000_000i64,
            |_: &i64| false,
            |v: &i64| Box::new(std::iter::once(*v - 1)) as Box<dyn Iterator<Item = i64>>,
        );
        assert_eq!(
            result.unwrap_err(),
            MinimizeError::IterationLimit { limit: 1000 }
        );
    }

    #[test]
    fn search_skips_already_tried_candidates() {
        // A shrink source that keeps returning the same candidate must not
        // loop: the candidate is evaluated once and then ignored.
        let result = Minimizer::new()
            .minimize(
                10i64,
                |_: &i64| false,
                |_: &i64| Box::new(std::iter::once(5i64)) as Box<dyn Iterator<Item = i64>>,
            )
            .unwrap();
        assert_eq!(result.minimal, 5);
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn free_minimize_returns_minimal_value() {
        let generator = integer(0i64, 1000).unwrap();
        let minimal = minimize(600, |i: &i64| *i < 10, |v| generator.shrink(v)).unwrap();
        assert!(minimal >= 10);
        // Greedy halving from 600 bottoms out at the first candidate whose
        // own candidates all pass.
        assert_eq!(minimal, 18);
    }
}

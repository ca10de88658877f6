//! Combinators that build generators out of other generators.

use std::marker::PhantomData;

use crate::error::GeneratorError;
use crate::generator::Generator;

/// Generator that uniformly chooses one of several sub-generators.
///
/// Shrinking tries the sub-generators in the order given and returns the
/// first non-empty candidate list; sub-generators whose shrink does not
/// apply to the value yield an empty list and the search falls through.
/// This assumes the value's shape matches the sub-generator that answers
/// first, which is not sound in general: a different sub-generator can
/// coincidentally return candidates for a value it never produced. The
/// behavior is kept as-is and documented rather than fixed.
pub struct OneOfGenerator<T> {
    generators: Vec<Box<dyn Generator<T>>>,
}

impl<T> OneOfGenerator<T> {
    /// Create a choice generator, rejecting an empty alternative list.
    pub fn new(generators: Vec<Box<dyn Generator<T>>>) -> Result<Self, GeneratorError> {
        if generators.is_empty() {
            return Err(GeneratorError::EmptyChoice);
        }
        Ok(Self { generators })
    }
}

impl<T> std::fmt::Debug for OneOfGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneOfGenerator")
            .field("alternatives", &self.generators.len())
            .finish()
    }
}

impl<T: 'static> Generator<T> for OneOfGenerator<T> {
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T {
        use rand::Rng;
        let index = rng.gen_range(0..self.generators.len());
        self.generators[index].sample(rng, size)
    }

    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        for generator in &self.generators {
            let candidates: Vec<T> = generator.shrink(value).collect();
            if !candidates.is_empty() {
                return Box::new(candidates.into_iter());
            }
        }
        Box::new(std::iter::empty())
    }
}

/// Create a generator that uniformly chooses one of the given generators.
pub fn one_of<T>(
    generators: Vec<Box<dyn Generator<T>>>,
) -> Result<OneOfGenerator<T>, GeneratorError> {
    OneOfGenerator::new(generators)
}

/// Generator that chooses among sub-generators with given weights.
///
/// Weight `w` out of total `W` selects that sub-generator with probability
/// `w / W`. Shrinking uses the same fallthrough strategy as
/// [`OneOfGenerator`], with the same documented shape-mismatch caveat.
pub struct FrequencyGenerator<T> {
    entries: Vec<(f64, Box<dyn Generator<T>>)>,
    total: f64,
}

impl<T> FrequencyGenerator<T> {
    /// Create a weighted choice generator, rejecting an empty list and
    /// non-finite or non-positive weights.
    pub fn new(entries: Vec<(f64, Box<dyn Generator<T>>)>) -> Result<Self, GeneratorError> {
        if entries.is_empty() {
            return Err(GeneratorError::EmptyChoice);
        }
        for (weight, _) in &entries {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(GeneratorError::InvalidWeight { weight: *weight });
            }
        }
        let total = entries.iter().map(|(weight, _)| *weight).sum();
        Ok(Self { entries, total })
    }
}

impl<T> std::fmt::Debug for FrequencyGenerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let weights: Vec<f64> = self.entries.iter().map(|(weight, _)| *weight).collect();
        f.debug_struct("FrequencyGenerator")
            .field("weights", &weights)
            .finish()
    }
}

impl<T: 'static> Generator<T> for FrequencyGenerator<T> {
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T {
        use rand::Rng;
        let choice = rng.gen_range(0.0..self.total);
        let mut upto = 0.0;
        for (weight, generator) in &self.entries {
            if upto + weight >= choice {
                return generator.sample(rng, size);
            }
            upto += weight;
        }
        // Floating rounding can leave the walk short of every entry; fall
        // back to the last generator rather than fail.
        let (_, last) = &self.entries[self.entries.len() - 1];
        last.sample(rng, size)
    }

    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        for (_, generator) in &self.entries {
            let candidates: Vec<T> = generator.shrink(value).collect();
            if !candidates.is_empty() {
                return Box::new(candidates.into_iter());
            }
        }
        Box::new(std::iter::empty())
    }
}

/// Create a weighted choice generator from `(weight, generator)` pairs.
pub fn frequency<T>(
    entries: Vec<(f64, Box<dyn Generator<T>>)>,
) -> Result<FrequencyGenerator<T>, GeneratorError> {
    FrequencyGenerator::new(entries)
}

/// Generator for pairs, sampling each component from its own generator.
///
/// Shrinking perturbs one position at a time while holding the other slot
/// fixed; there is no joint multi-position shrink step.
pub struct Tuple2Generator<A, B, GA, GB> {
    a: GA,
    b: GB,
    _phantom: PhantomData<(A, B)>,
}

impl<A, B, GA, GB> Generator<(A, B)> for Tuple2Generator<A, B, GA, GB>
where
    A: Clone + 'static,
    B: Clone + 'static,
    GA: Generator<A>,
    GB: Generator<B>,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> (A, B) {
        (self.a.sample(rng, size), self.b.sample(rng, size))
    }

    fn shrink(&self, value: &(A, B)) -> Box<dyn Iterator<Item = (A, B)>> {
        let mut candidates = Vec::new();
        for a in self.a.shrink(&value.0) {
            candidates.push((a, value.1.clone()));
        }
        for b in self.b.shrink(&value.1) {
            candidates.push((value.0.clone(), b));
        }
        Box::new(candidates.into_iter())
    }
}

/// Combine two generators into a pair generator.
pub fn tuple_of<A, B, GA, GB>(a: GA, b: GB) -> Tuple2Generator<A, B, GA, GB>
where
    GA: Generator<A>,
    GB: Generator<B>,
{
    Tuple2Generator {
        a,
        b,
        _phantom: PhantomData,
    }
}

/// Generator for triples; same per-position shrink policy as pairs.
pub struct Tuple3Generator<A, B, C, GA, GB, GC> {
    a: GA,
    b: GB,
    c: GC,
    _phantom: PhantomData<(A, B, C)>,
}

impl<A, B, C, GA, GB, GC> Generator<(A, B, C)> for Tuple3Generator<A, B, C, GA, GB, GC>
where
    A: Clone + 'static,
    B: Clone + 'static,
    C: Clone + 'static,
    GA: Generator<A>,
    GB: Generator<B>,
    GC: Generator<C>,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> (A, B, C) {
        (
            self.a.sample(rng, size),
            self.b.sample(rng, size),
            self.c.sample(rng, size),
        )
    }

    fn shrink(&self, value: &(A, B, C)) -> Box<dyn Iterator<Item = (A, B, C)>> {
        let mut candidates = Vec::new();
        for a in self.a.shrink(&value.0) {
            candidates.push((a, value.1.clone(), value.2.clone()));
        }
        for b in self.b.shrink(&value.1) {
            candidates.push((value.0.clone(), b, value.2.clone()));
        }
        for c in self.c.shrink(&value.2) {
            candidates.push((value.0.clone(), value.1.clone(), c));
        }
        Box::new(candidates.into_iter())
    }
}

/// Combine three generators into a triple generator.
pub fn tuple3_of<A, B, C, GA, GB, GC>(a: GA, b: GB, c: GC) -> Tuple3Generator<A, B, C, GA, GB, GC>
where
    GA: Generator<A>,
    GB: Generator<B>,
    GC: Generator<C>,
{
    Tuple3Generator {
        a,
        b,
        c,
        _phantom: PhantomData,
    }
}

/// Generator that combines two independent samples with a binary function.
///
/// The combined value has no shrink strategy by design: the relationship
/// between it and the two original samples is not generally invertible, so
/// `shrink` always returns an empty sequence. Callers needing shrinkable
/// combined values should build a domain-specific generator instead.
pub struct Map2Generator<A, B, GA, GB, F> {
    a: GA,
    b: GB,
    f: F,
    _phantom: PhantomData<(A, B)>,
}

impl<A, B, O, GA, GB, F> Generator<O> for Map2Generator<A, B, GA, GB, F>
where
    O: 'static,
    GA: Generator<A>,
    GB: Generator<B>,
    F: Fn(A, B) -> O,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> O {
        let a = self.a.sample(rng, size);
        let b = self.b.sample(rng, size);
        (self.f)(a, b)
    }

    fn shrink(&self, _value: &O) -> Box<dyn Iterator<Item = O>> {
        Box::new(std::iter::empty())
    }
}

/// Apply a binary function to the outputs of two generators.
pub fn map2<A, B, O, GA, GB, F>(a: GA, b: GB, f: F) -> Map2Generator<A, B, GA, GB, F>
where
    GA: Generator<A>,
    GB: Generator<B>,
    F: Fn(A, B) -> O,
{
    Map2Generator {
        a,
        b,
        f,
        _phantom: PhantomData,
    }
}

/// Generator for `Vec<T>` with length drawn uniformly from
/// `[min_len, min(max_len, size)]`, floored at `min_len`.
pub struct VecGenerator<T, G> {
    element_generator: G,
    min_len: usize,
    max_len: usize,
    _phantom: PhantomData<T>,
}

impl<T, G> VecGenerator<T, G>
where
    G: Generator<T>,
{
    /// Create a list generator, validating the length bounds.
    pub fn new(element_generator: G, min_len: usize, max_len: usize) -> Result<Self, GeneratorError> {
        if min_len > max_len {
            return Err(GeneratorError::invalid_range(min_len, max_len));
        }
        Ok(Self {
            element_generator,
            min_len,
            max_len,
            _phantom: PhantomData,
        })
    }
}

impl<T, G> std::fmt::Debug for VecGenerator<T, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VecGenerator")
            .field("min_len", &self.min_len)
            .field("max_len", &self.max_len)
            .finish()
    }
}

impl<T, G> Generator<Vec<T>> for VecGenerator<T, G>
where
    T: Clone + PartialEq + 'static,
    G: Generator<T>,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> Vec<T> {
        use rand::Rng;
        let upper = self.max_len.min(size);
        let length = if upper <= self.min_len {
            self.min_len
        } else {
            rng.gen_range(self.min_len..=upper)
        };
        (0..length)
            .map(|_| self.element_generator.sample(rng, size))
            .collect()
    }

    fn shrink(&self, value: &Vec<T>) -> Box<dyn Iterator<Item = Vec<T>>> {
        if value.is_empty() {
            return Box::new(std::iter::empty());
        }

        let mut candidates = Vec::new();
        // Priority order: the empty list, single deletions, then
        // single-element in-place shrinks.
        candidates.push(Vec::new());
        if value.len() > 1 {
            for index in 0..value.len() {
                let mut shorter = value.clone();
                shorter.remove(index);
                candidates.push(shorter);
            }
        }
        for index in 0..value.len() {
            for element in self.element_generator.shrink(&value[index]) {
                let mut replaced = value.clone();
                replaced[index] = element;
                candidates.push(replaced);
            }
        }

        let mut unique: Vec<Vec<T>> = Vec::new();
        for candidate in candidates {
            if candidate != *value && !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        Box::new(unique.into_iter())
    }
}

/// Create a generator for lists of `min_len` to `max_len` elements.
pub fn list_of<T, G>(
    element_generator: G,
    min_len: usize,
    max_len: usize,
) -> Result<VecGenerator<T, G>, GeneratorError>
where
    G: Generator<T>,
{
    VecGenerator::new(element_generator, min_len, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{boolean, integer};
    use crate::rng::create_seeded_rng;
    use rand::thread_rng;

    #[test]
    fn one_of_rejects_empty_input() {
        let error = OneOfGenerator::<i64>::new(Vec::new()).unwrap_err();
        assert_eq!(error, GeneratorError::EmptyChoice);
    }

    #[test]
    fn one_of_samples_from_subgenerators() {
        let generator = one_of(vec![
            integer(0i64, 10).unwrap().boxed(),
            integer(100i64, 110).unwrap().boxed(),
        ])
        .unwrap();
        let mut rng = thread_rng();

        for _ in 0..50 {
            let value = generator.sample(&mut rng, 1000);
            assert!((0..=10).contains(&value) || (100..=110).contains(&value));
        }
    }

    #[test]
    fn one_of_shrink_falls_through_in_declared_order() {
        // The first sub-generator cannot shrink 7 (all halving candidates
        // fall below its minimum), so the second one answers.
        let generator = one_of(vec![
            integer(5i64, 10).unwrap().boxed(),
            integer(0i64, 10).unwrap().boxed(),
        ])
        .unwrap();

        let candidates: Vec<i64> = generator.shrink(&7).collect();
        let expected: Vec<i64> = integer(0i64, 10).unwrap().shrink(&7).collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn one_of_shrink_first_nonempty_wins_even_on_shape_mismatch() {
        // 150 can only have been sampled from the second sub-generator, but
        // the first one still produces candidates for it and wins the
        // fallthrough. Documented limitation, not a bug.
        let generator = one_of(vec![
            integer(0i64, 10).unwrap().boxed(),
            integer(100i64, 200).unwrap().boxed(),
        ])
        .unwrap();

        let candidates: Vec<i64> = generator.shrink(&150).collect();
        let first_subgen: Vec<i64> = integer(0i64, 10).unwrap().shrink(&150).collect();
        assert!(!candidates.is_empty());
        assert_eq!(candidates, first_subgen);
    }

    #[test]
    fn frequency_rejects_empty_and_bad_weights() {
        let error = FrequencyGenerator::<i64>::new(Vec::new()).unwrap_err();
        assert_eq!(error, GeneratorError::EmptyChoice);

        let error = frequency(vec![(0.0, integer(0i64, 1).unwrap().boxed())]).unwrap_err();
        assert_eq!(error, GeneratorError::InvalidWeight { weight: 0.0 });

        let error = frequency(vec![(f64::NAN, integer(0i64, 1).unwrap().boxed())]).unwrap_err();
        assert!(matches!(error, GeneratorError::InvalidWeight { .. }));
    }

    #[test]
    fn frequency_prefers_heavier_entries() {
        let generator = frequency(vec![
            (1.0, integer(0i64, 0).unwrap().boxed()),
            (1e9, integer(1i64, 1).unwrap().boxed()),
        ])
        .unwrap();
        let mut rng = create_seeded_rng(7);

        let ones = (0..100)
            .filter(|_| generator.sample(&mut rng, 10) == 1)
            .count();
        assert!(ones >= 95, "expected almost all samples from the heavy entry");
    }

    #[test]
    fn frequency_shrink_falls_through_like_one_of() {
        let generator = frequency(vec![
            (1.0, integer(5i64, 10).unwrap().boxed()),
            (3.0, integer(0i64, 10).unwrap().boxed()),
        ])
        .unwrap();

        let candidates: Vec<i64> = generator.shrink(&7).collect();
        let expected: Vec<i64> = integer(0i64, 10).unwrap().shrink(&7).collect();
        assert_eq!(candidates, expected);
    }

    #[test]
    fn tuple_shrinks_one_position_at_a_time() {
        let generator = tuple_of(integer(0i64, 10).unwrap(), boolean());
        let candidates: Vec<(i64, bool)> = generator.shrink(&(4, true)).collect();

        assert_eq!(candidates, vec![(2, true), (1, true), (0, true), (4, false)]);
    }

    #[test]
    fn tuple3_samples_positionally() {
        let generator = tuple3_of(
            integer(1i64, 1).unwrap(),
            integer(2i64, 2).unwrap(),
            integer(3i64, 3).unwrap(),
        );
        let mut rng = thread_rng();
        assert_eq!(generator.sample(&mut rng, 10), (1, 2, 3));

        let candidates: Vec<(i64, i64, i64)> = generator.shrink(&(1, 2, 3)).collect();
        // Every candidate differs from the original in exactly one slot.
        for (a, b, c) in candidates {
            let changed = [(a != 1), (b != 2), (c != 3)];
            assert_eq!(changed.iter().filter(|&&x| x).count(), 1);
        }
    }

    #[test]
    fn map2_combines_samples_and_has_no_shrink() {
        let generator = map2(
            integer(2i64, 2).unwrap(),
            integer(3i64, 3).unwrap(),
            |a, b| a + b,
        );
        let mut rng = thread_rng();
        assert_eq!(generator.sample(&mut rng, 10), 5);

        let candidates: Vec<i64> = generator.shrink(&5).collect();
        assert!(candidates.is_empty());
    }

    #[test]
    fn list_of_respects_length_bounds_and_size() {
        let generator = list_of(integer(0i64, 100).unwrap(), 2, 8).unwrap();
        let mut rng = thread_rng();

        for _ in 0..50 {
            let value = generator.sample(&mut rng, 4);
            assert!((2..=4).contains(&value.len()));
        }

        // Size zero floors at the minimum length.
        assert_eq!(generator.sample(&mut rng, 0).len(), 2);
    }

    #[test]
    fn list_of_rejects_inverted_bounds() {
        let error = list_of(integer(0i64, 1).unwrap(), 5, 2).unwrap_err();
        assert_eq!(error, GeneratorError::invalid_range(5usize, 2usize));
    }

    #[test]
    fn list_shrink_priority_order() {
        let generator = list_of(integer(0i64, 10).unwrap(), 0, 10).unwrap();
        let candidates: Vec<Vec<i64>> = generator.shrink(&vec![4, 7]).collect();

        // Empty list first, then single deletions, then element shrinks.
        assert_eq!(candidates[0], Vec::<i64>::new());
        assert_eq!(candidates[1], vec![7]);
        assert_eq!(candidates[2], vec![4]);
        assert!(candidates[3..].iter().all(|c| c.len() == 2));
    }

    #[test]
    fn list_shrink_of_singleton_does_not_duplicate_empty() {
        let generator = list_of(integer(0i64, 10).unwrap(), 0, 10).unwrap();
        let candidates: Vec<Vec<i64>> = generator.shrink(&vec![6]).collect();

        assert_eq!(candidates.iter().filter(|c| c.is_empty()).count(), 1);
    }
}

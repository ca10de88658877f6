//! The core generator abstraction: paired sampling and shrinking.

/// A source of random test values of type `T`, paired with a strategy for
/// producing strictly simpler candidates from a failing value.
///
/// Generators are immutable and stateless: all randomness comes from the
/// injected `rng` and all scaling from the explicit `size` parameter, so a
/// generator can be shared freely and re-sampled any number of times.
///
/// Implementations must keep `shrink` well-founded: the returned sequence is
/// finite, never contains the input value, and every candidate is strictly
/// simpler under the type's simplicity order. An empty sequence means the
/// value is already minimal and stops the minimization search.
pub trait Generator<T> {
    /// Sample a value using the provided random source and size.
    ///
    /// `size` scales the magnitude or length of produced values and must be
    /// accepted in full `usize` range; `size == 0` still produces a valid
    /// value at the generator's minimum.
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T;

    /// Produce the shrink candidates for a failing value, simplest-first
    /// where the type has a preference.
    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>>;

    /// Transform sampled values with a pure function of the same type.
    ///
    /// The mapped generator shrinks by applying `f` to each candidate the
    /// inner generator produces for the value. This is only sound when `f`
    /// is monotonic with respect to the simplicity order; that is not
    /// enforced, just documented.
    fn map<F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(T) -> T,
    {
        Map { inner: self, f }
    }

    /// Dependent generation: sample a value, build a generator from it, and
    /// sample that.
    ///
    /// Shrinking is deliberately conservative: candidates come from this
    /// generator's own shrink function, since re-deriving the dependent
    /// generator at every shrink step is not generally possible. Callers
    /// needing full shrink fidelity should supply a custom
    /// [`Shrinker`](crate::shrink::Shrinker) to the minimizer instead.
    fn flat_map<F, G>(self, f: F) -> FlatMap<Self, F>
    where
        Self: Sized,
        F: Fn(&T) -> G,
        G: Generator<T>,
    {
        FlatMap { inner: self, f }
    }

    /// Erase the concrete generator type, for heterogeneous composition in
    /// choice combinators.
    fn boxed(self) -> Box<dyn Generator<T>>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

impl<T> Generator<T> for Box<dyn Generator<T>> {
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T {
        (**self).sample(rng, size)
    }

    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        (**self).shrink(value)
    }
}

/// A generator that transforms values from an inner generator.
pub struct Map<G, F> {
    inner: G,
    f: F,
}

impl<T, G, F> Generator<T> for Map<G, F>
where
    T: 'static,
    G: Generator<T>,
    F: Fn(T) -> T,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T {
        (self.f)(self.inner.sample(rng, size))
    }

    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        let mapped: Vec<T> = self.inner.shrink(value).map(&self.f).collect();
        Box::new(mapped.into_iter())
    }
}

/// A generator whose second stage depends on a first sampled value.
pub struct FlatMap<G, F> {
    inner: G,
    f: F,
}

impl<T, G, F, H> Generator<T> for FlatMap<G, F>
where
    T: 'static,
    G: Generator<T>,
    F: Fn(&T) -> H,
    H: Generator<T>,
{
    fn sample(&self, rng: &mut dyn rand::RngCore, size: usize) -> T {
        let seed_value = self.inner.sample(rng, size);
        (self.f)(&seed_value).sample(rng, size)
    }

    fn shrink(&self, value: &T) -> Box<dyn Iterator<Item = T>> {
        // Conservative: shrink with the outer generator only.
        self.inner.shrink(value)
    }
}

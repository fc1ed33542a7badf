//! Bounded resampling.

/// Outcome of a bounded resampling loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sampled<T> {
    /// The accepted draw, or the last draw when the cap was hit.
    pub value: T,
    /// Whether `value` satisfies the predicate.
    pub satisfied: bool,
    /// Number of draws taken, at least 1.
    pub attempts: usize,
}

/// Draws from `sample` until `accept` holds or `max_attempts` draws were made.
///
/// Returns the last draw with `satisfied = false` when the cap is exhausted.
/// Returns `None` when the sampler yields nothing or `max_attempts` is zero.
pub fn sample_until<T, S, P>(mut sample: S, mut accept: P, max_attempts: usize) -> Option<Sampled<T>>
where
    S: FnMut() -> Option<T>,
    P: FnMut(&T) -> bool,
{
    let mut last = None;

    for attempt in 1..=max_attempts {
        let value = sample()?;
        if accept(&value) {
            return Some(Sampled {
                value,
                satisfied: true,
                attempts: attempt,
            });
        }
        last = Some(Sampled {
            value,
            satisfied: false,
            attempts: attempt,
        });
    }

    last
}

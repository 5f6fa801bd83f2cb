//! Random sources
//!
//! Every random choice in a discovery cycle (default category, candidate
//! city, picked place) goes through a `RandomSource`, so tests can swap in
//! a seeded generator and get reproducible picks.

pub mod pseudo;

/// Trait for uniform random sources
///
/// Implementations must be thread-safe (Send + Sync) so a coordinator can be
/// shared across tasks.
pub trait RandomSource: Send + Sync {
    /// Returns the source name (e.g., "thread", "seeded")
    fn name(&self) -> &'static str;

    /// Generate a float uniformly distributed in [0.0, 1.0)
    fn float(&self) -> f64;

    /// Pick an index uniformly from `0..len`
    ///
    /// Returns None for an empty range.
    fn index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let i = (self.float() * len as f64).floor() as usize;
        Some(i.min(len - 1))
    }
}

/// Get a source by name, seeded when a seed is given
pub fn get_source(seed: Option<u64>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(pseudo::SeededSource::new(seed)),
        None => Box::new(pseudo::ThreadSource::new()),
    }
}

//! Injectable uniform random sources.
//!
//! The engine never reads a global RNG; every draw goes through a
//! [`RandomSource`] handed in by the caller.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::ContractViolation;

/// Source of uniform values in `[0, 1)`.
///
/// `None` means the source could not produce a value, which the engine
/// reports as [`ContractViolation::RandomSourceExhausted`].
pub trait RandomSource {
    fn uniform01(&mut self) -> Option<f64>;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform01(&mut self) -> Option<f64> {
        (**self).uniform01()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn uniform01(&mut self) -> Option<f64> {
        (**self).uniform01()
    }
}

/// ChaCha8 backed source. Same seed, same draws.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: ChaCha8Rng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// OS entropy seeded, for interactive sessions.
    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::new)
    }
}

impl RandomSource for SeededSource {
    fn uniform01(&mut self) -> Option<f64> {
        Some(self.rng.gen::<f64>())
    }
}

/// Always yields the same value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSource(pub f64);

impl RandomSource for FixedSource {
    fn uniform01(&mut self) -> Option<f64> {
        Some(self.0)
    }
}

/// Yields scripted values in order, then runs dry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceSource {
    values: VecDeque<f64>,
}

impl SequenceSource {
    pub fn new<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self { values: values.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for SequenceSource {
    fn uniform01(&mut self) -> Option<f64> {
        self.values.pop_front()
    }
}

/// `floor(u * len)` for one draw from `source`.
///
/// `len` must be non-zero. Values outside `[0, 1)` are rejected rather than
/// clamped so a broken source is visible to callers.
pub fn draw_index<R: RandomSource + ?Sized>(
    source: &mut R,
    len: usize,
) -> Result<usize, ContractViolation> {
    let value = source.uniform01().ok_or(ContractViolation::RandomSourceExhausted)?;
    if !value.is_finite() || !(0.0..1.0).contains(&value) {
        return Err(ContractViolation::RandomOutOfRange { value });
    }
    let index = (value * len as f64).floor() as usize;
    // f64 반올림으로 len 에 닿는 경우 방지
    Ok(index.min(len.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = SeededSource::new(42);
        let mut b = SeededSource::new(42);
        for _ in 0..16 {
            assert_eq!(a.uniform01(), b.uniform01());
        }
    }

    #[test]
    fn test_seeded_values_in_unit_interval() {
        let mut source = SeededSource::new(7);
        for _ in 0..1000 {
            let v = source.uniform01().unwrap();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_draw_index_floor() {
        assert_eq!(draw_index(&mut FixedSource(0.0), 3), Ok(0));
        assert_eq!(draw_index(&mut FixedSource(0.34), 3), Ok(1));
        assert_eq!(draw_index(&mut FixedSource(0.99), 3), Ok(2));
        assert_eq!(draw_index(&mut FixedSource(0.999), 8), Ok(7));
    }

    #[test]
    fn test_draw_index_rejects_out_of_range() {
        assert_eq!(
            draw_index(&mut FixedSource(1.0), 3),
            Err(ContractViolation::RandomOutOfRange { value: 1.0 })
        );
        assert_eq!(
            draw_index(&mut FixedSource(-0.1), 3),
            Err(ContractViolation::RandomOutOfRange { value: -0.1 })
        );
        assert!(matches!(
            draw_index(&mut FixedSource(f64::NAN), 3),
            Err(ContractViolation::RandomOutOfRange { .. })
        ));
    }

    #[test]
    fn test_sequence_source_runs_dry() {
        let mut source = SequenceSource::new([0.5]);
        assert_eq!(draw_index(&mut source, 4), Ok(2));
        assert_eq!(source.remaining(), 0);
        assert_eq!(draw_index(&mut source, 4), Err(ContractViolation::RandomSourceExhausted));
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut boxed: Box<dyn RandomSource> = Box::new(FixedSource(0.25));
        assert_eq!(draw_index(&mut boxed, 4), Ok(1));
    }
}

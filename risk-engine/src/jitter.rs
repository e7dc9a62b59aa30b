//! Score jitter sources
//!
//! A small non-negative term can be added to every risk score to simulate
//! model variability. The source is chosen per batch through [`JitterMode`]
//! and handed explicitly to the scorer; there is no process-wide generator.

use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default jitter amplitude
pub const DEFAULT_JITTER_AMPLITUDE: f64 = 0.05;

/// Largest amplitude accepted by [`JitterConfig::validate`]
pub const MAX_JITTER_AMPLITUDE: f64 = 0.1;

/// Finite amplitudes are clamped to `[0, MAX_JITTER_AMPLITUDE]`; NaN and
/// infinities disable jitter
fn sanitize_amplitude(amplitude: f64) -> f64 {
    if amplitude.is_finite() {
        amplitude.clamp(0.0, MAX_JITTER_AMPLITUDE)
    } else {
        0.0
    }
}

/// Source of the jitter term added to a risk score
pub trait JitterSource: Send {
    /// Next jitter value
    fn sample(&mut self) -> f64;
}

/// Deterministic source that always yields zero
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self) -> f64 {
        0.0
    }
}

/// Reproducible source seeded from a fixed value
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
    amplitude: f64,
}

impl SeededJitter {
    /// Create a seeded source sampling uniformly from `[0, amplitude)`
    pub fn new(seed: u64, amplitude: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            amplitude: sanitize_amplitude(amplitude),
        }
    }
}

impl JitterSource for SeededJitter {
    fn sample(&mut self) -> f64 {
        if self.amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.gen_range(0.0..self.amplitude)
    }
}

/// Non-reproducible source backed by the calling thread's generator
#[derive(Debug, Clone, Copy)]
pub struct ThreadJitter {
    amplitude: f64,
}

impl ThreadJitter {
    /// Create an entropy-backed source sampling from `[0, amplitude)`
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude: sanitize_amplitude(amplitude),
        }
    }
}

impl JitterSource for ThreadJitter {
    fn sample(&mut self) -> f64 {
        if self.amplitude <= 0.0 {
            return 0.0;
        }
        rand::thread_rng().gen_range(0.0..self.amplitude)
    }
}

/// How jitter is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JitterMode {
    /// No jitter, scores are fully deterministic
    #[default]
    Disabled,
    /// Reproducible jitter; every batch restarts from the same seed
    Seeded(u64),
    /// Jitter drawn from thread-local entropy
    Entropy,
}

/// Jitter configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterConfig {
    /// Source selection
    pub mode: JitterMode,
    /// Upper bound (exclusive) of the jitter term
    pub amplitude: f64,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            mode: JitterMode::Disabled,
            amplitude: DEFAULT_JITTER_AMPLITUDE,
        }
    }
}

impl JitterConfig {
    /// Jitter disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Seeded jitter with the default amplitude
    pub fn seeded(seed: u64) -> Self {
        Self {
            mode: JitterMode::Seeded(seed),
            amplitude: DEFAULT_JITTER_AMPLITUDE,
        }
    }

    /// Check the amplitude bounds
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=MAX_JITTER_AMPLITUDE).contains(&self.amplitude) {
            return Err(Error::InvalidConfig(format!(
                "jitter amplitude {} outside [0, {}]",
                self.amplitude, MAX_JITTER_AMPLITUDE
            )));
        }
        Ok(())
    }

    /// Build a fresh source for one batch
    pub fn source(&self) -> Box<dyn JitterSource> {
        match self.mode {
            JitterMode::Disabled => Box::new(NoJitter),
            JitterMode::Seeded(seed) => Box::new(SeededJitter::new(seed, self.amplitude)),
            JitterMode::Entropy => Box::new(ThreadJitter::new(self.amplitude)),
        }
    }

    /// Whether scores produced under this configuration are reproducible
    pub fn is_deterministic(&self) -> bool {
        !matches!(self.mode, JitterMode::Entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_is_zero() {
        let mut source = JitterConfig::disabled().source();
        assert!((0..100).all(|_| source.sample() == 0.0));
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let config = JitterConfig::seeded(42);
        let mut a = config.source();
        let mut b = config.source();

        for _ in 0..50 {
            let x = a.sample();
            assert_eq!(x, b.sample());
            assert!((0.0..DEFAULT_JITTER_AMPLITUDE).contains(&x));
        }
    }

    #[test]
    fn test_entropy_is_bounded() {
        let config = JitterConfig {
            mode: JitterMode::Entropy,
            amplitude: MAX_JITTER_AMPLITUDE,
        };
        let mut source = config.source();
        assert!((0..200).all(|_| (0.0..MAX_JITTER_AMPLITUDE).contains(&source.sample())));
        assert!(!config.is_deterministic());
    }

    #[test]
    fn test_zero_amplitude() {
        let mut source = SeededJitter::new(7, 0.0);
        assert_eq!(source.sample(), 0.0);
    }

    #[test]
    fn test_direct_construction_tolerates_bad_amplitudes() {
        assert_eq!(SeededJitter::new(1, f64::NAN).sample(), 0.0);
        assert_eq!(SeededJitter::new(1, -0.5).sample(), 0.0);
        assert_eq!(ThreadJitter::new(f64::INFINITY).sample(), 0.0);
        assert_eq!(ThreadJitter::new(f64::NAN).sample(), 0.0);

        let mut wide = SeededJitter::new(3, 5.0);
        assert!((0..100).all(|_| (0.0..MAX_JITTER_AMPLITUDE).contains(&wide.sample())));
    }

    #[test]
    fn test_amplitude_validation() {
        assert!(JitterConfig::default().validate().is_ok());
        let too_wide = JitterConfig {
            mode: JitterMode::Entropy,
            amplitude: 0.25,
        };
        assert!(too_wide.validate().is_err());
        let negative = JitterConfig {
            mode: JitterMode::Disabled,
            amplitude: -0.01,
        };
        assert!(negative.validate().is_err());
    }
}

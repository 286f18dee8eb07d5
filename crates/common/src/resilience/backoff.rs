//! Backoff strategies for retry pacing
//!
//! Delay computation is kept separate from any scheduling so callers can
//! verify retry timing without timers. The reconnect loop of the push
//! client drives its pacing through [`BackoffStrategy::Exponential`].

use std::time::Duration;

/// Strategy for computing delays between retry attempts
///
/// Attempt numbering is zero-based: `calculate_delay(0)` is the delay
/// before the first retry.
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Linear backoff: initial_delay + (attempt * increment)
    Linear { initial_delay: Duration, increment: Duration },
    /// Exponential backoff: initial_delay * base^attempt, capped at max_delay
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay for a given attempt number
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Linear { initial_delay, increment } => {
                *initial_delay + increment.saturating_mul(attempt)
            }
            BackoffStrategy::Exponential { initial_delay, base, max_delay } => {
                let delay = initial_delay.as_millis() as f64 * base.powi(attempt as i32);
                let delay_ms = delay.min(max_delay.as_millis() as f64) as u64;
                Duration::from_millis(delay_ms)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for resilience::backoff.
    use super::*;

    /// Validates `BackoffStrategy::Fixed` behavior for the constant delay
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the delay is identical for every attempt number.
    #[test]
    fn test_fixed_backoff_constant() {
        let strategy = BackoffStrategy::Fixed(Duration::from_millis(250));

        assert_eq!(strategy.calculate_delay(0), Duration::from_millis(250));
        assert_eq!(strategy.calculate_delay(7), Duration::from_millis(250));
    }

    /// Validates `BackoffStrategy::Linear` behavior for the additive growth
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms `calculate_delay(0)` equals the initial delay.
    /// - Confirms each attempt adds one increment.
    #[test]
    fn test_linear_backoff_growth() {
        let strategy = BackoffStrategy::Linear {
            initial_delay: Duration::from_millis(100),
            increment: Duration::from_millis(50),
        };

        assert_eq!(strategy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(strategy.calculate_delay(1), Duration::from_millis(150));
        assert_eq!(strategy.calculate_delay(4), Duration::from_millis(300));
    }

    /// Validates `BackoffStrategy::Exponential` behavior for the reconnect
    /// pacing scenario.
    ///
    /// Assertions:
    /// - Confirms the delay doubles per attempt: 1000, 2000, 4000, 8000,
    ///   16000 milliseconds.
    /// - Confirms the sixth value is capped at 30000 milliseconds.
    #[test]
    fn test_exponential_doubles_and_caps() {
        let strategy = BackoffStrategy::Exponential {
            initial_delay: Duration::from_millis(1000),
            base: 2.0,
            max_delay: Duration::from_millis(30_000),
        };

        let delays: Vec<u64> =
            (0..6).map(|attempt| strategy.calculate_delay(attempt).as_millis() as u64).collect();

        assert_eq!(delays, vec![1000, 2000, 4000, 8000, 16_000, 30_000]);
    }

    /// Validates `BackoffStrategy::Exponential` behavior for the cap
    /// saturation scenario.
    ///
    /// Assertions:
    /// - Confirms very large attempt numbers stay at the configured cap.
    #[test]
    fn test_exponential_stays_capped() {
        let strategy = BackoffStrategy::Exponential {
            initial_delay: Duration::from_millis(1000),
            base: 2.0,
            max_delay: Duration::from_millis(30_000),
        };

        assert_eq!(strategy.calculate_delay(20), Duration::from_millis(30_000));
    }
}

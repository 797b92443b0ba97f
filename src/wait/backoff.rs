// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::poll::{INITIAL_INTERVAL_MILLIS, MAX_INTERVAL_MILLIS};
use rand::Rng;
use std::time::Duration;

/// Delay policy between two fetches of the same object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Poll as fast as the provider answers
    None,
    Fixed(Duration),
    /// Doubling delay capped at `max`. With `jitter` the actual delay is
    /// drawn uniformly from the upper half of the computed one.
    Exponential {
        initial: Duration,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Backoff::Exponential {
            initial: Duration::from_millis(INITIAL_INTERVAL_MILLIS),
            max: Duration::from_millis(MAX_INTERVAL_MILLIS),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay to apply after `attempt` fetches have already been made (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(interval) => interval,
            Backoff::Exponential {
                initial,
                max,
                jitter,
            } => {
                let exponent = attempt.saturating_sub(1).min(31);
                let delay = initial.saturating_mul(1u32 << exponent).min(max);
                if jitter && !delay.is_zero() {
                    let half = delay / 2;
                    half + rand::thread_rng().gen_range(Duration::ZERO..=delay - half)
                } else {
                    delay
                }
            }
        }
    }
}

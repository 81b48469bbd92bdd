//! Fixed-timestep scheduling.
//!
//! The render loop runs at whatever rate it manages; the scheduler turns the
//! time it reports into a whole number of simulation steps and carries the
//! remainder over to the next frame.

use crate::error::{LifeError, Result};
use std::time::{Duration, Instant};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;
const NANOS_PER_SEC_U128: u128 = 1_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickState {
    Idle,
    Ready,
}

#[derive(Clone, Debug)]
pub struct TickScheduler {
    period: Duration,
    accumulator: Duration,
    last_observed: Option<Instant>,
}

impl TickScheduler {
    pub fn with_period(period: Duration) -> Result<Self> {
        check_period(period)?;
        Ok(TickScheduler {
            period,
            accumulator: Duration::ZERO,
            last_observed: None,
        })
    }

    pub fn from_rate(steps_per_second: f64) -> Result<Self> {
        Self::with_period(rate_to_period(steps_per_second)?)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn accumulator(&self) -> Duration {
        self.accumulator
    }

    pub fn rate(&self) -> f64 {
        NANOS_PER_SEC / self.period.as_nanos() as f64
    }

    /// Changes the period. Pending time is kept.
    pub fn set_period(&mut self, period: Duration) -> Result<()> {
        check_period(period)?;
        self.period = period;
        Ok(())
    }

    pub fn set_rate(&mut self, steps_per_second: f64) -> Result<()> {
        self.set_period(rate_to_period(steps_per_second)?)
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.accumulator = self.accumulator.saturating_add(elapsed);
    }

    /// Advances by the time since the previous observation. The first call
    /// only records `now`.
    pub fn observe(&mut self, now: Instant) -> Result<()> {
        if let Some(elapsed) = self.since_last(now)? {
            self.advance(elapsed);
        }
        self.last_observed = Some(now);
        Ok(())
    }

    /// Records `now` as the latest observation without accumulating the time
    /// since the previous one.
    pub fn mark(&mut self, now: Instant) -> Result<()> {
        self.since_last(now)?;
        self.last_observed = Some(now);
        Ok(())
    }

    fn since_last(&self, now: Instant) -> Result<Option<Duration>> {
        match self.last_observed {
            None => Ok(None),
            Some(last) => now
                .checked_duration_since(last)
                .map(Some)
                .ok_or_else(|| LifeError::InvalidElapsed(last - now)),
        }
    }

    /// Takes one period out of the accumulator if a step is due.
    pub fn consume_if_ready(&mut self) -> bool {
        if self.accumulator >= self.period {
            self.accumulator -= self.period;
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> TickState {
        if self.accumulator >= self.period {
            TickState::Ready
        } else {
            TickState::Idle
        }
    }

    /// How far the simulation is towards its next step, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.accumulator.as_nanos() as f64 / self.period.as_nanos() as f64).min(1.0)
    }

    /// Drops every whole period still pending, keeping the fraction towards
    /// the next step. Returns the number of steps dropped.
    pub fn skip_backlog(&mut self) -> u64 {
        let period = self.period.as_nanos();
        let pending = self.accumulator.as_nanos();
        let rest = pending % period;
        self.accumulator = Duration::new(
            (rest / NANOS_PER_SEC_U128) as u64,
            (rest % NANOS_PER_SEC_U128) as u32,
        );
        u64::try_from(pending / period).unwrap_or(u64::MAX)
    }

    pub fn clear(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

fn check_period(period: Duration) -> Result<()> {
    if period.is_zero() {
        return Err(LifeError::InvalidPeriod("period must be positive".to_string()));
    }
    Ok(())
}

fn rate_to_period(steps_per_second: f64) -> Result<Duration> {
    if !steps_per_second.is_finite() || steps_per_second <= 0.0 {
        return Err(LifeError::InvalidPeriod(format!(
            "steps per second must be positive, got {}",
            steps_per_second
        )));
    }
    if steps_per_second > NANOS_PER_SEC {
        return Err(LifeError::InvalidPeriod(format!(
            "{} steps per second is more than one per nanosecond",
            steps_per_second
        )));
    }
    Ok(Duration::from_nanos((NANOS_PER_SEC / steps_per_second) as u64))
}

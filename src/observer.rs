use std::time::Duration;

/// Instrumentation hook called by a [`Session`](crate::Session).
pub trait StepObserver {
    /// Called after every step with the size of its diff and how long it took.
    fn on_step(&mut self, generation: u64, diff_len: usize, took: Duration);

    fn on_reset(&mut self, _population: usize) {}
}

const WINDOW: usize = 42;

/// Rolling average over the most recent step durations.
#[derive(Clone, Debug)]
pub struct StepTimings {
    samples: [Duration; WINDOW],
    next: usize,
    filled: usize,
    last_diff_len: usize,
}

impl StepTimings {
    pub fn new() -> Self {
        StepTimings {
            samples: [Duration::ZERO; WINDOW],
            next: 0,
            filled: 0,
            last_diff_len: 0,
        }
    }

    /// Average over the recorded samples, `None` before the first step.
    pub fn average(&self) -> Option<Duration> {
        if self.filled == 0 {
            return None;
        }
        let total: Duration = self.samples[..self.filled].iter().sum();
        Some(total / self.filled as u32)
    }

    pub fn samples(&self) -> usize {
        self.filled
    }

    pub fn last_diff_len(&self) -> usize {
        self.last_diff_len
    }

    pub fn clear(&mut self) {
        *self = StepTimings::new();
    }
}

impl Default for StepTimings {
    fn default() -> Self {
        StepTimings::new()
    }
}

impl StepObserver for StepTimings {
    fn on_step(&mut self, _generation: u64, diff_len: usize, took: Duration) {
        self.samples[self.next] = took;
        self.next = (self.next + 1) % WINDOW;
        self.filled = (self.filled + 1).min(WINDOW);
        self.last_diff_len = diff_len;
    }

    fn on_reset(&mut self, _population: usize) {
        self.clear();
    }
}

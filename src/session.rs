use crate::{
    config::Config,
    engine::{LifeEngine, Seed},
    error::{LifeError, Result},
    observer::StepObserver,
    tick::TickScheduler,
    topology::{Coord, Dimensions},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

const MIN_RATE: f64 = 1.0;
const MAX_RATE: f64 = 60.0;
/// Most steps a single `advance` runs. Anything beyond is dropped.
const MAX_CATCH_UP: usize = 120;

/// Seeds each cell independently with a fixed probability of being alive.
#[derive(Clone, Debug)]
pub struct RandomSeeder {
    rng: StdRng,
    density: f64,
}

impl RandomSeeder {
    pub fn new(density: f64, seed: Option<u64>) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LifeError::InvalidDensity(density));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(RandomSeeder { rng, density })
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn predicate(&mut self) -> impl FnMut(Coord) -> bool + '_ {
        let density = self.density;
        move |_| self.rng.gen_bool(density)
    }
}

/// One engine driven by one fixed-timestep scheduler.
///
/// The render loop calls [`advance`](Session::advance) once per frame, then
/// redraws the cells in [`current_diff`](Session::current_diff) and uses
/// [`progress`](Session::progress) to interpolate between steps.
///
/// When several steps run before the renderer takes the diff, their diffs are
/// merged: a cell is listed once if its state differs from what the renderer
/// last saw, and dropped if it flipped back.
pub struct Session {
    engine: Box<dyn LifeEngine>,
    scheduler: TickScheduler,
    seeder: RandomSeeder,
    paused: bool,
    pending: Vec<Coord>,
    changed: FxHashSet<Coord>,
    full_redraw: bool,
    observer: Option<Box<dyn StepObserver>>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self> {
        let dims = config.dimensions()?;
        let rule = config.parse_rule()?;
        let scheduler = config.scheduler()?;
        let mut seeder = RandomSeeder::new(config.density, config.rng_seed)?;
        let engine = config
            .strategy
            .build(dims, rule, &mut seeder.predicate());
        debug!(
            rows = dims.rows(),
            cols = dims.cols(),
            strategy = ?config.strategy,
            %rule,
            steps_per_second = config.steps_per_second,
            "session created"
        );
        Ok(Self::with_engine(engine, scheduler, seeder))
    }

    /// Wraps an already seeded engine. Its current diff becomes the first
    /// thing to draw.
    pub fn with_engine(
        engine: Box<dyn LifeEngine>,
        scheduler: TickScheduler,
        seeder: RandomSeeder,
    ) -> Self {
        let mut session = Session {
            engine,
            scheduler,
            seeder,
            paused: false,
            pending: Vec::new(),
            changed: FxHashSet::default(),
            full_redraw: true,
            observer: None,
        };
        merge_diff(&mut session.pending, &mut session.changed, session.engine.diff());
        session
    }

    pub fn set_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observer = Some(observer);
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn StepObserver>> {
        self.observer.take()
    }

    /// Feeds `elapsed` to the scheduler and runs the steps that became due,
    /// at most `MAX_CATCH_UP` of them. Returns the number of steps run. Does
    /// nothing while paused.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if self.paused {
            return 0;
        }
        self.scheduler.advance(elapsed);
        self.run_due_steps()
    }

    /// Same as [`advance`](Session::advance), measuring the elapsed time
    /// from the previous call.
    pub fn advance_to(&mut self, now: Instant) -> Result<usize> {
        if self.paused {
            self.scheduler.mark(now)?;
            return Ok(0);
        }
        self.scheduler.observe(now)?;
        Ok(self.run_due_steps())
    }

    fn run_due_steps(&mut self) -> usize {
        let mut steps = 0;
        while steps < MAX_CATCH_UP && self.scheduler.consume_if_ready() {
            self.run_step();
            steps += 1;
        }
        let dropped = self.scheduler.skip_backlog();
        if dropped > 0 {
            warn!(steps, dropped, "simulation fell too far behind, dropping steps");
        } else if steps > 1 {
            warn!(steps, "simulation fell behind, catching up");
        }
        steps
    }

    fn run_step(&mut self) {
        let start = Instant::now();
        let diff = self.engine.step();
        let took = start.elapsed();
        let diff_len = diff.len();
        merge_diff(&mut self.pending, &mut self.changed, diff);

        let generation = self.engine.generation();
        trace!(generation, diff_len, ?took, "step");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_step(generation, diff_len, took);
        }
    }

    /// Runs one step now, paused or not.
    pub fn step_once(&mut self) {
        self.run_step();
    }

    /// Re-seeds the engine randomly and drops any pending time.
    pub fn reset(&mut self) {
        {
            let mut seed = self.seeder.predicate();
            self.engine.reset(&mut seed);
        }
        self.after_reset();
    }

    pub fn reset_with<F>(&mut self, seed: F)
    where
        F: FnMut(Coord) -> bool,
    {
        let mut seed = seed;
        self.reseed(&mut seed);
    }

    fn reseed(&mut self, seed: Seed<'_>) {
        self.engine.reset(seed);
        self.after_reset();
    }

    fn after_reset(&mut self) {
        self.pending.clear();
        self.changed.clear();
        merge_diff(&mut self.pending, &mut self.changed, self.engine.diff());
        self.scheduler.clear();
        self.full_redraw = true;

        let population = self.engine.population();
        debug!(population, "session reset");
        if let Some(observer) = self.observer.as_mut() {
            observer.on_reset(population);
        }
    }

    pub fn progress(&self) -> f64 {
        self.scheduler.progress()
    }

    pub fn current_diff(&self) -> &[Coord] {
        &self.pending
    }

    pub fn take_diff(&mut self) -> Vec<Coord> {
        self.changed.clear();
        self.full_redraw = false;
        std::mem::take(&mut self.pending)
    }

    /// True after a reset until the diff is taken: the display should be
    /// cleared before drawing the diff.
    pub fn needs_full_redraw(&self) -> bool {
        self.full_redraw
    }

    pub fn pause(&mut self) {
        if !self.paused {
            debug!("paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            debug!("resumed");
        }
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn rate(&self) -> f64 {
        self.scheduler.rate()
    }

    pub fn set_rate(&mut self, steps_per_second: f64) -> Result<()> {
        self.scheduler.set_rate(steps_per_second)?;
        debug!(steps_per_second, "rate changed");
        Ok(())
    }

    /// One more step per second, up to 60. A faster rate is left alone.
    pub fn speed_up(&mut self) -> Result<()> {
        if self.rate() >= MAX_RATE {
            return Ok(());
        }
        let rate = (self.rate().round() + 1.0).min(MAX_RATE);
        self.set_rate(rate)
    }

    /// One less step per second, down to 1. A slower rate is left alone.
    pub fn slow_down(&mut self) -> Result<()> {
        if self.rate() <= MIN_RATE {
            return Ok(());
        }
        let rate = (self.rate().round() - 1.0).max(MIN_RATE);
        self.set_rate(rate)
    }

    pub fn is_alive(&self, coord: Coord) -> Result<bool> {
        self.engine.is_alive(coord)
    }

    pub fn dimensions(&self) -> Dimensions {
        self.engine.dimensions()
    }

    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    pub fn population(&self) -> usize {
        self.engine.population()
    }

    pub fn engine(&self) -> &dyn LifeEngine {
        self.engine.as_ref()
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}

/// Adds one step's diff to the pending one. A cell already pending has now
/// flipped back and is removed.
fn merge_diff(pending: &mut Vec<Coord>, changed: &mut FxHashSet<Coord>, diff: &[Coord]) {
    if pending.is_empty() {
        pending.extend_from_slice(diff);
        changed.extend(diff.iter().copied());
        return;
    }
    let mut reverted = false;
    for &coord in diff {
        if changed.insert(coord) {
            pending.push(coord);
        } else {
            changed.remove(&coord);
            reverted = true;
        }
    }
    if reverted {
        pending.retain(|coord| changed.contains(coord));
    }
}

use crate::{
    engine::Strategy,
    error::{LifeError, Result},
    rule::Rule,
    tick::TickScheduler,
    topology::Dimensions,
};

/// Startup parameters of a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Config {
    pub rows: u32,
    pub cols: u32,
    pub steps_per_second: f64,
    pub strategy: Strategy,
    /// A Life-like rulestring such as `B3/S23`.
    pub rule: String,
    /// Fraction of cells alive after a random reset.
    pub density: f64,
    /// Seed for random resets. `None` draws one from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 100,
            cols: 100,
            steps_per_second: 12.0,
            strategy: Strategy::Dense,
            rule: "B3/S23".to_string(),
            density: 1.0 / 3.0,
            rng_seed: None,
        }
    }
}

impl Config {
    pub fn dimensions(&self) -> Result<Dimensions> {
        Dimensions::new(self.rows, self.cols)
    }

    pub fn parse_rule(&self) -> Result<Rule> {
        self.rule.parse()
    }

    pub fn scheduler(&self) -> Result<TickScheduler> {
        TickScheduler::from_rate(self.steps_per_second)
    }

    pub fn check_density(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.density) {
            Ok(())
        } else {
            Err(LifeError::InvalidDensity(self.density))
        }
    }

    /// Checks every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<()> {
        self.dimensions()?;
        self.parse_rule()?;
        self.scheduler()?;
        self.check_density()
    }
}

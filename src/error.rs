use ca_rules::ParseRuleError;
use thiserror::Error;

/// Errors reported by engines, schedulers and sessions.
///
/// All of them are input or configuration errors. Stepping and resetting
/// never fail once an engine has been built.
#[derive(Error, Debug)]
pub enum LifeError {
    #[error("invalid grid dimensions {rows}x{cols}: both must be at least 1")]
    InvalidDimensions { rows: u32, cols: u32 },

    #[error("invalid simulation period: {0}")]
    InvalidPeriod(String),

    #[error("elapsed time went backwards by {0:?}")]
    InvalidElapsed(std::time::Duration),

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    #[error("seeding density {0} is outside [0, 1]")]
    InvalidDensity(f64),

    #[error("invalid rule: {0}")]
    Rule(#[from] ParseRuleError),

    #[error("unsupported rule {0}: B0 rules are not supported")]
    UnsupportedRule(String),

    #[error("invalid RLE pattern: {0}")]
    Rle(#[from] ca_formats::rle::Error),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;

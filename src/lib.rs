#![allow(clippy::bool_assert_comparison)]

mod config;
mod dense;
mod engine;
mod error;
mod observer;
mod read;
mod rule;
mod session;
mod sparse;
mod tick;
mod topology;

pub use ca_formats;
pub use config::Config;
pub use dense::DenseLife;
pub use engine::{LifeEngine, Seed, Strategy};
pub use error::{LifeError, Result};
pub use observer::{StepObserver, StepTimings};
pub use read::Pattern;
pub use rule::Rule;
pub use session::{RandomSeeder, Session};
pub use sparse::{CellMeta, SparseLife};
pub use tick::{TickScheduler, TickState};
pub use topology::{neighbor_indices, neighbors, Coord, Dimensions};

use crate::{
    dense::DenseLife,
    error::Result,
    rule::Rule,
    sparse::SparseLife,
    topology::{Coord, Dimensions},
};

/// A seed predicate: called once per cell in row-major order, returns whether
/// the cell starts alive.
pub type Seed<'a> = &'a mut dyn FnMut(Coord) -> bool;

/// The capability shared by every state representation.
///
/// The diff returned by [`step`](LifeEngine::step) and
/// [`reset`](LifeEngine::reset) lists every cell whose state changed, once,
/// in scan order. It stays valid until the next call to either method.
pub trait LifeEngine {
    /// Advances one generation and returns the cells that changed.
    fn step(&mut self) -> &[Coord];

    /// Re-seeds every cell. The diff becomes the list of live cells, as if
    /// the grid had been empty before.
    fn reset(&mut self, seed: Seed<'_>) -> &[Coord];

    fn is_alive(&self, coord: Coord) -> Result<bool>;

    fn dimensions(&self) -> Dimensions;

    /// The diff produced by the most recent `step` or `reset`.
    fn diff(&self) -> &[Coord];

    fn population(&self) -> usize;

    /// Generations stepped since construction or the last reset.
    fn generation(&self) -> u64;

    fn rule(&self) -> Rule;
}

/// Records a toggle of `coord` in a diff without creating a duplicate.
pub(crate) fn toggle_in_diff(diff: &mut Vec<Coord>, coord: Coord) {
    match diff.iter().position(|&c| c == coord) {
        Some(pos) => {
            diff.remove(pos);
        }
        None => diff.push(coord),
    }
}

/// Which state representation to use.
///
/// Dense scans the whole grid every step. Sparse only visits live cells and
/// their neighbours, so it wins when occupancy is low.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Strategy {
    #[default]
    Dense,
    Sparse,
}

/// Below this expected occupancy the sparse representation is cheaper.
const SPARSE_THRESHOLD: f64 = 0.1;

impl Strategy {
    pub fn for_density(expected: f64) -> Self {
        if expected < SPARSE_THRESHOLD {
            Strategy::Sparse
        } else {
            Strategy::Dense
        }
    }

    pub fn build(self, dims: Dimensions, rule: Rule, seed: Seed<'_>) -> Box<dyn LifeEngine> {
        match self {
            Strategy::Dense => Box::new(DenseLife::with_rule(dims, rule, seed)),
            Strategy::Sparse => Box::new(SparseLife::with_rule(dims, rule, seed)),
        }
    }
}

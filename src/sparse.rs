use crate::{
    engine::{toggle_in_diff, LifeEngine, Seed},
    error::Result,
    rule::Rule,
    topology::{neighbors, Coord, Dimensions},
};
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Per-cell data carried by a live cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellMeta {
    /// When the cell was born (or seeded). Survivors keep it.
    pub created: Instant,
}

/// Only the live cells, kept in a hash map.
///
/// A step visits every live cell and its 8 neighbours, so the cost follows
/// the population instead of the grid area.
#[derive(Clone, Debug)]
pub struct SparseLife {
    dims: Dimensions,
    rule: Rule,
    cells: FxHashMap<Coord, CellMeta>,
    diff: Vec<Coord>,
    generation: u64,
}

impl SparseLife {
    pub fn new<F>(dims: Dimensions, seed: F) -> Self
    where
        F: FnMut(Coord) -> bool,
    {
        Self::with_rule(dims, Rule::life(), seed)
    }

    pub fn with_rule<F>(dims: Dimensions, rule: Rule, seed: F) -> Self
    where
        F: FnMut(Coord) -> bool,
    {
        let mut seed = seed;
        let mut life = SparseLife {
            dims,
            rule,
            cells: FxHashMap::default(),
            diff: Vec::new(),
            generation: 0,
        };
        life.seed(&mut seed);
        debug!(
            rows = dims.rows(),
            cols = dims.cols(),
            %rule,
            population = life.cells.len(),
            "sparse engine created"
        );
        life
    }

    fn seed(&mut self, seed: Seed<'_>) {
        let now = Instant::now();
        self.cells.clear();
        self.diff.clear();
        self.generation = 0;
        for row in 0..self.dims.rows() {
            for col in 0..self.dims.cols() {
                let coord = Coord::new(row, col);
                if seed(coord) {
                    self.cells.insert(coord, CellMeta { created: now });
                    self.diff.push(coord);
                }
            }
        }
    }

    /// Sets a single cell between steps, see [`DenseLife::set_alive`].
    ///
    /// [`DenseLife::set_alive`]: crate::DenseLife::set_alive
    pub fn set_alive(&mut self, coord: Coord, alive: bool) -> Result<()> {
        self.dims.check(coord)?;
        let changed = if alive {
            if self.cells.contains_key(&coord) {
                false
            } else {
                self.cells.insert(
                    coord,
                    CellMeta {
                        created: Instant::now(),
                    },
                );
                true
            }
        } else {
            self.cells.remove(&coord).is_some()
        };
        if changed {
            toggle_in_diff(&mut self.diff, coord);
        }
        Ok(())
    }

    pub fn created_at(&self, coord: Coord) -> Option<Instant> {
        self.cells.get(&coord).map(|meta| meta.created)
    }

    /// How long the cell has been alive as of `now`, or `None` if it is dead.
    pub fn age(&self, coord: Coord, now: Instant) -> Option<Duration> {
        self.created_at(coord)
            .map(|created| now.saturating_duration_since(created))
    }

    /// Live cells in no particular order.
    pub fn live_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.keys().copied()
    }
}

impl LifeEngine for SparseLife {
    fn step(&mut self) -> &[Coord] {
        let now = Instant::now();
        let dims = self.dims;
        let rule = self.rule;
        let mut next =
            FxHashMap::with_capacity_and_hasher(self.cells.len(), Default::default());
        // Live-neighbour counts of dead cells next to at least one live cell.
        let mut counts: FxHashMap<Coord, u8> = FxHashMap::default();

        self.diff.clear();
        for (&coord, &meta) in &self.cells {
            let mut alive_neighbors = 0;
            for neighbor in neighbors(coord, dims) {
                if self.cells.contains_key(&neighbor) {
                    alive_neighbors += 1;
                } else {
                    *counts.entry(neighbor).or_insert(0) += 1;
                }
            }
            if rule.next_state(true, alive_neighbors) {
                next.insert(coord, meta);
            } else {
                self.diff.push(coord);
            }
        }
        for (coord, n) in counts {
            if rule.next_state(false, n) {
                next.insert(coord, CellMeta { created: now });
                self.diff.push(coord);
            }
        }

        self.cells = next;
        self.generation += 1;
        &self.diff
    }

    fn reset(&mut self, seed: Seed<'_>) -> &[Coord] {
        self.seed(seed);
        &self.diff
    }

    fn is_alive(&self, coord: Coord) -> Result<bool> {
        self.dims.check(coord)?;
        Ok(self.cells.contains_key(&coord))
    }

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn diff(&self) -> &[Coord] {
        &self.diff
    }

    fn population(&self) -> usize {
        self.cells.len()
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn rule(&self) -> Rule {
        self.rule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn sorted(cells: impl IntoIterator<Item = Coord>) -> Vec<Coord> {
        let mut cells: Vec<Coord> = cells.into_iter().collect();
        cells.sort();
        cells
    }

    #[test]
    fn test_block_is_still() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(6, 6)?;
        let mut life = SparseLife::new(dims, |c| {
            (1..=2).contains(&c.row) && (1..=2).contains(&c.col)
        });
        assert!(life.step().is_empty());
        assert_eq!(life.population(), 4);
        Ok(())
    }

    #[test]
    fn test_blinker() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = SparseLife::new(dims, |c| c.row == 2 && (1..=3).contains(&c.col));
        let initial = sorted(life.live_cells());

        let diff = life.step().to_vec();
        // Deaths come first, then births.
        assert_eq!(
            sorted(diff[..2].iter().copied()),
            vec![Coord::new(2, 1), Coord::new(2, 3)]
        );
        assert_eq!(
            sorted(diff[2..].iter().copied()),
            vec![Coord::new(1, 2), Coord::new(3, 2)]
        );

        life.step();
        assert_eq!(sorted(life.live_cells()), initial);
        Ok(())
    }

    #[test]
    fn test_glider_wraps() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(8, 8)?;
        let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
        let mut life = SparseLife::new(dims, |c| glider.contains(&(c.row, c.col)));
        // A glider moves one cell diagonally every 4 generations, so after
        // 32 it is back where it started.
        for _ in 0..32 {
            life.step();
        }
        let expected = sorted(glider.iter().map(|&c| Coord::from(c)));
        assert_eq!(sorted(life.live_cells()), expected);
        Ok(())
    }

    #[test]
    fn test_survivors_keep_creation_time() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = SparseLife::new(dims, |c| c.row == 2 && (1..=3).contains(&c.col));
        let center = Coord::new(2, 2);
        let created = life.created_at(center);
        assert!(created.is_some());
        life.step();
        assert_eq!(life.created_at(center), created);
        assert_eq!(life.created_at(Coord::new(2, 1)), None);
        assert!(life.created_at(Coord::new(1, 2)) >= created);
        assert!(life.age(center, Instant::now()).is_some());
        Ok(())
    }

    #[test]
    fn test_reset_and_set_alive() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(4, 4)?;
        let mut life = SparseLife::new(dims, |_| true);
        assert_eq!(life.population(), 16);
        assert_eq!(life.diff().len(), 16);
        let diff = life.reset(&mut |c| c.col == 3).to_vec();
        assert_eq!(
            diff,
            vec![
                Coord::new(0, 3),
                Coord::new(1, 3),
                Coord::new(2, 3),
                Coord::new(3, 3)
            ]
        );
        life.set_alive(Coord::new(0, 3), false)?;
        assert_eq!(life.diff().len(), 3);
        assert_eq!(life.is_alive(Coord::new(0, 3))?, false);
        assert!(life.is_alive(Coord::new(0, 4)).is_err());
        Ok(())
    }
}

use crate::{
    engine::{toggle_in_diff, LifeEngine, Seed},
    error::Result,
    rule::Rule,
    topology::{Coord, Dimensions},
};
use tracing::debug;

/// One `bool` per cell, in two row-major buffers that take turns being the
/// current generation.
///
/// Both buffers are allocated once, at construction, with `rows * cols`
/// entries and never resized.
#[derive(Clone, Debug)]
pub struct DenseLife {
    dims: Dimensions,
    rule: Rule,
    buffers: [Vec<bool>; 2],
    /// Index into `buffers` of the current generation; the other buffer is
    /// scratch space for the next step.
    current: usize,
    diff: Vec<Coord>,
    generation: u64,
}

impl DenseLife {
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
        let area = dims.area();
        let mut life = DenseLife {
            dims,
            rule,
            buffers: [vec![false; area], vec![false; area]],
            current: 0,
            diff: Vec::new(),
            generation: 0,
        };
        life.seed(&mut seed);
        debug!(
            rows = dims.rows(),
            cols = dims.cols(),
            %rule,
            population = life.diff.len(),
            "dense engine created"
        );
        life
    }

    fn seed(&mut self, seed: Seed<'_>) {
        let dims = self.dims;
        self.diff.clear();
        self.generation = 0;
        let current = &mut self.buffers[self.current];
        for (i, cell) in current.iter_mut().enumerate() {
            let coord = dims.coord(i);
            *cell = seed(coord);
            if *cell {
                self.diff.push(coord);
            }
        }
    }

    /// Sets a single cell between steps. A real change is recorded in the
    /// current diff; setting it back removes the entry again.
    pub fn set_alive(&mut self, coord: Coord, alive: bool) -> Result<()> {
        self.dims.check(coord)?;
        let i = self.dims.index(coord);
        let cell = &mut self.buffers[self.current][i];
        if *cell != alive {
            *cell = alive;
            toggle_in_diff(&mut self.diff, coord);
        }
        Ok(())
    }

    pub fn live_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        let dims = self.dims;
        self.buffers[self.current]
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(i, _)| dims.coord(i))
    }
}

impl LifeEngine for DenseLife {
    fn step(&mut self) -> &[Coord] {
        let dims = self.dims;
        let rule = self.rule;
        let cols = dims.cols() as usize;
        let (front, back) = self.buffers.split_at_mut(1);
        let (current, next) = if self.current == 0 {
            (&front[0], &mut back[0])
        } else {
            (&back[0], &mut front[0])
        };

        self.diff.clear();
        for row in 0..dims.rows() {
            let up = dims.up(row) as usize * cols;
            let mid = row as usize * cols;
            let down = dims.down(row) as usize * cols;
            for col in 0..dims.cols() {
                let left = dims.left(col) as usize;
                let center = col as usize;
                let right = dims.right(col) as usize;

                let neighbors = current[up + left] as u8
                    + current[up + center] as u8
                    + current[up + right] as u8
                    + current[mid + left] as u8
                    + current[mid + right] as u8
                    + current[down + left] as u8
                    + current[down + center] as u8
                    + current[down + right] as u8;

                let was_alive = current[mid + center];
                let alive = rule.next_state(was_alive, neighbors);
                next[mid + center] = alive;
                if alive != was_alive {
                    self.diff.push(Coord::new(row, col));
                }
            }
        }

        self.current ^= 1;
        self.generation += 1;
        &self.diff
    }

    fn reset(&mut self, seed: Seed<'_>) -> &[Coord] {
        self.seed(seed);
        &self.diff
    }

    fn is_alive(&self, coord: Coord) -> Result<bool> {
        self.dims.check(coord)?;
        Ok(self.buffers[self.current][self.dims.index(coord)])
    }

    fn dimensions(&self) -> Dimensions {
        self.dims
    }

    fn diff(&self) -> &[Coord] {
        &self.diff
    }

    fn population(&self) -> usize {
        self.buffers[self.current].iter().filter(|&&alive| alive).count()
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

    fn blinker(dims: Dimensions) -> DenseLife {
        DenseLife::new(dims, |c| c.row == 2 && (1..=3).contains(&c.col))
    }

    #[test]
    fn test_block_is_still() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(4, 4)?;
        let mut life = DenseLife::new(dims, |c| {
            (1..=2).contains(&c.row) && (1..=2).contains(&c.col)
        });
        assert_eq!(life.diff().len(), 4);
        assert!(life.step().is_empty());
        assert_eq!(life.population(), 4);
        Ok(())
    }

    #[test]
    fn test_blinker() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = blinker(dims);
        let initial: Vec<Coord> = life.live_cells().collect();

        let mut diff = life.step().to_vec();
        diff.sort();
        assert_eq!(
            diff,
            vec![
                Coord::new(1, 2),
                Coord::new(2, 1),
                Coord::new(2, 3),
                Coord::new(3, 2)
            ]
        );
        let vertical: Vec<Coord> = life.live_cells().collect();
        assert_eq!(vertical, vec![Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2)]);

        assert_eq!(life.step().len(), 4);
        assert_eq!(life.live_cells().collect::<Vec<_>>(), initial);
        assert_eq!(life.generation(), 2);
        Ok(())
    }

    #[test]
    fn test_diff_is_scan_ordered() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = blinker(dims);
        let diff = life.step().to_vec();
        let mut sorted = diff.clone();
        sorted.sort();
        assert_eq!(diff, sorted);
        Ok(())
    }

    #[test]
    fn test_wraps_across_edges() -> Result<(), Box<dyn Error>> {
        // A blinker straddling the left/right edge.
        let dims = Dimensions::new(5, 5)?;
        let mut life = DenseLife::new(dims, |c| c.row == 2 && (c.col == 4 || c.col <= 1));
        life.step();
        let alive: Vec<Coord> = life.live_cells().collect();
        assert_eq!(alive, vec![Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0)]);
        Ok(())
    }

    #[test]
    fn test_single_row_counts_aliases() -> Result<(), Box<dyn Error>> {
        // On a 1x3 torus each cell sees itself twice and each other cell
        // three times. A lone live cell gives its neighbours 3: births.
        let dims = Dimensions::new(1, 3)?;
        let mut life = DenseLife::new(dims, |c| c.col == 0);
        let mut diff = life.step().to_vec();
        diff.sort();
        // The seed cell sees only itself (2 neighbours) and survives.
        assert_eq!(diff, vec![Coord::new(0, 1), Coord::new(0, 2)]);
        assert_eq!(life.population(), 3);
        Ok(())
    }

    #[test]
    fn test_reset() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = blinker(dims);
        life.step();
        let diff = life.reset(&mut |c| c == Coord::new(0, 0)).to_vec();
        assert_eq!(diff, vec![Coord::new(0, 0)]);
        assert_eq!(life.generation(), 0);
        assert_eq!(life.is_alive(Coord::new(2, 2))?, false);
        assert_eq!(life.is_alive(Coord::new(0, 0))?, true);
        Ok(())
    }

    #[test]
    fn test_set_alive() -> Result<(), Box<dyn Error>> {
        let dims = Dimensions::new(5, 5)?;
        let mut life = DenseLife::new(dims, |_| false);
        life.set_alive(Coord::new(3, 3), true)?;
        assert_eq!(life.diff(), &[Coord::new(3, 3)]);
        life.set_alive(Coord::new(3, 3), false)?;
        assert!(life.diff().is_empty());
        assert!(life.set_alive(Coord::new(5, 0), true).is_err());
        Ok(())
    }
}

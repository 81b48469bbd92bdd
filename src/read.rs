use crate::{
    error::Result,
    rule::Rule,
    topology::{Coord, Dimensions},
};
use ca_formats::{rle::Rle, Input};
use rustc_hash::FxHashSet;

/// The live cells of a pattern file, relative to the pattern's top-left
/// corner, as `(x, y)` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    cells: Vec<(i64, i64)>,
    rule: Option<Rule>,
}

impl Pattern {
    pub fn from_rle<I: Input>(rle: Rle<I>) -> Result<Self> {
        let rule = rle
            .header_data()
            .and_then(|header| header.rule.as_deref())
            .and_then(|rulestring| rulestring.parse().ok());
        let mut cells = Vec::new();
        for cell in rle {
            cells.push(cell?.position);
        }
        Ok(Pattern { cells, rule })
    }

    pub fn parse_rle(text: &str) -> Result<Self> {
        Self::from_rle(Rle::new(text)?)
    }

    pub fn cells(&self) -> &[(i64, i64)] {
        &self.cells
    }

    /// The rule named in the file header, if it names one we support.
    pub fn rule(&self) -> Option<Rule> {
        self.rule
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    /// A seed predicate that places the pattern's top-left corner at
    /// `origin`. Cells that fall off an edge wrap around.
    pub fn seed(&self, dims: Dimensions, origin: Coord) -> impl FnMut(Coord) -> bool {
        let live: FxHashSet<Coord> = self
            .cells
            .iter()
            .map(|&(x, y)| dims.wrap(origin.row as i64 + y, origin.col as i64 + x))
            .collect();
        move |coord| live.contains(&coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{engine::LifeEngine, DenseLife};
    use std::error::Error;

    const GLIDER: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbo$2bo$3o!\n";

    #[test]
    fn test_read_rle() -> Result<(), Box<dyn Error>> {
        let pattern = Pattern::parse_rle(GLIDER)?;
        assert_eq!(pattern.population(), 5);
        assert_eq!(pattern.rule(), Some(Rule::life()));
        let mut cells = pattern.cells().to_vec();
        cells.sort();
        assert_eq!(cells, vec![(0, 2), (1, 0), (1, 2), (2, 1), (2, 2)]);
        Ok(())
    }

    #[test]
    fn test_seed_wraps() -> Result<(), Box<dyn Error>> {
        let pattern = Pattern::parse_rle(GLIDER)?;
        let dims = Dimensions::new(4, 4)?;
        let life = DenseLife::new(dims, pattern.seed(dims, Coord::new(2, 3)));
        assert_eq!(life.population(), 5);
        // (x, y) = (1, 0) lands on row 2, col 4 -> col 0.
        assert_eq!(life.is_alive(Coord::new(2, 0))?, true);
        // (x, y) = (2, 2) lands on row 4 -> 0, col 5 -> 1.
        assert_eq!(life.is_alive(Coord::new(0, 1))?, true);
        Ok(())
    }
}

use crate::error::{LifeError, Result};
use ca_rules::ParseLife;
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// A totalistic Life-like rule, stored as birth and survival tables indexed
/// by the number of live neighbours.
///
/// Every constructor rejects B0 rules: a dead cell with no live neighbours
/// is never visited by the sparse engine, so births on zero neighbours
/// cannot be honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    birth: [bool; 9],
    survival: [bool; 9],
}

/// Unchecked tables straight out of the rulestring parser.
struct Tables {
    birth: [bool; 9],
    survival: [bool; 9],
}

impl ParseLife for Tables {
    fn from_bs(b: Vec<u8>, s: Vec<u8>) -> Self {
        Tables {
            birth: table(&b),
            survival: table(&s),
        }
    }
}

fn table(counts: &[u8]) -> [bool; 9] {
    let mut table = [false; 9];
    counts
        .iter()
        .filter(|&&n| n <= 8)
        .for_each(|&n| table[n as usize] = true);
    table
}

impl Rule {
    /// Builds a rule from the neighbour counts that cause a birth and those
    /// that let a cell survive. Counts above 8 are ignored.
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self> {
        Rule {
            birth: table(birth),
            survival: table(survival),
        }
        .checked()
    }

    fn checked(self) -> Result<Self> {
        if self.birth[0] {
            return Err(LifeError::UnsupportedRule(self.to_string()));
        }
        Ok(self)
    }

    /// Conway's Game of Life, B3/S23.
    pub fn life() -> Self {
        Rule {
            birth: [false, false, false, true, false, false, false, false, false],
            survival: [false, false, true, true, false, false, false, false, false],
        }
    }

    /// The state of a cell in the next generation.
    #[inline]
    pub fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        let n = neighbors.min(8) as usize;
        if alive {
            self.survival[n]
        } else {
            self.birth[n]
        }
    }

    pub fn is_birth(&self, neighbors: u8) -> bool {
        self.next_state(false, neighbors)
    }

    pub fn is_survival(&self, neighbors: u8) -> bool {
        self.next_state(true, neighbors)
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::life()
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("B")?;
        for n in (0..9).filter(|&n| self.birth[n]) {
            write!(f, "{}", n)?;
        }
        f.write_str("/S")?;
        for n in (0..9).filter(|&n| self.survival[n]) {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl FromStr for Rule {
    type Err = LifeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Tables { birth, survival } = Tables::parse_rule(s)?;
        Rule { birth, survival }.checked()
    }
}

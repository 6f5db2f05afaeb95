//! One-dimensional binary cellular automaton
//!
//! Cells sit on a ring: the left neighbour of cell 0 is the last cell and the
//! right neighbour of the last cell is cell 0. Every generation is computed
//! from the previous one in full before it replaces the current state.

use crate::error::{Error, Result};

/// Elementary rule: an 8-entry lookup table indexed by the (left, center, right) neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct Rule(u8);

impl Rule {
    pub const fn new(rule: u8) -> Self {
        Self(rule)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Next value of the center cell
    #[inline(always)]
    pub fn apply(self, left: bool, center: bool, right: bool) -> bool {
        let index = (left as u8) << 2 | (center as u8) << 1 | right as u8;
        (self.0 >> index) & 1 == 1
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self(crate::params::DEFAULT_RULE)
    }
}

impl From<u8> for Rule {
    fn from(rule: u8) -> Self {
        Self(rule)
    }
}

impl TryFrom<u32> for Rule {
    type Error = Error;

    fn try_from(rule: u32) -> Result<Self> {
        u8::try_from(rule)
            .map(Self)
            .map_err(|_| Error::InvalidRule(rule))
    }
}

impl From<Rule> for u32 {
    fn from(rule: Rule) -> Self {
        rule.0 as u32
    }
}

impl core::fmt::Display for Rule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "rule {}", self.0)
    }
}

/// Ring of cells evolved one generation at a time
#[derive(Debug, Clone)]
pub struct CellularAutomaton {
    cells: Vec<bool>,
    /// Scratch buffer for the next generation, reused across calls
    next: Vec<bool>,
}

impl CellularAutomaton {
    pub fn new(cells: Vec<bool>) -> Self {
        let width = cells.len();
        Self {
            cells,
            next: vec![false; width],
        }
    }

    /// Build a ring of `width` cells by repeating `bits` cyclically
    ///
    /// Fails with [`Error::EmptyInput`] when `bits` is empty.
    pub fn from_bits(bits: &[bool], width: usize) -> Result<Self> {
        let mut ca = Self::new(Vec::new());
        ca.reseed(bits, width)?;
        Ok(ca)
    }

    /// Refill this automaton in place, keeping its allocations
    pub(crate) fn reseed(&mut self, bits: &[bool], width: usize) -> Result<()> {
        if bits.is_empty() {
            return Err(Error::EmptyInput);
        }
        self.cells.clear();
        self.cells.extend(bits.iter().copied().cycle().take(width));
        self.next.resize(width, false);
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Advance one generation under `rule`
    pub fn evolve(&mut self, rule: Rule) {
        let width = self.cells.len();
        if width == 0 {
            return;
        }
        self.next.resize(width, false);

        for i in 0..width {
            let left = self.cells[(i + width - 1) % width];
            let center = self.cells[i];
            let right = self.cells[(i + 1) % width];
            self.next[i] = rule.apply(left, center, right);
        }

        core::mem::swap(&mut self.cells, &mut self.next);
    }

    /// Advance `generations` generations under `rule`
    pub fn evolve_n(&mut self, rule: Rule, generations: usize) {
        for _ in 0..generations {
            self.evolve(rule);
        }
    }
}

impl PartialEq for CellularAutomaton {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells
    }
}

impl Eq for CellularAutomaton {}

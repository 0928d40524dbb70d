use crate::geometry::Side;
use fastrand::Rng;

/// Source of the two uniform choices made when a target spawns.
pub trait SpawnRandom {
    fn pick_side(&mut self) -> Side;

    /// Index into a row list of length `row_count` (always non-zero).
    fn pick_row(&mut self, row_count: usize) -> usize;
}

impl SpawnRandom for Rng {
    fn pick_side(&mut self) -> Side {
        if self.bool() { Side::Left } else { Side::Right }
    }

    fn pick_row(&mut self, row_count: usize) -> usize {
        self.usize(0..row_count)
    }
}

/// Replays a fixed list of spawns, cycling when exhausted.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedSpawns {
    script: Vec<(Side, usize)>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedSpawns {
    pub(crate) fn new(script: Vec<(Side, usize)>) -> Self {
        assert!(!script.is_empty(), "spawn script must not be empty");
        Self { script, cursor: 0 }
    }

    fn current(&self) -> (Side, usize) {
        self.script[self.cursor % self.script.len()]
    }
}

#[cfg(test)]
impl SpawnRandom for ScriptedSpawns {
    fn pick_side(&mut self) -> Side {
        self.current().0
    }

    fn pick_row(&mut self, row_count: usize) -> usize {
        let row = self.current().1.min(row_count - 1);
        self.cursor += 1;
        row
    }
}

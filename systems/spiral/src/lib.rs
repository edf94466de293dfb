#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure spiral path generator laying out campaign target columns.
//!
//! The walk starts at the origin column, moves one cell along the base
//! facing, and keeps walking the perimeter of the current ring, rotating 90
//! degrees whenever the next step would leave it. Closing a lap — rotating
//! back onto the base facing — grows the ring by one, which yields the
//! classic outward square spiral: ring 1 holds 8 columns, ring 2 holds 16,
//! and so on. The origin itself is never part of the path.

use seedfall_core::{Direction, GridOffset};

/// Iterator over the offsets of an outward square spiral.
///
/// Deterministic for identical `(base, clockwise, max_steps)` inputs and
/// exactly `max_steps` items long.
#[derive(Clone, Debug)]
pub struct SpiralPath {
    base: Direction,
    facing: Direction,
    clockwise: bool,
    ring: i32,
    cursor: GridOffset,
    remaining: u32,
}

impl SpiralPath {
    /// Creates a spiral walk starting one step along `base` from the origin.
    #[must_use]
    pub const fn new(base: Direction, clockwise: bool, max_steps: u32) -> Self {
        Self {
            base,
            facing: base,
            clockwise,
            ring: 1,
            cursor: GridOffset::new(0, 0),
            remaining: max_steps,
        }
    }
}

impl Iterator for SpiralPath {
    type Item = GridOffset;

    fn next(&mut self) -> Option<GridOffset> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let candidate = self.cursor.stepped(self.facing);
        if candidate.x().abs() <= self.ring && candidate.z().abs() <= self.ring {
            self.cursor = candidate;
        } else {
            self.facing = self.facing.rotated_y(self.clockwise);
            if self.facing == self.base {
                self.ring += 1;
            }
            self.cursor = self.cursor.stepped(self.facing);
        }
        Some(self.cursor)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SpiralPath {}

/// Collects the ordered spiral offsets for the provided parameters.
#[must_use]
pub fn generate(base: Direction, clockwise: bool, max_steps: u32) -> Vec<GridOffset> {
    SpiralPath::new(base, clockwise, max_steps).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_yield_an_empty_path() {
        assert!(generate(Direction::North, true, 0).is_empty());
    }

    #[test]
    fn path_length_always_matches_the_budget() {
        for steps in [1, 7, 8, 9, 24, 25, 120] {
            assert_eq!(generate(Direction::East, true, steps).len(), steps as usize);
        }
    }

    #[test]
    fn size_hint_is_exact() {
        let path = SpiralPath::new(Direction::South, false, 12);
        assert_eq!(path.len(), 12);
    }
}

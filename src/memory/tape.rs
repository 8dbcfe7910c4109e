//! Tape (memory state) implementation
//!
//! A fixed number of cells with a movable pointer. Every bound is exposed
//! as an explicit predicate (`can_move_next`, `can_increment`, ...) that the
//! engine consults before mutating; the mutators themselves never clamp.
//!
//! # Overflow Modes
//!
//! The tape itself only knows the signed 16-bit ceiling. Byte wraparound is
//! applied by the engine through [`Tape::set`], which keeps the tape usable
//! unchanged under both [`OverflowMode`]s.

use crate::interpreter::constants::{BYTE_MAX, SHORT_MAX};
use std::fmt;
use std::ops::Index;

/// Policy for cell values reaching a numeric bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowMode {
    /// Cells behave as non-negative signed 16-bit values; crossing a bound fails
    #[default]
    ShortNoOverflow,
    /// Cells wrap modulo 256
    ByteOverflow,
}

impl fmt::Display for OverflowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowMode::ShortNoOverflow => write!(f, "short"),
            OverflowMode::ByteOverflow => write!(f, "byte"),
        }
    }
}

/// The interpreter's bounded memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<u16>,
    position: usize,
}

impl Tape {
    /// Create a zeroed tape with `size` cells
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero; configurations are validated before a tape
    /// is ever created.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "tape size must be positive");
        Tape {
            cells: vec![0; size],
            position: 0,
        }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a tape has at least one cell
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Current pointer index
    pub fn position(&self) -> usize {
        self.position
    }

    /// All cell values
    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    pub fn can_move_next(&self) -> bool {
        self.position + 1 < self.cells.len()
    }

    pub fn can_move_back(&self) -> bool {
        self.position > 0
    }

    pub fn move_next(&mut self) {
        debug_assert!(self.can_move_next());
        self.position += 1;
    }

    pub fn move_back(&mut self) {
        debug_assert!(self.can_move_back());
        self.position -= 1;
    }

    pub fn can_increment(&self) -> bool {
        self.current_value() < SHORT_MAX
    }

    pub fn can_decrement(&self) -> bool {
        self.current_value() > 0
    }

    /// Whether the current cell holds the largest byte value
    pub fn is_at_byte_max(&self) -> bool {
        self.current_value() == BYTE_MAX
    }

    pub fn increment(&mut self) {
        debug_assert!(self.can_increment());
        self.cells[self.position] += 1;
    }

    pub fn decrement(&mut self) {
        debug_assert!(self.can_decrement());
        self.cells[self.position] -= 1;
    }

    /// Overwrite the current cell
    pub fn set(&mut self, value: u16) {
        self.cells[self.position] = value;
    }

    pub fn reset_to_zero(&mut self) {
        self.set(0);
    }

    /// Reduce every cell modulo 256
    pub fn wrap_to_bytes(&mut self) {
        for cell in &mut self.cells {
            *cell %= BYTE_MAX + 1;
        }
    }

    pub fn current_value(&self) -> u16 {
        self.cells[self.position]
    }

    /// The current cell interpreted as a character
    pub fn current_as_char(&self) -> char {
        // Every u16 except the surrogate range is a valid scalar value
        char::from_u32(u32::from(self.current_value())).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

impl Index<usize> for Tape {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.cells[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_is_zeroed() {
        let tape = Tape::new(8);
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.position(), 0);
        assert!(tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_pointer_bounds() {
        let mut tape = Tape::new(2);
        assert!(!tape.can_move_back());
        assert!(tape.can_move_next());
        tape.move_next();
        assert!(!tape.can_move_next());
        assert!(tape.can_move_back());
        tape.move_back();
        assert_eq!(tape.position(), 0);
    }

    #[test]
    fn test_value_bounds() {
        let mut tape = Tape::new(1);
        assert!(!tape.can_decrement());
        tape.set(SHORT_MAX);
        assert!(!tape.can_increment());
        tape.decrement();
        assert!(tape.can_increment());
    }

    #[test]
    fn test_byte_max() {
        let mut tape = Tape::new(1);
        tape.set(254);
        assert!(!tape.is_at_byte_max());
        tape.increment();
        assert!(tape.is_at_byte_max());
        tape.reset_to_zero();
        assert_eq!(tape.current_value(), 0);
    }

    #[test]
    fn test_wrap_to_bytes() {
        let mut tape = Tape::new(3);
        tape.set(300);
        tape.move_next();
        tape.set(BYTE_MAX);
        tape.move_next();
        tape.set(512);
        tape.wrap_to_bytes();
        assert_eq!(tape.cells(), &[44, 255, 0]);
        assert_eq!(tape.position(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Tape::new(4);
        original.set(7);
        let mut copy = original.clone();
        copy.move_next();
        copy.set(3);
        assert_eq!(original.position(), 0);
        assert_eq!(original[1], 0);
        assert_eq!(copy[0], 7);
    }

    #[test]
    fn test_current_as_char() {
        let mut tape = Tape::new(1);
        tape.set(u16::from(b'a'));
        assert_eq!(tape.current_as_char(), 'a');
        tape.set(0xD800);
        assert_eq!(tape.current_as_char(), char::REPLACEMENT_CHARACTER);
    }
}

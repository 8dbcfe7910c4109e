//! Memory model for the PBrain interpreter
//!
//! This module provides the state a program runs against:
//! - [`tape`]: The cell array with its pointer and the [`OverflowMode`] policy
//! - [`buffers`]: The stdin queue and the capped stdout accumulator
//!
//! # Cell Values
//!
//! Cells are stored as `u16`. Under [`OverflowMode::ShortNoOverflow`] they
//! range over `0..=i16::MAX`; under [`OverflowMode::ByteOverflow`] they stay
//! within `0..=255` because every operation that would leave that range
//! wraps instead.

pub mod buffers;
pub mod tape;

pub use buffers::{Stdin, Stdout};
pub use tape::{OverflowMode, Tape};

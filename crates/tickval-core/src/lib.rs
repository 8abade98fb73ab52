//! # Tickval Core
//!
//! Market-data tick sanity checks.
//!
//! ## Design Principles
//! - Pure predicates, no state
//! - No allocation, no logging
//! - Plain-old-data tick records shared with C hosts
//! - `no_std` so the same code links into the exported library

#![cfg_attr(not(test), no_std)]

pub mod tick;
pub mod verdict;
pub mod record;

pub use tick::Tick;
pub use verdict::{TickVerdict, validate, validate_tick};
pub use record::{ParseError, TickReader, decode_tick, TICK_RECORD_SIZE};

//! Tick record.
//!
//! The layout is fixed at 32 bytes so hosts can hand arrays of ticks
//! straight to the exported library.

use bytemuck::{Pod, Zeroable};
use core::mem::size_of;

use crate::verdict::{validate, TickVerdict};

/// A single market-data update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Tick {
    /// Best bid price.
    pub bid: f64,                   // 8 bytes
    /// Best ask price.
    pub ask: f64,                   // 8 bytes
    /// Timestamp, seconds since the Unix epoch.
    pub time: f64,                  // 8 bytes
    /// Pre-computed spread in points.
    pub spread: i32,                // 4 bytes
    pub _padding: u32,              // 4 bytes
}

const _: () = assert!(size_of::<Tick>() == 32);

// SAFETY: repr(C), all fields are Pod and the explicit padding field
// leaves no implicit padding bytes.
unsafe impl Pod for Tick {}
unsafe impl Zeroable for Tick {}

impl Tick {
    /// Create a tick.
    #[inline(always)]
    pub const fn new(bid: f64, ask: f64, time: f64, spread: i32) -> Self {
        Self {
            bid,
            ask,
            time,
            spread,
            _padding: 0,
        }
    }

    /// Validate this tick.
    #[inline(always)]
    pub fn verdict(&self) -> TickVerdict {
        validate(self.bid, self.ask, self.time, self.spread)
    }

    /// Check if this tick passes validation.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.verdict().is_valid()
    }

    /// Ask minus bid, in price units.
    #[inline(always)]
    pub fn quoted_width(&self) -> f64 {
        self.ask - self.bid
    }

    /// Mid price.
    #[inline(always)]
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) * 0.5
    }

    /// Wire form of the record.
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

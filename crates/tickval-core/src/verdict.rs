//! Tick validation.
//!
//! Checks run in a fixed order (bid, ask against bid, spread) and the
//! first failure is reported. `validate_tick` collapses the verdict to
//! the boolean the exported library has always returned.

/// Outcome of validating a single tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TickVerdict {
    /// All checks passed.
    Valid = 0,
    /// Bid is zero, negative or NaN.
    NonPositiveBid = 1,
    /// Ask is not strictly above bid (crossed, locked or NaN).
    AskNotAboveBid = 2,
    /// Spread in points is zero or negative.
    NonPositiveSpread = 3,
}

impl TickVerdict {
    /// Every verdict, in code order.
    pub const ALL: [TickVerdict; 4] = [
        TickVerdict::Valid,
        TickVerdict::NonPositiveBid,
        TickVerdict::AskNotAboveBid,
        TickVerdict::NonPositiveSpread,
    ];

    /// Check if the tick passed.
    #[inline(always)]
    pub const fn is_valid(self) -> bool {
        matches!(self, TickVerdict::Valid)
    }

    /// Numeric code as seen across the C boundary.
    #[inline(always)]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Short human-readable label.
    pub const fn as_str(self) -> &'static str {
        match self {
            TickVerdict::Valid => "valid",
            TickVerdict::NonPositiveBid => "non-positive bid",
            TickVerdict::AskNotAboveBid => "ask not above bid",
            TickVerdict::NonPositiveSpread => "non-positive spread",
        }
    }
}

impl TryFrom<u8> for TickVerdict {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0 => Ok(TickVerdict::Valid),
            1 => Ok(TickVerdict::NonPositiveBid),
            2 => Ok(TickVerdict::AskNotAboveBid),
            3 => Ok(TickVerdict::NonPositiveSpread),
            _ => Err(()),
        }
    }
}

impl core::fmt::Display for TickVerdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a tick and report the first failed check.
///
/// `time` is accepted but does not take part in validation. Comparisons
/// are written so that NaN fails each check.
#[inline]
pub fn validate(bid: f64, ask: f64, time: f64, spread: i32) -> TickVerdict {
    let _ = time;

    if !(bid > 0.0) {
        return TickVerdict::NonPositiveBid;
    }

    if !(ask > bid) {
        return TickVerdict::AskNotAboveBid;
    }

    if spread <= 0 {
        return TickVerdict::NonPositiveSpread;
    }

    TickVerdict::Valid
}

/// Boolean form of [`validate`].
#[inline]
pub fn validate_tick(bid: f64, ask: f64, time: f64, spread: i32) -> bool {
    validate(bid, ask, time, spread).is_valid()
}

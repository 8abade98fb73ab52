//! Non-empty view over a tick capture.

use sha2::{Digest, Sha256};
use tickval_core::Tick;

use crate::QualityError;

/// A borrowed, non-empty run of ticks in capture order.
#[derive(Debug, Clone, Copy)]
pub struct TickSeries<'a> {
    ticks: &'a [Tick],
}

impl<'a> TickSeries<'a> {
    pub fn new(ticks: &'a [Tick]) -> Result<Self, QualityError> {
        if ticks.is_empty() {
            return Err(QualityError::EmptySeries);
        }
        Ok(Self { ticks })
    }

    #[inline]
    pub fn ticks(&self) -> &'a [Tick] {
        self.ticks
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[inline]
    pub fn first(&self) -> &'a Tick {
        &self.ticks[0]
    }

    #[inline]
    pub fn last(&self) -> &'a Tick {
        &self.ticks[self.ticks.len() - 1]
    }

    /// Time between consecutive ticks, in seconds.
    pub fn intervals(&self) -> impl Iterator<Item = f64> + 'a {
        self.ticks.windows(2).map(|w| w[1].time - w[0].time)
    }

    /// Seconds from the first tick to the last.
    pub fn duration_secs(&self) -> f64 {
        self.last().time - self.first().time
    }

    /// Hex SHA-256 of the series' raw tick records, in capture order.
    ///
    /// Equal to the digest of the capture file the series was read from.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for tick in self.ticks {
            hasher.update(tick.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

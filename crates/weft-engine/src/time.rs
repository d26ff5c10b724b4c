//! Host-relative timestamps.
//!
//! The scheduler never reads a wall clock directly; every instant comes from
//! the host's [`now`](crate::host::Host::now) capability so tests can inject
//! a hand-advanced clock. `std::time::Instant` is opaque and cannot be
//! fabricated, so timestamps are measured as a [`Duration`] past the host's
//! epoch instead.

use std::ops::Add;
use std::time::Duration;

/// A monotonic instant reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Duration);

impl Timestamp {
    /// The host epoch itself.
    pub const ZERO: Timestamp = Timestamp(Duration::ZERO);

    /// Timestamp at `offset` past the host epoch.
    pub const fn from_offset(offset: Duration) -> Self {
        Timestamp(offset)
    }

    /// Offset from the host epoch.
    pub const fn as_offset(self) -> Duration {
        self.0
    }

    /// Elapsed time since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp(self.0 + rhs)
    }
}

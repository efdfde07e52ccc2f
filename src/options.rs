use std::ops::RangeInclusive;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::{BusId, DEFAULT_BUS};

/// Default wait between writing a Get VCP Feature request and reading the
/// reply, in milliseconds.
pub const DEFAULT_RESPONSE_DELAY_MS: u64 = 40;

/// Tunables for a `Ddc` handle.
///
/// Deserializes with every missing field taking its default, so it can be
/// embedded in an application's own configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Bus used when no target is named.
    pub default_bus: BusId,
    /// First bus probed by discovery.
    pub first_bus: BusId,
    /// Last bus probed by discovery, inclusive.
    pub last_bus: BusId,
    /// Milliseconds to wait for a display to prepare its reply.
    pub response_delay_ms: u64,
    /// Give up on a bus during a fan-out after this many milliseconds.
    ///
    /// Without it a hung bus blocks the whole fan-out.
    pub timeout_ms: Option<u64>,
    /// Reject replies whose checksum does not match.
    pub strict_reply_checksum: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            default_bus: DEFAULT_BUS,
            first_bus: BusId::MIN,
            last_bus: BusId::MAX,
            response_delay_ms: DEFAULT_RESPONSE_DELAY_MS,
            timeout_ms: None,
            strict_reply_checksum: false,
        }
    }
}

impl Options {
    /// Set the bus used when no target is named.
    pub fn with_default_bus(mut self, bus: BusId) -> Self {
        self.default_bus = bus;
        self
    }

    /// Restrict discovery to `range`.
    pub fn with_probe_range(mut self, range: RangeInclusive<BusId>) -> Self {
        self.first_bus = *range.start();
        self.last_bus = *range.end();
        self
    }

    /// Set the wait between a request and reading its reply.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Bound how long a fan-out waits for each bus.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Enable or disable reply checksum verification.
    pub fn with_strict_reply_checksum(mut self, strict: bool) -> Self {
        self.strict_reply_checksum = strict;
        self
    }

    /// The buses discovery probes.
    pub fn probe_range(&self) -> RangeInclusive<BusId> {
        self.first_bus..=self.last_bus
    }

    /// The wait between a request and reading its reply.
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    /// The fan-out timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

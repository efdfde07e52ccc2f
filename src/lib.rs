#![deny(missing_docs)]

//! Read and write display brightness using the DDC/CI protocol.
//!
//! Displays are reached over I2C buses. A [`Transport`] opens a bus, the
//! [`Ddc`] handle finds buses with a display attached and runs brightness
//! commands on one bus or on all of them at once.
//!
//! # Example
//!
//! ```rust,no_run
//! use monitorctl_ddc::{Ddc, Target};
//!
//! # #[cfg(feature = "i2c-linux")] fn ddc() {
//! let ddc = Ddc::new(monitorctl_ddc::LinuxTransport);
//! let report = ddc.set(Target::All, 50).unwrap();
//! for (bus, error) in report.failed() {
//!     println!("bus {}: {}", bus, error);
//! }
//! # }
//! ```

use std::sync::Arc;
use tracing::debug;

/// DDC/CI command and control I2C address
pub const I2C_ADDRESS_DDC_CI: u16 = 0x37;

/// DDC sub-address command prefix
pub const SUB_ADDRESS_DDC_CI: u8 = 0x51;

/// VCP feature code of the display's luminance control.
pub const BRIGHTNESS_REGISTER: FeatureCode = 0x10;

/// The highest brightness value a display is asked to take.
pub const MAX_BRIGHTNESS: u8 = 100;

/// The bus used when no other is selected.
///
/// This is a convention carried over from common single-monitor setups; it
/// has no meaning in the protocol itself.
pub const DEFAULT_BUS: BusId = 8;

/// Identifies an I2C bus, as in `/dev/i2c-N`.
pub type BusId = u8;

pub use mccs::FeatureCode;

/// Checksums used on DDC/CI frames.
pub mod checksum;

/// DDC/CI request frames.
pub mod commands;
pub use commands::{Command, GetVcpFeature, SetVcpFeature};

/// Validation of replies read back from a display.
pub mod reply;
pub use reply::VcpReply;

/// Access to I2C buses.
pub mod transport;
pub use transport::{Connection, Transport};
#[cfg(feature = "i2c-linux")]
pub use transport::LinuxTransport;

/// Commands executed against a single bus.
pub mod device;

/// Finding buses with a display attached.
pub mod discovery;

/// Running one operation on several buses concurrently.
pub mod fanout;
pub use fanout::{Outcome, Report};

mod options;
pub use options::Options;

mod error;
pub use error::{Error, ErrorCode, ErrorKind};

/// The buses an operation applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// A single bus. Failures are returned to the caller.
    Bus(BusId),
    /// Every bus found by discovery. Failures are reported per bus.
    All,
}

impl Default for Target {
    fn default() -> Self {
        Target::Bus(DEFAULT_BUS)
    }
}

/// A handle to run DDC/CI brightness operations over a transport.
#[derive(Debug)]
pub struct Ddc<T> {
    transport: Arc<T>,
    options: Options,
}

impl<T> Ddc<T> {
    /// Create a new handle with default options.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, Options::default())
    }

    /// Create a new handle with the given options.
    pub fn with_options(transport: T, options: Options) -> Self {
        Ddc {
            transport: Arc::new(transport),
            options,
        }
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The options this handle was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The target selected when the caller does not name one.
    pub fn default_target(&self) -> Target {
        Target::Bus(self.options.default_bus)
    }
}

impl<T: Transport + Send + 'static> Ddc<T> {
    /// Read the current brightness of the display on `bus`.
    pub fn get_brightness(&self, bus: BusId) -> Result<u8, Error> {
        device::get_brightness(&*self.transport, bus, &self.options)
    }

    /// Set the brightness of the display on `bus`.
    ///
    /// The value is sent as is; see `set` for a range-checked variant.
    pub fn set_brightness(&self, bus: BusId, value: u8) -> Result<(), Error> {
        device::set_brightness(&*self.transport, bus, value, &self.options)
    }

    /// Find every bus in the configured probe range that can be opened.
    pub fn discover(&self) -> Result<Vec<BusId>, Error> {
        discovery::discover_buses_in(&*self.transport, self.options.probe_range())
    }

    /// Read brightness from the target.
    ///
    /// For `Target::Bus` any failure is returned as `Err`. For `Target::All`
    /// only a failed discovery is, every other failure is part of the report.
    pub fn get(&self, target: Target) -> Result<Report<u8>, Error> {
        match target {
            Target::Bus(bus) => {
                let value = self.get_brightness(bus)?;
                Ok(Report::new(vec![Outcome::new(bus, Ok(value))]))
            },
            Target::All => {
                let buses = self.discover()?;
                Ok(self.fan_out(&buses, device::get_brightness::<T>))
            },
        }
    }

    /// Set brightness on the target.
    ///
    /// Values above `MAX_BRIGHTNESS` are rejected before any bus is touched.
    /// Failures are reported as described for `get`.
    pub fn set(&self, target: Target, value: u8) -> Result<Report<()>, Error> {
        if value > MAX_BRIGHTNESS {
            return Err(Error::BrightnessOutOfRange(value))
        }

        match target {
            Target::Bus(bus) => {
                self.set_brightness(bus, value)?;
                Ok(Report::new(vec![Outcome::new(bus, Ok(()))]))
            },
            Target::All => {
                let buses = self.discover()?;
                Ok(self.fan_out(&buses, move |transport: &T, bus, options: &Options| {
                    device::set_brightness(transport, bus, value, options)
                }))
            },
        }
    }

    fn fan_out<R, F>(&self, buses: &[BusId], op: F) -> Report<R> where
        R: Send + 'static,
        F: Fn(&T, BusId, &Options) -> Result<R, Error> + Send + Sync + 'static,
    {
        debug!(?buses, "applying operation to buses");
        let outcomes = match self.options.timeout() {
            Some(timeout) => {
                let transport = Arc::clone(&self.transport);
                let options = self.options.clone();
                fanout::apply_to_all_with_timeout(buses, timeout, move |bus| op(&*transport, bus, &options))
            },
            None => fanout::apply_to_all(buses, |bus| op(&*self.transport, bus, &self.options)),
        };

        Report::new(outcomes)
    }
}

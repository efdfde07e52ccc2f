use std::error;
use tracing::{debug, trace};
use crate::{BusId, Error};

/// Opens I2C buses.
///
/// The returned handle is the connection: writes and reads go through its
/// `i2c::ReadWrite` implementation, and dropping it closes the bus.
pub trait Transport: Sync {
    /// Error raised by the bus.
    type Error: error::Error + Send + Sync + 'static;

    /// An open bus.
    type Handle: i2c::Address + i2c::ReadWrite + i2c::Master<Error = Self::Error>;

    /// Open `bus`.
    fn open(&self, bus: BusId) -> Result<Self::Handle, Self::Error>;
}

/// One open bus, addressed to a single device.
///
/// Errors from every call are tagged with the bus. The bus is released when
/// the connection is dropped, whichever way the operation using it ends.
pub struct Connection<T: Transport + ?Sized> {
    bus: BusId,
    inner: T::Handle,
}

impl<T: Transport + ?Sized> Connection<T> {
    /// Open `bus` and select the device at `address` on it.
    pub fn open(transport: &T, address: u16, bus: BusId) -> Result<Self, Error> {
        let mut inner = transport.open(bus).map_err(|e| Error::transport(bus, e))?;
        i2c::Address::set_slave_address(&mut inner, address, false).map_err(|e| Error::transport(bus, e))?;
        trace!(bus, address, "opened I2C bus");

        Ok(Connection {
            bus,
            inner,
        })
    }

    /// The bus this connection is open on.
    pub fn bus(&self) -> BusId {
        self.bus
    }

    /// Write a frame to the device.
    pub fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        debug!(bus = self.bus, frame = ?data, "writing frame");
        i2c::ReadWrite::i2c_write(&mut self.inner, data).map_err(|e| Error::transport(self.bus, e))
    }

    /// Read from the device into `out`, returning the number of bytes read.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize, Error> {
        let len = i2c::ReadWrite::i2c_read(&mut self.inner, out).map_err(|e| Error::transport(self.bus, e))?;
        let len = len.min(out.len());
        debug!(bus = self.bus, reply = ?&out[..len], "read reply");
        Ok(len)
    }
}

impl<T: Transport + ?Sized> Drop for Connection<T> {
    fn drop(&mut self) {
        trace!(bus = self.bus, "closed I2C bus");
    }
}

/// I2C buses exposed by Linux i2c-dev as `/dev/i2c-N`.
#[cfg(feature = "i2c-linux")]
#[derive(Copy, Clone, Debug, Default)]
pub struct LinuxTransport;

#[cfg(feature = "i2c-linux")]
impl Transport for LinuxTransport {
    type Error = std::io::Error;
    type Handle = i2c_linux::I2c<std::fs::File>;

    fn open(&self, bus: BusId) -> std::io::Result<Self::Handle> {
        i2c_linux::I2c::from_path(format!("/dev/i2c-{}", bus))
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{Event, MockTransport};
    use super::*;
    use crate::{ErrorKind, I2C_ADDRESS_DDC_CI};

    #[test]
    fn open_selects_address_and_drop_closes() {
        let transport = MockTransport::with_buses(vec![4]);
        {
            let mut conn = Connection::open(&transport, I2C_ADDRESS_DDC_CI, 4).unwrap();
            assert_eq!(conn.bus(), 4);
            conn.write(&[0x01, 0x10]).unwrap();
            assert_eq!(transport.open_handles(), 1);
        }
        assert_eq!(transport.open_handles(), 0);
        assert_eq!(transport.events(), vec![
            Event::Open(4),
            Event::Address(4, 0x37),
            Event::Write(4, vec![0x01, 0x10]),
            Event::Close(4),
        ]);
    }

    #[test]
    fn errors_are_tagged_with_bus() {
        let transport = MockTransport::with_buses(vec![4]).fail_writes(4);
        let err = Connection::open(&transport, I2C_ADDRESS_DDC_CI, 5).err().unwrap();
        assert_eq!((err.bus(), err.kind()), (Some(5), ErrorKind::Transport));

        let mut conn = Connection::open(&transport, I2C_ADDRESS_DDC_CI, 4).unwrap();
        let err = conn.write(&[0x00]).unwrap_err();
        assert_eq!((err.bus(), err.kind()), (Some(4), ErrorKind::Transport));
    }

    #[test]
    fn short_read_reports_length() {
        let transport = MockTransport::with_buses(vec![1]).reply(1, &[0x6e, 0x88, 0x02]);
        let mut conn = Connection::open(&transport, I2C_ADDRESS_DDC_CI, 1).unwrap();
        let mut out = [0u8; 12];
        assert_eq!(conn.read(&mut out).unwrap(), 3);
        assert_eq!(&out[..3], &[0x6e, 0x88, 0x02]);
    }
}

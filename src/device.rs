use std::thread::sleep;
use tracing::debug;
use crate::commands::{Command, GetVcpFeature, SetVcpFeature};
use crate::transport::{Connection, Transport};
use crate::{BusId, Error, Options, BRIGHTNESS_REGISTER, I2C_ADDRESS_DDC_CI};

/// Execute a DDC/CI command against the display on `bus`.
///
/// A connection is opened for this command alone and closed before
/// returning. Nothing is retried.
pub fn execute<T, C>(transport: &T, bus: BusId, command: C, options: &Options) -> Result<C::Ok, Error> where
    T: Transport + ?Sized,
    C: Command,
{
    let frame = command.encode();
    let mut conn = Connection::open(transport, I2C_ADDRESS_DDC_CI, bus)?;
    conn.write(&frame)?;

    let mut out = vec![0u8; C::REPLY_LEN];
    let len = if out.is_empty() {
        0
    } else {
        sleep(options.response_delay());
        conn.read(&mut out)?
    };

    command.decode(&out[..len], options.strict_reply_checksum).map_err(|code| Error::ddc(bus, code))
}

/// Read the brightness of the display on `bus`.
pub fn get_brightness<T: Transport + ?Sized>(transport: &T, bus: BusId, options: &Options) -> Result<u8, Error> {
    let reply = execute(transport, bus, GetVcpFeature::new(BRIGHTNESS_REGISTER), options)?;
    debug!(bus, value = reply.value, maximum = reply.maximum, "read brightness");
    Ok(reply.value)
}

/// Set the brightness of the display on `bus` to `value`.
pub fn set_brightness<T: Transport + ?Sized>(transport: &T, bus: BusId, value: u8, options: &Options) -> Result<(), Error> {
    execute(transport, bus, SetVcpFeature::new(BRIGHTNESS_REGISTER, value), options)?;
    debug!(bus, value, "set brightness");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{Event, MockTransport};
    use crate::{ErrorCode, ErrorKind};

    fn options() -> Options {
        Options::default().with_response_delay(Default::default())
    }

    fn reply(register: u8, value: u8) -> Vec<u8> {
        vec![0x6e, 0x88, 0x02, 0x00, register, 0x00, 0x00, 0x64, 0x00, value, 0x00, 0x00]
    }

    #[test]
    fn get_writes_request_and_reads_twelve_bytes() {
        let transport = MockTransport::with_buses(vec![8]).reply(8, &reply(0x10, 77));
        assert_eq!(get_brightness(&transport, 8, &options()).unwrap(), 77);
        assert_eq!(transport.events(), vec![
            Event::Open(8),
            Event::Address(8, 0x37),
            Event::Write(8, vec![0x01, 0x10]),
            Event::Read(8, 12),
            Event::Close(8),
        ]);
    }

    #[test]
    fn get_releases_bus_on_decode_failure() {
        let transport = MockTransport::with_buses(vec![8]).reply(8, &reply(0x12, 77));
        let err = get_brightness(&transport, 8, &options()).unwrap_err();
        match err {
            Error::Ddc { bus: 8, code: ErrorCode::RegisterMismatch { expected: 0x10, actual: 0x12 } } => (),
            e => panic!("unexpected error {:?}", e),
        }
        assert_eq!(transport.open_handles(), 0);
        assert_eq!(transport.events().last(), Some(&Event::Close(8)));
    }

    #[test]
    fn get_short_reply_is_length_error() {
        let transport = MockTransport::with_buses(vec![2]).reply(2, &reply(0x10, 1)[..11]);
        let err = get_brightness(&transport, 2, &options()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Length);
        assert_eq!(err.bus(), Some(2));
    }

    #[test]
    fn get_strict_checksum() {
        let transport = MockTransport::with_buses(vec![2]).reply(2, &reply(0x10, 1));
        let err = get_brightness(&transport, 2, &options().with_strict_reply_checksum(true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Checksum);
    }

    #[test]
    fn get_read_failure_is_transport_error() {
        let transport = MockTransport::with_buses(vec![2]);
        let err = get_brightness(&transport, 2, &options()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(transport.open_handles(), 0);
    }

    #[test]
    fn set_writes_frame_without_reading() {
        let transport = MockTransport::with_buses(vec![8]);
        set_brightness(&transport, 8, 50, &options()).unwrap();
        assert_eq!(transport.events(), vec![
            Event::Open(8),
            Event::Address(8, 0x37),
            Event::Write(8, vec![0x51, 0x84, 0x03, 0x10, 0x00, 50, 0x9a]),
            Event::Close(8),
        ]);
    }

    #[test]
    fn set_twice_writes_same_frame() {
        let transport = MockTransport::with_buses(vec![8]);
        set_brightness(&transport, 8, 63, &options()).unwrap();
        set_brightness(&transport, 8, 63, &options()).unwrap();
        let writes = transport.writes(8);
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0], writes[1]);
    }

    #[test]
    fn set_failures_are_tagged() {
        let transport = MockTransport::with_buses(vec![3]).fail_writes(3);
        let err = set_brightness(&transport, 3, 10, &options()).unwrap_err();
        assert_eq!((err.bus(), err.kind()), (Some(3), ErrorKind::Transport));
        assert_eq!(transport.open_handles(), 0);

        let err = set_brightness(&transport, 4, 10, &options()).unwrap_err();
        assert_eq!((err.bus(), err.kind()), (Some(4), ErrorKind::Transport));
    }
}

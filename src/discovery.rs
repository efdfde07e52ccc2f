use std::ops::RangeInclusive;
use tracing::{debug, trace};
use crate::transport::{Connection, Transport};
use crate::{BusId, Error, I2C_ADDRESS_DDC_CI};

/// Find every bus that can be opened and addressed at the DDC/CI address.
///
/// Buses 0 through 255 are probed in ascending order, and returned in that
/// order. Each probe connection is closed as soon as it has been opened.
///
/// A bus that opens is not known to have a display on it. The display may
/// also refuse DDC/CI when its active input belongs to another host.
pub fn discover_buses<T: Transport + ?Sized>(transport: &T) -> Result<Vec<BusId>, Error> {
    discover_buses_in(transport, BusId::MIN..=BusId::MAX)
}

/// Like `discover_buses`, probing only the buses in `range`.
pub fn discover_buses_in<T: Transport + ?Sized>(transport: &T, range: RangeInclusive<BusId>) -> Result<Vec<BusId>, Error> {
    let buses: Vec<BusId> = range
        .filter(|&bus| match Connection::open(transport, I2C_ADDRESS_DDC_CI, bus) {
            Ok(_) => {
                debug!(bus, "found I2C bus");
                true
            },
            Err(e) => {
                trace!(bus, error = %e, "skipping I2C bus");
                false
            },
        })
        .collect();

    if buses.is_empty() {
        return Err(Error::NoBusesFound)
    }

    Ok(buses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{Event, MockTransport};
    use crate::ErrorKind;

    #[test]
    fn finds_available_buses_in_order() {
        let transport = MockTransport::with_buses(vec![9, 2, 5]);
        assert_eq!(discover_buses(&transport).unwrap(), vec![2, 5, 9]);
    }

    #[test]
    fn probes_close_immediately() {
        let transport = MockTransport::with_buses(vec![2, 5]);
        discover_buses(&transport).unwrap();
        assert_eq!(transport.open_handles(), 0);
        assert_eq!(transport.events(), vec![
            Event::Open(2),
            Event::Address(2, 0x37),
            Event::Close(2),
            Event::Open(5),
            Event::Address(5, 0x37),
            Event::Close(5),
        ]);
    }

    #[test]
    fn highest_bus_is_probed() {
        let transport = MockTransport::with_buses(vec![0, 255]);
        assert_eq!(discover_buses(&transport).unwrap(), vec![0, 255]);
    }

    #[test]
    fn nothing_found() {
        let transport = MockTransport::with_buses(vec![]);
        let err = discover_buses(&transport).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoBusesFound);
    }

    #[test]
    fn restricted_range() {
        let transport = MockTransport::with_buses(vec![2, 5, 9]);
        assert_eq!(discover_buses_in(&transport, 3..=9).unwrap(), vec![5, 9]);
        assert_eq!(discover_buses_in(&transport, 10..=20).unwrap_err().kind(), ErrorKind::NoBusesFound);
    }
}

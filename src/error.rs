use std::{error, io};
use thiserror::Error;
use crate::{BusId, FeatureCode};

/// An error that can occur while operating on a display.
///
/// Every error raised by an operation on a bus names that bus.
#[derive(Debug, Error)]
pub enum Error {
    /// The bus could not be opened, written to or read from.
    #[error("I2C bus {bus}: {source}")]
    Transport {
        /// The bus the transport failed on.
        bus: BusId,
        /// The underlying I2C error.
        source: Box<dyn error::Error + Send + Sync>,
    },
    /// The display replied with something that is not a valid DDC/CI reply.
    #[error("I2C bus {bus}: DDC/CI error: {code}")]
    Ddc {
        /// The bus the reply was read from.
        bus: BusId,
        /// What was wrong with the reply.
        code: ErrorCode,
    },
    /// Discovery did not find a single usable bus.
    #[error("no available I2C buses found")]
    NoBusesFound,
    /// A brightness outside 0 to 100 was requested.
    #[error("brightness {0} is out of range 0-100")]
    BrightnessOutOfRange(u8),
    /// The operation did not finish in time.
    #[error("I2C bus {bus}: operation timed out")]
    Timeout {
        /// The bus that did not answer.
        bus: BusId,
    },
    /// The thread running the operation panicked.
    #[error("I2C bus {bus}: operation panicked")]
    WorkerPanicked {
        /// The bus the operation was running on.
        bus: BusId,
    },
}

/// DDC/CI protocol errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The reply did not have the expected length.
    #[error("invalid reply length {actual}, expected {expected}")]
    InvalidLength {
        /// Length the reply should have had.
        expected: usize,
        /// Length of the reply read.
        actual: usize,
    },
    /// The reply did not start with the display's source address.
    #[error("invalid leading byte 0x{0:02x}")]
    InvalidLeadingByte(u8),
    /// The reply is about a different feature than requested.
    #[error("unexpected register 0x{actual:02x}, expected 0x{expected:02x}")]
    RegisterMismatch {
        /// The requested feature.
        expected: FeatureCode,
        /// The feature the display replied about.
        actual: FeatureCode,
    },
    /// Checksum mismatch
    #[error("checksum 0x{actual:02x} does not match 0x{expected:02x}")]
    InvalidChecksum {
        /// The checksum computed over the reply.
        expected: u8,
        /// The checksum byte in the reply.
        actual: u8,
    },
}

/// The broad category of an `Error`, for reporting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See `Error::Transport`.
    Transport,
    /// See `ErrorCode::InvalidLength`.
    Length,
    /// See `ErrorCode::InvalidLeadingByte`.
    Framing,
    /// See `ErrorCode::RegisterMismatch`.
    RegisterMismatch,
    /// See `ErrorCode::InvalidChecksum`.
    Checksum,
    /// See `Error::NoBusesFound`.
    NoBusesFound,
    /// See `Error::BrightnessOutOfRange`.
    OutOfRange,
    /// See `Error::Timeout`.
    Timeout,
    /// See `Error::WorkerPanicked`.
    Panicked,
}

impl Error {
    pub(crate) fn transport<E>(bus: BusId, e: E) -> Self where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Error::Transport {
            bus,
            source: e.into(),
        }
    }

    pub(crate) fn ddc(bus: BusId, code: ErrorCode) -> Self {
        Error::Ddc {
            bus,
            code,
        }
    }

    /// The bus the error occurred on, if it is tied to one.
    pub fn bus(&self) -> Option<BusId> {
        match *self {
            Error::Transport { bus, .. } |
            Error::Ddc { bus, .. } |
            Error::Timeout { bus } |
            Error::WorkerPanicked { bus } => Some(bus),
            Error::NoBusesFound | Error::BrightnessOutOfRange(_) => None,
        }
    }

    /// The category of the error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Ddc { ref code, .. } => code.kind(),
            Error::NoBusesFound => ErrorKind::NoBusesFound,
            Error::BrightnessOutOfRange(_) => ErrorKind::OutOfRange,
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::WorkerPanicked { .. } => ErrorKind::Panicked,
        }
    }
}

impl ErrorCode {
    /// The category of the error.
    pub fn kind(&self) -> ErrorKind {
        match *self {
            ErrorCode::InvalidLength { .. } => ErrorKind::Length,
            ErrorCode::InvalidLeadingByte(_) => ErrorKind::Framing,
            ErrorCode::RegisterMismatch { .. } => ErrorKind::RegisterMismatch,
            ErrorCode::InvalidChecksum { .. } => ErrorKind::Checksum,
        }
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        let kind = match e.kind() {
            ErrorKind::Transport => io::ErrorKind::Other,
            ErrorKind::NoBusesFound => io::ErrorKind::NotFound,
            ErrorKind::OutOfRange => io::ErrorKind::InvalidInput,
            ErrorKind::Timeout => io::ErrorKind::TimedOut,
            ErrorKind::Panicked => io::ErrorKind::Other,
            ErrorKind::Length |
            ErrorKind::Framing |
            ErrorKind::RegisterMismatch |
            ErrorKind::Checksum => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}

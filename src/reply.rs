use crate::checksum::{reply_checksum, WRITE_CHECKSUM_SEED};
use crate::{ErrorCode, FeatureCode};

/// Length of a Get VCP Feature reply as read from the bus.
pub const GET_VCP_REPLY_LEN: usize = 12;

/// The byte every reply starts with: the display's 8-bit source address.
pub const REPLY_SOURCE_ADDRESS: u8 = WRITE_CHECKSUM_SEED;

const OFFSET_CODE: usize = 4;
const OFFSET_MAXIMUM: usize = 6;
const OFFSET_VALUE: usize = 9;
const OFFSET_CHECKSUM: usize = 10;

/// A decoded Get VCP Feature reply.
///
/// Layout of the 12 byte buffer:
///
/// | offset | content |
/// |---|---|
/// | 0 | source address, `0x6e` |
/// | 1 | length |
/// | 2 | reply opcode |
/// | 3 | result code |
/// | 4 | feature code |
/// | 5 | feature type |
/// | 6..8 | maximum, big endian |
/// | 8..10 | current value, big endian |
/// | 10 | checksum |
/// | 11 | unused |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VcpReply {
    /// The feature the reply is about.
    pub code: FeatureCode,
    /// The maximum the display reports for the feature.
    pub maximum: u16,
    /// The low byte of the current value.
    pub value: u8,
}

impl VcpReply {
    /// Validate `data` as the reply to a request for `code`.
    ///
    /// Checks run in order: length, leading byte, feature code and, only if
    /// `strict` is set, the checksum at offset 10.
    pub fn decode(data: &[u8], code: FeatureCode, strict: bool) -> Result<Self, ErrorCode> {
        if data.len() != GET_VCP_REPLY_LEN {
            return Err(ErrorCode::InvalidLength {
                expected: GET_VCP_REPLY_LEN,
                actual: data.len(),
            })
        }

        if data[0] != REPLY_SOURCE_ADDRESS {
            return Err(ErrorCode::InvalidLeadingByte(data[0]))
        }

        if data[OFFSET_CODE] != code {
            return Err(ErrorCode::RegisterMismatch {
                expected: code,
                actual: data[OFFSET_CODE],
            })
        }

        if strict {
            let checksum = reply_checksum(&data[..OFFSET_CHECKSUM]);
            if data[OFFSET_CHECKSUM] != checksum {
                return Err(ErrorCode::InvalidChecksum {
                    expected: checksum,
                    actual: data[OFFSET_CHECKSUM],
                })
            }
        }

        Ok(VcpReply {
            code,
            maximum: ((data[OFFSET_MAXIMUM] as u16) << 8) | data[OFFSET_MAXIMUM + 1] as u16,
            value: data[OFFSET_VALUE],
        })
    }
}

/// Decode the brightness, or other single byte value, from a Get VCP
/// Feature reply to a request for `code`.
///
/// The reply checksum is not verified.
pub fn decode_get_reply(data: &[u8], code: FeatureCode) -> Result<u8, ErrorCode> {
    VcpReply::decode(data, code, false).map(|reply| reply.value)
}

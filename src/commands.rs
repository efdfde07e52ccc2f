#![allow(missing_docs)]
use crate::checksum::append_checksum;
use crate::reply::{VcpReply, GET_VCP_REPLY_LEN};
use crate::{ErrorCode, FeatureCode, SUB_ADDRESS_DDC_CI};

/// Get VCP Feature opcode
pub const OPCODE_GET_VCP_FEATURE: u8 = 0x01;

/// Set VCP Feature opcode
pub const OPCODE_SET_VCP_FEATURE: u8 = 0x03;

/// A DDC/CI request and the reply it expects.
pub trait Command {
    /// The decoded reply.
    type Ok;

    /// Number of bytes to read back once the request is written. Zero for
    /// commands the display does not answer.
    const REPLY_LEN: usize;

    /// The bytes to write to the bus.
    fn encode(&self) -> Vec<u8>;

    /// Validate and decode a reply of `REPLY_LEN` bytes.
    ///
    /// `strict` enables checks the displays in the wild are not known to
    /// pass consistently, such as the reply checksum.
    fn decode(&self, data: &[u8], strict: bool) -> Result<Self::Ok, ErrorCode>;
}

/// The Get VCP Feature request frame for `code`.
///
/// This is the bare opcode and feature code. Unlike `build_set_request` it
/// carries no sub-address, length or checksum byte; displays have been
/// observed to answer it as is, but this is not what the DDC/CI standard
/// describes and may not hold for every display.
pub fn build_get_request(code: FeatureCode) -> Vec<u8> {
    vec![OPCODE_GET_VCP_FEATURE, code]
}

/// The Set VCP Feature request frame setting `code` to `value`.
///
/// The value is not range checked.
pub fn build_set_request(code: FeatureCode, value: u8) -> Vec<u8> {
    let data = [OPCODE_SET_VCP_FEATURE, code, 0x00, value];
    let mut packet = [0u8; 2 + 4];
    packet[0] = SUB_ADDRESS_DDC_CI;
    packet[1] = 0x80 | data.len() as u8;
    packet[2..].copy_from_slice(&data);

    append_checksum(&packet)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GetVcpFeature {
    pub code: FeatureCode,
}

impl GetVcpFeature {
    pub fn new(code: FeatureCode) -> Self {
        GetVcpFeature {
            code,
        }
    }
}

impl Command for GetVcpFeature {
    type Ok = VcpReply;
    const REPLY_LEN: usize = GET_VCP_REPLY_LEN;

    fn encode(&self) -> Vec<u8> {
        build_get_request(self.code)
    }

    fn decode(&self, data: &[u8], strict: bool) -> Result<VcpReply, ErrorCode> {
        VcpReply::decode(data, self.code, strict)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SetVcpFeature {
    pub code: FeatureCode,
    pub value: u8,
}

impl SetVcpFeature {
    pub fn new(code: FeatureCode, value: u8) -> Self {
        SetVcpFeature {
            code,
            value,
        }
    }
}

impl Command for SetVcpFeature {
    type Ok = ();
    const REPLY_LEN: usize = 0;

    fn encode(&self) -> Vec<u8> {
        build_set_request(self.code, self.value)
    }

    fn decode(&self, _data: &[u8], _strict: bool) -> Result<(), ErrorCode> {
        Ok(())
    }
}

impl<'a, C: Command> Command for &'a C {
    type Ok = C::Ok;
    const REPLY_LEN: usize = C::REPLY_LEN;

    fn encode(&self) -> Vec<u8> {
        (*self).encode()
    }

    fn decode(&self, data: &[u8], strict: bool) -> Result<C::Ok, ErrorCode> {
        (*self).decode(data, strict)
    }
}

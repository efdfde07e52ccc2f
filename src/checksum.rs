use crate::I2C_ADDRESS_DDC_CI;

/// Seed of the checksum on frames written to a display.
///
/// This is the display's 8-bit write address, `0x6e`.
pub const WRITE_CHECKSUM_SEED: u8 = (I2C_ADDRESS_DDC_CI as u8) << 1;

/// Seed of the checksum on frames a display replies with.
///
/// Displays checksum their replies against the host's virtual address,
/// `0x50`, in place of the destination byte.
pub const REPLY_CHECKSUM_SEED: u8 = 0x50;

fn xor<I: IntoIterator<Item=u8>>(seed: u8, iter: I) -> u8 {
    iter.into_iter().fold(seed, |sum, v| sum ^ v)
}

/// XOR of every byte in `data`, XOR `0x6e`.
pub fn compute_checksum(data: &[u8]) -> u8 {
    xor(WRITE_CHECKSUM_SEED, data.iter().cloned())
}

/// Copy `data` and append its checksum as the final byte.
pub fn append_checksum(data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(data.len() + 1);
    frame.extend_from_slice(data);
    frame.push(compute_checksum(data));
    frame
}

/// The checksum a display is expected to place after `data` in a reply.
pub fn reply_checksum(data: &[u8]) -> u8 {
    xor(REPLY_CHECKSUM_SEED, data.iter().cloned())
}

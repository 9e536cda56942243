//! Bit stream over MIDI data bytes: each byte carries 7 bits, MSB first.

pub fn read_bits(data: &[u8], offset: usize, width: usize) -> u32 {
    (offset .. offset + width).fold(0u32, |acc, bit| {
        let byte = data[bit / 7];
        let b = (byte >> (6 - bit % 7)) & 1;
        (acc << 1) | b as u32
    })
}

pub fn write_bits(data: &mut [u8], offset: usize, width: usize, value: u32) {
    for (n, bit) in (offset .. offset + width).enumerate() {
        let b = (value >> (width - 1 - n)) & 1;
        let mask = 1u8 << (6 - bit % 7);
        if b == 1 {
            data[bit / 7] |= mask;
        } else {
            data[bit / 7] &= !mask;
        }
    }
}

/// Sign-extend a `width`-bit two's complement value.
pub fn sign_extend(raw: u32, width: usize) -> i32 {
    let shift = 32 - width as u32;
    ((raw << shift) as i32) >> shift
}

pub fn truncate(value: i32, width: usize) -> u32 {
    (value as u32) & (u32::MAX >> (32 - width as u32))
}

//! Checksum and nibble helpers used by the protocol encoders.

/// Wrapping byte sum of the big-endian bytes of `value`.
pub const fn sum8(value: u32) -> u8 {
    let b = value.to_be_bytes();
    b[0].wrapping_add(b[1]).wrapping_add(b[2]).wrapping_add(b[3])
}

/// Bit-reverse a nibble and invert it (`0b0001` → `0b0111`).
///
/// Only the low four bits of `nibble` are used.
pub const fn reverse_inverse_nibble(nibble: u8) -> u8 {
    ((0x084C_2A6E_195D_3B7F_u64 >> ((nibble & 0xF) as u64 * 4)) & 0xF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum8_wraps() {
        assert_eq!(sum8(0x0102_0304), 10);
        assert_eq!(sum8(0xFFFF_0000), 0xFE);
    }

    #[test]
    fn reverse_inverse_matches_bitwise_definition() {
        for n in 0u8..16 {
            let reversed = (n & 1) << 3 | (n & 2) << 1 | (n & 4) >> 1 | (n & 8) >> 3;
            assert_eq!(reverse_inverse_nibble(n), !reversed & 0xF, "nibble {n:#06b}");
        }
    }
}

//! Bit Math
//!
//! Nearest-set-bit searches over 256-bit bitmap words.

use crate::math::full_math::U256;

/// Mask with every bit at or above `position` set
fn mask_at_or_above(position: u8) -> U256 {
    U256::MAX << (position as usize)
}

/// Mask with every bit at or below `position` set
fn mask_at_or_below(position: u8) -> U256 {
    U256::MAX >> (255 - position as usize)
}

/// Position of the lowest set bit at or after `position`
pub fn next_bit_position(bitmap: U256, position: u8) -> Option<u8> {
    let masked = bitmap & mask_at_or_above(position);
    if masked.is_zero() {
        None
    } else {
        Some(masked.trailing_zeros() as u8)
    }
}

/// Position of the highest set bit at or before `position`
pub fn prev_bit_position(bitmap: U256, position: u8) -> Option<u8> {
    let masked = bitmap & mask_at_or_below(position);
    if masked.is_zero() {
        None
    } else {
        Some((255 - masked.leading_zeros()) as u8)
    }
}

/// Check if a specific bit is set
#[inline]
pub fn is_bit_set(bitmap: U256, position: u8) -> bool {
    bitmap.bit(position as usize)
}

/// Set a specific bit
#[inline]
pub fn set_bit(bitmap: U256, position: u8) -> U256 {
    bitmap | (U256::one() << (position as usize))
}

/// Clear a specific bit
#[inline]
pub fn clear_bit(bitmap: U256, position: u8) -> U256 {
    bitmap & !(U256::one() << (position as usize))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_operations() {
        let bitmap = U256::from(0b1010u8);
        assert!(is_bit_set(bitmap, 1));
        assert!(is_bit_set(bitmap, 3));
        assert!(!is_bit_set(bitmap, 0));
        assert!(!is_bit_set(bitmap, 2));

        assert_eq!(set_bit(U256::zero(), 5), U256::from(32u8));
        assert_eq!(clear_bit(U256::from(0b111u8), 1), U256::from(0b101u8));

        let top = set_bit(U256::zero(), 255);
        assert!(is_bit_set(top, 255));
        assert!(clear_bit(top, 255).is_zero());
    }

    #[test]
    fn test_next_prev_bit() {
        let bitmap = U256::from(0b10100u8); // bits 2 and 4 set

        assert_eq!(next_bit_position(bitmap, 0), Some(2));
        assert_eq!(next_bit_position(bitmap, 2), Some(2));
        assert_eq!(next_bit_position(bitmap, 3), Some(4));
        assert_eq!(next_bit_position(bitmap, 5), None);

        assert_eq!(prev_bit_position(bitmap, 5), Some(4));
        assert_eq!(prev_bit_position(bitmap, 4), Some(4));
        assert_eq!(prev_bit_position(bitmap, 3), Some(2));
        assert_eq!(prev_bit_position(bitmap, 1), None);
    }

    #[test]
    fn test_word_edges() {
        let bitmap = set_bit(set_bit(U256::zero(), 0), 255);
        assert_eq!(next_bit_position(bitmap, 1), Some(255));
        assert_eq!(next_bit_position(bitmap, 255), Some(255));
        assert_eq!(prev_bit_position(bitmap, 254), Some(0));
        assert_eq!(prev_bit_position(bitmap, 0), Some(0));
        assert_eq!(prev_bit_position(U256::zero(), 255), None);
    }
}

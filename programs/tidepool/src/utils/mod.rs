//! Floating point views of Q64.64 prices, for display and tests only

use crate::constants::Q64;

/// Root price as a float
pub fn sqrt_price_to_f64(sqrt_price_x64: u128) -> f64 {
    sqrt_price_x64 as f64 / Q64 as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqrt_price_to_f64() {
        assert!((sqrt_price_to_f64(Q64) - 1.0).abs() < 1e-12);
        assert!((sqrt_price_to_f64(3 * Q64 / 2) - 1.5).abs() < 1e-12);
        assert!((sqrt_price_to_f64(Q64 / 4) - 0.25).abs() < 1e-12);
    }
}

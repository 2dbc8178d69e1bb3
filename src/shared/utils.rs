//! Unit conversion helpers

/// Highest mint precision accepted; keeps realistic amounts well inside u128.
pub const MAX_DECIMALS: u8 = 24;

/// Convert a human-unit amount to atomic units, truncating toward zero.
/// Returns `None` when the result is negative, not finite or does not fit in u128.
pub fn to_atomic(amount: f64, decimals: u8) -> Option<u128> {
    let scaled = (amount * 10_f64.powi(decimals as i32)).floor();
    if !scaled.is_finite() || scaled < 0.0 || scaled >= u128::MAX as f64 {
        return None;
    }
    Some(scaled as u128)
}

/// Convert atomic units back to a human-unit amount.
pub fn from_atomic(amount: u128, decimals: u8) -> f64 {
    amount as f64 / 10_f64.powi(decimals as i32)
}

/// Price of one input token expressed in output tokens, corrected for the
/// decimals difference between the two mints.
pub fn input_token_price(in_amount: u128, out_amount: u128, in_decimals: u8, out_decimals: u8) -> f64 {
    if in_amount == 0 {
        return 0.0;
    }
    let scale = 10_f64.powi(in_decimals as i32 - out_decimals as i32);
    (out_amount as f64 / in_amount as f64) * scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_atomic_truncates() {
        assert_eq!(to_atomic(1.5, 6), Some(1_500_000));
        assert_eq!(to_atomic(0.0000019, 6), Some(1));
        assert_eq!(to_atomic(1000.0, 18), Some(1_000_000_000_000_000_000_000));
    }

    #[test]
    fn test_to_atomic_rejects_out_of_range() {
        assert_eq!(to_atomic(1000.0, 40), None);
        assert_eq!(to_atomic(-1.0, 6), None);
        assert_eq!(to_atomic(f64::INFINITY, 6), None);
        assert_eq!(to_atomic(f64::NAN, 6), None);
        // the largest accepted precision still fits 10^14 human units
        assert!(to_atomic(1e14, MAX_DECIMALS).is_some());
    }

    #[test]
    fn test_round_trip_within_one_atomic_unit() {
        for (amount, decimals) in [(1000.0, 6u8), (500.0, 18), (3.14159265, 6), (0.123456789, 9), (62.5, 0)] {
            let back = from_atomic(to_atomic(amount, decimals).unwrap(), decimals);
            let unit = 10_f64.powi(-(decimals as i32));
            let slack = unit * 1e-6;
            assert!(back <= amount + slack, "{amount} @ {decimals}: {back}");
            assert!(amount - back <= unit + slack, "{amount} @ {decimals}: {back}");
        }
    }

    #[test]
    fn test_input_token_price_scales_by_decimals() {
        // 1 USDC (6) -> 0.999 of an 18-decimal stable
        let price = input_token_price(1_000_000, 999_000_000_000_000_000, 6, 18);
        assert!((price - 0.999).abs() < 1e-12);

        let price = input_token_price(2_000_000, 1_000_000, 6, 6);
        assert!((price - 0.5).abs() < 1e-12);

        assert_eq!(input_token_price(0, 10, 6, 6), 0.0);
    }
}

//! Fixed-point amounts for MOVE and mFUSD
//!
//! Both coins use 8 decimals: 1 token = 100,000,000 base units (octas).
//! User input is parsed exactly (no binary floating point), digits past the
//! eighth decimal place are truncated, which is `floor(input × 10^8)`.
//! Rounding to two decimals only happens when formatting for display.

use eyre::{eyre, Result};

/// Base units per whole token
pub const OCTAS_PER_COIN: u64 = 100_000_000;

/// Number of decimal places carried by both coins
pub const DECIMALS: usize = 8;

/// Client-side minimum collateralization for deposit & mint, in percent.
/// Sits above the protocol's 150% floor to absorb rounding.
pub const MIN_DEPOSIT_RATIO_PCT: u64 = 151;

/// Protocol minimum collateralization ratio, in percent
pub const PROTOCOL_MIN_RATIO_PCT: u64 = 150;

/// Parse a decimal string like `"15.1"` into base units.
pub fn parse_amount(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let invalid = || eyre!("Invalid amount: {}", input.trim());

    if trimmed.is_empty() {
        return Err(invalid());
    }

    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole_units: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse::<u64>().map_err(|_| eyre!("Amount is too large: {}", trimmed))?
    };

    // Keep at most 8 fractional digits, right-padded
    let kept: String = fraction.chars().take(DECIMALS).collect();
    let fraction_units: u64 = if kept.is_empty() {
        0
    } else {
        format!("{:0<width$}", kept, width = DECIMALS).parse()?
    };

    whole_units
        .checked_mul(OCTAS_PER_COIN)
        .and_then(|v| v.checked_add(fraction_units))
        .ok_or_else(|| eyre!("Amount is too large: {}", trimmed))
}

/// Format base units with two decimals, rounding half up at the cent.
pub fn format_amount(units: u64) -> String {
    let cents = (units as u128 + 500_000) / 1_000_000;
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Minimum collateral (base units) the client requires before minting `mint` base units.
pub fn min_collateral_for(mint: u64) -> u64 {
    let min = mint as u128 * MIN_DEPOSIT_RATIO_PCT as u128 / 100;
    u64::try_from(min).unwrap_or(u64::MAX)
}

/// `collateral ≥ mint × 1.51`, evaluated without rounding.
pub fn meets_min_collateral(collateral: u64, mint: u64) -> bool {
    collateral as u128 * 100 >= mint as u128 * MIN_DEPOSIT_RATIO_PCT as u128
}

/// Convert an on-chain basis-point ratio into a percentage.
pub fn bps_to_percent(bps: u64) -> f64 {
    bps as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whole_and_fractional() {
        assert_eq!(parse_amount("10").unwrap(), 1_000_000_000);
        assert_eq!(parse_amount("15.1").unwrap(), 1_510_000_000);
        assert_eq!(parse_amount("0.5").unwrap(), 50_000_000);
        assert_eq!(parse_amount(".25").unwrap(), 25_000_000);
        assert_eq!(parse_amount("7.").unwrap(), 700_000_000);
        assert_eq!(parse_amount("  3.00000001 ").unwrap(), 300_000_001);
    }

    #[test]
    fn test_parse_truncates_extra_digits() {
        // floor, never round up
        assert_eq!(parse_amount("1.999999999").unwrap(), 199_999_999);
    }

    #[test]
    fn test_parse_avoids_float_error() {
        // 0.29 * 1e8 in f64 floors to 28999999
        assert_eq!(parse_amount("0.29").unwrap(), 29_000_000);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "abc", "-1", "1.2.3", "1e8", "1,5"] {
            assert!(parse_amount(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(parse_amount("999999999999999").is_err());
    }

    #[test]
    fn test_two_decimal_inputs_format_back() {
        for input in ["0.01", "0.29", "1.10", "12.34", "15.10", "999.99", "100.00"] {
            let units = parse_amount(input).unwrap();
            assert_eq!(format_amount(units), input);
        }
    }

    #[test]
    fn test_format_rounds_at_presentation() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(123_456_789), "1.23");
        assert_eq!(format_amount(199_999_999), "2.00");
        assert_eq!(format_amount(100_500_000), "1.01");
    }

    #[test]
    fn test_min_collateral_check() {
        let ten = parse_amount("10").unwrap();
        assert!(!meets_min_collateral(ten, ten));
        assert!(meets_min_collateral(parse_amount("15.1").unwrap(), ten));
        assert!(!meets_min_collateral(parse_amount("15.09999999").unwrap(), ten));
        assert_eq!(format_amount(min_collateral_for(ten)), "15.10");
    }

    #[test]
    fn test_bps_to_percent() {
        assert_eq!(bps_to_percent(17_500), 175.0);
        assert_eq!(bps_to_percent(0), 0.0);
    }
}

// utils/decimal.rs
use bigdecimal::{rounding::RoundingMode, BigDecimal, FromPrimitive};

/// Normalize an amount to the two-decimal money scale used everywhere
/// in the ledger.
pub fn to_money(value: BigDecimal) -> BigDecimal {
    value.with_scale_round(2, RoundingMode::HalfUp)
}

/// Convert a request-body f64 into a money-scaled BigDecimal.
pub fn money_from_f64(value: f64) -> Option<BigDecimal> {
    BigDecimal::from_f64(value).map(to_money)
}

pub trait BigDecimalHelpers {
    fn to_f64_or_zero(&self) -> f64;
}

impl BigDecimalHelpers for BigDecimal {
    fn to_f64_or_zero(&self) -> f64 {
        use num_traits::ToPrimitive;
        self.to_f64().unwrap_or(0.0)
    }
}

impl BigDecimalHelpers for Option<BigDecimal> {
    fn to_f64_or_zero(&self) -> f64 {
        self.as_ref().map(|bd| bd.to_f64_or_zero()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_is_scaled_to_two_decimals() {
        assert_eq!(money_from_f64(3000.0).unwrap(), BigDecimal::from_str("3000.00").unwrap());
        assert_eq!(money_from_f64(10.005).unwrap(), BigDecimal::from_str("10.01").unwrap());
        assert_eq!(money_from_f64(0.1).unwrap(), BigDecimal::from_str("0.10").unwrap());
    }
}

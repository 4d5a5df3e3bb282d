use rust_decimal::Decimal;

/// Round a monetary amount to 2 decimal places.
///
/// Uses banker's rounding, matching the NUMERIC(_, 2) columns the amounts are
/// persisted into.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Round a percentage to 1 decimal place (facility utilization, price deltas).
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp(1)
}

/// Percentage of `part` against `total`, 0 when `total` is 0.
pub fn percent_of(part: Decimal, total: Decimal) -> Decimal {
    if total.is_zero() {
        return Decimal::ZERO;
    }
    round_percent(part / total * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_money(dec!(312.5)), dec!(312.50));
        assert_eq!(round_money(dec!(16312.504)), dec!(16312.50));
    }

    #[test]
    fn percent_of_zero_total_is_zero() {
        assert_eq!(percent_of(dec!(10), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn percent_of_rounds_to_one_place() {
        assert_eq!(percent_of(dec!(320), dec!(500)), dec!(64.0));
        assert_eq!(percent_of(dec!(1), dec!(3)), dec!(33.3));
    }
}

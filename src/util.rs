/// Payoffs print with up to two decimals and no trailing zeros.
pub fn format_payoff(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_zeros() {
        assert_eq!(format_payoff(3.0), "3");
        assert_eq!(format_payoff(2.5), "2.5");
        assert_eq!(format_payoff(-1.25), "-1.25");
        assert_eq!(format_payoff(1.0 / 3.0), "0.33");
        assert_eq!(format_payoff(-0.001), "0");
        assert_eq!(format_payoff(10.0), "10");
    }
}

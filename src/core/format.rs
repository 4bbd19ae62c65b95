//! Brazilian-style number formatting: `.` groups thousands, `,` separates
//! decimals. Inputs are expected to be finite.

pub const CURRENCY_PREFIX: &str = "R$ ";
pub const DEFAULT_DECIMALS: usize = 1;

pub fn format_currency(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, "00"));
    format!(
        "{CURRENCY_PREFIX}{sign}{},{fraction}",
        group_thousands(integer)
    )
}

pub fn format_decimal(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}").replace('.', ",")
}

/// `value` is a fraction: 0.12 renders as "12,0%".
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{}%", format_decimal(value * 100.0, decimals))
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_and_uses_comma_decimals() {
        assert_eq!(format_currency(1518.0), "R$ 1.518,00");
        assert_eq!(format_currency(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(999.5), "R$ 999,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(100_000.0), "R$ 100.000,00");
    }

    #[test]
    fn currency_keeps_sign_before_digits() {
        assert_eq!(format_currency(-2500.25), "R$ -2.500,25");
    }

    #[test]
    fn decimal_uses_comma_without_grouping() {
        assert_eq!(format_decimal(10499.0 / 1100.0, DEFAULT_DECIMALS), "9,5");
        assert_eq!(format_decimal(12345.678, 2), "12345,68");
        assert_eq!(format_decimal(3.0, 0), "3");
    }

    #[test]
    fn percentage_scales_fraction() {
        assert_eq!(format_percentage(0.12, DEFAULT_DECIMALS), "12,0%");
        assert_eq!(format_percentage(7999.0 / 7599.0 - 1.0, DEFAULT_DECIMALS), "5,3%");
        assert_eq!(format_percentage(-0.05, 2), "-5,00%");
    }
}

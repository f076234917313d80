/// Format a dollar amount with thousands separators, e.g. `$1,234.57`.
///
/// The sign goes after the dollar sign (`$-1,234`); a value that rounds to
/// zero is printed without a sign.
pub fn format_usd(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let rounds_to_zero = fixed.chars().all(|c| c == '0' || c == '.');
    let sign = if value < 0.0 && !rounds_to_zero { "-" } else { "" };

    let mut out = format!("${sign}{}", group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.567, 2), "$1,234.57");
        assert_eq!(format_usd(5.0, 2), "$5.00");
        assert_eq!(format_usd(1_234_567.0, 0), "$1,234,567");
        assert_eq!(format_usd(999.0, 0), "$999");
        assert_eq!(format_usd(-30_000.0, 0), "$-30,000");
        assert_eq!(format_usd(-0.001, 2), "$0.00");
    }
}

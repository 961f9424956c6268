//! Number formatting for the report.

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Magnitude with two decimals and thousands separators, e.g. `1,234.56`.
fn money_digits(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    match fixed.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_thousands(int), frac),
        None => group_thousands(&fixed),
    }
}

fn is_negative_at_two_decimals(value: f64, rendered: &str) -> bool {
    value < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0')
}

/// `0.0512` → `5.12%`
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// `1234.5` → `$1,234.50`, `-12.0` → `-$12.00`
pub fn format_currency(amount: f64) -> String {
    let digits = money_digits(amount);
    if is_negative_at_two_decimals(amount, &digits) {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Percentage-point delta with explicit sign: `+7.00%`, `-1.25%`.
pub fn format_signed_percent(delta: f64) -> String {
    let digits = format!("{:.2}", (delta * 100.0).abs());
    let sign = if is_negative_at_two_decimals(delta, &digits) { '-' } else { '+' };
    format!("{sign}{digits}%")
}

/// Currency delta with explicit sign: `+$397.50`, `-$12.00`.
pub fn format_signed_currency(delta: f64) -> String {
    let digits = money_digits(delta);
    let sign = if is_negative_at_two_decimals(delta, &digits) { '-' } else { '+' };
    format!("{sign}${digits}")
}

/// Fixed-width bar filled by `min(max(fraction, 0), 1)`.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let clamped = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let filled = ((clamped * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency() {
        assert_eq!(format_currency(187.5), "$187.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn percents() {
        assert_eq!(format_percent(0.05), "5.00%");
        assert_eq!(format_signed_percent(0.12 - 0.05), "+7.00%");
        assert_eq!(format_signed_percent(-0.0125), "-1.25%");
        assert_eq!(format_signed_percent(0.0), "+0.00%");
    }

    #[test]
    fn signed_currency() {
        assert_eq!(format_signed_currency(397.5), "+$397.50");
        assert_eq!(format_signed_currency(-1500.0), "-$1,500.00");
    }

    #[test]
    fn bar_is_bounded() {
        assert_eq!(progress_bar(0.5, 4), "[##..]");
        assert_eq!(progress_bar(1.7, 4), "[####]");
        assert_eq!(progress_bar(-0.2, 4), "[....]");
    }
}

use crate::core::MonthlyPayments;

/// Formats `value` with `decimals` places and `,` thousands separators.
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + whole.len() / 3 + 1);
    // Rounded-to-zero negatives print without a sign.
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.push('-');
    }
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

pub fn format_currency(value: f64, decimals: usize) -> String {
    let number = format_number(value, decimals);
    match number.strip_prefix('-') {
        Some(unsigned) => format!("-${unsigned}"),
        None => format!("${number}"),
    }
}

/// Month-by-month listing with a closing total, as printed by the CLI.
pub fn format_month_table(label: &str, payments: &MonthlyPayments) -> String {
    let mut out = String::new();
    out.push_str(label);
    out.push('\n');
    for (idx, value) in payments.iter().enumerate() {
        out.push_str(&format!("Month {:2}: {:>10}\n", idx + 1, format_number(*value, 2)));
    }
    let total: f64 = payments.iter().sum();
    out.push_str(&format!("Total: {}\n", format_number(total, 2)));
    out.push_str(&"-".repeat(30));
    out.push('\n');
    out
}

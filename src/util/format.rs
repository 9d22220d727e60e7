/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "$--".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

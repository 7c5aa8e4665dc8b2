use crate::domain::Cents;

/// Renders cents as a US-dollar display string, e.g. `125000` as `$1,250.00`.
///
/// This is the only place cents become text; everything upstream carries [`Cents`].
pub fn format_currency(amount: Cents) -> String {
    let sign = if amount.0 < 0 { "-" } else { "" };
    let abs = amount.0.unsigned_abs();
    let dollars = abs / 100;
    let cents = abs % 100;
    format!("{sign}${}.{cents:02}", group_thousands(dollars))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

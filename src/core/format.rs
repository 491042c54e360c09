const RUPEE: char = '₹';
const NOT_A_NUMBER: &str = "₹-";

/// Rounds half-up to a whole currency unit. Display only.
pub fn round_display(amount: f64) -> f64 {
    (amount + 0.5).floor()
}

/// Formats an amount as whole rupees with Indian digit grouping,
/// e.g. `₹12,34,567` or `-₹1,234`. Infinite and NaN amounts print as `₹-`.
pub fn format_inr(amount: f64) -> String {
    let rounded = round_display(amount);
    if !rounded.is_finite() {
        return NOT_A_NUMBER.to_string();
    }

    // `rounded` may be -0.0; compare instead of checking the sign bit.
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_indian(&digits);
    if negative {
        format!("-{RUPEE}{grouped}")
    } else {
        format!("{RUPEE}{grouped}")
    }
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    let mut out = groups.join(",");
    out.push(',');
    out.push_str(tail);
    out
}

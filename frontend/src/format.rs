use crate::config::CURRENCY_SYMBOL;

/// Groups a run of ASCII digits in threes.
pub fn format_with_commas(digits: &str) -> String {
    let digits = digits.chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// `-₹1,234.50` style, two decimals.
pub fn format_currency(amount: f64) -> String {
    format_amount(amount, 2)
}

/// Whole-rupee figure, used by the dashboard insight cards.
pub fn format_currency_whole(amount: f64) -> String {
    format_amount(amount, 0)
}

fn format_amount(amount: f64, decimals: usize) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match rounded.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rounded.as_str(), None),
    };
    let whole = format_with_commas(whole);
    // -0.004 rounds to 0.00 and prints without a sign
    let sign = if amount < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(fraction) => format!("{sign}{CURRENCY_SYMBOL}{whole}.{fraction}"),
        None => format!("{sign}{CURRENCY_SYMBOL}{whole}"),
    }
}

pub fn amount_label(amount: Option<f64>) -> String {
    amount.map(format_currency).unwrap_or_else(|| "N/A".to_string())
}

pub fn amount_class(amount: Option<f64>) -> &'static str {
    if amount.unwrap_or(0.0) < 0.0 {
        "text-red-600"
    } else {
        "text-green-600"
    }
}

pub fn category_icon(category: Option<&str>) -> &'static str {
    match category {
        Some("Food") => "🍽️",
        Some("Groceries") => "🛒",
        Some("Shopping") => "🛍️",
        Some("Transport") => "🚗",
        Some("Travel") => "✈️",
        Some("Bills & Subscriptions") => "📄",
        Some("Miscellaneous") => "📦",
        _ => "💰",
    }
}

pub fn confidence_badge_class(confidence: Option<&str>) -> &'static str {
    match confidence.map(str::to_ascii_lowercase).as_deref() {
        Some("high") => "bg-green-100 text-green-800 border-green-200",
        Some("medium") => "bg-yellow-100 text-yellow-800 border-yellow-200",
        Some("low") => "bg-red-100 text-red-800 border-red-200",
        _ => "bg-gray-100 text-gray-800 border-gray-200",
    }
}

/// Date portion of an ISO timestamp (`2024-03-01T00:00:00` → `2024-03-01`).
pub fn display_date(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw)
}

/// Format a phone number for display.
/// Argentine 10-digit numbers become `(XXXX) XX-XXXX`; a leading 54 country
/// code is dropped. Anything else is returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = match digits.len() {
        10 => &digits[..],
        12 if digits.starts_with("54") => &digits[2..],
        _ => return phone.to_string(),
    };
    format!("({}) {}-{}", &local[0..4], &local[4..6], &local[6..10])
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format a backend date or timestamp as `DD/MM/YYYY`.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%d/%m/%Y").to_string()
    } else if let Some(day) = date.get(..10).and_then(|d| chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        day.format("%d/%m/%Y").to_string()
    } else {
        date.to_string()
    }
}

/// Format an amount in pesos with thousands separators: `$12.000`.
pub fn format_price(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if amount < 0.0 && whole > 0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Render a yes/no flag.
pub fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_phone() {
        assert_eq!(format_phone("3764123456"), "(3764) 12-3456");
        assert_eq!(format_phone("+54 3764 123456"), "(3764) 12-3456");
        assert_eq!(format_phone("123"), "123");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Músculo", 5), "Mú...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-03-01"), "01/03/2025");
        assert_eq!(format_date("2025-03-01T10:00:00Z"), "01/03/2025");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0.0), "$0");
        assert_eq!(format_price(950.0), "$950");
        assert_eq!(format_price(12000.0), "$12.000");
        assert_eq!(format_price(1234567.4), "$1.234.567");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&None, "-"), "-");
        assert_eq!(format_optional(&Some("x".to_string()), "-"), "x");
    }
}

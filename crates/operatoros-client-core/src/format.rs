use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::Rng;
use regex::Regex;

static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

const FILE_SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;
/// Upper bound on requested decimals, the same range `toFixed` accepts.
pub const MAX_PERCENT_DECIMALS: usize = 100;
pub const DEFAULT_ID_LENGTH: usize = 8;

/// en-US currency rendering: symbol prefix, thousands separators and the
/// currency's minor-unit precision.
#[must_use]
pub fn format_currency(amount: f64, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let (prefix, decimals) = currency_style(&code);
    if !amount.is_finite() {
        let body = if amount.is_nan() { "NaN" } else { "∞" };
        let sign = if amount.is_sign_negative() && !amount.is_nan() {
            "-"
        } else {
            ""
        };
        return format!("{sign}{prefix}{body}");
    }

    let fixed = format!("{:.*}", decimals, amount.abs());
    let (whole, fraction) = match fixed.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (fixed.as_str(), None),
    };
    let is_zero = fixed.chars().all(|ch| ch == '0' || ch == '.');
    let sign = if amount.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    let mut rendered = format!("{sign}{prefix}{}", group_thousands(whole));
    if let Some(fraction) = fraction {
        rendered.push('.');
        rendered.push_str(fraction);
    }
    rendered
}

fn currency_style(code: &str) -> (String, usize) {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "CAD" => "CA$",
        "AUD" => "A$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "CNY" => "CN¥",
        _ => "",
    };
    let decimals = if matches!(code, "JPY" | "KRW") { 0 } else { 2 };
    if symbol.is_empty() {
        (format!("{code} "), decimals)
    } else {
        (symbol.to_string(), decimals)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[must_use]
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals.min(MAX_PERCENT_DECIMALS), value * 100.0)
}

#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", FILE_SIZE_UNITS[unit])
}

#[must_use]
pub fn format_relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "Just now".to_string();
    }
    if seconds < 3_600 {
        return format!("{} minutes ago", seconds / 60);
    }
    if seconds < 86_400 {
        return format!("{} hours ago", seconds / 3_600);
    }
    if seconds < 2_592_000 {
        return format!("{} days ago", seconds / 86_400);
    }
    then.format("%-m/%-d/%Y").to_string()
}

/// Accepts RFC 3339 and the offset-less ISO forms the server templates emit.
/// Offset-less values are read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(raw, pattern).ok())
        .map(|naive| naive.and_utc())
}

#[must_use]
pub fn relative_label(raw: &str, now: DateTime<Utc>) -> Option<String> {
    parse_timestamp(raw).map(|then| format_relative_time(then, now))
}

#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL.as_ref().is_some_and(|pattern| pattern.is_match(email))
}

pub fn generate_id<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn currency_uses_symbol_and_grouping() {
        assert_eq!(format_currency(1_234_567.891, "USD"), "$1,234,567.89");
        assert_eq!(format_currency(-42.5, "eur"), "-€42.50");
        assert_eq!(format_currency(1500.0, "JPY"), "¥1,500");
        assert_eq!(format_currency(999.0, "CHF"), "CHF 999.00");
        assert_eq!(format_currency(-0.001, "USD"), "$0.00");
    }

    #[test]
    fn percentage_scales_and_rounds() {
        assert_eq!(format_percentage(0.256, DEFAULT_PERCENT_DECIMALS), "25.6%");
        assert_eq!(format_percentage(1.0, 0), "100%");
    }

    #[test]
    fn percentage_decimals_are_capped() {
        let rendered = format_percentage(0.5, usize::MAX);
        assert_eq!(rendered, format_percentage(0.5, MAX_PERCENT_DECIMALS));
        assert_eq!(rendered.len(), "50.".len() + MAX_PERCENT_DECIMALS + "%".len());
    }

    #[test]
    fn file_sizes_drop_trailing_zeros() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc
            .with_ymd_and_hms(2024, 3, 10, 12, 0, 0)
            .single()
            .expect("valid time");
        assert_eq!(format_relative_time(now - Duration::seconds(30), now), "Just now");
        assert_eq!(format_relative_time(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(format_relative_time(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_relative_time(now - Duration::days(2), now), "2 days ago");
        assert_eq!(format_relative_time(now - Duration::days(45), now), "1/25/2024");
        assert_eq!(format_relative_time(now + Duration::hours(1), now), "Just now");
    }

    #[test]
    fn timestamps_parse_with_and_without_offset() {
        let expected = Utc
            .with_ymd_and_hms(2024, 3, 10, 9, 30, 0)
            .single()
            .expect("valid time");
        assert_eq!(parse_timestamp("2024-03-10T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-10T11:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-10T09:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-10 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn email_validation_matches_simple_shape() {
        assert!(validate_email("ops@example.com"));
        assert!(!validate_email("ops@example"));
        assert!(!validate_email("ops @example.com"));
        assert!(!validate_email("@example.com"));
    }

    #[test]
    fn generated_ids_are_alphanumeric_with_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let id = generate_id(&mut rng, DEFAULT_ID_LENGTH);
        assert_eq!(id.len(), DEFAULT_ID_LENGTH);
        assert!(id.chars().all(|ch| ch.is_ascii_alphanumeric()));
        assert_ne!(id, generate_id(&mut rng, DEFAULT_ID_LENGTH));
    }
}

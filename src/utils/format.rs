/// Format an RFC 3339 timestamp as the dd/mm/yyyy form the backend's users
/// expect. Falls back to the date prefix of the raw string, or the raw
/// string itself when it is too short to carry one.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%d/%m/%Y").to_string()
    } else if date.len() >= 10 {
        // Assume a YYYY-MM-DD prefix
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format an optional string, returning a default if None or blank
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Display a JSON value the service typed loosely (string or number),
/// returning a default when absent.
pub fn format_value(value: Option<&serde_json::Value>, default: &str) -> String {
    match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2025-09-02T10:15:00Z"), "02/09/2025");
        assert_eq!(format_date("2025-09-02T10:15:00-05:00"), "02/09/2025");
        assert_eq!(format_date("2025-09-02"), "2025-09-02"); // no time part, keep prefix
        assert_eq!(format_date("ayer"), "ayer");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some("Medellín"), "-"), "Medellín");
        assert_eq!(format_optional(Some("   "), "-"), "-");
        assert_eq!(format_optional(None, "No especificado"), "No especificado");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value(Some(&serde_json::json!("2.5")), "-"),
            "2.5"
        );
        assert_eq!(format_value(Some(&serde_json::json!(2.5)), "-"), "2.5");
        assert_eq!(format_value(Some(&serde_json::json!(3)), "-"), "3");
        assert_eq!(format_value(Some(&serde_json::json!("")), "-"), "-");
        assert_eq!(format_value(None, "No especificado"), "No especificado");
    }
}

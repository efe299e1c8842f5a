use crate::error::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime};
use validator::ValidateEmail;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Trimmed text, or None when blank.
pub fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn require_text(field: &str, value: &str) -> AppResult<String> {
    clean(Some(value)).ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// ISO date, or the date part of an ISO date-time.
pub fn parse_date(field: &str, raw: &str) -> AppResult<NaiveDate> {
    let raw = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Ok(d);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| AppError::Coercion(format!("{field} '{raw}' is not a date (YYYY-MM-DD)")))
}

pub fn check_email(field: &str, value: Option<&str>) -> AppResult<()> {
    match value {
        Some(email) if !email.validate_email() => Err(AppError::Validation(format!(
            "{field} '{email}' is not a valid email address"
        ))),
        _ => Ok(()),
    }
}

/// Digits with optional `+ - ( )` and spaces, 7 to 15 digits.
pub fn check_phone(field: &str, value: Option<&str>) -> AppResult<()> {
    let Some(phone) = value else {
        return Ok(());
    };
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if allowed && (7..=15).contains(&digits) && !phone[1..].contains('+') {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{field} '{phone}' is not a valid phone number"
        )))
    }
}

pub fn check_amount(field: &str, amount: f64, allow_zero: bool) -> AppResult<()> {
    let ok = amount.is_finite() && if allow_zero { amount >= 0.0 } else { amount > 0.0 };
    if ok {
        Ok(())
    } else if allow_zero {
        Err(AppError::Validation(format!("{field} must not be negative")))
    } else {
        Err(AppError::Validation(format!("{field} must be greater than zero")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_drops_blank_values() {
        assert_eq!(clean(Some("  x ")), Some("x".to_string()));
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(clean(None), None);
    }

    #[test]
    fn dates_accept_iso_and_datetime() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(parse_date("d", "2026-03-04").unwrap(), d);
        assert_eq!(parse_date("d", "2026-03-04 10:11:12").unwrap(), d);
        assert_eq!(parse_date("d", "2026-03-04T10:11:12").unwrap(), d);
        assert!(matches!(
            parse_date("d", "04/03/2026"),
            Err(AppError::Coercion(_))
        ));
    }

    #[test]
    fn phone_rules() {
        assert!(check_phone("phone", Some("+880 1712-345678")).is_ok());
        assert!(check_phone("phone", Some("(02) 555 1234")).is_ok());
        assert!(check_phone("phone", None).is_ok());
        assert!(check_phone("phone", Some("12345")).is_err());
        assert!(check_phone("phone", Some("call me")).is_err());
        assert!(check_phone("phone", Some("12+3456789")).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(check_email("email", Some("a@b.com")).is_ok());
        assert!(check_email("email", None).is_ok());
        assert!(check_email("email", Some("not-an-email")).is_err());
    }

    #[test]
    fn amount_rules() {
        assert!(check_amount("amount", 0.0, true).is_ok());
        assert!(check_amount("amount", 0.0, false).is_err());
        assert!(check_amount("amount", -1.0, true).is_err());
        assert!(check_amount("amount", f64::NAN, true).is_err());
        assert!(check_amount("amount", 10.5, false).is_ok());
    }
}

//! Input validation for account fields.
//!
//! Validators return the violation message so callers can collect every
//! failure in order instead of stopping at the first one.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email regex is valid")
    })
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }

    if !email_regex().is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate display name
pub fn validate_display_name(display_name: &str) -> Result<(), String> {
    if display_name.trim().is_empty() {
        return Err("Display name cannot be empty".to_string());
    }

    if display_name.len() > 50 {
        return Err("Display name must be less than 50 characters long".to_string());
    }

    let disallowed_chars = ['\n', '\r', '\t', '\0'];
    if display_name.chars().any(|c| disallowed_chars.contains(&c)) {
        return Err("Display name contains invalid characters".to_string());
    }

    Ok(())
}

//! Utility functions

use uuid::Uuid;

pub fn is_valid_uuid(s: &str) -> bool {
    Uuid::parse_str(s).is_ok()
}

pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        if local.len() <= 2 {
            format!("{}***{}", local.get(..1).unwrap_or(""), domain)
        } else {
            format!("{}***{}", &local[..2], domain)
        }
    } else {
        "***".to_string()
    }
}

/// Keep only the digits of a CPF/CNPJ so formatted and raw input compare equal.
pub fn normalize_document(document: &str) -> String {
    document.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Trimmed, lowercased form used for location comparisons.
pub fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

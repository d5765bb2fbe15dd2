use std::io;

use crate::modules::config::PolicyConfig;

const COMPOSITION_MESSAGE: &str = "Debe tener mayúscula, minúscula y un número o símbolo.";

/// Reasons a password is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    TooShort(usize),
    NoLowercase,
    NoUppercase,
    NoDigitOrSymbol,
    LineBreak,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::TooShort(min) => write!(
                f,
                "Debe tener al menos {} caracteres, mayúscula, minúscula y un número o símbolo.",
                min
            ),
            PasswordError::NoLowercase
            | PasswordError::NoUppercase
            | PasswordError::NoDigitOrSymbol => write!(f, "{}", COMPOSITION_MESSAGE),
            PasswordError::LineBreak => write!(f, "La contraseña no puede contener saltos de línea."),
        }
    }
}

impl std::error::Error for PasswordError {}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Digits count, and so does anything outside `[A-Za-z0-9_]`
fn is_digit_or_symbol(c: char) -> bool {
    c.is_ascii_digit() || !(c.is_ascii_alphanumeric() || c == '_')
}

/// Function to validate password strength
pub fn validate_password(password: &str, policy: &PolicyConfig) -> Result<(), PasswordError> {
    if let Some(min) = policy.min_password_length {
        if password.chars().count() < min {
            return Err(PasswordError::TooShort(min));
        }
    }
    if password.chars().any(is_line_break) {
        return Err(PasswordError::LineBreak);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordError::NoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::NoUppercase);
    }
    if !password.chars().any(is_digit_or_symbol) {
        return Err(PasswordError::NoDigitOrSymbol);
    }
    Ok(())
}

/// Message shown under the password field, empty when valid
pub fn password_message(password: &str, policy: &PolicyConfig) -> String {
    match validate_password(password, policy) {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Helper function to read a password securely
pub fn read_password() -> io::Result<String> {
    rpassword::read_password()
}

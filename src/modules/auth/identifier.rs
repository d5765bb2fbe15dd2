use crate::modules::config::PolicyConfig;

/// Which rule accepted an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Email,
    Phone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    MissingAtOrDot,
    BadPhonePrefix(String),
    BadPhoneLength(usize),
}

impl std::fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentifierError::MissingAtOrDot => {
                write!(f, "El correo debe contener \"@\" y un punto.")
            }
            IdentifierError::BadPhonePrefix(prefix) => {
                write!(f, "El teléfono debe comenzar con {}.", prefix)
            }
            IdentifierError::BadPhoneLength(length) => {
                write!(f, "El teléfono debe tener {} caracteres.", length)
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

/// Validate an email address or phone number.
///
/// A leading `+` (after trimming) selects the phone rule, anything else the
/// email rule. The rule itself sees the raw input; nothing is normalized.
pub fn validate_identifier(
    identifier: &str,
    policy: &PolicyConfig,
) -> Result<IdentifierKind, IdentifierError> {
    if identifier.trim().starts_with('+') {
        if !identifier.starts_with(policy.phone_prefix.as_str()) {
            return Err(IdentifierError::BadPhonePrefix(policy.phone_prefix.clone()));
        }
        if identifier.chars().count() != policy.phone_length {
            return Err(IdentifierError::BadPhoneLength(policy.phone_length));
        }
        return Ok(IdentifierKind::Phone);
    }

    if !identifier.contains('@') || !identifier.contains('.') {
        return Err(IdentifierError::MissingAtOrDot);
    }
    Ok(IdentifierKind::Email)
}

/// Message shown under the identifier field, empty when valid
pub fn identifier_message(identifier: &str, policy: &PolicyConfig) -> String {
    match validate_identifier(identifier, policy) {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}

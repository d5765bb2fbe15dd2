/// One optional message per form field; `None` means the field is fine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub identifier: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub file: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.identifier.is_none()
            && self.password.is_none()
            && self.confirm_password.is_none()
            && self.file.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Messages in field order, skipping the empty ones
    pub fn messages(&self) -> Vec<&str> {
        [
            &self.identifier,
            &self.password,
            &self.confirm_password,
            &self.file,
        ]
        .into_iter()
        .filter_map(|m| m.as_deref())
        .collect()
    }
}

/// Turn a validator message into a field entry, where "" means valid
pub fn non_empty(message: String) -> Option<String> {
    if message.is_empty() {
        None
    } else {
        Some(message)
    }
}

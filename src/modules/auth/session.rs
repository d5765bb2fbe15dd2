use super::hashing::{CredentialHasher, Sha256Hasher};
use super::identifier::identifier_message;
use super::password::password_message;
use super::store::{CredentialRecord, CredentialRepository, InMemoryCredentials};
use crate::modules::config::PolicyConfig;
use crate::modules::forms::{non_empty, FieldErrors};
use crate::modules::utils::logging::log_auth_event;

/// Which form is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Login,
    Register,
}

/// What a successful submit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Account created, form is back in login mode
    Registered,
    LoggedIn,
}

/// Every way a submit can fail. All of them leave the session waiting for new input.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Validation(FieldErrors),
    PasswordMismatch,
    AlreadyRegistered,
    InvalidCredentials,
    AlreadyLoggedIn,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Validation(errors) => write!(f, "{}", errors.messages().join(" ")),
            SessionError::PasswordMismatch => write!(f, "Las contraseñas no coinciden"),
            SessionError::AlreadyRegistered => write!(f, "Usuario ya registrado"),
            SessionError::InvalidCredentials => write!(f, "Correo o contraseña incorrectos"),
            SessionError::AlreadyLoggedIn => write!(f, "Ya hay una sesión iniciada"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Login/registration form state plus the account list it checks against
pub struct Session<R = InMemoryCredentials, H = Sha256Hasher> {
    credentials: R,
    hasher: H,
    policy: PolicyConfig,
    mode: FormMode,
    identifier: String,
    password: String,
    confirm_password: String,
    errors: FieldErrors,
    logged_in: bool,
}

impl Session {
    /// Empty in-memory account list hashed with SHA-256
    pub fn new(policy: PolicyConfig) -> Self {
        Self::with_parts(InMemoryCredentials::new(), Sha256Hasher, policy)
    }
}

impl<R: CredentialRepository, H: CredentialHasher> Session<R, H> {
    pub fn with_parts(credentials: R, hasher: H, policy: PolicyConfig) -> Self {
        Self {
            credentials,
            hasher,
            policy,
            mode: FormMode::default(),
            identifier: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            errors: FieldErrors::default(),
            logged_in: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirm_password(&self) -> &str {
        &self.confirm_password
    }

    pub fn credentials(&self) -> &R {
        &self.credentials
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Update the identifier field and re-check it. An empty field shows no error.
    pub fn set_identifier(&mut self, value: impl Into<String>) {
        self.identifier = value.into();
        self.errors.identifier = if self.identifier.is_empty() {
            None
        } else {
            non_empty(identifier_message(&self.identifier, &self.policy))
        };
    }

    pub fn set_password(&mut self, value: impl Into<String>) {
        self.password = value.into();
        self.errors.password = if self.password.is_empty() {
            None
        } else {
            non_empty(password_message(&self.password, &self.policy))
        };
        if self.mode == FormMode::Register {
            self.refresh_confirm_error();
        }
    }

    pub fn set_confirm_password(&mut self, value: impl Into<String>) {
        self.confirm_password = value.into();
        self.refresh_confirm_error();
    }

    fn refresh_confirm_error(&mut self) {
        self.errors.confirm_password =
            if self.confirm_password.is_empty() || self.confirm_password == self.password {
                None
            } else {
                Some(SessionError::PasswordMismatch.to_string())
            };
    }

    /// Switch between login and registration, dropping all input and errors
    pub fn toggle_mode(&mut self) -> FormMode {
        self.mode = match self.mode {
            FormMode::Login => FormMode::Register,
            FormMode::Register => FormMode::Login,
        };
        self.reset_form();
        self.mode
    }

    /// Submit the form in its current mode
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        if self.logged_in {
            return Err(SessionError::AlreadyLoggedIn);
        }
        match self.mode {
            FormMode::Login => self.handle_login(),
            FormMode::Register => self.handle_register(),
        }
    }

    /// End the session. Registered accounts stay; returns whether anyone was logged in.
    pub fn logout(&mut self) -> bool {
        let was_logged_in = self.logged_in;
        self.logged_in = false;
        self.mode = FormMode::Login;
        self.reset_form();
        if was_logged_in {
            log::info!("Session closed");
        }
        was_logged_in
    }

    fn reset_form(&mut self) {
        self.identifier.clear();
        self.password.clear();
        self.confirm_password.clear();
        self.errors.clear();
    }

    /// Check both fields together so every problem is reported at once
    fn validate_fields(&mut self) -> Result<(), SessionError> {
        let errors = FieldErrors {
            identifier: non_empty(identifier_message(&self.identifier, &self.policy)),
            password: non_empty(password_message(&self.password, &self.policy)),
            ..FieldErrors::default()
        };
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(SessionError::Validation(errors));
        }
        self.errors.clear();
        Ok(())
    }

    fn handle_register(&mut self) -> Result<SubmitOutcome, SessionError> {
        if let Err(e) = self.validate_fields() {
            log_auth_event("register", &self.identifier, false, Some("invalid format"));
            return Err(e);
        }

        if self.password != self.confirm_password {
            self.errors.confirm_password = Some(SessionError::PasswordMismatch.to_string());
            log_auth_event("register", &self.identifier, false, Some("password mismatch"));
            return Err(SessionError::PasswordMismatch);
        }

        let identifier_hash = self.hasher.digest(&self.identifier);
        if self
            .credentials
            .find_by_identifier_hash(&identifier_hash)
            .is_some()
        {
            log_auth_event("register", &self.identifier, false, Some("already registered"));
            return Err(SessionError::AlreadyRegistered);
        }

        let password_hash = self.hasher.digest(&self.password);
        self.credentials
            .insert(CredentialRecord::new(identifier_hash, password_hash))?;
        log_auth_event("register", &self.identifier, true, None);

        self.mode = FormMode::Login;
        self.reset_form();
        Ok(SubmitOutcome::Registered)
    }

    fn handle_login(&mut self) -> Result<SubmitOutcome, SessionError> {
        if let Err(e) = self.validate_fields() {
            log_auth_event("login", &self.identifier, false, Some("invalid format"));
            return Err(e);
        }

        let identifier_hash = self.hasher.digest(&self.identifier);
        let password_hash = self.hasher.digest(&self.password);
        if self
            .credentials
            .find_match(&identifier_hash, &password_hash)
            .is_none()
        {
            // Same notice for unknown identifier and wrong password
            log_auth_event("login", &self.identifier, false, Some("no matching record"));
            return Err(SessionError::InvalidCredentials);
        }

        log_auth_event("login", &self.identifier, true, None);
        self.logged_in = true;
        self.reset_form();
        Ok(SubmitOutcome::LoggedIn)
    }
}

pub mod hashing;
pub mod identifier;
pub mod password;
pub mod session;
pub mod store;

// Re-export the main types and functions
pub use hashing::{CredentialHasher, Sha256Hasher};
pub use identifier::{identifier_message, validate_identifier, IdentifierError, IdentifierKind};
pub use password::{password_message, validate_password, PasswordError};
pub use session::{FormMode, Session, SessionError, SubmitOutcome};
pub use store::{CredentialRecord, CredentialRepository, InMemoryCredentials};

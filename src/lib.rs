// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{auth, config, forms, gallery, utils};

// Re-export commonly used types
pub use modules::auth::session::{FormMode, Session, SessionError, SubmitOutcome};
pub use modules::config::AppConfig;
pub use modules::forms::FieldErrors;
pub use modules::gallery::store::GalleryStore;

// Constants
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 8;
pub const PHONE_PREFIX: &str = "+569";
pub const PHONE_LENGTH: usize = 12;
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

pub mod errors;

pub use errors::{non_empty, FieldErrors};

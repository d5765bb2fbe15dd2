pub mod handle;
pub mod store;

pub use handle::{HandleSource, ImageHandle, LocalHandleSource, SelectedFile};
pub use store::{GalleryError, GalleryStore, RemoveOutcome};

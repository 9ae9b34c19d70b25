//! Storage module for file management
//!
//! Provides local filesystem storage for uploads: generated system
//! filenames, storage root confinement and bounded content previews.

pub mod identifier;
mod local_storage;
pub mod path_guard;
pub mod preview;

pub use identifier::generate_system_filename;
pub use local_storage::LocalStorage;
pub use preview::FilePreview;

//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod controller;
pub mod document;
pub mod error;
pub mod error_ext;
pub mod export;
pub mod ingest;
pub mod prompt;
pub mod services;
pub mod session;
pub mod svg;

pub use controller::{EditorController, Gesture, InteractionState, Key, MenuAction, Outcome};
pub use document::{Document, DocumentSource};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use session::{Session, Stage};

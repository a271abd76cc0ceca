//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, LanguageModel, ...)
//! but are themselves concrete structs, not traits.

mod analysis;
mod documents;

pub use analysis::{AnalysisService, HealthStatus};
pub use documents::{DocumentService, DOCUMENT_EXTENSION};

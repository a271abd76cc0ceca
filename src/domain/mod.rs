//! Domain layer: the pyramid tree, its rules, layout and slide derivation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod ids;
pub mod layout;
pub mod node;
pub mod slides;
pub mod store;

pub use arena::{PyramidNode, PyramidTree};
pub use error::{DomainError, DomainResult};
pub use ids::IdGenerator;
pub use layout::{compute_connector, compute_layout, LayoutConfig, PyramidLayout};
pub use node::{Level, Node, PyramidDocument, ROOT_ID};
pub use slides::{generate_slides, Slide};
pub use store::TreeStore;

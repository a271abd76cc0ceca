//! pyramid: Minto pyramid argument trees from documents
//!
//! Layers, from the inside out:
//! - `domain`: the pyramid tree, its mutations, layout and slide derivation
//! - `application`: document analysis, ingestion, the interaction controller
//! - `infrastructure`: filesystem, Gemini client, PDF extraction, DI
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

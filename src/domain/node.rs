//! Pyramid node: the owned tree shape exchanged with the analysis service
//! and stored in pyramid document files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Identifier of the single main message node.
pub const ROOT_ID: &str = "root";

/// Content given to nodes created by add-child and add-sibling.
pub const PLACEHOLDER_CONTENT: &str = "New item - click to edit";

/// Content given to key arguments created from the toolbar.
pub const ARGUMENT_PLACEHOLDER: &str = "New argument - click to edit";

/// Depth of a node in the pyramid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    /// Level 0: the main message (root)
    MainMessage,
    /// Level 1: a key argument supporting the main message
    KeyArgument,
    /// Level 2: supporting evidence for a key argument
    Evidence,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::MainMessage, Level::KeyArgument, Level::Evidence];

    pub fn from_depth(depth: usize) -> Option<Self> {
        Self::ALL.get(depth).copied()
    }

    pub fn depth(self) -> usize {
        match self {
            Level::MainMessage => 0,
            Level::KeyArgument => 1,
            Level::Evidence => 2,
        }
    }

    /// Level of a child of this level, `None` for evidence (depth cap).
    pub fn child(self) -> Option<Self> {
        Self::from_depth(self.depth() + 1)
    }

    /// Category label used for freshly created nodes of this level.
    pub fn default_label(self) -> &'static str {
        match self {
            Level::MainMessage => "Main Message",
            Level::KeyArgument => "Key Argument",
            Level::Evidence => "Evidence",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_depth(value as usize).ok_or(DomainError::InvalidLevel(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.depth() as u8
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.depth())
    }
}

/// A node of the pyramid with exclusive ownership of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub level: Level,
    pub label: String,
    pub content: String,
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        level: Level,
        label: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            label: label.into(),
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }
}

/// Pyramid document: the analysis result and the on-disk file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PyramidDocument {
    pub title: String,
    pub pyramid: Node,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_level_numbers_when_converting_then_maps_depths() {
        assert_eq!(Level::try_from(0).unwrap(), Level::MainMessage);
        assert_eq!(Level::try_from(2).unwrap(), Level::Evidence);
        assert_eq!(Level::try_from(3), Err(DomainError::InvalidLevel(3)));
        assert_eq!(u8::from(Level::KeyArgument), 1);
    }

    #[test]
    fn given_evidence_level_when_asking_for_child_then_none() {
        assert_eq!(Level::MainMessage.child(), Some(Level::KeyArgument));
        assert_eq!(Level::Evidence.child(), None);
    }

    #[test]
    fn given_json_without_children_when_deserializing_then_defaults_to_empty() {
        let node: Node =
            serde_json::from_str(r#"{"id":"e","level":2,"label":"Evidence","content":"x"}"#)
                .unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.level, Level::Evidence);
    }
}

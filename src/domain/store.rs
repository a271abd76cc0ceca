//! Tree store: the current pyramid and the current selection.

use crate::domain::arena::{PyramidNode, PyramidTree};

/// Holds the loaded pyramid (none before the first analysis) and the node
/// selected by the context menu. Callers keep the selection consistent;
/// the store does not validate it.
#[derive(Debug, Clone, Default)]
pub struct TreeStore {
    tree: Option<PyramidTree>,
    selected: Option<String>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<&PyramidNode> {
        self.tree.as_ref().map(|t| t.root_node())
    }

    pub fn tree(&self) -> Option<&PyramidTree> {
        self.tree.as_ref()
    }

    pub fn tree_mut(&mut self) -> Option<&mut PyramidTree> {
        self.tree.as_mut()
    }

    pub fn is_loaded(&self) -> bool {
        self.tree.is_some()
    }

    /// Replace the whole tree; the old tree and selection are discarded.
    pub fn replace(&mut self, tree: PyramidTree) {
        self.tree = Some(tree);
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn set_selected(&mut self, id: Option<String>) {
        self.selected = id;
    }
}

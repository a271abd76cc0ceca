//! Arena-backed pyramid tree and its mutation operations.
//!
//! Nodes live in a generational arena and refer to their children by index.
//! Lookups by identifier are depth-first searches from the root; at pyramid
//! scale (three levels, a handful of nodes per level) that is cheap enough
//! that no id index is maintained.

use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::ids::IdGenerator;
use crate::domain::node::{Level, Node, ARGUMENT_PLACEHOLDER, PLACEHOLDER_CONTENT};

/// Node stored in the arena.
#[derive(Debug, Clone)]
pub struct PyramidNode {
    pub id: String,
    pub level: Level,
    pub label: String,
    pub content: String,
    /// Indices of child nodes in the arena, in display order
    pub children: Vec<Index>,
}

impl fmt::Display for PyramidNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

/// The pyramid: exactly one root of level 0 owning all other nodes.
#[derive(Debug, Clone)]
pub struct PyramidTree {
    arena: Arena<PyramidNode>,
    root: Index,
    ids: IdGenerator,
}

impl PyramidTree {
    /// Build the arena from an owned node tree, checking the structural rules:
    /// root at level 0, every child one level below its parent, no node below
    /// level 2 and unique identifiers.
    #[instrument(level = "debug", skip(node), fields(root = %node.id))]
    pub fn from_node(node: &Node) -> DomainResult<Self> {
        if node.level != Level::MainMessage {
            return Err(DomainError::InvalidPyramid(format!(
                "root '{}' has level {}, expected 0",
                node.id, node.level
            )));
        }

        let mut arena = Arena::new();
        let mut seen = HashSet::new();
        let root = insert_subtree(&mut arena, &mut seen, node, 0)?;
        debug!("pyramid loaded with {} nodes", arena.len());

        Ok(Self {
            arena,
            root,
            ids: IdGenerator::new(),
        })
    }

    /// Owned copy of the current tree.
    pub fn to_node(&self) -> Node {
        self.node_at(self.root)
    }

    fn node_at(&self, idx: Index) -> Node {
        let node = &self.arena[idx];
        Node {
            id: node.id.clone(),
            level: node.level,
            label: node.label.clone(),
            content: node.content.clone(),
            children: node.children.iter().map(|&c| self.node_at(c)).collect(),
        }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn root_node(&self) -> &PyramidNode {
        &self.arena[self.root]
    }

    pub fn get(&self, idx: Index) -> Option<&PyramidNode> {
        self.arena.get(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Children of `idx` in display order.
    pub fn children(&self, idx: Index) -> impl Iterator<Item = (Index, &PyramidNode)> + '_ {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(move |&child| self.arena.get(child).map(|node| (child, node)))
    }

    /// Depth-first pre-order traversal from the root.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, id: &str) -> Option<Index> {
        self.iter().find(|(_, node)| node.id == id).map(|(idx, _)| idx)
    }

    /// First node with the given identifier, depth-first.
    pub fn find_node(&self, id: &str) -> Option<&PyramidNode> {
        self.find(id).and_then(|idx| self.arena.get(idx))
    }

    #[instrument(level = "trace", skip(self))]
    fn find_parent_index(&self, id: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| {
                node.children
                    .iter()
                    .any(|&child| self.arena.get(child).is_some_and(|c| c.id == id))
            })
            .map(|(idx, _)| idx)
    }

    /// Direct parent of the node with the given identifier.
    pub fn find_parent(&self, id: &str) -> Option<&PyramidNode> {
        self.find_parent_index(id)
            .and_then(|idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        let arena = &self.arena;
        self.ids
            .next_id(prefix, |candidate| arena.iter().any(|(_, n)| n.id == candidate))
    }

    /// Overwrite the content of a node. Returns false if the id is unknown.
    #[instrument(level = "debug", skip(self, text))]
    pub fn update_content(&mut self, id: &str, text: &str) -> bool {
        match self.find(id) {
            Some(idx) => {
                self.arena[idx].content = text.to_string();
                true
            }
            None => {
                debug!("update_content: no node '{}'", id);
                false
            }
        }
    }

    /// Append a child below `parent_id`. No-op on unknown ids and on evidence
    /// nodes, which may not have children.
    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent_id: &str) -> Option<String> {
        let parent_idx = self.find(parent_id)?;
        let Some(level) = self.arena[parent_idx].level.child() else {
            debug!("add_child: '{}' is at maximum depth", parent_id);
            return None;
        };

        let id = self.fresh_id("node");
        let child = self.arena.insert(PyramidNode {
            id: id.clone(),
            level,
            label: level.default_label().to_string(),
            content: PLACEHOLDER_CONTENT.to_string(),
            children: Vec::new(),
        });
        self.arena[parent_idx].children.push(child);
        Some(id)
    }

    /// Insert a node of the same level and label directly after `id`.
    /// No-op for the root and for unknown ids.
    #[instrument(level = "debug", skip(self))]
    pub fn add_sibling(&mut self, id: &str) -> Option<String> {
        let parent_idx = self.find_parent_index(id)?;
        let position = self.arena[parent_idx]
            .children
            .iter()
            .position(|&c| self.arena[c].id == id)?;
        let original = &self.arena[self.arena[parent_idx].children[position]];
        let (level, label) = (original.level, original.label.clone());

        let new_id = self.fresh_id("node");
        let sibling = self.arena.insert(PyramidNode {
            id: new_id.clone(),
            level,
            label,
            content: PLACEHOLDER_CONTENT.to_string(),
            children: Vec::new(),
        });
        self.arena[parent_idx].children.insert(position + 1, sibling);
        Some(new_id)
    }

    /// Append a new key argument to the main message.
    #[instrument(level = "debug", skip(self))]
    pub fn add_argument(&mut self) -> String {
        let id = self.fresh_id("arg");
        let argument = self.arena.insert(PyramidNode {
            id: id.clone(),
            level: Level::KeyArgument,
            label: Level::KeyArgument.default_label().to_string(),
            content: ARGUMENT_PLACEHOLDER.to_string(),
            children: Vec::new(),
        });
        self.arena[self.root].children.push(argument);
        id
    }

    /// Remove a node together with its subtree.
    ///
    /// Deleting the main message is rejected with [`DomainError::RootDeletion`];
    /// unknown ids are a no-op returning `Ok(false)`.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_node(&mut self, id: &str) -> DomainResult<bool> {
        let Some(idx) = self.find(id) else {
            debug!("delete_node: no node '{}'", id);
            return Ok(false);
        };
        if idx == self.root || self.arena[idx].level == Level::MainMessage {
            warn!("rejected deletion of main message node '{}'", id);
            return Err(DomainError::RootDeletion);
        }
        let Some(parent_idx) = self.find_parent_index(id) else {
            return Ok(false);
        };

        self.arena[parent_idx].children.retain(|&c| c != idx);
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
            }
        }
        Ok(true)
    }

    /// Exchange two same-level siblings of the same parent.
    ///
    /// No-op when either id is unknown, the ids are equal, the levels differ,
    /// or the nodes have different parents.
    #[instrument(level = "debug", skip(self))]
    pub fn swap(&mut self, id_a: &str, id_b: &str) -> bool {
        if id_a == id_b {
            return false;
        }
        let (Some(a), Some(b)) = (self.find(id_a), self.find(id_b)) else {
            return false;
        };
        if self.arena[a].level != self.arena[b].level {
            debug!("swap: level mismatch between '{}' and '{}'", id_a, id_b);
            return false;
        }
        let (Some(parent_a), Some(parent_b)) =
            (self.find_parent_index(id_a), self.find_parent_index(id_b))
        else {
            return false;
        };
        if parent_a != parent_b {
            debug!("swap: '{}' and '{}' have different parents", id_a, id_b);
            return false;
        }

        let siblings = &mut self.arena[parent_a].children;
        let (Some(pos_a), Some(pos_b)) = (
            siblings.iter().position(|&c| c == a),
            siblings.iter().position(|&c| c == b),
        ) else {
            return false;
        };
        siblings.swap(pos_a, pos_b);
        true
    }

    /// Number of levels in the tree (1 for a lone root).
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        match self.arena.get(idx) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_depth(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }
}

fn insert_subtree(
    arena: &mut Arena<PyramidNode>,
    seen: &mut HashSet<String>,
    node: &Node,
    depth: usize,
) -> DomainResult<Index> {
    let expected = Level::from_depth(depth).ok_or_else(|| {
        DomainError::InvalidPyramid(format!("node '{}' is deeper than level 2", node.id))
    })?;
    if node.level != expected {
        return Err(DomainError::InvalidPyramid(format!(
            "node '{}' has level {}, expected {}",
            node.id, node.level, expected
        )));
    }
    if !seen.insert(node.id.clone()) {
        return Err(DomainError::InvalidPyramid(format!(
            "duplicate node id '{}'",
            node.id
        )));
    }

    let mut children = Vec::with_capacity(node.children.len());
    for child in &node.children {
        children.push(insert_subtree(arena, seen, child, depth + 1)?);
    }
    Ok(arena.insert(PyramidNode {
        id: node.id.clone(),
        level: node.level,
        label: node.label.clone(),
        content: node.content.clone(),
        children,
    }))
}

pub struct TreeIterator<'a> {
    tree: &'a PyramidTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a PyramidTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a PyramidNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.arena.get(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::new("root", Level::MainMessage, "Main Message", "Main").with_children(vec![
            Node::new("arg-1", Level::KeyArgument, "Key Argument 1", "First").with_children(
                vec![Node::new("ev-1", Level::Evidence, "Evidence", "Fact")],
            ),
            Node::new("arg-2", Level::KeyArgument, "Key Argument 2", "Second"),
        ])
    }

    #[test]
    fn given_node_tree_when_round_tripping_through_arena_then_equal() {
        let tree = PyramidTree::from_node(&sample()).unwrap();
        assert_eq!(tree.to_node(), sample());
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn given_tree_when_iterating_then_preorder() {
        let tree = PyramidTree::from_node(&sample()).unwrap();
        let ids: Vec<_> = tree.iter().map(|(_, n)| n.id.as_str()).collect();
        assert_eq!(ids, vec!["root", "arg-1", "ev-1", "arg-2"]);
    }

    #[test]
    fn given_wrong_level_when_building_then_rejected() {
        let mut node = sample();
        node.children[1].level = Level::Evidence;
        assert!(matches!(
            PyramidTree::from_node(&node),
            Err(DomainError::InvalidPyramid(_))
        ));
    }

    #[test]
    fn given_duplicate_ids_when_building_then_rejected() {
        let mut node = sample();
        node.children[1].id = "arg-1".into();
        let err = PyramidTree::from_node(&node).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn given_deleted_subtree_when_inspecting_arena_then_descendants_gone() {
        let mut tree = PyramidTree::from_node(&sample()).unwrap();
        assert_eq!(tree.delete_node("arg-1"), Ok(true));
        assert_eq!(tree.len(), 2);
        assert!(!tree.contains("ev-1"));
    }
}

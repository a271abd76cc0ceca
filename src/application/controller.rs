//! Interaction controller: gestures in, tree mutations and relayouts out.
//!
//! The controller owns the [`TreeStore`] and the interaction state. Every
//! gesture is handled synchronously; a gesture that changes the tree is
//! followed by a full relayout from the current tree.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::domain::{compute_layout, LayoutConfig, Level, PyramidLayout, PyramidTree, TreeStore};

/// Entries of the node context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Edit,
    AddChild,
    AddSibling,
    Delete,
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(MenuAction::Edit),
            "add-child" => Ok(MenuAction::AddChild),
            "add-sibling" => Ok(MenuAction::AddSibling),
            "delete" => Ok(MenuAction::Delete),
            other => Err(format!(
                "unknown menu action '{}' (edit, add-child, add-sibling, delete)",
                other
            )),
        }
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuAction::Edit => "edit",
            MenuAction::AddChild => "add-child",
            MenuAction::AddSibling => "add-sibling",
            MenuAction::Delete => "delete",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other,
}

/// A discrete user interface event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gesture {
    /// Make a node's content editable in place
    ActivateEdit(String),
    /// Replace the edit draft
    Input(String),
    KeyDown { key: Key, shift: bool },
    /// The editable content lost focus
    Blur,
    DragStart(String),
    DragOver(String),
    DragLeave(String),
    Drop(String),
    DragEnd,
    /// Secondary click on a node
    ContextMenu(String),
    MenuSelect(MenuAction),
    /// Click anywhere outside the open menu or editor
    ClickOutside,
    /// Toolbar button appending a key argument
    AddArgument,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Editing {
        node_id: String,
        draft: String,
    },
    Dragging {
        node_id: String,
        /// Node currently showing the drop-target affordance
        hover: Option<String>,
    },
    ContextMenuOpen {
        node_id: String,
    },
}

/// What a gesture did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The tree changed and was laid out again
    pub changed: bool,
    /// Identifier of a node created by the gesture
    pub created: Option<String>,
    /// Rejection to show to the user
    pub notice: Option<String>,
}

impl Outcome {
    fn unchanged() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct EditorController {
    store: TreeStore,
    state: InteractionState,
    layout_config: LayoutConfig,
    layout: Option<PyramidLayout>,
    layout_passes: u64,
}

impl EditorController {
    pub fn new(layout_config: LayoutConfig) -> Self {
        Self {
            store: TreeStore::new(),
            state: InteractionState::Idle,
            layout_config,
            layout: None,
            layout_passes: 0,
        }
    }

    /// Replace the tree wholesale, e.g. after a new analysis.
    pub fn load(&mut self, tree: PyramidTree) {
        self.store.replace(tree);
        self.state = InteractionState::Idle;
        self.relayout();
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn tree(&self) -> Option<&PyramidTree> {
        self.store.tree()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Layout of the current tree, recomputed after every change.
    pub fn layout(&self) -> Option<&PyramidLayout> {
        self.layout.as_ref()
    }

    /// Number of full layout passes run so far.
    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    fn relayout(&mut self) {
        self.layout = self
            .store
            .tree()
            .map(|tree| compute_layout(tree, &self.layout_config));
        self.layout_passes += 1;
    }

    fn changed(&mut self, created: Option<String>) -> Outcome {
        self.relayout();
        Outcome {
            changed: true,
            created,
            notice: None,
        }
    }

    #[instrument(level = "debug", skip(self), fields(state = ?self.state))]
    pub fn handle(&mut self, gesture: Gesture) -> Outcome {
        if !self.store.is_loaded() {
            debug!("ignoring gesture without a loaded pyramid");
            return Outcome::unchanged();
        }

        match gesture {
            Gesture::ActivateEdit(id) => {
                let outcome = self.commit_edit();
                self.begin_edit(&id);
                outcome
            }
            Gesture::Input(text) => {
                if let InteractionState::Editing { draft, .. } = &mut self.state {
                    *draft = text;
                }
                Outcome::unchanged()
            }
            Gesture::KeyDown { key, shift } => self.key_down(key, shift),
            Gesture::Blur => self.commit_edit(),
            Gesture::DragStart(id) => {
                let outcome = self.commit_edit();
                if self.find_level(&id).is_some() {
                    self.store.set_selected(None);
                    self.state = InteractionState::Dragging {
                        node_id: id,
                        hover: None,
                    };
                }
                outcome
            }
            Gesture::DragOver(id) => {
                if let InteractionState::Dragging { hover, .. } = &mut self.state {
                    *hover = Some(id);
                }
                Outcome::unchanged()
            }
            Gesture::DragLeave(id) => {
                if let InteractionState::Dragging { hover, .. } = &mut self.state {
                    if hover.as_deref() == Some(id.as_str()) {
                        *hover = None;
                    }
                }
                Outcome::unchanged()
            }
            Gesture::Drop(target) => self.drop_on(&target),
            Gesture::DragEnd => {
                if matches!(self.state, InteractionState::Dragging { .. }) {
                    self.state = InteractionState::Idle;
                }
                Outcome::unchanged()
            }
            Gesture::ContextMenu(id) => {
                let outcome = self.commit_edit();
                if self.find_level(&id).is_some() {
                    self.store.set_selected(Some(id.clone()));
                    self.state = InteractionState::ContextMenuOpen { node_id: id };
                }
                outcome
            }
            Gesture::MenuSelect(action) => self.menu_select(action),
            Gesture::ClickOutside => {
                if matches!(self.state, InteractionState::ContextMenuOpen { .. }) {
                    self.close_menu();
                    Outcome::unchanged()
                } else {
                    self.commit_edit()
                }
            }
            Gesture::AddArgument => {
                let created = self.store.tree_mut().map(|tree| tree.add_argument());
                self.changed(created)
            }
        }
    }

    fn find_level(&self, id: &str) -> Option<Level> {
        self.store.tree()?.find_node(id).map(|n| n.level)
    }

    fn begin_edit(&mut self, id: &str) {
        let draft = self
            .store
            .tree()
            .and_then(|t| t.find_node(id))
            .map(|n| n.content.clone());
        if let Some(draft) = draft {
            self.store.set_selected(None);
            self.state = InteractionState::Editing {
                node_id: id.to_string(),
                draft,
            };
        }
    }

    /// Write the draft back if an edit is in progress; returns to Idle.
    fn commit_edit(&mut self) -> Outcome {
        if !matches!(self.state, InteractionState::Editing { .. }) {
            return Outcome::unchanged();
        }
        let InteractionState::Editing { node_id, draft } = std::mem::take(&mut self.state) else {
            return Outcome::unchanged();
        };
        let updated = self
            .store
            .tree_mut()
            .is_some_and(|tree| tree.update_content(&node_id, &draft));
        if updated {
            self.changed(None)
        } else {
            Outcome::unchanged()
        }
    }

    fn key_down(&mut self, key: Key, shift: bool) -> Outcome {
        match key {
            Key::Enter => {
                let InteractionState::Editing { draft, .. } = &mut self.state else {
                    return Outcome::unchanged();
                };
                if shift {
                    draft.push('\n');
                    return Outcome::unchanged();
                }
                self.commit_edit()
            }
            Key::Escape => {
                if matches!(self.state, InteractionState::ContextMenuOpen { .. }) {
                    self.close_menu();
                }
                Outcome::unchanged()
            }
            Key::Other => Outcome::unchanged(),
        }
    }

    fn drop_on(&mut self, target: &str) -> Outcome {
        let InteractionState::Dragging { node_id, hover } = &mut self.state else {
            return Outcome::unchanged();
        };
        *hover = None;
        let dragged = node_id.clone();
        if dragged == target {
            return Outcome::unchanged();
        }
        match (self.find_level(&dragged), self.find_level(target)) {
            (Some(a), Some(b)) if a == b => {}
            _ => {
                debug!("drop of '{}' on '{}' has no valid target", dragged, target);
                return Outcome::unchanged();
            }
        }
        let swapped = self
            .store
            .tree_mut()
            .is_some_and(|tree| tree.swap(&dragged, target));
        if swapped {
            self.changed(None)
        } else {
            Outcome::unchanged()
        }
    }

    fn close_menu(&mut self) {
        self.state = InteractionState::Idle;
        self.store.set_selected(None);
    }

    fn menu_select(&mut self, action: MenuAction) -> Outcome {
        let InteractionState::ContextMenuOpen { .. } = self.state else {
            return Outcome::unchanged();
        };
        let Some(selected) = self.store.selected().map(str::to_string) else {
            self.close_menu();
            return Outcome::unchanged();
        };
        self.close_menu();

        let Some(tree) = self.store.tree_mut() else {
            return Outcome::unchanged();
        };
        match action {
            MenuAction::Edit => {
                self.begin_edit(&selected);
                Outcome::unchanged()
            }
            MenuAction::AddChild => match tree.add_child(&selected) {
                Some(id) => self.changed(Some(id)),
                None => Outcome::unchanged(),
            },
            MenuAction::AddSibling => match tree.add_sibling(&selected) {
                Some(id) => self.changed(Some(id)),
                None => Outcome::unchanged(),
            },
            MenuAction::Delete => match tree.delete_node(&selected) {
                Ok(true) => self.changed(None),
                Ok(false) => Outcome::unchanged(),
                Err(e) => Outcome {
                    changed: false,
                    created: None,
                    notice: Some(e.to_string()),
                },
            },
        }
    }
}

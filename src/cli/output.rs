//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use generational_arena::Index;
use termtree::Tree;

use crate::domain::PyramidTree;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X, indented)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {} {}", "✗".red(), msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn node_line(tree: &PyramidTree, idx: Index) -> String {
    match tree.get(idx) {
        Some(node) => format!(
            "L{} [{}] {}: {}",
            node.level,
            node.id,
            node.label,
            node.content.replace('\n', " ")
        ),
        None => String::new(),
    }
}

fn subtree(tree: &PyramidTree, idx: Index) -> Tree<String> {
    Tree::new(node_line(tree, idx))
        .with_leaves(tree.children(idx).map(|(child, _)| subtree(tree, child)))
}

/// Pyramid as a printable tree: one line per node with level, id and label.
pub fn tree_view(tree: &PyramidTree) -> Tree<String> {
    subtree(tree, tree.root())
}

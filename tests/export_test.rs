//! Integration tests for the HTML deck export and SVG rendering.

use tempfile::TempDir;

use pyramid::application::export::export_deck;
use pyramid::application::svg::render_svg;
use pyramid::domain::{compute_layout, LayoutConfig, Level, Node, PyramidTree, ROOT_ID};
use pyramid::infrastructure::traits::RealFileSystem;

fn tree() -> PyramidTree {
    let root = Node::new(ROOT_ID, Level::MainMessage, "Main Message", "Adopt mobile-first")
        .with_children(vec![
            Node::new("arg-1", Level::KeyArgument, "Usage", "Users & devices").with_children(
                vec![Node::new("ev-1", Level::Evidence, "Evidence", "68% on mobile")],
            ),
            Node::new("arg-2", Level::KeyArgument, "Market", "Competitors moved"),
        ]);
    PyramidTree::from_node(&root).unwrap()
}

#[test]
fn given_tree_when_exporting_then_deck_written_with_slug_name() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let out_dir = temp.path().join("decks");

    // Act
    let path = export_deck(&RealFileSystem, &out_dir, "Q4 Product Strategy", &tree()).unwrap();

    // Assert
    assert_eq!(path, out_dir.join("Q4-Product-Strategy-slides.html"));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Q4 Product Strategy - Slides</title>"));
    assert_eq!(html.matches("class=\"slide ").count(), 5);
    assert!(html.contains("<h2>Recommendation</h2>"));
    assert!(html.contains("<li>Users &amp; devices</li>"));
    assert!(html.contains("<p>Executive Summary</p>"));
}

#[test]
fn given_existing_deck_when_exporting_again_then_overwritten() {
    let temp = TempDir::new().unwrap();
    let mut tree = tree();
    export_deck(&RealFileSystem, temp.path(), "Deck", &tree).unwrap();

    tree.update_content("arg-2", "Competitors shipped apps");
    let path = export_deck(&RealFileSystem, temp.path(), "Deck", &tree).unwrap();

    let html = std::fs::read_to_string(path).unwrap();
    assert!(html.contains("Competitors shipped apps"));
    assert!(!html.contains("Competitors moved"));
}

#[test]
fn given_layout_when_rendering_svg_then_nodes_and_connectors_painted() {
    let tree = tree();
    let layout = compute_layout(&tree, &LayoutConfig::default());

    let svg = render_svg(&tree, &layout);

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<rect ").count(), 4);
    assert_eq!(svg.matches("class=\"connection-line").count(), 3);
    assert!(svg.contains("Users &amp; devices"));
    assert!(svg.contains("data-id=\"ev-1\""));
}

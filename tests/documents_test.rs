//! Integration tests for pyramid document files.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use pyramid::application::services::DocumentService;
use pyramid::application::ApplicationError;
use pyramid::domain::{DomainError, Level, Node, PyramidDocument, PyramidTree, ROOT_ID};
use pyramid::infrastructure::traits::RealFileSystem;

fn service() -> DocumentService {
    DocumentService::new(Arc::new(RealFileSystem))
}

fn document() -> PyramidDocument {
    PyramidDocument {
        title: "Q4 Strategy".into(),
        pyramid: Node::new(ROOT_ID, Level::MainMessage, "Main Message", "Go mobile")
            .with_children(vec![Node::new(
                "arg-1",
                Level::KeyArgument,
                "Usage",
                "Usage grew",
            )]),
    }
}

#[test]
fn given_document_when_saved_and_loaded_then_tree_preserved() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = DocumentService::default_path(&temp.path().join("out"), "Q4 Strategy");

    // Act
    service().save(&path, &document()).unwrap();
    let (title, tree) = service().load(&path).unwrap();

    // Assert
    assert!(path.ends_with("Q4-Strategy.pyramid.json"));
    assert_eq!(title, "Q4 Strategy");
    assert_eq!(tree.to_node(), document().pyramid);
}

#[test]
fn given_edited_tree_when_saved_then_numeric_levels_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.pyramid.json");
    let mut tree = PyramidTree::from_node(&document().pyramid).unwrap();
    tree.add_child("arg-1");

    service().save_tree(&path, "Q4 Strategy", &tree).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["pyramid"]["level"], 0);
    assert_eq!(json["pyramid"]["children"][0]["children"][0]["level"], 2);
}

#[test]
fn given_invalid_levels_on_disk_when_loading_then_domain_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.pyramid.json");
    std::fs::write(
        &path,
        r#"{"title":"t","pyramid":{"id":"root","level":1,"label":"x","content":"y"}}"#,
    )
    .unwrap();

    let err = service().load(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::InvalidPyramid(_))
    ));
}

#[test]
fn given_missing_file_when_loading_then_operation_failed_with_path() {
    let err = service()
        .load(Path::new("/nonexistent/pyramid.json"))
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/pyramid.json"));
}

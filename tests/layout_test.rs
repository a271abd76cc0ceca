//! Integration tests for the two-pass pyramid layout.

use rstest::{fixture, rstest};

use pyramid::domain::layout::{place, rows};
use pyramid::domain::{
    compute_layout, LayoutConfig, Level, Node, PyramidNode, PyramidTree, ROOT_ID,
};

#[fixture]
fn tree() -> PyramidTree {
    let root = Node::new(ROOT_ID, Level::MainMessage, "Main Message", "Adopt mobile-first")
        .with_children(vec![
            Node::new("arg-1", Level::KeyArgument, "Usage", "Usage").with_children(vec![
                Node::new("ev-1a", Level::Evidence, "Evidence", "a"),
                Node::new("ev-1b", Level::Evidence, "Evidence", "b"),
            ]),
            Node::new("arg-2", Level::KeyArgument, "Market", "Market")
                .with_children(vec![Node::new("ev-2a", Level::Evidence, "Evidence", "c")]),
            Node::new("arg-3", Level::KeyArgument, "ROI", "ROI"),
        ]);
    PyramidTree::from_node(&root).unwrap()
}

fn ids(row: &[&PyramidNode]) -> Vec<String> {
    row.iter().map(|n| n.id.clone()).collect()
}

#[rstest]
fn given_tree_when_building_rows_then_evidence_flattened_in_parent_order(tree: PyramidTree) {
    let [top, middle, bottom] = rows(&tree);

    assert_eq!(ids(&top), vec![ROOT_ID]);
    assert_eq!(ids(&middle), vec!["arg-1", "arg-2", "arg-3"]);
    assert_eq!(ids(&bottom), vec!["ev-1a", "ev-1b", "ev-2a"]);
}

#[rstest]
fn given_default_config_when_placing_then_rows_centred_and_stacked(tree: PyramidTree) {
    // Act
    let placement = place(&tree, &LayoutConfig::default());

    // Assert: widest row is 3 * 220 + 2 * 24 = 708 plus 2 * 40 padding
    assert_eq!(placement.width, 788.0);
    assert_eq!(placement.height, 456.0);
    let root = placement.find(ROOT_ID).unwrap();
    assert_eq!((root.x, root.y), (284.0, 40.0));
    let arg_1 = placement.find("arg-1").unwrap();
    assert_eq!((arg_1.x, arg_1.y), (40.0, 192.0));
    let ev_2a = placement.find("ev-2a").unwrap();
    assert_eq!((ev_2a.x, ev_2a.y), (528.0, 344.0));
}

#[rstest]
fn given_tree_when_layout_then_one_connector_per_edge_anchored_on_boxes(tree: PyramidTree) {
    let layout = compute_layout(&tree, &LayoutConfig::default());

    assert_eq!(layout.connectors.len(), 6);
    for connector in &layout.connectors {
        let parent = layout.placement.find(&connector.parent_id).unwrap();
        let child = layout.placement.find(&connector.child_id).unwrap();
        assert_eq!(connector.curve.start, parent.bottom_center());
        assert_eq!(connector.curve.end, child.top_center());
        assert_eq!(connector.level, parent.level);
    }
}

#[rstest]
fn given_root_to_first_argument_when_layout_then_svg_path_matches(tree: PyramidTree) {
    let layout = compute_layout(&tree, &LayoutConfig::default());

    let connector = layout
        .connectors
        .iter()
        .find(|c| c.child_id == "arg-1")
        .unwrap();

    // dy = 80, offset = min(0.4 * 80, 40) = 32
    assert_eq!(
        connector.curve.to_svg_path(),
        "M 394 112 C 394 144, 150 160, 150 192"
    );
}

#[test]
fn given_lone_root_when_layout_then_single_box_and_no_connectors() {
    let tree =
        PyramidTree::from_node(&Node::new(ROOT_ID, Level::MainMessage, "Main Message", "m"))
            .unwrap();

    let layout = compute_layout(&tree, &LayoutConfig::default());

    assert_eq!(layout.placement.boxes.len(), 1);
    assert!(layout.connectors.is_empty());
    assert_eq!(layout.placement.height, 152.0);
}

#[rstest]
fn given_far_rows_when_layout_then_offset_capped(tree: PyramidTree) {
    let config = LayoutConfig {
        vertical_gap: 400.0,
        ..LayoutConfig::default()
    };
    let layout = compute_layout(&tree, &config);

    for connector in &layout.connectors {
        let curve = connector.curve;
        assert_eq!(curve.control1.y - curve.start.y, 40.0);
        assert_eq!(curve.end.y - curve.control2.y, 40.0);
    }
}

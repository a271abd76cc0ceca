//! Pyramid layout: rows, box placement and connector curves.
//!
//! Layout runs in two passes. [`place`] positions one box per node from the
//! tree shape alone; [`connect`] then derives connector curves from the
//! finished placement. [`compute_layout`] runs both and is cheap enough to
//! be called after every mutation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::{PyramidNode, PyramidTree};
use crate::domain::node::Level;

/// Box and spacing sizes, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    /// Space between boxes of the same row
    pub horizontal_gap: f32,
    /// Space between rows
    pub vertical_gap: f32,
    /// Margin around the whole diagram
    pub padding: f32,
    /// Upper bound of the vertical control-point offset of connectors
    pub connector_cap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 220.0,
            node_height: 72.0,
            horizontal_gap: 24.0,
            vertical_gap: 80.0,
            padding: 40.0,
            connector_cap: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rendered position of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub id: String,
    pub level: Level,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeBox {
    pub fn top_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y)
    }

    pub fn bottom_center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height)
    }
}

/// Cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicCurve {
    pub start: Point,
    pub control1: Point,
    pub control2: Point,
    pub end: Point,
}

impl CubicCurve {
    /// Evaluate the curve at parameter t in [0, 1].
    pub fn point_at(&self, t: f32) -> Point {
        let mt = 1.0 - t;
        let (a, b, c, d) = (mt * mt * mt, 3.0 * mt * mt * t, 3.0 * mt * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.control1.x + c * self.control2.x + d * self.end.x,
            a * self.start.y + b * self.control1.y + c * self.control2.y + d * self.end.y,
        )
    }

    /// SVG path data: `M x0 y0 C x1 y1, x2 y2, x3 y3`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            self.start.x,
            self.start.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.end.x,
            self.end.y
        )
    }
}

/// Curve from a parent's bottom-centre anchor to a child's top-centre anchor.
///
/// Both control points are offset vertically by `min(0.4 * |dy|, cap)`, the
/// first downwards from the parent and the second upwards from the child.
pub fn compute_connector(parent: Point, child: Point, cap: f32) -> CubicCurve {
    let offset = ((child.y - parent.y).abs() * 0.4).min(cap);
    CubicCurve {
        start: parent,
        control1: Point::new(parent.x, parent.y + offset),
        control2: Point::new(child.x, child.y - offset),
        end: child,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent_id: String,
    pub child_id: String,
    /// Level of the parent end (0 for root links, 1 for evidence links)
    pub level: Level,
    pub curve: CubicCurve,
}

/// Result of the first layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub width: f32,
    pub height: f32,
    pub boxes: Vec<NodeBox>,
}

impl Placement {
    pub fn find(&self, id: &str) -> Option<&NodeBox> {
        self.boxes.iter().find(|b| b.id == id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PyramidLayout {
    pub placement: Placement,
    pub connectors: Vec<Connector>,
}

/// The three pyramid rows: the root, its children, and all grandchildren
/// flattened in parent order then child order.
pub fn rows(tree: &PyramidTree) -> [Vec<&PyramidNode>; 3] {
    let root = tree.root();
    let arguments: Vec<_> = tree.children(root).collect();
    let evidence = arguments
        .iter()
        .flat_map(|&(idx, _)| tree.children(idx).map(|(_, node)| node))
        .collect();
    [
        vec![tree.root_node()],
        arguments.into_iter().map(|(_, node)| node).collect(),
        evidence,
    ]
}

/// First pass: centre each non-empty row in a canvas as wide as the widest
/// row and stack the rows from the top.
#[instrument(level = "debug", skip_all)]
pub fn place(tree: &PyramidTree, config: &LayoutConfig) -> Placement {
    let rows: Vec<_> = rows(tree).into_iter().filter(|r| !r.is_empty()).collect();
    let row_width = |count: usize| {
        count as f32 * config.node_width + count.saturating_sub(1) as f32 * config.horizontal_gap
    };
    let widest = rows.iter().map(|r| row_width(r.len())).fold(0.0, f32::max);

    let mut boxes = Vec::new();
    for (row_idx, row) in rows.iter().enumerate() {
        let y = config.padding + row_idx as f32 * (config.node_height + config.vertical_gap);
        let mut x = config.padding + (widest - row_width(row.len())) / 2.0;
        for node in row {
            boxes.push(NodeBox {
                id: node.id.clone(),
                level: node.level,
                x,
                y,
                width: config.node_width,
                height: config.node_height,
            });
            x += config.node_width + config.horizontal_gap;
        }
    }

    let row_count = rows.len() as f32;
    Placement {
        width: widest + 2.0 * config.padding,
        height: 2.0 * config.padding + row_count * config.node_height
            + (row_count - 1.0).max(0.0) * config.vertical_gap,
        boxes,
    }
}

/// Second pass: connect every root→argument and argument→evidence edge using
/// the boxes realised by [`place`].
#[instrument(level = "debug", skip_all)]
pub fn connect(tree: &PyramidTree, placement: &Placement, cap: f32) -> Vec<Connector> {
    let by_id: HashMap<&str, &NodeBox> =
        placement.boxes.iter().map(|b| (b.id.as_str(), b)).collect();
    let mut connectors = Vec::new();

    let root = tree.root_node();
    let Some(root_box) = by_id.get(root.id.as_str()) else {
        return connectors;
    };
    for (arg_idx, argument) in tree.children(tree.root()) {
        let Some(arg_box) = by_id.get(argument.id.as_str()) else {
            continue;
        };
        connectors.push(Connector {
            parent_id: root.id.clone(),
            child_id: argument.id.clone(),
            level: root.level,
            curve: compute_connector(root_box.bottom_center(), arg_box.top_center(), cap),
        });
        for (_, evidence) in tree.children(arg_idx) {
            if let Some(ev_box) = by_id.get(evidence.id.as_str()) {
                connectors.push(Connector {
                    parent_id: argument.id.clone(),
                    child_id: evidence.id.clone(),
                    level: argument.level,
                    curve: compute_connector(arg_box.bottom_center(), ev_box.top_center(), cap),
                });
            }
        }
    }
    connectors
}

pub fn compute_layout(tree: &PyramidTree, config: &LayoutConfig) -> PyramidLayout {
    let placement = place(tree, config);
    let connectors = connect(tree, &placement, config.connector_cap);
    PyramidLayout {
        placement,
        connectors,
    }
}

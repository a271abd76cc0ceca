//! SVG painter for a computed pyramid layout.

use std::fmt::Write as _;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::layout::{NodeBox, PyramidLayout};
use crate::domain::{Level, PyramidTree};

const STYLE: &str = r#"  <style>
    .node { stroke-width: 2; rx: 12; }
    .level-0 { fill: #4F46E5; stroke: #4338CA; }
    .level-1 { fill: #EEF2FF; stroke: #6366F1; }
    .level-2 { fill: #FFFFFF; stroke: #C7D2FE; }
    .node-text { font-family: Arial, sans-serif; font-size: 13px; }
    .level-0 + .node-text { fill: #FFFFFF; font-weight: bold; }
    .node-arrow { font-family: Arial, sans-serif; font-size: 14px; fill: #6366F1; }
    .dimmed { opacity: 0.3; }
    .connection-line { fill: none; stroke: #A5B4FC; stroke-width: 2; }
    .connection-level-1 { stroke-dasharray: 4 3; }
  </style>
"#;

/// Greedy word wrap by character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn paint_node(svg: &mut String, node_box: &NodeBox, content: &str, has_children: bool) {
    let level = node_box.level.depth();
    let _ = writeln!(
        svg,
        "  <g data-id=\"{}\">\n    <rect class=\"node level-{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" />",
        encode_double_quoted_attribute(&node_box.id),
        level,
        node_box.x,
        node_box.y,
        node_box.width,
        node_box.height
    );

    let chars_per_line = ((node_box.width - 32.0) / 7.0).max(8.0) as usize;
    let max_lines = ((node_box.height - 12.0) / 16.0).max(1.0) as usize;
    let mut lines = wrap(content, chars_per_line);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    let center_x = node_box.x + node_box.width / 2.0;
    let first_y =
        node_box.y + node_box.height / 2.0 - (lines.len() as f32 - 1.0) * 8.0 + 4.0;
    let _ = write!(
        svg,
        "    <text class=\"node-text\" text-anchor=\"middle\" x=\"{}\" y=\"{}\">",
        center_x, first_y
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            svg,
            "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
            center_x,
            if i == 0 { 0 } else { 16 },
            encode_text(line)
        );
    }
    svg.push_str("</text>\n");

    let arrow_y = node_box.y + node_box.height / 2.0 + 5.0;
    if node_box.level == Level::MainMessage && has_children {
        let _ = writeln!(
            svg,
            "    <text class=\"node-arrow\" x=\"{}\" y=\"{}\">&lt;</text>",
            node_box.x + 8.0,
            arrow_y
        );
    }
    let right_x = node_box.x + node_box.width - 16.0;
    if has_children && node_box.level != Level::MainMessage {
        let _ = writeln!(
            svg,
            "    <text class=\"node-arrow\" x=\"{}\" y=\"{}\">&gt;</text>",
            right_x, arrow_y
        );
    } else if node_box.level != Level::Evidence {
        let _ = writeln!(
            svg,
            "    <text class=\"node-arrow dimmed\" x=\"{}\" y=\"{}\">&gt;</text>",
            right_x, arrow_y
        );
    }
    svg.push_str("  </g>\n");
}

/// Paint connectors first so that node boxes are drawn on top of them.
pub fn render_svg(tree: &PyramidTree, layout: &PyramidLayout) -> String {
    let placement = &layout.placement;
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
        w = placement.width,
        h = placement.height
    );
    svg.push_str(STYLE);

    svg.push_str("  <g class=\"connections\">\n");
    for connector in &layout.connectors {
        let _ = writeln!(
            svg,
            "    <path class=\"connection-line connection-level-{}\" d=\"{}\" />",
            connector.level.depth(),
            connector.curve.to_svg_path()
        );
    }
    svg.push_str("  </g>\n");

    for node_box in &placement.boxes {
        if let Some(node) = tree.find_node(&node_box.id) {
            paint_node(&mut svg, node_box, &node.content, !node.children.is_empty());
        }
    }
    svg.push_str("</svg>\n");
    svg
}

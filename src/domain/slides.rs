//! Slide sequence derived from the pyramid.

use serde::Serialize;

use crate::domain::arena::PyramidTree;

pub const TITLE_SUBTITLE: &str = "Executive Summary";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Slide {
    Title { title: String, subtitle: String },
    Content { title: String, points: Vec<String> },
}

impl Slide {
    pub fn title(&self) -> &str {
        match self {
            Slide::Title { title, .. } | Slide::Content { title, .. } => title,
        }
    }

    /// Thumbnail text: the subtitle, or the first 50 characters of the first
    /// bullet, followed by an ellipsis.
    pub fn preview(&self) -> String {
        let text: String = match self {
            Slide::Title { subtitle, .. } => subtitle.clone(),
            Slide::Content { points, .. } => points
                .first()
                .map(|p| p.chars().take(50).collect())
                .unwrap_or_default(),
        };
        format!("{}...", text)
    }
}

/// Title slide, recommendation, one slide per key argument (its content
/// followed by its evidence) and a closing summary of all key arguments.
pub fn generate_slides(title: &str, tree: &PyramidTree) -> Vec<Slide> {
    let root = tree.root_node();
    let mut slides = vec![
        Slide::Title {
            title: title.to_string(),
            subtitle: TITLE_SUBTITLE.to_string(),
        },
        Slide::Content {
            title: "Recommendation".to_string(),
            points: vec![root.content.clone()],
        },
    ];

    let mut summary = Vec::new();
    for (position, (arg_idx, argument)) in tree.children(tree.root()).enumerate() {
        let mut points = vec![argument.content.clone()];
        points.extend(tree.children(arg_idx).map(|(_, ev)| ev.content.clone()));
        let slide_title = if argument.label.is_empty() {
            format!("Key Point {}", position + 1)
        } else {
            argument.label.clone()
        };
        slides.push(Slide::Content {
            title: slide_title,
            points,
        });
        summary.push(argument.content.clone());
    }

    slides.push(Slide::Content {
        title: "Summary".to_string(),
        points: summary,
    });
    slides
}

//! HTML slide deck export.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use html_escape::encode_text;
use regex::Regex;
use tracing::{info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{generate_slides, PyramidTree, Slide};
use crate::infrastructure::traits::FileSystem;

const DECK_STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 0; padding: 0; }
        .slide {
            width: 100vw;
            height: 100vh;
            display: flex;
            flex-direction: column;
            justify-content: center;
            padding: 60px;
            box-sizing: border-box;
            page-break-after: always;
        }
        .title-slide {
            background: linear-gradient(135deg, #4F46E5, #7C3AED);
            color: white;
            text-align: center;
            align-items: center;
        }
        .title-slide h1 { font-size: 48px; margin-bottom: 20px; }
        .title-slide p { font-size: 24px; opacity: 0.9; }
        .content-slide h2 { font-size: 36px; color: #4F46E5; margin-bottom: 40px; }
        .content-slide ul { list-style: none; padding: 0; }
        .content-slide li {
            font-size: 24px;
            margin-bottom: 20px;
            padding-left: 30px;
            position: relative;
        }
        .content-slide li::before {
            content: '';
            width: 12px;
            height: 12px;
            background: #4F46E5;
            border-radius: 50%;
            position: absolute;
            left: 0;
            top: 10px;
        }
"#;

/// `title` with every whitespace run replaced by `-`.
pub fn slug(title: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE
        .get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
        .replace_all(title, "-")
        .into_owned()
}

/// Download name of the exported deck.
pub fn export_file_name(title: &str) -> String {
    format!("{}-slides.html", slug(title))
}

/// Self-contained HTML document with one full-viewport section per slide.
pub fn render_html(title: &str, slides: &[Slide]) -> String {
    let mut html = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    <title>{} - Slides</title>\n    <style>\n{}    </style>\n</head>\n<body>\n",
        encode_text(title),
        DECK_STYLE
    );

    for slide in slides {
        match slide {
            Slide::Title { title, subtitle } => {
                let _ = write!(
                    html,
                    "    <div class=\"slide title-slide\">\n        <h1>{}</h1>\n        <p>{}</p>\n    </div>\n",
                    encode_text(title),
                    encode_text(subtitle)
                );
            }
            Slide::Content { title, points } => {
                let items: Vec<String> = points
                    .iter()
                    .map(|p| format!("<li>{}</li>", encode_text(p)))
                    .collect();
                let _ = write!(
                    html,
                    "    <div class=\"slide content-slide\">\n        <h2>{}</h2>\n        <ul>\n            {}\n        </ul>\n    </div>\n",
                    encode_text(title),
                    items.join("\n            ")
                );
            }
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Generate the slides of `tree` and write the deck into `dir`.
#[instrument(level = "debug", skip(fs, tree))]
pub fn export_deck(
    fs: &dyn FileSystem,
    dir: &Path,
    title: &str,
    tree: &PyramidTree,
) -> ApplicationResult<PathBuf> {
    let slides = generate_slides(title, tree);
    let path = dir.join(export_file_name(title));
    fs.create_dir_all(dir)
        .with_path_context("create export directory", dir)?;
    fs.write(&path, &render_html(title, &slides))
        .with_path_context("write slide deck", &path)?;
    info!("exported {} slides to {}", slides.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_title_with_spaces_when_naming_export_then_dashes() {
        assert_eq!(
            export_file_name("Q4  Product\tStrategy"),
            "Q4-Product-Strategy-slides.html"
        );
    }

    #[test]
    fn given_markup_in_content_when_rendering_then_escaped() {
        let slides = vec![Slide::Content {
            title: "Risks".into(),
            points: vec!["<script>alert(1)</script>".into()],
        }];
        let html = render_html("Deck", &slides);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}

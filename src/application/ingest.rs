//! Ingestion of the model's answer into a typed pyramid.
//!
//! The answer is untrusted: it may be wrapped in Markdown fences, carry
//! wrong level numbers, reuse identifiers or nest too deeply. Levels are
//! recomputed from depth, identifiers are made unique and anything below
//! level 2 is rejected.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{IdGenerator, Level, Node, PyramidDocument, ROOT_ID};

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    pyramid: Option<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    level: Option<Value>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    children: Option<Vec<RawNode>>,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?\n?").expect("valid fence regex"))
}

/// Remove Markdown code fences and surrounding whitespace.
pub fn clean_response(text: &str) -> String {
    fence_regex().replace_all(text, "").trim().to_string()
}

/// Parse the model's answer into a pyramid document.
///
/// `fallback_title` is used when the answer has no usable title. Any parse
/// or structure failure yields [`ApplicationError::MalformedResponse`]
/// carrying the cleaned answer for diagnosis.
#[instrument(level = "debug", skip(raw), fields(raw_len = raw.len()))]
pub fn parse_analysis(raw: &str, fallback_title: &str) -> ApplicationResult<PyramidDocument> {
    let cleaned = clean_response(raw);
    let malformed = |reason: String| ApplicationError::MalformedResponse {
        reason,
        raw: cleaned.clone(),
    };

    let analysis: RawAnalysis = serde_json::from_str(&cleaned).map_err(|e| {
        warn!("failed to parse model response: {}", e);
        malformed(e.to_string())
    })?;
    let pyramid = analysis
        .pyramid
        .ok_or_else(|| malformed("response has no 'pyramid' object".to_string()))?;

    let mut ids = IdGenerator::new();
    let mut seen = HashSet::new();
    let root = sanitize(pyramid, 0, &mut ids, &mut seen).map_err(malformed)?;

    let title = analysis
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());
    debug!("ingested pyramid '{}' with {} nodes", title, seen.len());

    Ok(PyramidDocument {
        title,
        pyramid: root,
    })
}

fn sanitize(
    raw: RawNode,
    depth: usize,
    ids: &mut IdGenerator,
    seen: &mut HashSet<String>,
) -> Result<Node, String> {
    let level = Level::from_depth(depth).ok_or_else(|| {
        format!(
            "node '{}' is nested deeper than supporting evidence",
            raw.id.as_deref().unwrap_or("?")
        )
    })?;
    if let Some(declared) = &raw.level {
        if declared.as_u64() != Some(depth as u64) {
            warn!(
                "node {:?} declares level {} but sits at depth {}; using {}",
                raw.id, declared, depth, depth
            );
        }
    }

    let id = match raw.id.map(|s| s.trim().to_string()) {
        _ if depth == 0 => ROOT_ID.to_string(),
        Some(id) if !id.is_empty() && !seen.contains(&id) => id,
        other => {
            let fresh = ids.next_id("node", |candidate| seen.contains(candidate));
            debug!("replacing node id {:?} with '{}'", other, fresh);
            fresh
        }
    };
    seen.insert(id.clone());

    let label = raw
        .label
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| level.default_label().to_string());

    let mut children = Vec::new();
    for child in raw.children.unwrap_or_default() {
        children.push(sanitize(child, depth + 1, ids, seen)?);
    }

    Ok(Node {
        id,
        level,
        label,
        content: raw.content.unwrap_or_default(),
        children,
    })
}

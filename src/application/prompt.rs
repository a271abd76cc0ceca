//! Minto pyramid extraction prompt.

/// Instructions sent ahead of the document text.
pub const MINTO_PYRAMID_PROMPT: &str = r#"You are an expert at the Minto Pyramid Principle, developed by Barbara Minto at McKinsey.

Analyze the following document and extract its content into a Minto Pyramid structure. The pyramid should follow the "answer first" approach:

1. **Main Message (Level 0)**: The single most important conclusion, recommendation, or "so what" of the document. This should be what an executive needs to know if they only read one sentence.

2. **Key Arguments (Level 1)**: 3-4 supporting arguments that directly support the main message. Each should be a distinct, mutually exclusive point that together comprehensively support the main message (MECE principle).

3. **Supporting Evidence (Level 2)**: For each key argument, provide 1-2 pieces of specific evidence, data points, or examples from the document.

IMPORTANT GUIDELINES:
- Extract ACTUAL content from the document - don't make things up
- The main message should be a recommendation or conclusion, not a topic description
- Key arguments should answer "why" or "how" the main message is true
- Evidence should be specific facts, numbers, or quotes from the document
- If the document doesn't have a clear recommendation, synthesize one from the content
- Keep each node concise (1-2 sentences max)

Respond with ONLY valid JSON in this exact format:
{
  "title": "Document title or topic",
  "pyramid": {
    "id": "root",
    "level": 0,
    "label": "Main Message",
    "content": "The main recommendation or conclusion",
    "children": [
      {
        "id": "arg-1",
        "level": 1,
        "label": "Key Argument 1",
        "content": "First supporting argument",
        "children": [
          {
            "id": "evidence-1-1",
            "level": 2,
            "label": "Evidence",
            "content": "Supporting data or fact",
            "children": []
          }
        ]
      },
      {
        "id": "arg-2",
        "level": 1,
        "label": "Key Argument 2",
        "content": "Second supporting argument",
        "children": []
      }
    ]
  }
}

DOCUMENT TO ANALYZE:
"#;

pub fn build_prompt(document: &str) -> String {
    let mut prompt = String::with_capacity(MINTO_PYRAMID_PROMPT.len() + document.len());
    prompt.push_str(MINTO_PYRAMID_PROMPT);
    prompt.push_str(document);
    prompt
}

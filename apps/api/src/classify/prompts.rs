// LLM prompt constants for the classification backend.

/// System prompt — enforces JSON-only output.
pub const CLASSIFY_SYSTEM: &str =
    "You are an expert in classifying professional job descriptions and \
    candidate profiles into industry categories. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Classification prompt template.
/// Replace `{categories}` with the numbered category list and `{text}` with
/// the JD or profile text before sending.
pub const CLASSIFY_PROMPT_TEMPLATE: &str = r#"Classify the following text into the SINGLE BEST category from this fixed list:

{categories}

You MUST choose one of the listed categories. Do NOT invent a category and do NOT return "Unclassified".

Return a JSON object with this EXACT schema (no extra fields):
{
  "category": "the exact category name from the list",
  "confidence": 0.95,
  "rationale": "one short sentence naming the deciding signals"
}

"confidence" is your certainty in [0, 1]. If the text fits no listed category, use the closest one with a low confidence rather than inventing a name.

TEXT:
---
{text}
---"#;

// LLM prompt constants for the ranking backend.

/// System prompt — enforces JSON-only output.
pub const RANK_SYSTEM: &str =
    "You are an expert recruiter ranking candidate profiles against a job \
    description's requirements. \
    You MUST respond with valid JSON only — a JSON array of score objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Ranking prompt template.
/// Replace `{requirements}` with the requirement digest and `{candidates}`
/// with the candidate digests before sending.
pub const RANK_PROMPT_TEMPLATE: &str = r#"Score every candidate below against the job requirements.

JOB REQUIREMENTS (keyword, weight):
{requirements}

CANDIDATES:
{candidates}

Return a JSON ARRAY with one object per candidate:
[
  {
    "id": "the-exact-candidate-uuid",
    "score": 87.5,
    "rationale": "one short sentence naming the deciding overlaps or gaps"
  }
]

HARD RULES:
1. Include EVERY candidate exactly once, using the exact id shown above
2. "score" is a number in [0, 100]; more matching, relevant signals means a higher score
3. Identical profiles must receive identical scores
4. Do NOT invent candidates or omit any"#;

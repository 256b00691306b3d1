//! Prompts and the declared output schema for resume analysis.
//!
//! Every piece of text sent to the model lives here so prompt changes never
//! touch transport or decoding code, and tests can inspect the exact
//! instruction without a live model.

use crate::model::{DocumentKind, Impact, JobDetails};
use serde_json::{json, Value};

/// Used in the instruction when the company field is left empty.
pub const COMPANY_FALLBACK: &str = "the target company";

/// System prompt for providers that support a separate system turn.
pub const SYSTEM_PROMPT: &str = "You are an expert ATS auditor and career coach. \
You read resumes exactly as they are attached and answer with a single JSON object, \
with no commentary and no markdown fences.";

/// Build the instruction text for one analysis request.
///
/// The JSON shape is spelled out inline as well as declared through
/// [`response_schema`]; providers without native schema support rely on
/// the inline copy.
pub fn build_instruction(kind: DocumentKind, job: &JobDetails) -> String {
    let company = if job.company.trim().is_empty() {
        COMPANY_FALLBACK
    } else {
        job.company.as_str()
    };

    format!(
        r#"Analyze the attached resume ({label}) specifically for the "{title}" role at "{company}".

Context Job Description:
{description}

Required Output JSON format:
{{
  "overallScore": number (0-100),
  "summary": string,
  "strengths": string[],
  "weaknesses": string[],
  "improvements": [{{"category": string, "description": string, "impact": "High" | "Medium" | "Low"}}],
  "spellingErrors": [{{"original": string, "suggestion": string, "context": string}}],
  "jobAlignment": {{
    "matchPercentage": number (0-100),
    "missingKeywords": string[],
    "suggestedKeywords": string[],
    "roleFitSummary": string
  }}
}}"#,
        label = kind.label(),
        title = job.title,
        company = company,
        description = job.description,
    )
}

/// Top-level keys every response must carry.
pub const REQUIRED_KEYS: [&str; 7] = [
    "overallScore",
    "summary",
    "strengths",
    "weaknesses",
    "improvements",
    "spellingErrors",
    "jobAlignment",
];

/// Output schema in the OpenAPI subset accepted by Gemini's `responseSchema`.
pub fn response_schema() -> Value {
    let string_array = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    let impacts: Vec<&str> = Impact::ALL.iter().map(|i| i.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "overallScore": { "type": "NUMBER" },
            "summary": { "type": "STRING" },
            "strengths": string_array,
            "weaknesses": string_array,
            "improvements": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "description": { "type": "STRING" },
                        "impact": { "type": "STRING", "enum": impacts },
                    },
                    "required": ["category", "description", "impact"],
                },
            },
            "spellingErrors": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "original": { "type": "STRING" },
                        "suggestion": { "type": "STRING" },
                        "context": { "type": "STRING" },
                    },
                    "required": ["original", "suggestion", "context"],
                },
            },
            "jobAlignment": {
                "type": "OBJECT",
                "properties": {
                    "matchPercentage": { "type": "NUMBER" },
                    "missingKeywords": string_array,
                    "suggestedKeywords": string_array,
                    "roleFitSummary": { "type": "STRING" },
                },
                "required": ["matchPercentage", "missingKeywords", "suggestedKeywords", "roleFitSummary"],
            },
        },
        "required": REQUIRED_KEYS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(company: &str) -> JobDetails {
        JobDetails::new(
            "Backend Engineer",
            company,
            "Go and distributed systems experience required",
        )
    }

    #[test]
    fn instruction_embeds_job_details() {
        let text = build_instruction(DocumentKind::Pdf, &job("Acme"));
        assert!(text.contains("(PDF)"));
        assert!(text.contains(r#""Backend Engineer" role at "Acme""#));
        assert!(text.contains("Go and distributed systems experience required"));
    }

    #[test]
    fn empty_company_uses_fallback() {
        let text = build_instruction(DocumentKind::Png, &job("  "));
        assert!(text.contains(r#"at "the target company""#));
        assert!(text.contains("(Image)"));
    }

    #[test]
    fn schema_requires_all_top_level_keys() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_KEYS);
        for key in REQUIRED_KEYS {
            assert!(schema["properties"].get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn schema_constrains_impact_enum() {
        let schema = response_schema();
        let impact = &schema["properties"]["improvements"]["items"]["properties"]["impact"];
        assert_eq!(impact["enum"], json!(["High", "Medium", "Low"]));
        assert_eq!(
            schema["properties"]["jobAlignment"]["required"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }
}

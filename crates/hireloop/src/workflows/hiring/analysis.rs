//! Transcript analysis seam and the hosted generative-model adapter.
//!
//! The workflow only depends on [`TranscriptAnalyzer`]; the concrete
//! [`GeminiAnalyzer`] wraps the Generative Language `generateContent`
//! endpoint and parses its JSON evaluation reply. No retries, no
//! cancellation: a failed call is reported and the interview keeps its
//! transcript with the analysis marked unavailable.

use std::future::Future;

use serde::Deserialize;

use super::domain::{AiDecision, InterviewAnalysis};

/// Inputs for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub transcript: String,
    pub job_description: String,
    pub required_skills: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("analysis transport failed: {0}")]
    Transport(String),
    #[error("model reply was not a valid evaluation: {0}")]
    Malformed(String),
}

/// Injected analyzer adapter. Implementations must produce `Send` futures so
/// the HTTP handlers awaiting them stay spawnable.
pub trait TranscriptAnalyzer: Send + Sync {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send;
}

/// Adapter for the hosted Gemini `generateContent` API.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiAnalyzer {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint.trim_end_matches('/'),
            self.model,
            self.api_key
        )
    }
}

impl TranscriptAnalyzer for GeminiAnalyzer {
    fn analyze(
        &self,
        request: AnalysisRequest,
    ) -> impl Future<Output = Result<InterviewAnalysis, AnalysisError>> + Send {
        async move {
            let prompt = build_prompt(&request);
            let body = serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            });

            let response = self
                .client
                .post(self.request_url())
                .json(&body)
                .send()
                .await
                .map_err(|err| AnalysisError::Transport(err.to_string()))?
                .error_for_status()
                .map_err(|err| AnalysisError::Transport(err.to_string()))?;

            let reply: GenerateContentReply = response
                .json()
                .await
                .map_err(|err| AnalysisError::Transport(err.to_string()))?;

            let text = reply
                .first_text()
                .ok_or_else(|| AnalysisError::Malformed("reply carried no candidate text".to_string()))?;

            parse_model_reply(&text)
        }
    }
}

pub(crate) fn build_prompt(request: &AnalysisRequest) -> String {
    format!(
        "Analyze the following job interview transcript and provide a detailed evaluation:\n\
         \n\
         JOB DESCRIPTION:\n{}\n\
         \n\
         REQUIRED SKILLS:\n{}\n\
         \n\
         INTERVIEW TRANSCRIPT:\n{}\n\
         \n\
         Please analyze this interview and return your evaluation in the following JSON format:\n\
         {{\n\
         \x20 \"decision\": \"Yes\" or \"No\" or \"Maybe\",\n\
         \x20 \"score\": 0-100,\n\
         \x20 \"strengths\": [\"strength 1\", \"strength 2\", \"strength 3\"],\n\
         \x20 \"weaknesses\": [\"weakness 1\", \"weakness 2\"],\n\
         \x20 \"recommendation\": \"Brief final recommendation in 2-3 sentences\"\n\
         }}\n\
         \n\
         Evaluate based on:\n\
         1. Relevance of candidate's answers to job requirements\n\
         2. Communication skills and clarity\n\
         3. Technical knowledge and experience\n\
         4. Problem-solving abilities\n\
         5. Cultural fit and motivation\n\
         \n\
         Return ONLY valid JSON, no additional text.\n",
        request.job_description,
        request.required_skills.join(", "),
        request.transcript
    )
}

/// Reply shape of the `generateContent` endpoint, reduced to the fields the
/// adapter consumes.
#[derive(Debug, Default, Deserialize)]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<ReplyCandidate>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyCandidate {
    #[serde(default)]
    content: ReplyContent,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentReply {
    fn first_text(&self) -> Option<String> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|part| part.text.clone())
    }
}

/// Raw evaluation as emitted by the model; every field optional so partial
/// replies still produce a usable analysis via the fallbacks below.
#[derive(Debug, Deserialize)]
struct RawEvaluation {
    decision: Option<String>,
    score: Option<f64>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    recommendation: Option<String>,
}

/// Parse the model's reply text into an [`InterviewAnalysis`].
///
/// Models habitually wrap the JSON in Markdown code fences; those are
/// stripped first. Missing fields fall back to Maybe / 50 / empty lists /
/// a generic recommendation, matching the hosted flow's defaults.
pub(crate) fn parse_model_reply(text: &str) -> Result<InterviewAnalysis, AnalysisError> {
    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let raw: RawEvaluation = serde_json::from_str(cleaned)
        .map_err(|err| AnalysisError::Malformed(err.to_string()))?;

    let decision = match raw.decision.as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("yes") => AiDecision::Yes,
        Some(value) if value.eq_ignore_ascii_case("no") => AiDecision::No,
        _ => AiDecision::Maybe,
    };

    let score = raw
        .score
        .map(|value| value.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(50);

    Ok(InterviewAnalysis {
        decision,
        score,
        strengths: raw.strengths.unwrap_or_default(),
        weaknesses: raw.weaknesses.unwrap_or_default(),
        recommendation: raw
            .recommendation
            .unwrap_or_else(|| "Further evaluation needed".to_string()),
    })
}

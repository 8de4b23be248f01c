//! Gemini integration boundary.
//!
//! The provider is an opaque collaborator: prompts go out, free text comes
//! back. Only the narrow shapes below ever cross into the domain, and every
//! failure mode (missing key, timeout, rate limit, malformed JSON) degrades
//! to a static fallback instead of surfacing as a 5xx.

use std::env;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::EmotionKind;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MODEL: &str = "gemini-1.5-pro";

/// Result of a provider call: either JSON we managed to parse, or the
/// static fallback. Callers can tell the two apart but both carry a usable
/// payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase", tag = "source", content = "result")]
pub enum AnalysisOutcome<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> AnalysisOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            AnalysisOutcome::Parsed(v) | AnalysisOutcome::Fallback(v) => v,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub primary_emotion: EmotionKind,
    pub confidence: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

impl EmotionAnalysis {
    pub fn fallback() -> Self {
        Self {
            primary_emotion: EmotionKind::Neutral,
            confidence: 0.0,
            summary: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationReport {
    #[serde(default)]
    pub correlations: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
}

impl CorrelationReport {
    pub fn fallback() -> Self {
        Self {
            correlations: vec![],
            insights: vec![
                "Not enough data yet to spot patterns. Keep logging moods and transactions."
                    .to_string(),
            ],
        }
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Builds the client from `GEMINI_API_KEY` / `GEMINI_MODEL`. A missing
    /// key is not an error: every call then short-circuits to its fallback,
    /// which keeps the rest of the API usable without a provider account.
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, analysis endpoints will serve fallbacks");
        }
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            model,
        }
    }

    /// Client with no provider key; every call serves its fallback.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub async fn analyze_text(&self, text: &str) -> AnalysisOutcome<EmotionAnalysis> {
        let prompt = format!(
            "Classify the dominant emotion in this journal entry. \
             Respond with a JSON object only, no markdown: \
             {{\"primaryEmotion\": one of stressed|worried|neutral|content|happy, \
             \"confidence\": 0.0-1.0, \"summary\": short string}}.\n\nEntry: {text}"
        );
        let parts = json!([{ "text": prompt }]);
        self.request_parsed(parts, EmotionAnalysis::fallback).await
    }

    pub async fn analyze_face(&self, image_base64: &str) -> AnalysisOutcome<EmotionAnalysis> {
        let prompt = "Classify the facial expression in this photo. \
             Respond with a JSON object only, no markdown: \
             {\"primaryEmotion\": one of stressed|worried|neutral|content|happy, \
             \"confidence\": 0.0-1.0, \"summary\": short string}.";
        let parts = json!([
            { "text": prompt },
            { "inline_data": { "mime_type": "image/jpeg", "data": image_base64 } }
        ]);
        self.request_parsed(parts, EmotionAnalysis::fallback).await
    }

    pub async fn correlate(
        &self,
        emotions: &Value,
        transactions: &Value,
        health_samples: &Value,
    ) -> AnalysisOutcome<CorrelationReport> {
        let prompt = format!(
            "Given this user's recent mood entries, transactions and health \
             samples, describe any correlations between mood, spending and \
             health. Respond with a JSON object only, no markdown: \
             {{\"correlations\": [string], \"insights\": [string]}}.\n\n\
             Emotions: {emotions}\nTransactions: {transactions}\nHealth: {health_samples}"
        );
        let parts = json!([{ "text": prompt }]);
        self.request_parsed(parts, CorrelationReport::fallback)
            .await
    }

    async fn request_parsed<T, F>(&self, parts: Value, fallback: F) -> AnalysisOutcome<T>
    where
        T: for<'de> Deserialize<'de>,
        F: FnOnce() -> T,
    {
        match self.generate_content(parts).await {
            Ok(text) => match parse_json_payload::<T>(&text) {
                Some(parsed) => AnalysisOutcome::Parsed(parsed),
                None => {
                    tracing::warn!("provider returned unparseable payload, using fallback");
                    AnalysisOutcome::Fallback(fallback())
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "provider call failed, using fallback");
                AnalysisOutcome::Fallback(fallback())
            }
        }
    }

    async fn generate_content(&self, parts: Value) -> Result<String, String> {
        let api_key = self.api_key.as_deref().ok_or("no API key configured")?;
        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, api_key
        );

        let body = json!({ "contents": [{ "parts": parts }] });
        let res = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(format!("provider returned {status}: {text}"));
        }

        let json: Value = res.json().await.map_err(|e| e.to_string())?;
        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| "no text in provider response".to_string())
    }
}

/// Extracts and deserializes the first balanced `{...}` block in the text.
///
/// Providers wrap JSON in markdown fences or chat preamble often enough that
/// parsing the raw body directly is hopeless; scanning for a balanced object
/// (string- and escape-aware) salvages the usual cases.
fn parse_json_payload<T: for<'de> Deserialize<'de>>(text: &str) -> Option<T> {
    let block = extract_json_block(text)?;
    serde_json::from_str(block).ok()
}

fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_block_from_markdown_fence() {
        let text = "```json\n{\"primaryEmotion\": \"happy\", \"confidence\": 0.9}\n```";
        let parsed: EmotionAnalysis = parse_json_payload(text).unwrap();
        assert_eq!(parsed.primary_emotion, EmotionKind::Happy);
        assert!((parsed.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn extracts_block_despite_chat_preamble() {
        let text = "Sure! Here is the analysis you asked for:\n\
                    {\"correlations\": [\"spending rises when stressed\"], \"insights\": []} hope that helps";
        let parsed: CorrelationReport = parse_json_payload(text).unwrap();
        assert_eq!(parsed.correlations.len(), 1);
    }

    #[test]
    fn braces_inside_strings_do_not_unbalance_the_scan() {
        let text = r#"{"insights": ["a } b { c"], "correlations": []}"#;
        let parsed: CorrelationReport = parse_json_payload(text).unwrap();
        assert_eq!(parsed.insights, vec!["a } b { c".to_string()]);
    }

    #[test]
    fn garbage_yields_none_not_panic() {
        assert!(parse_json_payload::<CorrelationReport>("no json here").is_none());
        assert!(parse_json_payload::<CorrelationReport>("{\"unterminated\": ").is_none());
        // an unknown emotion label fails the closed enum and falls through
        assert!(parse_json_payload::<EmotionAnalysis>(
            "{\"primaryEmotion\": \"euphoric\", \"confidence\": 1.0}"
        )
        .is_none());
    }
}

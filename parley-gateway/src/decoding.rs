//! Typed decoding of provider payloads.
//!
//! Wire format:
//!
//! ```json
//! {"suggestions": [{"text": "...", "confidence": 0.9,
//!                   "reasoning": "...", "context_relevance": 0.4,
//!                   "alternatives": ["..."], "source": "neural"}]}
//! ```
//!
//! `text` and `confidence` are required; everything else is optional.
//! Values outside `[0, 1]` are rejected rather than clamped.

use parley_core::errors::ParseError;
use parley_core::models::{Suggestion, SuggestionSource};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Envelope {
    suggestions: Vec<RawSuggestion>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    text: String,
    confidence: f64,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    context_relevance: Option<f64>,
    #[serde(default)]
    alternatives: Vec<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Decode `raw` into suggestions. `default_source` applies to items that do
/// not carry their own `source` tag. An empty list is a valid response.
pub fn decode_suggestions(
    raw: &str,
    default_source: SuggestionSource,
) -> Result<Vec<Suggestion>, ParseError> {
    let envelope: Envelope = serde_json::from_str(raw).map_err(classify)?;

    envelope
        .suggestions
        .into_iter()
        .enumerate()
        .map(|(index, item)| validate(index, item, default_source))
        .collect()
}

fn validate(
    index: usize,
    item: RawSuggestion,
    default_source: SuggestionSource,
) -> Result<Suggestion, ParseError> {
    if item.text.trim().is_empty() {
        return Err(ParseError::EmptyText { index });
    }
    if !(0.0..=1.0).contains(&item.confidence) {
        return Err(ParseError::ConfidenceOutOfRange {
            index,
            value: item.confidence,
        });
    }
    let relevance = item.context_relevance.unwrap_or(0.0);
    if !(0.0..=1.0).contains(&relevance) {
        return Err(ParseError::RelevanceOutOfRange {
            index,
            value: relevance,
        });
    }
    let source = match item.source {
        Some(tag) => tag.parse::<SuggestionSource>()?,
        None => default_source,
    };

    Ok(Suggestion::new(item.text.trim(), item.confidence, source)
        .with_reasoning(item.reasoning.unwrap_or_default())
        .with_relevance(relevance)
        .with_alternatives(item.alternatives))
}

/// serde_json reports absent keys as "missing field `name` at line ..".
fn classify(err: serde_json::Error) -> ParseError {
    let message = err.to_string();
    if let Some(rest) = message.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return ParseError::MissingField {
                field: field.to_string(),
            };
        }
    }
    ParseError::InvalidJson { reason: message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_and_minimal_items() {
        let raw = r#"{"suggestions":[
            {"text":"¡Hola! ¿Cómo estás?","confidence":0.9,"reasoning":"greeting",
             "context_relevance":0.8,"alternatives":["Hola"],"source":"pattern"},
            {"text":"Buenos días","confidence":0.6}
        ]}"#;
        let out = decode_suggestions(raw, SuggestionSource::Neural).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source, SuggestionSource::Pattern);
        assert_eq!(out[0].alternatives, vec!["Hola".to_string()]);
        assert_eq!(out[1].source, SuggestionSource::Neural);
        assert_eq!(out[1].context_relevance, 0.0);
    }

    #[test]
    fn empty_list_is_ok() {
        let out = decode_suggestions(r#"{"suggestions":[]}"#, SuggestionSource::Neural).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn missing_fields_are_named() {
        let err = decode_suggestions(r#"{"suggestions":[{"text":"hi"}]}"#, SuggestionSource::Neural)
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "confidence".into()
            }
        );
        let err = decode_suggestions("{}", SuggestionSource::Neural).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: "suggestions".into()
            }
        );
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            (r#"{"suggestions":[{"text":"  ","confidence":0.5}]}"#, "empty"),
            (r#"{"suggestions":[{"text":"a","confidence":1.5}]}"#, "confidence"),
            (
                r#"{"suggestions":[{"text":"a","confidence":0.5,"context_relevance":-0.1}]}"#,
                "relevance",
            ),
            (
                r#"{"suggestions":[{"text":"a","confidence":0.5,"source":"oracle"}]}"#,
                "source",
            ),
            ("not json", "json"),
        ];
        for (raw, label) in cases {
            let err = decode_suggestions(raw, SuggestionSource::Neural).unwrap_err();
            let ok = match label {
                "empty" => matches!(err, ParseError::EmptyText { index: 0 }),
                "confidence" => matches!(err, ParseError::ConfidenceOutOfRange { index: 0, .. }),
                "relevance" => matches!(err, ParseError::RelevanceOutOfRange { index: 0, .. }),
                "source" => matches!(err, ParseError::UnknownSource { .. }),
                _ => matches!(err, ParseError::InvalidJson { .. }),
            };
            assert!(ok, "{label}: unexpected {err:?}");
        }
    }
}

//! Stage 2: deduplicate by normalized text.
//!
//! When several distinct providers produce the same text, the merged entry
//! keeps the highest weighted confidence plus `boost` per additional
//! provider (capped at 1.0), the longest reasoning, and the union of
//! alternatives.

use std::collections::HashMap;

use parley_core::models::{normalize_text, Confidence};

use super::weighting::WeightedSuggestion;
use super::RankedSuggestion;

pub fn merge(weighted: Vec<WeightedSuggestion>, boost: f64) -> Vec<RankedSuggestion> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<WeightedSuggestion>> = HashMap::new();
    for item in weighted {
        let key = normalize_text(&item.suggestion.text);
        if key.is_empty() {
            continue;
        }
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(item);
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(|group| merge_group(group, boost))
        .collect()
}

fn merge_group(mut group: Vec<WeightedSuggestion>, boost: f64) -> RankedSuggestion {
    // Highest confidence first; priority breaks ties.
    group.sort_by(|a, b| {
        b.suggestion
            .confidence
            .value()
            .total_cmp(&a.suggestion.confidence.value())
            .then_with(|| a.rank.cmp(&b.rank))
    });

    let mut providers: Vec<(usize, String)> = Vec::new();
    for item in &group {
        if !providers.iter().any(|(_, id)| *id == item.provider_id) {
            providers.push((item.rank, item.provider_id.clone()));
        }
    }
    providers.sort();
    let rank = providers.first().map_or(usize::MAX, |(r, _)| *r);

    let reasoning = group
        .iter()
        .map(|i| i.suggestion.reasoning.as_str())
        .max_by_key(|r| r.len())
        .unwrap_or_default()
        .to_string();
    let relevance = group
        .iter()
        .map(|i| i.suggestion.context_relevance)
        .fold(0.0, f64::max);

    let mut alternatives: Vec<String> = Vec::new();
    for item in &group {
        for alt in &item.suggestion.alternatives {
            if !alternatives.iter().any(|a| normalize_text(a) == normalize_text(alt)) {
                alternatives.push(alt.clone());
            }
        }
    }

    let mut best = group.swap_remove(0).suggestion;
    let own = normalize_text(&best.text);
    alternatives.retain(|a| normalize_text(a) != own);

    let extra = providers.len().saturating_sub(1) as f64;
    best.confidence = Confidence::new(best.confidence.value() + boost * extra);
    best.reasoning = reasoning;
    best.context_relevance = relevance;
    best.alternatives = alternatives;

    RankedSuggestion {
        suggestion: best,
        score: 0.0,
        providers: providers.into_iter().map(|(_, id)| id).collect(),
        rank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::models::{Suggestion, SuggestionSource};

    fn w(provider: &str, rank: usize, text: &str, conf: f64) -> WeightedSuggestion {
        WeightedSuggestion {
            suggestion: Suggestion::new(text, conf, SuggestionSource::Neural),
            provider_id: provider.into(),
            rank,
        }
    }

    #[test]
    fn two_providers_get_one_boost() {
        let merged = merge(
            vec![
                w("neural", 0, "Hola, ¿cómo estás?", 0.8),
                w("pattern", 1, "hola,  ¿CÓMO estás?", 0.7),
            ],
            0.1,
        );
        assert_eq!(merged.len(), 1);
        assert!((merged[0].suggestion.confidence.value() - 0.9).abs() < 1e-12);
        assert_eq!(merged[0].providers, vec!["neural", "pattern"]);
        assert_eq!(merged[0].suggestion.text, "Hola, ¿cómo estás?");
    }

    #[test]
    fn same_provider_duplicates_are_not_boosted() {
        let merged = merge(vec![w("neural", 0, "Hi", 0.5), w("neural", 0, "hi", 0.4)], 0.1);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].suggestion.confidence.value(), 0.5);
    }

    #[test]
    fn boost_is_capped() {
        let merged = merge(
            vec![w("a", 0, "x", 0.95), w("b", 1, "x", 0.9), w("c", 2, "x", 0.9)],
            0.1,
        );
        assert_eq!(merged[0].suggestion.confidence.value(), 1.0);
    }

    #[test]
    fn richer_reasoning_and_alternatives_survive() {
        let mut a = w("neural", 0, "Hi", 0.9);
        a.suggestion.reasoning = "short".into();
        a.suggestion.alternatives = vec!["Hello".into()];
        let mut b = w("pattern", 1, "hi", 0.5);
        b.suggestion.reasoning = "matched greeting phrase pattern".into();
        b.suggestion.alternatives = vec!["hello".into(), "Hey".into(), "HI".into()];
        let merged = merge(vec![a, b], 0.1);
        assert_eq!(merged[0].suggestion.reasoning, "matched greeting phrase pattern");
        assert_eq!(merged[0].suggestion.alternatives, vec!["Hello", "Hey"]);
    }
}

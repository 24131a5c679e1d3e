//! Stage 3: blended score.
//!
//! `score = confidence + α·relevance + personality_boost`, where the
//! personality boost applies only to personality-sourced suggestions when
//! the alignment score exceeds the configured threshold. A provider that
//! reports no relevance gets lexical overlap with the conversation instead.

use parley_context::analysis::lexical_overlap;
use parley_core::config::RankingConfig;
use parley_core::models::{AlignmentScore, ContextSnapshot, SuggestionSource};

use super::RankedSuggestion;

pub fn score(
    mut merged: Vec<RankedSuggestion>,
    context: &ContextSnapshot,
    alignment: &AlignmentScore,
    config: &RankingConfig,
) -> Vec<RankedSuggestion> {
    let reference = reference_text(context);
    let boost_personality = alignment.score > config.alignment_threshold;

    for candidate in &mut merged {
        let s = &mut candidate.suggestion;
        if s.context_relevance <= 0.0 {
            s.context_relevance = lexical_overlap(&s.text, &reference);
        }
        let mut blended = s.confidence.value() + config.relevance_weight * s.context_relevance;
        if boost_personality && s.source == SuggestionSource::Personality {
            blended += config.personality_boost;
        }
        candidate.score = blended;
    }
    merged
}

/// Recent messages plus the topic name.
fn reference_text(context: &ContextSnapshot) -> String {
    let mut text = context.transcript();
    text.push(' ');
    text.push_str(context.topic.as_str());
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::models::{Message, Suggestion};

    fn candidate(text: &str, conf: f64, source: SuggestionSource) -> RankedSuggestion {
        RankedSuggestion {
            suggestion: Suggestion::new(text, conf, source),
            score: 0.0,
            providers: vec!["p".into()],
            rank: 0,
        }
    }

    #[test]
    fn personality_boost_requires_alignment() {
        let config = RankingConfig::default();
        let ctx = ContextSnapshot::empty("c");
        let mut high = AlignmentScore::neutral();
        high.score = 0.9;
        let low = AlignmentScore::neutral();

        let boosted = score(
            vec![candidate("x", 0.5, SuggestionSource::Personality)],
            &ctx,
            &high,
            &config,
        );
        let plain = score(
            vec![candidate("x", 0.5, SuggestionSource::Personality)],
            &ctx,
            &low,
            &config,
        );
        assert!((boosted[0].score - plain[0].score - config.personality_boost).abs() < 1e-12);

        let other = score(
            vec![candidate("x", 0.5, SuggestionSource::Neural)],
            &ctx,
            &high,
            &config,
        );
        assert_eq!(other[0].score, plain[0].score);
    }

    #[test]
    fn lexical_relevance_fills_in_missing_scores() {
        let config = RankingConfig::default();
        let mut ctx = ContextSnapshot::empty("c");
        ctx.recent_messages.push(Message::partner("are you coming to dinner"));
        let scored = score(
            vec![
                candidate("yes I am coming to dinner", 0.5, SuggestionSource::Neural),
                candidate("unrelated words here", 0.5, SuggestionSource::Neural),
            ],
            &ctx,
            &AlignmentScore::neutral(),
            &config,
        );
        assert!(scored[0].suggestion.context_relevance > 0.0);
        assert_eq!(scored[1].suggestion.context_relevance, 0.0);
        assert!(scored[0].score > scored[1].score);
    }

    #[test]
    fn provider_relevance_is_kept() {
        let config = RankingConfig::default();
        let mut c = candidate("x", 0.5, SuggestionSource::Neural);
        c.suggestion.context_relevance = 0.5;
        let scored = score(
            vec![c],
            &ContextSnapshot::empty("c"),
            &AlignmentScore::neutral(),
            &config,
        );
        assert!((scored[0].score - (0.5 + config.relevance_weight * 0.5)).abs() < 1e-12);
    }
}

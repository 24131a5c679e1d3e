use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parley_core::config::RankingConfig;
use parley_core::models::{
    AlignmentScore, ContextSnapshot, Message, Suggestion, SuggestionSource, UserProfile,
};
use parley_ranking::{Aggregator, ProviderContribution, RankingInput};

fn contributions(providers: usize, per_provider: usize) -> Vec<ProviderContribution> {
    (0..providers)
        .map(|p| {
            ProviderContribution::new(
                format!("provider-{p}"),
                p,
                (0..per_provider)
                    .map(|i| {
                        // Every third text is shared across providers.
                        let text = if i % 3 == 0 {
                            format!("shared reply {i}")
                        } else {
                            format!("reply {p}-{i}")
                        };
                        Suggestion::new(text, 0.3 + (i % 7) as f64 * 0.1, SuggestionSource::Neural)
                    })
                    .collect(),
            )
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut context = ContextSnapshot::empty("bench");
    for i in 0..10 {
        context
            .recent_messages
            .push(Message::partner(format!("message {i} about the shared reply")));
    }
    let profile = UserProfile::new("bench");
    let alignment = AlignmentScore::neutral();
    let aggregator = Aggregator::new(&RankingConfig::default(), 5);

    for (providers, per) in [(3, 5), (5, 20)] {
        let contribs = contributions(providers, per);
        c.bench_function(&format!("aggregate_{providers}x{per}"), |b| {
            b.iter(|| {
                let input = RankingInput {
                    contributions: &contribs,
                    context: &context,
                    profile: &profile,
                    alignment: &alignment,
                    input: "hello there",
                    target_language: "en",
                    providers_failed: 0,
                    providers_skipped: 0,
                };
                black_box(aggregator.aggregate(&input, "bench", Duration::from_secs(60)))
            })
        });
    }
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);

use std::sync::Arc;

use parley_context::{cleanup_idle, ContextWindowManager, GenerationTracker};
use parley_core::config::ContextConfig;
use parley_core::models::{Message, Tone, Topic};
use proptest::prelude::*;

fn manager() -> ContextWindowManager {
    ContextWindowManager::new(&ContextConfig::default())
}

// ── Window bound ──────────────────────────────────────────────────────────

#[test]
fn window_never_exceeds_ten_messages() {
    let m = manager();
    for i in 0..25 {
        let snap = m.append("c1", Message::user(format!("line {i}")));
        assert!(snap.recent_messages.len() <= 10);
    }
    let snap = m.snapshot("c1").unwrap();
    assert_eq!(snap.recent_messages.len(), 10);
    assert_eq!(snap.recent_messages[0].text, "line 15");
    assert_eq!(snap.recent_messages[9].text, "line 24");
}

// ── Snapshot content ──────────────────────────────────────────────────────

#[test]
fn snapshot_reflects_tone_topic_and_languages() {
    let m = manager();
    m.append("c1", Message::partner("Hola, ¿cómo estás?"));
    let snap = m.append("c1", Message::user("Hello, how are you").with_language("en"));
    assert!(snap.languages_used.contains("en"));
    assert!(snap.languages_used.contains("es"));
    assert_eq!(snap.topic, Topic::Greeting);
    assert_eq!(snap.tone, Tone::Friendly);
}

#[test]
fn read_after_write_within_conversation() {
    let m = manager();
    let written = m.append("c1", Message::user("Is the flight on time?"));
    let read = m.snapshot("c1").unwrap();
    assert_eq!(written.recent_messages, read.recent_messages);
    assert_eq!(read.topic, Topic::Travel);
}

// ── Concurrency ───────────────────────────────────────────────────────────

#[test]
fn concurrent_appends_to_one_conversation_are_serialized() {
    let m = Arc::new(manager());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let m = m.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    m.append("shared", Message::user(format!("t{t} m{i}")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let ctx = m.get("shared").unwrap();
    assert_eq!(ctx.total_messages, 400);
    assert_eq!(ctx.len(), 10);
}

#[test]
fn conversations_are_isolated() {
    let m = Arc::new(manager());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let m = m.clone();
            std::thread::spawn(move || {
                let id = format!("conv-{t}");
                for i in 0..5 {
                    m.append(&id, Message::user(format!("{i}")));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(m.conversation_count(), 4);
    for t in 0..4 {
        assert_eq!(m.snapshot(&format!("conv-{t}")).unwrap().recent_messages.len(), 5);
    }
}

// ── Generations ───────────────────────────────────────────────────────────

#[test]
fn newer_request_supersedes_older() {
    let generations = GenerationTracker::new();
    let g1 = generations.begin("c1");
    let g2 = generations.begin("c1");
    assert!(!generations.is_current("c1", g1));
    assert!(generations.is_current("c1", g2));
}

// ── Lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn cleanup_keeps_active_conversations() {
    let m = manager();
    m.append("c1", Message::user("hi"));
    assert_eq!(cleanup_idle(&m, chrono::Duration::hours(1)), 0);
}

proptest! {
    #[test]
    fn window_bound_holds_for_any_capacity(capacity in 1usize..20, appends in 0usize..60) {
        let m = ContextWindowManager::new(&ContextConfig {
            window_capacity: capacity,
            ..Default::default()
        });
        for i in 0..appends {
            let snap = m.append("c", Message::user(format!("m{i}")));
            prop_assert!(snap.recent_messages.len() <= capacity);
        }
        let len = m.snapshot("c").map(|s| s.recent_messages.len()).unwrap_or(0);
        prop_assert_eq!(len, appends.min(capacity));
    }
}

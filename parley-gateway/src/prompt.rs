//! Prompt enrichment.
//!
//! Format: `[{tone}|{topic}|{source}->{target}] {input}` followed by up to
//! three prior messages, one per line, prefixed with `> `. Every provider
//! sees the same context-tagged prompt.

use parley_core::models::{ContextSnapshot, Speaker, Tone, Topic};

/// Prior messages quoted after the header line.
const QUOTED_HISTORY: usize = 3;

/// Build the provider prompt for `input`.
pub fn build_prompt(
    input: &str,
    snapshot: &ContextSnapshot,
    source_language: Option<&str>,
    target_language: &str,
) -> String {
    let source = source_language
        .map(str::to_string)
        .or_else(|| {
            snapshot
                .last_message()
                .and_then(|m| m.language.clone())
        })
        .unwrap_or_else(|| "auto".to_string());

    let mut prompt = format!(
        "[{}|{}|{}->{}] {}",
        snapshot.tone,
        snapshot.topic,
        source,
        target_language,
        input.trim()
    );

    // The newest message is the input itself.
    let history = snapshot
        .recent_messages
        .iter()
        .rev()
        .skip(1)
        .take(QUOTED_HISTORY)
        .collect::<Vec<_>>();
    for message in history.into_iter().rev() {
        let who = match message.speaker {
            Speaker::User => "me",
            Speaker::Partner => "them",
        };
        prompt.push_str(&format!("\n> {who}: {}", message.text));
    }
    prompt
}

/// Header fields recovered from a prompt produced by [`build_prompt`].
#[derive(Debug, Clone, PartialEq)]
pub struct PromptParts {
    pub tone: Tone,
    pub topic: Topic,
    pub source_language: String,
    pub target_language: String,
    pub input: String,
}

/// Parse the header line of an enriched prompt. Returns `None` for plain text.
pub fn parse_prompt(prompt: &str) -> Option<PromptParts> {
    let first = prompt.lines().next()?;
    let rest = first.strip_prefix('[')?;
    let (header, input) = rest.split_once("] ")?;
    let mut fields = header.split('|');
    let tone = parse_tone(fields.next()?)?;
    let topic = parse_topic(fields.next()?)?;
    let (source, target) = fields.next()?.split_once("->")?;
    Some(PromptParts {
        tone,
        topic,
        source_language: source.to_string(),
        target_language: target.to_string(),
        input: input.to_string(),
    })
}

fn parse_tone(s: &str) -> Option<Tone> {
    Tone::ALL.into_iter().find(|t| t.as_str() == s)
}

fn parse_topic(s: &str) -> Option<Topic> {
    [
        Topic::Greeting,
        Topic::Travel,
        Topic::Work,
        Topic::Food,
        Topic::Health,
        Topic::Shopping,
        Topic::General,
    ]
    .into_iter()
    .find(|t| t.as_str() == s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::models::Message;

    #[test]
    fn prompt_round_trips_header() {
        let mut snap = ContextSnapshot::empty("c1");
        snap.tone = Tone::Friendly;
        snap.topic = Topic::Greeting;
        snap.recent_messages.push(Message::user("Hello, how are you"));
        let prompt = build_prompt("Hello, how are you", &snap, Some("en"), "es");
        assert_eq!(prompt, "[friendly|greeting|en->es] Hello, how are you");

        let parts = parse_prompt(&prompt).unwrap();
        assert_eq!(parts.tone, Tone::Friendly);
        assert_eq!(parts.topic, Topic::Greeting);
        assert_eq!(parts.source_language, "en");
        assert_eq!(parts.target_language, "es");
        assert_eq!(parts.input, "Hello, how are you");
    }

    #[test]
    fn prompt_quotes_prior_messages_oldest_first() {
        let mut snap = ContextSnapshot::empty("c1");
        snap.recent_messages.push(Message::partner("Are you coming?"));
        snap.recent_messages.push(Message::user("yes"));
        let prompt = build_prompt("yes", &snap, None, "en");
        assert!(prompt.starts_with("[neutral|general|auto->en] yes"));
        assert!(prompt.ends_with("\n> them: Are you coming?"));
    }

    #[test]
    fn plain_text_is_not_a_prompt() {
        assert!(parse_prompt("just text").is_none());
        assert!(parse_prompt("[bogus|x|a->b] hi").is_none());
    }
}

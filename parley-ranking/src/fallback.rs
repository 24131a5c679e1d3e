//! Rule-based fallback. Produces a single template reply from the detected
//! intent of the input, so a request always gets an answer even when every
//! provider failed.

use parley_core::models::{Suggestion, SuggestionSource};

/// Coarse intent of the user's draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackIntent {
    Greeting,
    Question,
    Thanks,
    Farewell,
    Generic,
}

impl FallbackIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Question => "question",
            Self::Thanks => "thanks",
            Self::Farewell => "farewell",
            Self::Generic => "generic",
        }
    }
}

const GREETING_WORDS: &[&str] = &[
    "hello", "hi", "hey", "hola", "bonjour", "salut", "hallo", "ciao", "olá", "ola", "namaste",
];
const THANKS_WORDS: &[&str] = &[
    "thanks", "thank", "gracias", "merci", "danke", "obrigado", "obrigada", "grazie",
];
const FAREWELL_WORDS: &[&str] = &[
    "bye", "goodbye", "adiós", "adios", "chao", "revoir", "tschüss", "tschüs", "tchau",
    "arrivederci",
];

/// Template per (language, intent). English is the catch-all.
const TEMPLATES: &[(&str, [&str; 5])] = &[
    //      greeting, question, thanks, farewell, generic
    ("en", ["Hello!", "Could you tell me more?", "You're welcome!", "Goodbye!", "I see."]),
    ("es", ["¡Hola!", "¿Podrías contarme más?", "¡De nada!", "¡Adiós!", "Entiendo."]),
    ("fr", ["Bonjour !", "Pouvez-vous m'en dire plus ?", "De rien !", "Au revoir !", "Je vois."]),
    ("de", ["Hallo!", "Kannst du mir mehr erzählen?", "Gern geschehen!", "Tschüss!", "Verstehe."]),
    ("pt", ["Olá!", "Pode me contar mais?", "De nada!", "Tchau!", "Entendo."]),
    ("it", ["Ciao!", "Puoi dirmi di più?", "Prego!", "Arrivederci!", "Capisco."]),
];

/// Template responder used when no provider produced anything.
#[derive(Debug, Clone)]
pub struct RuleBasedFallback {
    confidence: f64,
}

impl RuleBasedFallback {
    pub fn new(confidence: f64) -> Self {
        Self { confidence }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Classify the draft. Greetings win over questions, so
    /// "hi, how are you?" is a greeting.
    pub fn classify(input: &str) -> FallbackIntent {
        let lower = input.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has = |set: &[&str]| words.iter().any(|w| set.contains(w));

        if has(GREETING_WORDS) || lower.contains("good morning") {
            FallbackIntent::Greeting
        } else if has(THANKS_WORDS) {
            FallbackIntent::Thanks
        } else if has(FAREWELL_WORDS) || lower.contains("see you") {
            FallbackIntent::Farewell
        } else if lower.contains('?') || lower.contains('¿') {
            FallbackIntent::Question
        } else {
            FallbackIntent::Generic
        }
    }

    pub fn template(language: &str, intent: FallbackIntent) -> &'static str {
        let lang = language.trim().to_ascii_lowercase();
        let row = TEMPLATES
            .iter()
            .find(|(code, _)| lang == *code || lang.starts_with(&format!("{code}-")))
            .or_else(|| TEMPLATES.first())
            .map_or(["I see."; 5], |(_, row)| *row);
        row[intent as usize]
    }

    /// One suggestion for `input` in `target_language`.
    pub fn suggest(&self, input: &str, target_language: &str) -> Suggestion {
        let intent = Self::classify(input);
        Suggestion::new(
            Self::template(target_language, intent),
            self.confidence,
            SuggestionSource::RuleBased,
        )
        .with_reasoning(format!("rule-based {} template", intent.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_intents() {
        assert_eq!(RuleBasedFallback::classify("Hello, how are you"), FallbackIntent::Greeting);
        assert_eq!(RuleBasedFallback::classify("where is the station?"), FallbackIntent::Question);
        assert_eq!(RuleBasedFallback::classify("thanks a lot"), FallbackIntent::Thanks);
        assert_eq!(RuleBasedFallback::classify("ok bye"), FallbackIntent::Farewell);
        assert_eq!(RuleBasedFallback::classify("the weather"), FallbackIntent::Generic);
        assert_eq!(RuleBasedFallback::classify("this is a high bar"), FallbackIntent::Generic);
    }

    #[test]
    fn templates_follow_target_language() {
        assert_eq!(RuleBasedFallback::template("es", FallbackIntent::Greeting), "¡Hola!");
        assert_eq!(RuleBasedFallback::template("pt-BR", FallbackIntent::Thanks), "De nada!");
        assert_eq!(RuleBasedFallback::template("xx", FallbackIntent::Generic), "I see.");
    }

    #[test]
    fn fallback_suggestion_is_rule_based() {
        let s = RuleBasedFallback::new(0.5).suggest("Hello, how are you", "es");
        assert_eq!(s.source, SuggestionSource::RuleBased);
        assert_eq!(s.confidence.value(), 0.5);
        assert_eq!(s.text, "¡Hola!");
    }
}

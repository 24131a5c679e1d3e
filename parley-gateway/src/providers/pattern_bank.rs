//! Local phrase bank: regex intents mapped to canned replies per language.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use parley_core::errors::ProviderError;
use parley_core::models::{ContextSnapshot, Suggestion, SuggestionSource};
use parley_core::traits::ISuggestionProvider;
use regex::Regex;

use crate::prompt::parse_prompt;

macro_rules! intent_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

intent_pattern!(
    RE_HOW_ARE_YOU,
    r"(?i)\b(how are you|how's it going|c[oó]mo est[aá]s|comment (vas|allez)[- ]?(tu|vous)|wie geht'?s|wie geht es)\b"
);
intent_pattern!(
    RE_GREETING,
    r"(?i)^\s*(hello|hi|hey|good (morning|afternoon|evening)|hola|buen[oa]s (d[ií]as|tardes|noches)|bonjour|salut|hallo|guten (morgen|tag|abend))\b"
);
intent_pattern!(
    RE_THANKS,
    r"(?i)\b(thanks|thank you|gracias|merci|danke)\b"
);
intent_pattern!(
    RE_FAREWELL,
    r"(?i)\b(bye|goodbye|see you|adi[oó]s|hasta luego|au revoir|tsch[uü]ss|auf wiedersehen)\b"
);
intent_pattern!(RE_QUESTION, r"[?¿]\s*$|^\s*¿");

struct Intent {
    name: &'static str,
    regex: &'static LazyLock<Option<Regex>>,
    confidence: f64,
    /// (language, primary reply, alternatives)
    replies: &'static [(&'static str, &'static str, &'static [&'static str])],
}

// Checked in order; the first matching intent wins.
static INTENTS: &[Intent] = &[
    Intent {
        name: "how-are-you",
        regex: &RE_HOW_ARE_YOU,
        confidence: 0.85,
        replies: &[
            ("en", "Hello, how are you?", &["Hi! How's it going?"]),
            ("es", "Hola, ¿cómo estás?", &["¿Qué tal?"]),
            ("fr", "Bonjour, comment allez-vous ?", &["Salut, ça va ?"]),
            ("de", "Hallo, wie geht es dir?", &["Wie geht's?"]),
        ],
    },
    Intent {
        name: "greeting",
        regex: &RE_GREETING,
        confidence: 0.8,
        replies: &[
            ("en", "Hello!", &["Hi there!"]),
            ("es", "¡Hola!", &["¡Buenas!"]),
            ("fr", "Bonjour !", &["Salut !"]),
            ("de", "Hallo!", &["Guten Tag!"]),
        ],
    },
    Intent {
        name: "thanks",
        regex: &RE_THANKS,
        confidence: 0.8,
        replies: &[
            ("en", "Thank you very much!", &["Thanks a lot!"]),
            ("es", "¡Muchas gracias!", &["Gracias"]),
            ("fr", "Merci beaucoup !", &["Merci"]),
            ("de", "Vielen Dank!", &["Danke schön"]),
        ],
    },
    Intent {
        name: "farewell",
        regex: &RE_FAREWELL,
        confidence: 0.75,
        replies: &[
            ("en", "Goodbye, see you soon!", &["Take care!"]),
            ("es", "¡Adiós, hasta pronto!", &["Cuídate"]),
            ("fr", "Au revoir, à bientôt !", &["Prends soin de toi"]),
            ("de", "Auf Wiedersehen, bis bald!", &["Mach's gut"]),
        ],
    },
    Intent {
        name: "question",
        regex: &RE_QUESTION,
        confidence: 0.5,
        replies: &[
            ("en", "Could you tell me more?", &["What do you mean?"]),
            ("es", "¿Me puedes contar más?", &["¿Qué quieres decir?"]),
            ("fr", "Pouvez-vous m'en dire plus ?", &["C'est-à-dire ?"]),
            ("de", "Kannst du mir mehr erzählen?", &["Wie meinst du das?"]),
        ],
    },
];

/// Pattern-bank provider. Never touches the network, so it answers well
/// inside any timeout.
pub struct PatternBankProvider {
    id: String,
}

impl PatternBankProvider {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Replies for `input` in `language` (falls back to English).
    pub fn lookup(&self, input: &str, language: &str) -> Vec<Suggestion> {
        let Some(intent) = INTENTS.iter().find(|intent| match &**intent.regex {
            Some(re) => re.is_match(input),
            None => false,
        }) else {
            return Vec::new();
        };

        let reply = intent
            .replies
            .iter()
            .find(|(lang, _, _)| *lang == language)
            .or_else(|| intent.replies.iter().find(|(lang, _, _)| *lang == "en"));

        reply
            .map(|(lang, text, alternatives)| {
                // Replies outside the requested language are a weaker match.
                let confidence = if *lang == language {
                    intent.confidence
                } else {
                    intent.confidence * 0.6
                };
                Suggestion::new(*text, confidence, SuggestionSource::Pattern)
                    .with_reasoning(format!("matched {} phrase pattern", intent.name))
                    .with_alternatives(alternatives.iter().map(|a| a.to_string()).collect())
            })
            .into_iter()
            .collect()
    }
}

impl Default for PatternBankProvider {
    fn default() -> Self {
        Self::new("pattern")
    }
}

#[async_trait]
impl ISuggestionProvider for PatternBankProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn source(&self) -> SuggestionSource {
        SuggestionSource::Pattern
    }

    async fn call(
        &self,
        prompt: &str,
        _context: &ContextSnapshot,
        _timeout: Duration,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let (input, language) = match parse_prompt(prompt) {
            Some(parts) => (parts.input, parts.target_language),
            None => (prompt.to_string(), "en".to_string()),
        };
        Ok(self.lookup(&input, &language))
    }
}

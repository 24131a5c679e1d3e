//! Lightweight conversation analysis: tone, topic, and language.
//!
//! Deterministic keyword and script heuristics. Recent messages weigh more
//! than older ones; the newest message counts double.

use parley_core::models::{Message, Tone, Topic};

const FORMAL_MARKERS: &[&str] = &[
    "dear", "sincerely", "regards", "kindly", "sir", "madam", "usted", "vous", "sie",
    "could you please", "would you be so kind", "i would appreciate",
];
const PROFESSIONAL_MARKERS: &[&str] = &[
    "meeting", "deadline", "project", "report", "schedule", "client", "invoice", "proposal",
    "agenda", "quarterly", "reunión", "proyecto",
];
const CASUAL_MARKERS: &[&str] = &[
    "lol", "hey", "yeah", "gonna", "wanna", "dude", "haha", "btw", "sup", "nah", "ya", "jaja",
];
const FRIENDLY_MARKERS: &[&str] = &[
    "thanks", "thank you", "great", "nice", "love", "glad", "how are you", ":)", "gracias",
    "merci", "cómo estás",
];
const EXCITED_MARKERS: &[&str] = &["wow", "amazing", "awesome", "can't wait", "incredible", "omg"];

const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Travel,
        &[
            "flight", "hotel", "airport", "trip", "train", "ticket", "passport", "vacation",
            "viaje", "vuelo", "voyage",
        ],
    ),
    (
        Topic::Work,
        &[
            "meeting", "project", "deadline", "office", "boss", "report", "client", "trabajo",
            "colleague", "job",
        ],
    ),
    (
        Topic::Food,
        &[
            "eat", "dinner", "lunch", "restaurant", "hungry", "breakfast", "coffee", "comida",
            "cena", "menu",
        ],
    ),
    (
        Topic::Health,
        &[
            "doctor", "sick", "hospital", "medicine", "pain", "fever", "pharmacy", "médico",
            "headache",
        ],
    ),
    (
        Topic::Shopping,
        &[
            "buy", "price", "store", "shop", "cost", "discount", "pay", "cheap", "expensive",
            "comprar",
        ],
    ),
    (
        Topic::Greeting,
        &[
            "hello", "hi", "hey", "hola", "bonjour", "hallo", "ciao", "good morning",
            "how are you", "namaste",
        ],
    ),
];

const STOPWORDS: &[(&str, &[&str])] = &[
    (
        "en",
        &[
            "the", "and", "is", "are", "you", "how", "what", "hello", "to", "of", "i", "it",
            "this", "that", "with", "for",
        ],
    ),
    (
        "es",
        &[
            "el", "la", "los", "las", "que", "de", "y", "es", "cómo", "estás", "hola", "por",
            "para", "con", "una", "qué",
        ],
    ),
    (
        "fr",
        &[
            "le", "la", "les", "et", "est", "vous", "je", "bonjour", "comment", "pas", "une",
            "avec", "pour", "oui",
        ],
    ),
    (
        "de",
        &[
            "der", "die", "das", "und", "ist", "ich", "nicht", "wie", "geht", "hallo", "mit",
            "ein", "eine", "danke",
        ],
    ),
    (
        "pt",
        &[
            "o", "os", "as", "que", "de", "e", "é", "você", "olá", "como", "obrigado", "não",
            "uma", "está",
        ],
    ),
    (
        "it",
        &[
            "il", "lo", "gli", "che", "di", "e", "è", "ciao", "come", "stai", "grazie", "non",
            "una", "sono",
        ],
    ),
];

const NEPALI_MARKERS: &[&str] = &["छ", "हो", "तपाईं", "म", "छु", "गर्नु", "हुनुहुन्छ"];
const HINDI_MARKERS: &[&str] = &["है", "मैं", "आप", "क्या", "हूँ", "नहीं", "हैं"];

/// Lower-cased word tokens (letters, digits, apostrophes).
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || is_devanagari_mark(c)))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn is_devanagari_mark(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}

/// Count marker hits in `text`: single words match whole tokens, phrases and
/// symbols match as substrings.
fn marker_hits(text: &str, tokens: &[String], markers: &[&str]) -> usize {
    markers
        .iter()
        .filter(|m| {
            if m.contains(' ') || !m.chars().all(char::is_alphanumeric) {
                text.contains(*m)
            } else {
                tokens.iter().any(|t| t == *m)
            }
        })
        .count()
}

/// Per-message weights: the newest message counts double.
fn weighted<'a>(messages: &'a [Message]) -> impl Iterator<Item = (&'a Message, usize)> {
    let last = messages.len().saturating_sub(1);
    messages
        .iter()
        .enumerate()
        .map(move |(i, m)| (m, if i == last { 2 } else { 1 }))
}

/// Infer the conversation tone from its messages.
pub fn detect_tone(messages: &[Message]) -> Tone {
    let mut scores = [0usize; 5]; // formal, professional, excited, casual, friendly
    for (message, weight) in weighted(messages) {
        let lower = message.text.to_lowercase();
        let tokens = tokenize(&lower);
        scores[0] += weight * marker_hits(&lower, &tokens, FORMAL_MARKERS);
        scores[1] += weight * marker_hits(&lower, &tokens, PROFESSIONAL_MARKERS);
        let bangs = message.text.matches('!').count();
        let shouting = message
            .text
            .split_whitespace()
            .filter(|w| w.len() > 2 && w.chars().all(|c| c.is_uppercase()))
            .count();
        scores[2] += weight
            * (marker_hits(&lower, &tokens, EXCITED_MARKERS)
                + usize::from(bangs >= 2)
                + shouting);
        scores[3] += weight * marker_hits(&lower, &tokens, CASUAL_MARKERS);
        scores[4] += weight * marker_hits(&lower, &tokens, FRIENDLY_MARKERS);
    }

    let order = [
        Tone::Formal,
        Tone::Professional,
        Tone::Excited,
        Tone::Casual,
        Tone::Friendly,
    ];
    let mut best = (Tone::Neutral, 0usize);
    for (tone, score) in order.into_iter().zip(scores) {
        if score > best.1 {
            best = (tone, score);
        }
    }
    best.0
}

/// Infer the conversation topic. Greetings only win when nothing more
/// specific is being discussed.
pub fn detect_topic(messages: &[Message]) -> Topic {
    let mut best = (Topic::General, 0usize);
    let mut greeting = 0usize;
    for (topic, keywords) in TOPIC_KEYWORDS {
        let mut score = 0;
        for (message, weight) in weighted(messages) {
            let lower = message.text.to_lowercase();
            let tokens = tokenize(&lower);
            score += weight * marker_hits(&lower, &tokens, keywords);
        }
        if *topic == Topic::Greeting {
            greeting = score;
        } else if score > best.1 {
            best = (*topic, score);
        }
    }
    if best.1 == 0 && greeting > 0 {
        return Topic::Greeting;
    }
    best.0
}

/// Best-effort language detection. Returns `None` when nothing matches.
pub fn detect_language(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    let tokens = tokenize(&lower);
    if tokens.is_empty() {
        return None;
    }

    if lower.chars().any(is_devanagari_mark) {
        let ne = marker_hits(&lower, &tokens, NEPALI_MARKERS);
        let hi = marker_hits(&lower, &tokens, HINDI_MARKERS);
        return Some(if ne > hi { "ne" } else { "hi" });
    }

    let mut best: Option<(&'static str, usize)> = None;
    for (lang, words) in STOPWORDS {
        let mut score = tokens.iter().filter(|t| words.contains(&t.as_str())).count();
        score += match *lang {
            "es" => lower.chars().filter(|c| matches!(c, 'ñ' | '¿' | '¡')).count() * 2,
            "de" => lower.chars().filter(|c| matches!(c, 'ß' | 'ä' | 'ö' | 'ü')).count() * 2,
            "pt" => lower.chars().filter(|c| matches!(c, 'ã' | 'õ')).count() * 2,
            "fr" => lower.chars().filter(|c| matches!(c, 'ç' | 'œ')).count() * 2,
            _ => 0,
        };
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((*lang, score));
        }
    }
    best.map(|(lang, _)| lang)
}

/// Jaccard overlap between the word sets of two texts, in [0, 1].
pub fn lexical_overlap(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;

    let left: HashSet<String> = tokenize(a).into_iter().collect();
    let right: HashSet<String> = tokenize(b).into_iter().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let shared = left.intersection(&right).count() as f64;
    let union = left.union(&right).count() as f64;
    shared / union
}

//! Tone × PersonalityType → alignment lookup table.
//!
//! 1.0 is a perfect match (professional mood, professional personality);
//! values near 0 mean the mood is far from the user's natural register.

use std::collections::HashMap;

use parley_core::models::{PersonalityType, Tone};

pub struct AlignmentMatrix {
    table: HashMap<(PersonalityType, Tone), f64>,
}

impl AlignmentMatrix {
    /// Create with hardcoded default scores.
    pub fn default_table() -> Self {
        use PersonalityType as P;

        // Columns follow Tone::ALL: formal, professional, neutral, friendly, excited, casual.
        let rows: [(PersonalityType, [f64; 6]); 6] = [
            (P::Professional, [0.90, 0.95, 0.70, 0.50, 0.35, 0.30]),
            (P::Analytical, [0.80, 0.85, 0.75, 0.50, 0.35, 0.35]),
            (P::Balanced, [0.60, 0.65, 0.80, 0.75, 0.60, 0.60]),
            (P::Friendly, [0.40, 0.50, 0.70, 0.95, 0.80, 0.80]),
            (P::Expressive, [0.30, 0.40, 0.60, 0.85, 0.95, 0.80]),
            (P::Casual, [0.25, 0.35, 0.65, 0.85, 0.80, 0.95]),
        ];

        let mut table = HashMap::new();
        for (personality, scores) in rows {
            for (tone, score) in Tone::ALL.into_iter().zip(scores) {
                table.insert((personality, tone), score);
            }
        }
        Self { table }
    }

    /// Alignment of `personality` with a conversation in `tone`.
    pub fn score(&self, personality: PersonalityType, tone: Tone) -> f64 {
        self.table.get(&(personality, tone)).copied().unwrap_or(0.5)
    }

    /// Override a single cell, clamped to [0, 1].
    pub fn set(&mut self, personality: PersonalityType, tone: Tone, score: f64) {
        self.table
            .insert((personality, tone), score.clamp(0.0, 1.0));
    }
}

impl Default for AlignmentMatrix {
    fn default() -> Self {
        Self::default_table()
    }
}

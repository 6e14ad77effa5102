//! Scoring lexicon - phrase table used around character mentions
//!
//! Each entry maps a phrase to a weight. When a phrase appears near a mention of
//! a character, its weight is added to that character's score. At most one
//! phrase per [`CueKind`] counts for a single mention.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// What a cue phrase signals about a nearby mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    /// The character is present and acting or speaking
    Presence,
    /// The character is only remembered, dreamed about or pictured
    Imagination,
}

/// One row of the lexicon table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub phrase: String,
    pub weight: f64,
    pub kind: CueKind,
}

impl LexiconEntry {
    pub fn new(phrase: impl Into<String>, weight: f64, kind: CueKind) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
            kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Invalid lexicon JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Lexicon has no usable entries")]
    Empty,
}

#[derive(Debug, Clone)]
struct CompiledCue {
    entry: LexiconEntry,
    regex: Regex,
}

/// Compiled phrase table
#[derive(Debug, Clone)]
pub struct ScoringLexicon {
    cues: Vec<CompiledCue>,
}

const PRESENCE_VERBS: &[&str] = &[
    "said", "says", "asked", "asks", "replied", "replies", "answered", "answers", "whispered",
    "whispers", "murmured", "muttered", "shouted", "shouts", "yelled", "called", "exclaimed",
    "added", "continued", "nodded", "nods", "shrugged", "smiled", "smiles", "grinned", "laughed",
    "laughs", "giggled", "sighed", "frowned", "blushed", "winked", "walked", "walks", "stepped",
    "turned", "leaned", "looked", "glanced", "spoke", "speaks", "began",
];

const IMAGINATION_HINTS: &[&str] = &[
    "memory of", "memories of", "dream of", "dreams of", "dreamed of", "dreamt of",
    "dreaming of", "image of", "picture of", "thought of", "thinking of", "imagined",
    "remembered", "recalled",
];

impl Default for ScoringLexicon {
    fn default() -> Self {
        let entries = PRESENCE_VERBS
            .iter()
            .map(|verb| LexiconEntry::new(*verb, 1.0, CueKind::Presence))
            .chain(
                IMAGINATION_HINTS
                    .iter()
                    .map(|hint| LexiconEntry::new(*hint, -1.0, CueKind::Imagination)),
            );
        Self::from_entries(entries)
    }
}

impl ScoringLexicon {
    /// Compile a table. Entries with a blank phrase are skipped.
    pub fn from_entries(entries: impl IntoIterator<Item = LexiconEntry>) -> Self {
        let cues = entries
            .into_iter()
            .filter_map(|entry| {
                let words: Vec<String> = entry
                    .phrase
                    .split_whitespace()
                    .map(regex::escape)
                    .collect();
                if words.is_empty() {
                    return None;
                }
                let pattern = format!(r"(?i)\b{}\b", words.join(r"\s+"));
                match Regex::new(&pattern) {
                    Ok(regex) => Some(CompiledCue { entry, regex }),
                    Err(e) => {
                        tracing::warn!("Skipping lexicon phrase {:?}: {}", entry.phrase, e);
                        None
                    }
                }
            })
            .collect();
        Self { cues }
    }

    /// Parse a JSON array of [`LexiconEntry`]
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let entries: Vec<LexiconEntry> = serde_json::from_str(json)?;
        let lexicon = Self::from_entries(entries);
        if lexicon.is_empty() {
            return Err(LexiconError::Empty);
        }
        Ok(lexicon)
    }

    pub fn entries(&self) -> Vec<LexiconEntry> {
        self.cues.iter().map(|c| c.entry.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Sum of weights of the first matching phrase of each cue kind
    pub fn window_adjustment(&self, window: &str) -> f64 {
        let mut presence: Option<f64> = None;
        let mut imagination: Option<f64> = None;

        for cue in &self.cues {
            let slot = match cue.entry.kind {
                CueKind::Presence => &mut presence,
                CueKind::Imagination => &mut imagination,
            };
            if slot.is_none() && cue.regex.is_match(window) {
                *slot = Some(cue.entry.weight);
            }
            if presence.is_some() && imagination.is_some() {
                break;
            }
        }

        presence.unwrap_or(0.0) + imagination.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window_adjustment() {
        let lexicon = ScoringLexicon::default();
        assert_eq!(lexicon.window_adjustment("and then she said hello"), 1.0);
        assert_eq!(lexicon.window_adjustment("a faint memory of her"), -1.0);
        assert_eq!(lexicon.window_adjustment("she said a memory of"), 0.0);
        assert_eq!(lexicon.window_adjustment("nothing to see"), 0.0);
    }

    #[test]
    fn test_whole_word_only() {
        let lexicon = ScoringLexicon::default();
        // "unsaid" must not count as "said"
        assert_eq!(lexicon.window_adjustment("left unsaid"), 0.0);
        // one presence cue per window even when several verbs appear
        assert_eq!(lexicon.window_adjustment("she nodded and smiled"), 1.0);
    }

    #[test]
    fn test_from_json_override() {
        let json = r#"[
            {"phrase": "purred", "weight": 2.0, "kind": "presence"},
            {"phrase": "   ", "weight": 5.0, "kind": "presence"}
        ]"#;
        let lexicon = ScoringLexicon::from_json(json).unwrap();
        assert_eq!(lexicon.entries().len(), 1);
        assert_eq!(lexicon.window_adjustment("the cat purred"), 2.0);
        assert_eq!(lexicon.window_adjustment("she said"), 0.0);
    }

    #[test]
    fn test_from_json_rejects_empty() {
        assert!(matches!(ScoringLexicon::from_json("[]"), Err(LexiconError::Empty)));
        assert!(matches!(ScoringLexicon::from_json("{"), Err(LexiconError::Parse(_))));
    }
}

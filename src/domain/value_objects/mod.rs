//! Value objects - Immutable objects defined by their attributes

mod ids;
mod lexicon;
mod names;
mod placeholder;
mod settings;
mod tuning;

pub use ids::*;
pub use lexicon::{CueKind, LexiconEntry, LexiconError, ScoringLexicon};
pub use names::{
    candidate_words, normalize_name, search_haystack, search_needle, strip_punctuation,
    ParsedName,
};
pub use placeholder::{
    build_placeholder, code_spans, contains_placeholder, dedupe_placeholders, find_placeholders,
    PlaceholderMatch,
};
pub use settings::{CharacterEntries, EmbedSettings};
pub use tuning::AttributionTuning;

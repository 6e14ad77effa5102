//! Character scorer - how strongly a span of text is about each candidate
//!
//! Signals, per candidate:
//! - every whole-word mention counts once
//! - cue phrases near a mention adjust the score (see [`ScoringLexicon`])
//! - `Name:` / `Name -` speaker label lines weigh extra
//! - a mention that opens the text earns a lead bonus
//!
//! Scoring is a pure function of the text and the candidate list.

use std::cmp::Ordering;
use std::collections::HashSet;

use regex::Regex;

use crate::domain::value_objects::{
    candidate_words, strip_punctuation, AttributionTuning, ScoringLexicon,
};

/// Score of one candidate against one span of text
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterScore {
    /// Candidate token as passed in
    pub character: String,
    /// Never negative
    pub score: f64,
    /// Byte offset of the first mention, `None` when never mentioned
    pub first_index: Option<usize>,
    pub mentions: usize,
}

pub struct CharacterScorer<'a> {
    lexicon: &'a ScoringLexicon,
    tuning: &'a AttributionTuning,
}

impl<'a> CharacterScorer<'a> {
    pub fn new(lexicon: &'a ScoringLexicon, tuning: &'a AttributionTuning) -> Self {
        Self { lexicon, tuning }
    }

    /// Score every candidate and return those above zero, best first.
    ///
    /// Ties go to the earlier first mention, then to the higher mention count.
    pub fn score<S: AsRef<str>>(&self, text: &str, candidates: &[S]) -> Vec<CharacterScore> {
        if text.trim().is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let stripped = strip_punctuation(text);
        let mut seen = HashSet::new();
        let mut scores: Vec<CharacterScore> = candidates
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| seen.insert(c.to_string()))
            .filter_map(|candidate| self.score_candidate(text, &stripped, candidate))
            .collect();

        scores.sort_by(compare_scores);
        scores
    }

    fn score_candidate(&self, text: &str, stripped: &str, candidate: &str) -> Option<CharacterScore> {
        let words: Vec<String> = candidate_words(candidate)
            .iter()
            .map(|w| regex::escape(w))
            .collect();
        if words.is_empty() {
            return None;
        }

        let mention = Regex::new(&format!(r"(?i)\b{}\b", words.join(r"[\s_]+"))).ok()?;
        let speaker_label = Regex::new(&format!(
            r"(?im)^[ \t]*({})[ \t]*[:\-–—]",
            words.join(r"[\s_\-]+")
        ))
        .ok()?;

        let mut score = 0.0;
        let mut mentions = 0;
        let mut first_index: Option<usize> = None;

        for m in mention.find_iter(stripped) {
            mentions += 1;
            score += 1.0;
            first_index.get_or_insert(m.start());

            let window = char_window(stripped, m.start(), m.end(), self.tuning.cue_window_chars);
            score += self.lexicon.window_adjustment(window);
        }

        for caps in speaker_label.captures_iter(text) {
            let Some(name) = caps.get(1) else { continue };
            score += self.tuning.speaker_label_weight;
            first_index = Some(first_index.map_or(name.start(), |i| i.min(name.start())));
        }

        if first_index == Some(0) {
            score += self.tuning.lead_mention_bonus;
        }

        let score: f64 = score.max(0.0);
        if score <= 0.0 {
            return None;
        }

        Some(CharacterScore {
            character: candidate.to_string(),
            score,
            first_index,
            mentions,
        })
    }
}

fn compare_scores(a: &CharacterScore, b: &CharacterScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| match (a.first_index, b.first_index) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| b.mentions.cmp(&a.mentions))
}

/// Slice of `text` reaching `radius` characters before `start` and after `end`.
fn char_window(text: &str, start: usize, end: usize, radius: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(start);
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str, candidates: &[&str]) -> Vec<CharacterScore> {
        let lexicon = ScoringLexicon::default();
        let tuning = AttributionTuning::default();
        CharacterScorer::new(&lexicon, &tuning).score(text, candidates)
    }

    #[test]
    fn test_empty_inputs_score_nothing() {
        assert!(score("Alice waves.", &[]).is_empty());
        assert!(score("", &["alice"]).is_empty());
        assert!(score("   \n ", &["alice"]).is_empty());
    }

    #[test]
    fn test_speaker_labels_and_lead_bonus() {
        let scores = score("Alice: Hi there!\nBob: Hello.", &["alice", "bob"]);
        assert_eq!(scores.len(), 2);

        // mention + label + lead
        assert_eq!(scores[0].character, "alice");
        assert_eq!(scores[0].score, 4.0);
        assert_eq!(scores[0].first_index, Some(0));

        // mention + label
        assert_eq!(scores[1].character, "bob");
        assert_eq!(scores[1].score, 3.0);
        assert_eq!(scores[1].first_index, Some(17));
    }

    #[test]
    fn test_presence_and_imagination_cues() {
        let scores = score("The room was quiet until Alice said hello.", &["alice"]);
        assert_eq!(scores[0].score, 2.0);

        // memory hint cancels the mention entirely
        let scores = score("He held the memory of Alice close.", &["alice"]);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_whole_word_case_insensitive() {
        let scores = score("ALICE waved. Malice grew. alice_smile", &["alice"]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].mentions, 1);
    }

    #[test]
    fn test_multi_word_candidate() {
        let scores = score("Later, Mary   Jane waved at mary-jane.", &["mary_jane"]);
        assert_eq!(scores[0].mentions, 2);
    }

    #[test]
    fn test_unmentioned_candidates_are_excluded() {
        let scores = score("Alice waves.", &["alice", "bob"]);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].character, "alice");
    }

    #[test]
    fn test_tie_breaks_on_first_mention_then_count() {
        let scores = score("the bob and the carl", &["carl", "bob"]);
        assert_eq!(scores[0].score, scores[1].score);
        assert_eq!(scores[0].character, "bob");
    }

    #[test]
    fn test_duplicate_candidates_scored_once() {
        let scores = score("Alice waves.", &["alice", "alice"]);
        assert_eq!(scores.len(), 1);
    }

    #[test]
    fn test_score_monotonic_in_mentions() {
        let base = "It was a long day. Alice sat down.";
        let more = "It was a long day. Alice sat down. Then alice sat again.";
        let a = score(base, &["alice"])[0].score;
        let b = score(more, &["alice"])[0].score;
        assert!(b >= a);
    }

    #[test]
    fn test_char_window_handles_multibyte() {
        let text = "ééé name ééé";
        let start = text.find("name").unwrap();
        let window = char_window(text, start, start + 4, 2);
        assert_eq!(window, "é name é");
        assert_eq!(char_window("abc", 1, 2, 0), "b");
    }
}

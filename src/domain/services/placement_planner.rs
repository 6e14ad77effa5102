//! Placement planner - which images go into a message and where
//!
//! Combines the character scorer, the dominance analyzer and the entry
//! selector into an ordered list of placements. At most two characters are
//! attributed, and only when double attribution is allowed and the message
//! really interleaves two speakers.

use crate::domain::entities::{ChatMessage, ImageEntry};
use crate::domain::services::character_scorer::{CharacterScore, CharacterScorer};
use crate::domain::services::dominance::{DominanceAnalyzer, DominanceReport};
use crate::domain::services::entry_selector::{
    find_direct_match, mention_offset, select_for_character, EntryGroups,
};
use crate::domain::value_objects::{AttributionTuning, ScoringLexicon};

/// One image to insert, anchored at a position of the message text
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub entry: ImageEntry,
    /// Byte offset, used for slicing the text
    pub target_offset: usize,
    /// The same position counted in characters
    pub char_offset: usize,
}

impl Placement {
    pub fn new(entry: ImageEntry, text: &str, target_offset: usize) -> Self {
        Self {
            entry,
            target_offset,
            char_offset: char_index(text, target_offset),
        }
    }
}

/// Number of characters that end at or before byte `offset`
pub fn char_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= offset)
        .count()
}

pub struct PlacementPlanner<'a> {
    lexicon: &'a ScoringLexicon,
    tuning: &'a AttributionTuning,
}

impl<'a> PlacementPlanner<'a> {
    pub fn new(lexicon: &'a ScoringLexicon, tuning: &'a AttributionTuning) -> Self {
        Self { lexicon, tuning }
    }

    /// Plan placements for a message snapshot.
    ///
    /// Missing, user and system messages get no placements.
    pub fn pick_entries_for_message(
        &self,
        message: Option<&ChatMessage>,
        entries: &[ImageEntry],
        allow_multiple: bool,
    ) -> Vec<Placement> {
        match message {
            Some(message) if !message.is_user() && !message.is_system() => {
                self.plan(&message.text, entries, allow_multiple)
            }
            _ => Vec::new(),
        }
    }

    /// Plan placements for raw text, sorted by target offset
    pub fn plan(&self, text: &str, entries: &[ImageEntry], allow_multiple: bool) -> Vec<Placement> {
        if entries.is_empty() {
            return Vec::new();
        }

        let groups = EntryGroups::from_entries(entries);
        let candidates = groups.character_keys();

        let scorer = CharacterScorer::new(self.lexicon, self.tuning);
        let scores = scorer.score(text, &candidates);
        let dominance = DominanceAnalyzer::new(&scorer, self.tuning).analyze(text, &candidates);

        let max_count = self.max_count(allow_multiple, &scores, &dominance);
        let desired = desired_characters(max_count, &scores, &dominance);

        tracing::debug!(
            ?desired,
            max_count,
            scored = scores.len(),
            "Attributing message"
        );

        let mut picks: Vec<Placement> = Vec::new();
        for character in &desired {
            if picks.len() >= max_count {
                break;
            }
            let Some(entry) = select_for_character(&groups, character, text) else {
                continue;
            };
            if picks.iter().any(|p| p.entry.id == entry.id) {
                continue;
            }

            let target_offset = dominance
                .block_for(character)
                .map(|block| block.midpoint())
                .or_else(|| {
                    scores
                        .iter()
                        .find(|s| &s.character == character)
                        .and_then(|s| s.first_index)
                })
                .unwrap_or(text.len());

            picks.push(Placement::new(entry.clone(), text, target_offset));
        }

        if picks.len() < max_count && (groups.len() == 1 || entries.len() == 1) {
            let fallback = find_direct_match(entries, text)
                .into_iter()
                .chain(groups.sole_group().and_then(|g| g.first().copied()))
                .chain(if entries.len() == 1 { entries.first() } else { None });

            for entry in fallback {
                if picks.len() >= max_count {
                    break;
                }
                if picks.iter().any(|p| p.entry.id == entry.id) {
                    continue;
                }
                tracing::debug!(entry = %entry.name, "Using fallback entry");
                let target_offset = mention_offset(text, entry).unwrap_or(text.len());
                picks.push(Placement::new(entry.clone(), text, target_offset));
            }
        }

        picks.sort_by_key(|p| p.target_offset);
        picks
    }

    fn max_count(
        &self,
        allow_multiple: bool,
        scores: &[CharacterScore],
        dominance: &DominanceReport,
    ) -> usize {
        if !allow_multiple || dominance.is_single_dominant {
            return 1;
        }
        let (Some(leader), Some(runner_up)) = (scores.first(), scores.get(1)) else {
            return 1;
        };
        if runner_up.score < self.tuning.runner_up_min_score
            || runner_up.score < leader.score * self.tuning.runner_up_ratio
        {
            return 1;
        }
        2
    }
}

fn desired_characters(
    max_count: usize,
    scores: &[CharacterScore],
    dominance: &DominanceReport,
) -> Vec<String> {
    let mut desired = Vec::new();

    let first = dominance
        .primary
        .clone()
        .or_else(|| scores.first().map(|s| s.character.clone()));
    let Some(first) = first else {
        return desired;
    };

    if max_count >= 2 {
        let second = dominance
            .secondary
            .clone()
            .or_else(|| scores.get(1).map(|s| s.character.clone()))
            .filter(|c| *c != first);
        desired.push(first);
        desired.extend(second);
    } else {
        desired.push(first);
    }

    desired
}

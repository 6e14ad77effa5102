//! Paragraph dominance analysis
//!
//! Splits a message into paragraphs, gives each paragraph to its best-scoring
//! character and decides whether the whole message belongs to one character or
//! interleaves several.

use std::collections::HashMap;

use crate::domain::services::character_scorer::CharacterScorer;
use crate::domain::value_objects::AttributionTuning;

/// A trimmed non-blank line and its byte span in the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paragraph<'t> {
    pub text: &'t str,
    pub start: usize,
    pub end: usize,
}

impl Paragraph<'_> {
    /// Distance from `offset` to this span, zero when inside it
    pub fn distance_to(&self, offset: usize) -> usize {
        if offset < self.start {
            self.start - offset
        } else if offset > self.end {
            offset - self.end
        } else {
            0
        }
    }
}

/// Split on line boundaries, dropping blank lines
pub fn split_paragraphs(text: &str) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let leading = line.len() - line.trim_start().len();
        let content = line.trim();
        if !content.is_empty() {
            let start = offset + leading;
            paragraphs.push(Paragraph {
                text: content,
                start,
                end: start + content.len(),
            });
        }
        offset += line.len();
    }

    paragraphs
}

/// A paragraph and the character it was given
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphAssignment {
    pub start: usize,
    pub end: usize,
    pub character: Option<String>,
    pub score: f64,
}

/// Maximal run of consecutive paragraphs given to the same character
#[derive(Debug, Clone, PartialEq)]
pub struct DominanceBlock {
    pub character: String,
    pub start: usize,
    pub end: usize,
    pub paragraph_count: usize,
    pub score: f64,
}

impl DominanceBlock {
    pub fn midpoint(&self) -> usize {
        self.start + (self.end - self.start) / 2
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DominanceReport {
    pub paragraphs: Vec<ParagraphAssignment>,
    pub blocks: Vec<DominanceBlock>,
    /// Paragraph count per character, in order of first appearance
    pub counts: Vec<(String, usize)>,
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub is_single_dominant: bool,
}

impl DominanceReport {
    pub fn count_for(&self, character: &str) -> usize {
        self.counts
            .iter()
            .find(|(c, _)| c == character)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }

    /// The character's strongest block: most paragraphs, then highest score,
    /// then earliest.
    pub fn block_for(&self, character: &str) -> Option<&DominanceBlock> {
        self.blocks
            .iter()
            .filter(|b| b.character == character)
            .fold(None, |best: Option<&DominanceBlock>, block| match best {
                Some(current)
                    if current.paragraph_count > block.paragraph_count
                        || (current.paragraph_count == block.paragraph_count
                            && current.score >= block.score) =>
                {
                    Some(current)
                }
                _ => Some(block),
            })
    }
}

pub struct DominanceAnalyzer<'a> {
    scorer: &'a CharacterScorer<'a>,
    tuning: &'a AttributionTuning,
}

impl<'a> DominanceAnalyzer<'a> {
    pub fn new(scorer: &'a CharacterScorer<'a>, tuning: &'a AttributionTuning) -> Self {
        Self { scorer, tuning }
    }

    pub fn analyze<S: AsRef<str>>(&self, text: &str, candidates: &[S]) -> DominanceReport {
        let paragraphs = split_paragraphs(text);
        if paragraphs.is_empty() || candidates.is_empty() {
            return DominanceReport {
                paragraphs: paragraphs
                    .iter()
                    .map(|p| ParagraphAssignment {
                        start: p.start,
                        end: p.end,
                        character: None,
                        score: 0.0,
                    })
                    .collect(),
                ..Default::default()
            };
        }

        let assignments: Vec<ParagraphAssignment> = paragraphs
            .iter()
            .map(|p| {
                let top = self.scorer.score(p.text, candidates).into_iter().next();
                ParagraphAssignment {
                    start: p.start,
                    end: p.end,
                    score: top.as_ref().map_or(0.0, |s| s.score),
                    character: top.map(|s| s.character),
                }
            })
            .collect();

        let blocks = group_blocks(&assignments);
        let counts = count_paragraphs(&assignments);
        let (primary, secondary) = rank_characters(&counts);
        let is_single_dominant =
            self.single_dominant(&assignments, &counts, primary.as_deref(), secondary.as_deref());

        tracing::debug!(
            paragraphs = assignments.len(),
            blocks = blocks.len(),
            ?primary,
            ?secondary,
            is_single_dominant,
            "Paragraph dominance analyzed"
        );

        DominanceReport {
            paragraphs: assignments,
            blocks,
            counts,
            primary,
            secondary,
            is_single_dominant,
        }
    }

    fn single_dominant(
        &self,
        assignments: &[ParagraphAssignment],
        counts: &[(String, usize)],
        primary: Option<&str>,
        secondary: Option<&str>,
    ) -> bool {
        let Some(primary) = primary else {
            return false;
        };

        let mut assigned = assignments.iter().filter_map(|a| a.character.as_deref());
        let first = assigned.next();
        let last = assigned.last().or(first);
        if first != Some(primary) || last != Some(primary) {
            return false;
        }

        let lookup = |c: Option<&str>| {
            c.and_then(|c| counts.iter().find(|(k, _)| k == c))
                .map(|(_, n)| *n)
                .unwrap_or(0)
        };
        let primary_count = lookup(Some(primary)) as f64;
        let secondary_count = lookup(secondary) as f64;
        let total = assignments.len() as f64;

        primary_count >= self.tuning.dominant_share * total
            && (secondary_count == 0.0 || primary_count >= self.tuning.dominant_ratio * secondary_count)
    }
}

fn group_blocks(assignments: &[ParagraphAssignment]) -> Vec<DominanceBlock> {
    let mut blocks: Vec<DominanceBlock> = Vec::new();
    let mut run_open = false;

    for assignment in assignments {
        let Some(character) = &assignment.character else {
            run_open = false;
            continue;
        };

        match blocks.last_mut() {
            Some(block) if run_open && &block.character == character => {
                block.end = assignment.end;
                block.paragraph_count += 1;
                block.score += assignment.score;
            }
            _ => blocks.push(DominanceBlock {
                character: character.clone(),
                start: assignment.start,
                end: assignment.end,
                paragraph_count: 1,
                score: assignment.score,
            }),
        }
        run_open = true;
    }

    blocks
}

fn count_paragraphs(assignments: &[ParagraphAssignment]) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for character in assignments.iter().filter_map(|a| a.character.as_deref()) {
        let count = counts.entry(character).or_insert(0);
        if *count == 0 {
            order.push(character.to_string());
        }
        *count += 1;
    }

    order
        .into_iter()
        .map(|c| {
            let n = counts.get(c.as_str()).copied().unwrap_or(0);
            (c, n)
        })
        .collect()
}

/// Most and second-most paragraphs; earlier first appearance wins ties
fn rank_characters(counts: &[(String, usize)]) -> (Option<String>, Option<String>) {
    let best = |skip: Option<&str>| {
        counts
            .iter()
            .filter(|(c, _)| Some(c.as_str()) != skip)
            .fold(None, |best: Option<&(String, usize)>, item| match best {
                Some(current) if current.1 >= item.1 => Some(current),
                _ => Some(item),
            })
            .map(|(c, _)| c.clone())
    };

    let primary = best(None);
    let secondary = primary.as_deref().and_then(|p| best(Some(p)));
    (primary, secondary)
}

//! Domain services - Pure attribution and placement logic
//!
//! Everything here is synchronous and works on snapshots: a message text and
//! an entry list go in, a new value comes out.

pub mod character_scorer;
pub mod dominance;
pub mod entry_selector;
pub mod placeholder_renderer;
pub mod placement_planner;

pub use character_scorer::{CharacterScore, CharacterScorer};
pub use dominance::{
    split_paragraphs, DominanceAnalyzer, DominanceBlock, DominanceReport, Paragraph,
    ParagraphAssignment,
};
pub use entry_selector::{
    find_direct_match, mention_offset, select_for_character, EntryGroups, DEFAULT_BUCKET,
};
pub use placeholder_renderer::{
    find_entry_by_name, inject_placeholders, render_segments, revert_segments, RenderSegment,
};
pub use placement_planner::{char_index, Placement, PlacementPlanner};

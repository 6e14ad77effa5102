//! Placeholder insertion and rendering over message text
//!
//! Insertion puts each planned placeholder right after the paragraph nearest
//! its target offset. Rendering turns placeholders into image segments for any
//! front end to paint; segments always carry the canonical placeholder, so a
//! re-render starts again from plain text.

use crate::domain::entities::ImageEntry;
use crate::domain::services::dominance::split_paragraphs;
use crate::domain::services::placement_planner::Placement;
use crate::domain::value_objects::{build_placeholder, dedupe_placeholders, find_placeholders, normalize_name};

/// A piece of rendered message text
#[derive(Debug, Clone, PartialEq)]
pub enum RenderSegment {
    Text(String),
    Image {
        entry: ImageEntry,
        /// Token to restore when the image is reverted
        placeholder: String,
        /// Alt text and caption
        label: String,
    },
}

/// Insert `\n{{img::name}}\n` for every placement.
///
/// Placements are taken in target order; each uses the nearest paragraph not
/// already used, or the end of the text when none is left.
pub fn inject_placeholders(text: &str, placements: &[Placement]) -> String {
    let paragraphs = split_paragraphs(text);
    let mut used = vec![false; paragraphs.len()];

    let mut ordered: Vec<&Placement> = placements.iter().collect();
    ordered.sort_by_key(|p| p.target_offset);

    let mut insertions: Vec<(usize, String)> = ordered
        .into_iter()
        .map(|placement| {
            let anchor = paragraphs
                .iter()
                .enumerate()
                .filter(|(i, _)| !used[*i])
                .min_by_key(|(i, p)| (p.distance_to(placement.target_offset), *i))
                .map(|(i, p)| (i, p.end));

            let at = match anchor {
                Some((i, end)) => {
                    used[i] = true;
                    end
                }
                None => text.len(),
            };
            (at, format!("\n{}\n", build_placeholder(&placement.entry.name)))
        })
        .collect();
    insertions.sort_by_key(|(at, _)| *at);

    let mut out = String::with_capacity(text.len() + insertions.len() * 32);
    let mut last = 0;
    for (at, token) in insertions {
        out.push_str(&text[last..at]);
        out.push_str(&token);
        last = at;
    }
    out.push_str(&text[last..]);
    out
}

/// Find the entry a placeholder name refers to
pub fn find_entry_by_name<'e>(entries: &'e [ImageEntry], name: &str) -> Option<&'e ImageEntry> {
    let target = normalize_name(name);
    entries.iter().find(|e| e.normalized_name() == target)
}

/// Split text into plain and image segments.
///
/// Repeated placeholders are dropped first. Placeholders naming an unknown
/// entry, or an entry without an image, stay as literal text.
pub fn render_segments(text: &str, entries: &[ImageEntry]) -> Vec<RenderSegment> {
    let text = dedupe_placeholders(text);
    let mut segments: Vec<RenderSegment> = Vec::new();
    let mut last = 0;

    for found in find_placeholders(&text) {
        push_text(&mut segments, &text[last..found.range.start]);
        last = found.range.end;

        match find_entry_by_name(entries, &found.raw_name).filter(|e| e.has_image()) {
            Some(entry) => {
                let name = found.raw_name.trim();
                let placeholder = build_placeholder(if name.is_empty() { &entry.name } else { name });
                let label = if entry.name.is_empty() {
                    found.raw_name.clone()
                } else {
                    entry.name.clone()
                };
                segments.push(RenderSegment::Image {
                    entry: entry.clone(),
                    placeholder,
                    label,
                });
            }
            None => push_text(&mut segments, &found.token),
        }
    }
    push_text(&mut segments, &text[last..]);

    segments
}

fn push_text(segments: &mut Vec<RenderSegment>, s: &str) {
    if s.is_empty() {
        return;
    }
    match segments.last_mut() {
        Some(RenderSegment::Text(existing)) => existing.push_str(s),
        _ => segments.push(RenderSegment::Text(s.to_string())),
    }
}

/// Join segments back into text, images reverted to their placeholders
pub fn revert_segments(segments: &[RenderSegment]) -> String {
    segments
        .iter()
        .map(|s| match s {
            RenderSegment::Text(text) => text.as_str(),
            RenderSegment::Image { placeholder, .. } => placeholder.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(name: &str, target_offset: usize) -> Placement {
        Placement {
            entry: ImageEntry::new(name, format!("/img/{}.png", name)),
            target_offset,
            char_offset: target_offset,
        }
    }

    #[test]
    fn test_inject_after_nearest_paragraph() {
        let text = "Alice: Hi there!\nBob: Hello.";
        let out = inject_placeholders(text, &[placement("bob/frown", 22), placement("alice/smile", 8)]);
        assert_eq!(
            out,
            "Alice: Hi there!\n{{img::alice/smile}}\n\nBob: Hello.\n{{img::bob/frown}}\n"
        );
    }

    #[test]
    fn test_inject_skips_used_paragraphs() {
        let text = "One.\nTwo.";
        let out = inject_placeholders(text, &[placement("a", 0), placement("b", 1)]);
        assert_eq!(out, "One.\n{{img::a}}\n\nTwo.\n{{img::b}}\n");
    }

    #[test]
    fn test_inject_appends_when_out_of_paragraphs() {
        let out = inject_placeholders("Only.", &[placement("a", 0), placement("b", 5)]);
        assert_eq!(out, "Only.\n{{img::a}}\n\n{{img::b}}\n");

        let out = inject_placeholders("", &[placement("a", 0)]);
        assert_eq!(out, "\n{{img::a}}\n");
    }

    #[test]
    fn test_render_segments() {
        let entries = vec![
            ImageEntry::new("alice/smile", "/smile.png"),
            ImageEntry::new("broken", ""),
        ];
        let text = "Hi {{img::Alice/Smile}} and {{img::broken}} and {{img::ALICE/SMILE}} {{img::missing}}";
        let segments = render_segments(text, &entries);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], RenderSegment::Text("Hi ".to_string()));
        match &segments[1] {
            RenderSegment::Image { entry, placeholder, label } => {
                assert_eq!(entry.name, "alice/smile");
                assert_eq!(placeholder, "{{img::Alice/Smile}}");
                assert_eq!(label, "alice/smile");
            }
            other => panic!("expected image, got {:?}", other),
        }
        assert_eq!(
            segments[2],
            RenderSegment::Text(" and {{img::broken}} and  {{img::missing}}".to_string())
        );
    }

    #[test]
    fn test_revert_round_trips_rendered_text() {
        let entries = vec![ImageEntry::new("grin", "/grin.png")];
        let text = "A {{img::grin}} here, `{{img::grin}}` in code";
        let segments = render_segments(text, &entries);
        assert_eq!(revert_segments(&segments), text);
    }

    #[test]
    fn test_find_entry_by_normalized_name() {
        let entries = vec![ImageEntry::new("Big Smile", "/big.png")];
        assert!(find_entry_by_name(&entries, "big_smile").is_some());
        assert!(find_entry_by_name(&entries, "  BIG   smile ").is_some());
        assert!(find_entry_by_name(&entries, "smile").is_none());
    }
}

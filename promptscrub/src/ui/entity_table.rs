// promptscrub/src/ui/entity_table.rs
//! Renders detected entities as a table for `scan`.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use promptscrub_core::{PlaceholderMap, RedactionPolicy, ResolvedEntity};

/// Builds the table. The last column shows the placeholder an entity would
/// get, or why it would be left in place.
pub fn build_entity_table(
    entities: &[ResolvedEntity],
    placeholders: &PlaceholderMap,
    policy: &RedactionPolicy,
    supports_color: bool,
) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Text").add_attribute(Attribute::Bold),
            Cell::new("Confidence").add_attribute(Attribute::Bold),
            Cell::new("Replacement").add_attribute(Attribute::Bold),
        ]);
    if !supports_color {
        table.force_no_tty();
    }

    for entity in entities {
        let admitted = policy.admits(entity);
        let replacement = if admitted {
            Cell::new(placeholders.lookup(&entity.category))
        } else if entity.confidence < policy.min_confidence {
            Cell::new("(below threshold)")
        } else {
            Cell::new("(excluded)")
        };
        let replacement = if supports_color {
            replacement.fg(if admitted { Color::Green } else { Color::DarkGrey })
        } else {
            replacement
        };

        table.add_row(vec![
            Cell::new(&entity.category),
            Cell::new(&entity.text),
            Cell::new(format!("{:.2}", entity.confidence)).set_alignment(CellAlignment::Right),
            replacement,
        ]);
    }
    table
}

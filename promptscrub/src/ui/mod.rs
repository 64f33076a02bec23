// promptscrub/src/ui/mod.rs
//! Terminal output helpers: status messages and the entity table.

pub mod entity_table;
pub mod output_format;

//! List tables with sortable headers and per-row action links
//!
//! [`render_table`] renders the standard table of a [`RenderSpec`]: one
//! column per field, then either the spec's custom columns or the
//! show / edit / delete action cells. [`Table`] builds tables by hand.
//!
//! Entries are rendered in the order given; sorting happens before.

mod builder;

pub use builder::{Action, Table};

use crate::format::{RenderContext, RenderSpec};
use crate::model::Entity;
use crate::sort::SortSpec;

/// Render the standard list table for `entries`
///
/// Empty lists render the configured no-entries placeholder instead.
#[must_use]
pub fn render_table<E: Entity>(
    entries: &[E],
    spec: &RenderSpec<E>,
    sort: Option<&SortSpec>,
    ctx: &RenderContext,
) -> String {
    let mut table = spec
        .fields
        .iter()
        .cloned()
        .fold(Table::new(entries, ctx), Table::field)
        .sorted_by(sort)
        .formatting(spec);

    if spec.columns.is_empty() {
        table = table.action_cols();
    } else {
        table = spec.columns.iter().fold(table, Table::custom);
    }
    table.render()
}

//! Table builder with fluent column definitions

use std::sync::Arc;

use crate::format::{format_attr, CustomColumn, Formatter, RenderContext, RenderSpec};
use crate::model::{captionize, column, Entity, FieldDescriptor, FieldType};
use crate::sort::{indicator, next_dir, SortSpec};
use crate::template::helpers::{
    content_tag, escape_html, link_action_destroy, link_action_with_class, link_to, write_attr,
};

/// Standard per-row actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Link to the show page
    Show,
    /// Link to the edit form
    Edit,
    /// HTMX delete link with confirmation
    Destroy,
}

enum CellKind<E> {
    Attr(FieldDescriptor),
    Custom(Formatter<E>),
    Action(Action),
}

/// One table column: header plus cell renderer
struct Column<E> {
    header: String,
    sort_field: Option<String>,
    kind: CellKind<E>,
}

/// Builder for list tables
///
/// ```rust,ignore
/// let html = Table::new(&countries, &ctx)
///     .sorted_by(sort.as_ref())
///     .attrs(&["name", "code"])
///     .col("Cities", |c: &Country| c.cities.len().to_string())
///     .action_cols()
///     .render();
/// ```
pub struct Table<'a, E> {
    entries: &'a [E],
    ctx: &'a RenderContext,
    sort: Option<&'a SortSpec>,
    spec: RenderSpec<E>,
    columns: Vec<Column<E>>,
}

impl<'a, E: Entity> Table<'a, E> {
    /// A table without columns over `entries`
    #[must_use]
    pub fn new(entries: &'a [E], ctx: &'a RenderContext) -> Self {
        Self {
            entries,
            ctx,
            sort: None,
            spec: RenderSpec::with_fields(Vec::new()),
            columns: Vec::new(),
        }
    }

    /// Mark the current sort, for header links and indicators
    #[must_use]
    pub fn sorted_by(mut self, sort: Option<&'a SortSpec>) -> Self {
        self.sort = sort;
        self
    }

    /// Use the formatter overrides and no-link set of `spec` for attribute cells
    #[must_use]
    pub fn formatting(mut self, spec: &RenderSpec<E>) -> Self {
        self.spec.formatters.clone_from(&spec.formatters);
        self.spec.no_links.clone_from(&spec.no_links);
        self
    }

    /// Attribute column for a field of `E`; unknown names render as text
    #[must_use]
    pub fn attr(self, name: &str) -> Self {
        let field = column::<E>(name)
            .unwrap_or_else(|| FieldDescriptor::new(name, FieldType::String).unsortable());
        self.field(field)
    }

    /// Attribute columns for several fields
    #[must_use]
    pub fn attrs(self, names: &[&str]) -> Self {
        names.iter().fold(self, |table, name| table.attr(name))
    }

    /// Attribute column for a descriptor
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.columns.push(Column {
            header: captionize(&field.name),
            sort_field: field.sortable.then(|| field.name.clone()),
            kind: CellKind::Attr(field),
        });
        self
    }

    /// Custom column with a plain header
    #[must_use]
    pub fn col<F>(mut self, header: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.columns.push(Column {
            header: header.into(),
            sort_field: None,
            kind: CellKind::Custom(Arc::new(cell)),
        });
        self
    }

    /// Custom column whose header sorts by `field`
    #[must_use]
    pub fn sortable_col<F>(mut self, header: impl Into<String>, field: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.columns.push(Column {
            header: header.into(),
            sort_field: Some(field.into()),
            kind: CellKind::Custom(Arc::new(cell)),
        });
        self
    }

    /// Add a prepared custom column
    #[must_use]
    pub fn custom(mut self, column: &CustomColumn<E>) -> Self {
        self.columns.push(Column {
            header: column.header.clone(),
            sort_field: column.sort_field.clone(),
            kind: CellKind::Custom(Arc::clone(&column.cell)),
        });
        self
    }

    /// Single action column
    #[must_use]
    pub fn action_col(mut self, action: Action) -> Self {
        self.columns.push(Column {
            header: String::new(),
            sort_field: None,
            kind: CellKind::Action(action),
        });
        self
    }

    /// Show, edit and delete action columns
    #[must_use]
    pub fn action_cols(self) -> Self {
        self.action_col(Action::Show)
            .action_col(Action::Edit)
            .action_col(Action::Destroy)
    }

    /// Render the table, or the no-entries placeholder for an empty list
    #[must_use]
    pub fn render(&self) -> String {
        let table = &self.ctx.config.table;
        if self.entries.is_empty() {
            return content_tag(
                "div",
                &escape_html(&self.ctx.messages().no_entries),
                Some(&table.list_class),
            );
        }

        let mut html = String::with_capacity(256 * (self.entries.len() + 1));
        html.push_str("<table");
        write_attr(&mut html, "class", &table.list_class);
        html.push_str(">\n");

        html.push_str("<tr>");
        for column in &self.columns {
            html.push_str(&self.header_cell(column));
        }
        html.push_str("</tr>\n");

        for (index, entry) in self.entries.iter().enumerate() {
            html.push_str("<tr");
            if !table.row_classes.is_empty() {
                let class = &table.row_classes[index % table.row_classes.len()];
                write_attr(&mut html, "class", class);
            }
            html.push('>');
            for column in &self.columns {
                html.push_str(&self.body_cell(column, entry));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</table>");
        html
    }

    fn header_cell(&self, column: &Column<E>) -> String {
        let caption = escape_html(&column.header);
        let Some(ref field) = column.sort_field else {
            return format!("<th>{caption}</th>");
        };
        let routes = &self.ctx.routes;
        let href = routes.sorted_index_url(&self.ctx.scope, field, next_dir(self.sort, field));
        format!(
            "<th>{}{}</th>",
            link_to(&caption, &href),
            indicator(self.sort, field, &self.ctx.config.table)
        )
    }

    fn body_cell(&self, column: &Column<E>, entry: &E) -> String {
        match &column.kind {
            CellKind::Attr(field) => {
                format!("<td>{}</td>", format_attr(entry, field, &self.spec, self.ctx))
            }
            CellKind::Custom(cell) => format!("<td>{}</td>", cell(entry)),
            CellKind::Action(action) => {
                let class = &self.ctx.config.table.action_class;
                let mut cell = String::from("<td");
                write_attr(&mut cell, "class", class);
                cell.push('>');
                if let Some(id) = entry.id() {
                    cell.push_str(&self.action_link(*action, id));
                }
                cell.push_str("</td>");
                cell
            }
        }
    }

    fn action_link(&self, action: Action, id: i64) -> String {
        let routes = &self.ctx.routes;
        let scope = &self.ctx.scope;
        let class = &self.ctx.config.table.action_class;
        match action {
            Action::Show => link_action_with_class("Show", &routes.show_url(scope, id), class, &[]),
            Action::Edit => link_action_with_class("Edit", &routes.edit_url(scope, id), class, &[]),
            Action::Destroy => link_action_destroy(
                &routes.show_url(scope, id),
                class,
                &self.ctx.messages().confirm_delete,
            ),
        }
    }
}

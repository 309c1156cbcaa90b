//! Value formatting, render specifications and the render context
//!
//! Formatting is type driven: every [`FieldType`] has a default rendering,
//! and a [`RenderSpec`] can override single fields by name.
//!
//! ```rust
//! use acton_crud::config::MessageSettings;
//! use acton_crud::format::format_value;
//! use acton_crud::model::{FieldType, Value};
//!
//! let messages = MessageSettings::default();
//! assert_eq!(format_value(&Value::Float(2.5), &FieldType::Float, &messages), "2.50");
//! assert_eq!(format_value(&Value::Boolean(true), &FieldType::Boolean, &messages), "yes");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::sync::Arc;

use crate::config::{CrudConfig, MessageSettings};
use crate::model::{captionize, fields, Entity, FieldDescriptor, FieldType, Value};
use crate::routing::{ResourceRoutes, RouteTable, Scope};
use crate::template::helpers::{content_tag, escape_html, link_to, simple_format};

/// Renders a value of an entity as HTML
pub type Formatter<E> = Arc<dyn Fn(&E) -> String + Send + Sync>;

/// A caller-defined table column
pub struct CustomColumn<E> {
    /// Header caption (plain text)
    pub header: String,
    /// Field the header sorts by, if sortable
    pub sort_field: Option<String>,
    /// Cell renderer
    pub cell: Formatter<E>,
}

impl<E> Clone for CustomColumn<E> {
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            sort_field: self.sort_field.clone(),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<E> std::fmt::Debug for CustomColumn<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomColumn")
            .field("header", &self.header)
            .field("sort_field", &self.sort_field)
            .finish_non_exhaustive()
    }
}

/// What to render for an entity type: fields, custom columns, per-field
/// formatter overrides and associations that must not be linked
pub struct RenderSpec<E> {
    /// Fields in display order
    pub fields: Vec<FieldDescriptor>,
    /// Custom columns; when present they replace the default action cells
    pub columns: Vec<CustomColumn<E>>,
    /// Formatter overrides keyed by field name
    pub formatters: HashMap<String, Formatter<E>>,
    /// Association fields rendered as plain labels
    pub no_links: HashSet<String>,
}

impl<E> Clone for RenderSpec<E> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            columns: self.columns.clone(),
            formatters: self.formatters.clone(),
            no_links: self.no_links.clone(),
        }
    }
}

impl<E> std::fmt::Debug for RenderSpec<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderSpec")
            .field("fields", &self.fields)
            .field("columns", &self.columns)
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("no_links", &self.no_links)
            .finish()
    }
}

impl<E: Entity> Default for RenderSpec<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> RenderSpec<E> {
    /// All default fields of `E`
    #[must_use]
    pub fn new() -> Self {
        Self::with_fields(fields::<E>())
    }

    /// An explicit field list
    #[must_use]
    pub fn with_fields(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            columns: Vec::new(),
            formatters: HashMap::new(),
            no_links: HashSet::new(),
        }
    }

    /// Only the named fields, in the given order
    #[must_use]
    pub fn only(names: &[&str]) -> Self {
        Self::with_fields(crate::model::select_fields::<E>(names))
    }

    /// Override the rendering of one field
    #[must_use]
    pub fn format<F>(mut self, field: impl Into<String>, formatter: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.formatters.insert(field.into(), Arc::new(formatter));
        self
    }

    /// Add a custom column
    #[must_use]
    pub fn column<F>(mut self, header: impl Into<String>, cell: F) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.columns.push(CustomColumn {
            header: header.into(),
            sort_field: None,
            cell: Arc::new(cell),
        });
        self
    }

    /// Add a custom column whose header sorts by `field`
    #[must_use]
    pub fn sortable_column<F>(
        mut self,
        header: impl Into<String>,
        field: impl Into<String>,
        cell: F,
    ) -> Self
    where
        F: Fn(&E) -> String + Send + Sync + 'static,
    {
        self.columns.push(CustomColumn {
            header: header.into(),
            sort_field: Some(field.into()),
            cell: Arc::new(cell),
        });
        self
    }

    /// Render the association `field` as a plain label
    #[must_use]
    pub fn no_link(mut self, field: impl Into<String>) -> Self {
        self.no_links.insert(field.into());
        self
    }

    /// Names accepted as `sort` parameter
    #[must_use]
    pub fn sortable_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.sortable)
            .map(|f| f.name.clone())
            .chain(self.columns.iter().filter_map(|c| c.sort_field.clone()))
            .collect()
    }
}

/// Labels of associated entities available while rendering
///
/// Keyed by target resource name for belongs-to choices and by
/// `(target, owner id)` for has-many relations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationIndex {
    choices: HashMap<String, Vec<(i64, String)>>,
    related: HashMap<(String, i64), Vec<(i64, String)>>,
}

impl AssociationIndex {
    /// Empty index
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the selectable entities of a target resource
    #[must_use]
    pub fn with(mut self, target: impl Into<String>, choices: Vec<(i64, String)>) -> Self {
        self.insert(target, choices);
        self
    }

    /// Register the selectable entities of a target resource in place
    pub fn insert(&mut self, target: impl Into<String>, choices: Vec<(i64, String)>) {
        self.choices.insert(target.into(), choices);
    }

    /// Register the dependents of `owner_id` in `target`
    pub fn insert_related(
        &mut self,
        target: impl Into<String>,
        owner_id: i64,
        related: Vec<(i64, String)>,
    ) {
        self.related.insert((target.into(), owner_id), related);
    }

    /// Selectable entities of a target resource
    #[must_use]
    pub fn choices(&self, target: &str) -> Option<&[(i64, String)]> {
        self.choices.get(target).map(Vec::as_slice)
    }

    /// Label of `target/id`
    #[must_use]
    pub fn label(&self, target: &str, id: i64) -> Option<&str> {
        self.choices(target)?
            .iter()
            .find(|(choice_id, _)| *choice_id == id)
            .map(|(_, label)| label.as_str())
    }

    /// Dependents of `owner_id` in `target`
    #[must_use]
    pub fn related(&self, target: &str, owner_id: i64) -> Option<&[(i64, String)]> {
        self.related
            .get(&(target.to_string(), owner_id))
            .map(Vec::as_slice)
    }
}

/// Everything a renderer needs besides the entities themselves
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// Texts, classes and form settings
    pub config: Arc<CrudConfig>,
    /// URLs of the rendered resource
    pub routes: ResourceRoutes,
    /// Routed resources, for association links
    pub links: RouteTable,
    /// Nesting context
    pub scope: Scope,
    /// Labels of associated entities
    pub associations: AssociationIndex,
}

impl RenderContext {
    /// Context with default configuration at the root scope
    #[must_use]
    pub fn new(routes: ResourceRoutes) -> Self {
        Self {
            config: Arc::new(CrudConfig::default()),
            routes,
            links: RouteTable::default(),
            scope: Scope::root(),
            associations: AssociationIndex::default(),
        }
    }

    /// Use a specific configuration
    #[must_use]
    pub fn with_config(mut self, config: Arc<CrudConfig>) -> Self {
        self.config = config;
        self
    }

    /// Render within a nesting scope
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Use a route table for association links
    #[must_use]
    pub fn with_links(mut self, links: RouteTable) -> Self {
        self.links = links;
        self
    }

    /// Provide association labels
    #[must_use]
    pub fn with_associations(mut self, associations: AssociationIndex) -> Self {
        self.associations = associations;
        self
    }

    /// Configured messages
    #[must_use]
    pub fn messages(&self) -> &MessageSettings {
        &self.config.messages
    }
}

/// Format a single value according to its field type
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_value(value: &Value, field_type: &FieldType, messages: &MessageSettings) -> String {
    match (field_type, value) {
        (_, Value::Null) => String::new(),
        (FieldType::Text, Value::Text(s)) => simple_format(&escape_html(s)),
        (FieldType::Float, Value::Integer(v)) => format!("{:.2}", *v as f64),
        (_, Value::Float(v)) => format!("{v:.2}"),
        (_, Value::Integer(v)) => v.to_string(),
        (_, Value::Boolean(true)) => escape_html(&messages.yes),
        (_, Value::Boolean(false)) => escape_html(&messages.no),
        (_, Value::Date(d)) => d.format("%Y-%m-%d").to_string(),
        (_, Value::Time(t)) => t.format("%H:%M").to_string(),
        (_, Value::DateTime(dt)) => dt.format("%Y-%m-%d %H:%M").to_string(),
        (_, Value::Text(s)) => escape_html(s),
    }
}

/// Format one attribute of an entity
///
/// A formatter registered for the field wins. Associations render the
/// referenced entity's label, linked to its show page when possible.
/// Everything else goes through [`format_value`].
#[must_use]
pub fn format_attr<E: Entity>(
    entity: &E,
    field: &FieldDescriptor,
    spec: &RenderSpec<E>,
    ctx: &RenderContext,
) -> String {
    if let Some(formatter) = spec.formatters.get(&field.name) {
        return formatter(entity);
    }

    match field.field_type {
        FieldType::Association { target } => {
            format_association(entity.get(&field.name), target, &field.name, spec, ctx)
        }
        FieldType::Relation { target } => entity
            .id()
            .and_then(|id| ctx.associations.related(target, id))
            .map_or_else(
                || format_value(&entity.get(&field.name), &field.field_type, ctx.messages()),
                |related| format_relation(related, target, ctx),
            ),
        _ => format_value(&entity.get(&field.name), &field.field_type, ctx.messages()),
    }
}

fn format_association<E>(
    value: Value,
    target: &str,
    field: &str,
    spec: &RenderSpec<E>,
    ctx: &RenderContext,
) -> String {
    let Some(id) = value.as_i64() else {
        return escape_html(&ctx.messages().none);
    };
    let label = ctx
        .associations
        .label(target, id)
        .map_or_else(|| id.to_string(), ToString::to_string);
    let label = escape_html(&label);

    if spec.no_links.contains(field) {
        return label;
    }
    match ctx.links.show_url(target, id) {
        Some(href) => link_to(&label, &href),
        None => label,
    }
}

fn format_relation(related: &[(i64, String)], target: &str, ctx: &RenderContext) -> String {
    if related.is_empty() {
        return escape_html(&ctx.messages().none);
    }
    let mut html = String::from("<ul>");
    for (id, label) in related {
        let label = escape_html(label);
        let item = ctx
            .links
            .show_url(target, *id)
            .map_or_else(|| label.clone(), |href| link_to(&label, &href));
        let _ = write!(html, "<li>{item}</li>");
    }
    html.push_str("</ul>");
    html
}

/// Caption and value in the uniform labeled layout
#[must_use]
pub fn labeled(caption: &str, content: &str) -> String {
    let mut html = String::from(r#"<div class="labeled">"#);
    html.push_str(&content_tag("div", &escape_html(caption), Some("caption")));
    html.push_str(&content_tag("div", content, Some("value")));
    html.push_str("</div>");
    html
}

/// All fields of the spec as labeled caption / value pairs
#[must_use]
pub fn render_attrs<E: Entity>(entity: &E, spec: &RenderSpec<E>, ctx: &RenderContext) -> String {
    let body: String = spec
        .fields
        .iter()
        .map(|field| labeled(&captionize(&field.name), &format_attr(entity, field, spec, ctx)))
        .collect();
    content_tag("div", &body, Some("attributes"))
}

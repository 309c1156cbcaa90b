//! Form builder API with fluent interface
//!
//! Provides a builder pattern for constructing HTML forms with
//! HTMX integration and validation support.

use chrono::{Datelike, NaiveDate};

use super::error::ValidationErrors;
use super::field::{DateParts, FieldKind, FormField, InputType, SelectOption};
use super::render::FormRenderer;

/// Builder for constructing HTML forms
///
/// # Examples
///
/// ```rust
/// use acton_crud::forms::{FormBuilder, InputType};
///
/// let html = FormBuilder::new("/countries", "POST")
///     .id("country-form")
///     .field("country[name]", InputType::Text)
///         .label("Name")
///         .required()
///         .done()
///     .field("country[population]", InputType::Number)
///         .label("Population")
///         .done()
///     .submit("Save")
///     .build();
///
/// assert!(html.contains(r#"name="country[name]""#));
/// ```
#[derive(Debug, Clone)]
pub struct FormBuilder<'a> {
    /// Form action URL
    pub(crate) action: String,
    /// HTTP method
    pub(crate) method: String,
    /// Form ID
    pub(crate) id: Option<String>,
    /// CSS classes
    pub(crate) class: Option<String>,
    /// Form fields
    pub(crate) fields: Vec<FormField>,
    /// Submit button text
    pub(crate) submit_text: Option<String>,
    /// Validation errors
    pub(crate) errors: Option<&'a ValidationErrors>,
    /// Render a summary of all errors above the fields
    pub(crate) error_summary: bool,
    /// HTMX attributes
    pub(crate) htmx: HtmxFormAttrs,
    /// Custom attributes
    pub(crate) custom_attrs: Vec<(String, String)>,
}

/// HTMX attributes for the form element
#[derive(Debug, Clone, Default)]
pub struct HtmxFormAttrs {
    /// hx-post URL
    pub post: Option<String>,
    /// hx-target selector
    pub target: Option<String>,
    /// hx-swap strategy
    pub swap: Option<String>,
}

impl<'a> FormBuilder<'a> {
    /// Create a new form builder with action and method
    #[must_use]
    pub fn new(action: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: method.into(),
            id: None,
            class: None,
            fields: Vec::new(),
            submit_text: None,
            errors: None,
            error_summary: false,
            htmx: HtmxFormAttrs::default(),
            custom_attrs: Vec::new(),
        }
    }

    /// Set the form ID
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the form CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set validation errors to display
    #[must_use]
    pub const fn errors(mut self, errors: &'a ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Show all validation errors in a summary before the fields
    #[must_use]
    pub const fn error_summary(mut self) -> Self {
        self.error_summary = true;
        self
    }

    /// Set the submit button text
    #[must_use]
    pub fn submit(mut self, text: impl Into<String>) -> Self {
        self.submit_text = Some(text.into());
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Set hx-post attribute
    #[must_use]
    pub fn htmx_post(mut self, url: impl Into<String>) -> Self {
        self.htmx.post = Some(url.into());
        self
    }

    /// Set hx-target attribute
    #[must_use]
    pub fn htmx_target(mut self, selector: impl Into<String>) -> Self {
        self.htmx.target = Some(selector.into());
        self
    }

    /// Set hx-swap attribute
    #[must_use]
    pub fn htmx_swap(mut self, strategy: impl Into<String>) -> Self {
        self.htmx.swap = Some(strategy.into());
        self
    }

    /// Add an input field and return a field builder
    #[must_use]
    pub fn field(self, name: impl Into<String>, input_type: InputType) -> FieldBuilder<'a> {
        FieldBuilder::new(self, FormField::input(name, input_type))
    }

    /// Add a textarea field and return a field builder
    #[must_use]
    pub fn textarea(self, name: impl Into<String>) -> FieldBuilder<'a> {
        FieldBuilder::new(self, FormField::textarea(name))
    }

    /// Add a select field and return a field builder
    #[must_use]
    pub fn select(self, name: impl Into<String>) -> FieldBuilder<'a> {
        FieldBuilder::new(self, FormField::select(name))
    }

    /// Add a checkbox field and return a field builder
    #[must_use]
    pub fn checkbox(self, name: impl Into<String>) -> FieldBuilder<'a> {
        FieldBuilder::new(self, FormField::checkbox(name))
    }

    /// Add a year / month / day select group offering `years`
    #[must_use]
    pub fn date_select(self, name: impl Into<String>, years: (i32, i32)) -> FieldBuilder<'a> {
        FieldBuilder::new(self, FormField::date_select(name, years))
    }

    /// Add a hidden field
    #[must_use]
    pub fn hidden(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = FormField::input(name, InputType::Hidden);
        field.value = Some(value.into());
        self.fields.push(field);
        self
    }

    /// Build the form HTML
    #[must_use]
    pub fn build(self) -> String {
        FormRenderer::render(&self)
    }
}

/// Builder for a single field; kind-specific setters are ignored for
/// other kinds
pub struct FieldBuilder<'a> {
    form: FormBuilder<'a>,
    field: FormField,
}

impl<'a> FieldBuilder<'a> {
    const fn new(form: FormBuilder<'a>, field: FormField) -> Self {
        Self { form, field }
    }

    /// Set the field label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.field.label = Some(label.into());
        self
    }

    /// Set the current value
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.field.value = Some(value.into());
        self
    }

    /// Mark field as required
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.field.required = true;
        self
    }

    /// Set step value (for number inputs)
    #[must_use]
    pub fn step(mut self, value: impl Into<String>) -> Self {
        self.field.step = Some(value.into());
        self
    }

    /// Set CSS class
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.field.class = Some(class.into());
        self
    }

    /// Set element ID (overrides default which is the field name)
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.field.id = Some(id.into());
        self
    }

    /// Look up validation errors under `key` instead of the field name
    #[must_use]
    pub fn error_key(mut self, key: impl Into<String>) -> Self {
        self.field.error_key = Some(key.into());
        self
    }

    /// Set help text
    #[must_use]
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.field.help_text = Some(text.into());
        self
    }

    /// Add a custom attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.field.custom_attrs.push((name.into(), value.into()));
        self
    }

    /// Set number of textarea rows
    #[must_use]
    pub const fn rows(mut self, rows: u32) -> Self {
        if let FieldKind::Textarea { rows: ref mut r } = self.field.kind {
            *r = Some(rows);
        }
        self
    }

    /// Add a select option
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        if let FieldKind::Select { ref mut options } = self.field.kind {
            options.push(SelectOption::new(value, label));
        }
        self
    }

    /// Add an empty select option before the current ones
    #[must_use]
    pub fn include_blank(mut self) -> Self {
        if let FieldKind::Select { ref mut options } = self.field.kind {
            options.insert(0, SelectOption::blank());
        }
        self
    }

    /// Set the checkbox state
    #[must_use]
    pub const fn checked(mut self, checked: bool) -> Self {
        if let FieldKind::Checkbox { checked: ref mut c } = self.field.kind {
            *c = checked;
        }
        self
    }

    /// Preselect a date in a date select group
    #[must_use]
    pub fn selected_date(mut self, date: Option<NaiveDate>) -> Self {
        if let FieldKind::DateSelect {
            ref mut selected, ..
        } = self.field.kind
        {
            *selected = date.map_or_else(DateParts::default, |d| DateParts {
                year: Some(d.year()),
                month: Some(d.month()),
                day: Some(d.day()),
            });
        }
        self
    }

    /// Finish building this field and return to form builder
    #[must_use]
    pub fn done(mut self) -> FormBuilder<'a> {
        self.form.fields.push(self.field);
        self.form
    }
}

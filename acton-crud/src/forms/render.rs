//! Form rendering to HTML
//!
//! Renders form builders to HTML strings with proper escaping
//! and validation error display.

use std::fmt::Write;

use super::builder::FormBuilder;
use super::error::ValidationErrors;
use super::field::{DateParts, FieldKind, FormField, InputType, SelectOption};
use crate::template::helpers::{escape_attr, escape_html, write_attr};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Options for customizing form rendering
#[derive(Debug, Clone)]
pub struct FormRenderOptions {
    /// CSS class for form groups (wrapper around label + input + errors)
    pub group_class: String,
    /// CSS class for labels
    pub label_class: String,
    /// CSS class for input elements
    pub input_class: String,
    /// CSS class for error messages
    pub error_class: String,
    /// CSS class for help text
    pub help_class: String,
    /// CSS class for submit button
    pub submit_class: String,
    /// CSS class applied to inputs with errors
    pub input_error_class: String,
    /// CSS class of the error summary
    pub summary_class: String,
}

impl Default for FormRenderOptions {
    fn default() -> Self {
        Self {
            group_class: "form-group".into(),
            label_class: "form-label".into(),
            input_class: "form-input".into(),
            error_class: "form-error".into(),
            help_class: "form-help".into(),
            submit_class: "form-submit".into(),
            input_error_class: "form-input-error".into(),
            summary_class: "validation-errors".into(),
        }
    }
}

/// Renders forms to HTML
pub struct FormRenderer;

impl FormRenderer {
    /// Render a form to HTML string
    #[must_use]
    pub fn render(form: &FormBuilder<'_>) -> String {
        Self::render_with_options(form, &FormRenderOptions::default())
    }

    /// Render a form with custom options
    #[must_use]
    pub fn render_with_options(form: &FormBuilder<'_>, options: &FormRenderOptions) -> String {
        let mut html = String::with_capacity(1024);

        html.push_str("<form");
        write_attr(&mut html, "action", &form.action);
        write_attr(&mut html, "method", &form.method);
        if let Some(ref id) = form.id {
            write_attr(&mut html, "id", id);
        }
        if let Some(ref class) = form.class {
            write_attr(&mut html, "class", class);
        }
        Self::write_htmx_form_attrs(&mut html, form);
        for (name, value) in &form.custom_attrs {
            write_attr(&mut html, name, value);
        }
        html.push_str(">\n");

        if form.error_summary {
            if let Some(errors) = form.errors.filter(|e| e.has_errors()) {
                html.push_str(&Self::render_error_summary(errors, options));
            }
        }

        for field in &form.fields {
            html.push_str(&Self::render_field(field, form.errors, options));
        }

        if let Some(ref text) = form.submit_text {
            let _ = writeln!(
                html,
                r#"  <button type="submit" class="{}">{}</button>"#,
                escape_attr(&options.submit_class),
                escape_html(text)
            );
        }

        html.push_str("</form>");
        html
    }

    /// Summary of every error, captionized, before the fields
    fn render_error_summary(errors: &ValidationErrors, options: &FormRenderOptions) -> String {
        let count = errors.count();
        let mut html = String::with_capacity(256);
        let _ = writeln!(html, r#"  <div class="{}">"#, escape_attr(&options.summary_class));
        let _ = writeln!(
            html,
            "    <h2>{count} {} prohibited this entry from being saved</h2>",
            if count == 1 { "error" } else { "errors" }
        );
        html.push_str("    <ul>\n");
        for message in errors.full_messages() {
            let _ = writeln!(html, "      <li>{}</li>", escape_html(&message));
        }
        html.push_str("    </ul>\n  </div>\n");
        html
    }

    fn render_field(
        field: &FormField,
        errors: Option<&ValidationErrors>,
        options: &FormRenderOptions,
    ) -> String {
        if field.is_hidden() {
            return Self::render_input(field, InputType::Hidden, false, options);
        }

        let mut html = String::with_capacity(256);
        let field_errors = errors.map_or(&[][..], |e| e.for_field(field.effective_error_key()));
        let has_errors = !field_errors.is_empty();

        let _ = writeln!(html, r#"  <div class="{}">"#, options.group_class);

        // Checkbox labels follow the input
        if let Some(ref label) = field.label {
            if !field.is_checkbox() {
                let _ = writeln!(
                    html,
                    r#"    <label for="{}" class="{}">{}</label>"#,
                    escape_attr(&Self::label_target(field)),
                    options.label_class,
                    escape_html(label)
                );
            }
        }

        let input_html = match &field.kind {
            FieldKind::Input(input_type) => {
                Self::render_input(field, *input_type, has_errors, options)
            }
            FieldKind::Textarea { rows } => Self::render_textarea(field, *rows, has_errors, options),
            FieldKind::Select { options: opts } => {
                Self::render_select(field, opts, has_errors, options)
            }
            FieldKind::Checkbox { checked } => {
                Self::render_checkbox(field, *checked, has_errors, options)
            }
            FieldKind::DateSelect { selected, years } => {
                Self::render_date_select(field, *selected, *years, has_errors, options)
            }
        };
        html.push_str(&input_html);

        if field.is_checkbox() {
            if let Some(ref label) = field.label {
                let _ = write!(
                    html,
                    r#" <label for="{}" class="{}">{}</label>"#,
                    escape_attr(field.effective_id()),
                    options.label_class,
                    escape_html(label)
                );
            }
            html.push('\n');
        }

        for error in field_errors {
            let _ = writeln!(
                html,
                r#"    <span class="{}">{}</span>"#,
                options.error_class,
                escape_html(&error.message)
            );
        }

        if let Some(ref help) = field.help_text {
            let _ = writeln!(
                html,
                r#"    <span class="{}">{}</span>"#,
                options.help_class,
                escape_html(help)
            );
        }

        html.push_str("  </div>\n");
        html
    }

    fn render_input(
        field: &FormField,
        input_type: InputType,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(128);

        let indent = if input_type == InputType::Hidden {
            "  "
        } else {
            "    "
        };
        html.push_str(indent);
        html.push_str("<input");
        write_attr(&mut html, "type", input_type.as_str());
        write_attr(&mut html, "name", &field.name);
        if input_type != InputType::Hidden {
            write_attr(&mut html, "id", field.effective_id());
            let class = Self::build_input_class(field, has_errors, options);
            write_attr(&mut html, "class", &class);
        }
        if let Some(ref value) = field.value {
            write_attr(&mut html, "value", value);
        }
        if field.required {
            html.push_str(" required");
        }
        if let Some(ref step) = field.step {
            write_attr(&mut html, "step", step);
        }
        for (name, value) in &field.custom_attrs {
            write_attr(&mut html, name, value);
        }
        html.push_str(">\n");
        html
    }

    fn render_textarea(
        field: &FormField,
        rows: Option<u32>,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(128);

        html.push_str("    <textarea");
        write_attr(&mut html, "name", &field.name);
        write_attr(&mut html, "id", field.effective_id());
        write_attr(
            &mut html,
            "class",
            &Self::build_input_class(field, has_errors, options),
        );
        if let Some(r) = rows {
            write_attr(&mut html, "rows", &r.to_string());
        }
        if field.required {
            html.push_str(" required");
        }
        for (name, value) in &field.custom_attrs {
            write_attr(&mut html, name, value);
        }

        html.push('>');
        if let Some(ref value) = field.value {
            html.push_str(&escape_html(value));
        }
        html.push_str("</textarea>\n");
        html
    }

    fn render_select(
        field: &FormField,
        opts: &[SelectOption],
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(256);

        html.push_str("    <select");
        write_attr(&mut html, "name", &field.name);
        write_attr(&mut html, "id", field.effective_id());
        write_attr(
            &mut html,
            "class",
            &Self::build_input_class(field, has_errors, options),
        );
        if field.required {
            html.push_str(" required");
        }
        for (name, value) in &field.custom_attrs {
            write_attr(&mut html, name, value);
        }
        html.push_str(">\n");

        let selected = field.value.as_deref().unwrap_or_default();
        for opt in opts {
            Self::write_option(&mut html, &opt.value, &opt.label, opt.value == selected);
        }

        html.push_str("    </select>\n");
        html
    }

    fn render_checkbox(
        field: &FormField,
        checked: bool,
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let mut html = String::with_capacity(192);

        html.push_str("    <input");
        write_attr(&mut html, "type", "hidden");
        write_attr(&mut html, "name", &field.name);
        write_attr(&mut html, "value", "false");
        html.push('>');

        html.push_str("<input");
        write_attr(&mut html, "type", "checkbox");
        write_attr(&mut html, "name", &field.name);
        write_attr(&mut html, "id", field.effective_id());
        write_attr(
            &mut html,
            "class",
            &Self::build_input_class(field, has_errors, options),
        );
        write_attr(&mut html, "value", field.value.as_deref().unwrap_or("true"));
        if checked {
            html.push_str(" checked");
        }
        html.push('>');
        html
    }

    fn render_date_select(
        field: &FormField,
        selected: DateParts,
        (first_year, last_year): (i32, i32),
        has_errors: bool,
        options: &FormRenderOptions,
    ) -> String {
        let class = Self::build_input_class(field, has_errors, options);
        let mut html = String::with_capacity(4096);

        // the stored year must stay selectable even outside the configured window
        let (first_year, last_year) = selected.year.map_or((first_year, last_year), |year| {
            (first_year.min(year), last_year.max(year))
        });
        let years: Vec<(String, String)> = (first_year..=last_year)
            .map(|y| (y.to_string(), y.to_string()))
            .collect();
        let months: Vec<(String, String)> = MONTHS
            .iter()
            .zip(1u32..)
            .map(|(name, m)| (m.to_string(), (*name).to_string()))
            .collect();
        let days: Vec<(String, String)> = (1u32..=31).map(|d| (d.to_string(), d.to_string())).collect();

        let parts = [
            (1, years, selected.year.map(|y| y.to_string())),
            (2, months, selected.month.map(|m| m.to_string())),
            (3, days, selected.day.map(|d| d.to_string())),
        ];

        for (index, choices, current) in parts {
            html.push_str("    <select");
            write_attr(&mut html, "name", &date_part_name(&field.name, index));
            write_attr(&mut html, "id", &format!("{}_{index}i", field.effective_id()));
            write_attr(&mut html, "class", &class);
            html.push_str(">\n");
            Self::write_option(&mut html, "", "", current.is_none());
            for (value, label) in &choices {
                Self::write_option(&mut html, value, label, current.as_deref() == Some(value.as_str()));
            }
            html.push_str("    </select>\n");
        }
        html
    }

    fn write_option(html: &mut String, value: &str, label: &str, selected: bool) {
        html.push_str("      <option");
        write_attr(html, "value", value);
        if selected {
            html.push_str(" selected");
        }
        let _ = writeln!(html, ">{}</option>", escape_html(label));
    }

    /// Date select groups have no element with the plain id; labels point at the year
    fn label_target(field: &FormField) -> String {
        match field.kind {
            FieldKind::DateSelect { .. } => format!("{}_1i", field.effective_id()),
            _ => field.effective_id().to_string(),
        }
    }

    fn build_input_class(field: &FormField, has_errors: bool, options: &FormRenderOptions) -> String {
        let mut classes = vec![options.input_class.as_str()];
        if let Some(ref class) = field.class {
            classes.push(class.as_str());
        }
        if has_errors {
            classes.push(options.input_error_class.as_str());
        }
        classes.join(" ")
    }

    fn write_htmx_form_attrs(html: &mut String, form: &FormBuilder<'_>) {
        if let Some(ref url) = form.htmx.post {
            write_attr(html, "hx-post", url);
        }
        if let Some(ref selector) = form.htmx.target {
            write_attr(html, "hx-target", selector);
        }
        if let Some(ref strategy) = form.htmx.swap {
            write_attr(html, "hx-swap", strategy);
        }
    }
}

/// `person[birthdate]` becomes `person[birthdate(1i)]`, `birthdate` becomes `birthdate(1i)`
fn date_part_name(name: &str, index: u8) -> String {
    name.strip_suffix(']').map_or_else(
        || format!("{name}({index}i)"),
        |inner| format!("{inner}({index}i)]"),
    )
}

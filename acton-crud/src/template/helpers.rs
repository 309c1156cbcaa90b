//! HTML helper functions shared by the table, form and page renderers
//!
//! ```rust
//! use acton_crud::template::helpers::*;
//!
//! let link = link_action("Edit", "/countries/1/edit", &[]);
//! assert_eq!(link, r#"<a href="/countries/1/edit" class="action">[Edit]</a>"#);
//! ```

use std::fmt::Write;

/// Escape a string for use in HTML content
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a string for use in HTML attribute values
#[must_use]
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Append ` name="value"` to `html`, escaping the value
pub fn write_attr(html: &mut String, name: &str, value: &str) {
    let _ = write!(html, r#" {name}="{}""#, escape_attr(value));
}

/// Wrap already-escaped content in a tag
///
/// # Examples
///
/// ```rust
/// use acton_crud::template::helpers::content_tag;
///
/// assert_eq!(content_tag("span", "42", None), "<span>42</span>");
/// assert_eq!(content_tag("div", "x", Some("list")), r#"<div class="list">x</div>"#);
/// ```
#[must_use]
pub fn content_tag(tag: &str, content: &str, class: Option<&str>) -> String {
    let mut html = format!("<{tag}");
    if let Some(class) = class {
        write_attr(&mut html, "class", class);
    }
    let _ = write!(html, ">{content}</{tag}>");
    html
}

/// Plain hyperlink around already-escaped content
#[must_use]
pub fn link_to(content: &str, href: &str) -> String {
    format!(r#"<a href="{}">{content}</a>"#, escape_attr(href))
}

/// Action link styled as a button: `[Label]` with class `action`
///
/// Extra attributes are written after the class.
#[must_use]
pub fn link_action(label: &str, href: &str, attrs: &[(&str, &str)]) -> String {
    link_action_with_class(label, href, "action", attrs)
}

/// Action link with an explicit CSS class
#[must_use]
pub fn link_action_with_class(
    label: &str,
    href: &str,
    class: &str,
    attrs: &[(&str, &str)],
) -> String {
    let mut html = String::from("<a");
    write_attr(&mut html, "href", href);
    write_attr(&mut html, "class", class);
    for (name, value) in attrs {
        write_attr(&mut html, name, value);
    }
    let _ = write!(html, ">[{}]</a>", escape_html(label));
    html
}

/// Delete action link issuing an HTMX `DELETE` after a confirmation prompt
#[must_use]
pub fn link_action_destroy(href: &str, class: &str, confirm: &str) -> String {
    link_action_with_class(
        "Delete",
        href,
        class,
        &[("hx-delete", href), ("hx-confirm", confirm)],
    )
}

/// Turn plain text into paragraphs: blank lines split paragraphs, single
/// newlines become `<br />`. The input must already be escaped.
///
/// # Examples
///
/// ```rust
/// use acton_crud::template::helpers::simple_format;
///
/// assert_eq!(simple_format("a\nb\n\nc"), "<p>a\n<br />b</p>\n\n<p>c</p>");
/// ```
#[must_use]
pub fn simple_format(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(|p| p.trim_matches('\n'))
        .filter(|p| !p.is_empty())
        .map(|p| format!("<p>{}</p>", p.replace('\n', "\n<br />")))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// HTML-safe string wrapper
///
/// Marks a string as safe for direct HTML output (already escaped).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeString(pub String);

impl SafeString {
    /// Create a new `SafeString`
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Borrow the markup
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SafeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SafeString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

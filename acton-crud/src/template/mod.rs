//! Page templates and HTML helpers
//!
//! Controller pages are rendered in two steps: the page [`Fragment`]
//! (heading, flash message, body) and the surrounding [`Layout`]. HTMX
//! requests only receive the fragment.

pub mod helpers;

use askama::Template;

/// Page content without the document shell
#[derive(Template)]
#[template(path = "crud/fragment.html")]
pub struct Fragment<'a> {
    /// Page heading
    pub title: &'a str,
    /// Flash CSS modifier (`notice` or `alert`)
    pub flash_kind: &'a str,
    /// Flash text, empty when there is none
    pub flash_message: &'a str,
    /// Rendered page body (already escaped)
    pub body: &'a str,
}

/// Full HTML document around a rendered fragment
#[derive(Template)]
#[template(path = "crud/layout.html")]
pub struct Layout<'a> {
    /// Document title
    pub title: &'a str,
    /// Rendered [`Fragment`]
    pub fragment: &'a str,
}

/// Render a page, optionally without the document shell
pub fn render_page(
    title: &str,
    flash: Option<(&str, &str)>,
    body: &str,
    fragment_only: bool,
) -> Result<String, askama::Error> {
    let (flash_kind, flash_message) = flash.unwrap_or(("", ""));
    let fragment = Fragment {
        title,
        flash_kind,
        flash_message,
        body,
    }
    .render()?;

    if fragment_only {
        return Ok(fragment);
    }
    Layout {
        title,
        fragment: &fragment,
    }
    .render()
}

//! Form building, rendering and validation errors
//!
//! Two layers:
//! - [`FormBuilder`] / [`FormRenderer`]: a fluent, escaping HTML form
//!   builder with HTMX attributes and per-field error display
//! - [`render_form`]: the generic form of an [`Entity`](crate::model::Entity),
//!   one control per field chosen by its type
//!
//! # Quick Start
//!
//! ```rust
//! use acton_crud::forms::{FormBuilder, InputType};
//!
//! let form = FormBuilder::new("/countries", "post")
//!     .field("country[name]", InputType::Text)
//!         .label("Name")
//!         .required()
//!         .done()
//!     .checkbox("country[member]")
//!         .label("Member")
//!         .checked(true)
//!         .done()
//!     .submit("Save")
//!     .htmx_post("/countries")
//!     .htmx_target("#content")
//!     .build();
//!
//! assert!(form.contains(r#"hx-post="/countries""#));
//! ```
//!
//! # Validation Errors
//!
//! ```rust
//! use acton_crud::forms::{FormBuilder, InputType, ValidationErrors};
//!
//! let mut errors = ValidationErrors::new();
//! errors.add("country[name]", "can't be blank");
//!
//! let form = FormBuilder::new("/countries", "post")
//!     .errors(&errors)
//!     .field("country[name]", InputType::Text)
//!         .label("Name")
//!         .done()
//!     .build();
//!
//! assert!(form.contains("can't be blank"));
//! ```

mod builder;
mod entity_form;
mod error;
mod field;
mod render;

pub use builder::{FieldBuilder, FormBuilder, HtmxFormAttrs};
pub use entity_form::{form_action, render_form};
pub use error::{FieldError, ValidationErrors};
pub use field::{DateParts, FieldKind, FormField, InputType, SelectOption};
pub use render::{FormRenderOptions, FormRenderer};

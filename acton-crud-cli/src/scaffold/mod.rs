//! CRUD scaffold generator
//!
//! Transforms a model name and field specifications into an entity module,
//! a controller router and HTTP tests built on `acton-crud`.

pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use field_type::{FieldDefinition, FieldType};
pub use generator::{GeneratedFile, ScaffoldGenerator};
pub use helpers::TemplateHelpers;

//! Entity model: typed attribute values, field descriptors and the
//! [`Entity`] trait every CRUD resource implements.
//!
//! Column metadata is declared once per entity type via
//! [`Entity::columns`] and drives tables, forms, sorting and JSON output.

mod entity;
mod field;
mod value;

pub use entity::{
    assign_params, captionize, column, fields, nested_params, select_fields, to_json, Entity,
    ID_FIELD,
};
pub use field::{FieldDescriptor, FieldType};
pub use value::Value;

//! acton-crud CLI library
//!
//! The scaffold generator behind `acton-crud scaffold crud`, usable without
//! the binary.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod scaffold;

pub use commands::ScaffoldCommand;
pub use scaffold::{FieldDefinition, FieldType, GeneratedFile, ScaffoldGenerator, TemplateHelpers};

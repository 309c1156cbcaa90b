//! CRUD tables, forms and controllers for axum + HTMX applications
//!
//! Describe an entity once through the [`Entity`](model::Entity) trait and
//! get list tables with sortable headers, detail pages, generic forms and a
//! complete controller with nested-resource support.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use acton_crud::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_crud::observability::init()?;
//!     let config = std::sync::Arc::new(CrudConfig::load()?);
//!
//!     let app = CrudController::new(InMemoryRepository::<Country>::new())
//!         .with_config(config)
//!         .order_by(SortSpec::asc("code"))
//!         .router();
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`model`]: entities, field descriptors and typed values
//! - [`format`]: value formatting and render specs
//! - [`table`]: list tables
//! - [`forms`]: form builder and entity forms
//! - [`persistence`]: repository interface and in-memory implementation
//! - [`controller`]: the CRUD actions and their router

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod forms;
pub mod model;
pub mod observability;
pub mod persistence;
pub mod routing;
pub mod sort;
pub mod table;
pub mod template;

#[cfg(test)]
mod testing;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_crud::prelude::*;
    //! ```

    pub use crate::config::CrudConfig;
    pub use crate::controller::{CrudController, CrudResponse, Flash};
    pub use crate::error::CrudError;
    pub use crate::format::{
        format_attr, format_value, labeled, render_attrs, AssociationIndex, RenderContext,
        RenderSpec,
    };
    pub use crate::forms::{
        form_action, render_form, FormBuilder, FormRenderer, InputType, ValidationErrors,
    };
    pub use crate::model::{Entity, FieldDescriptor, FieldType, Value};
    pub use crate::persistence::{
        Associations, ChoiceSource, InMemoryRepository, ListQuery, Repository,
        StaticChoices,
    };
    pub use crate::routing::{ResourceRoutes, RouteTable, Scope};
    pub use crate::sort::{SortDir, SortParams, SortSpec};
    pub use crate::table::{render_table, Action, Table};

    pub use async_trait::async_trait;
    pub use axum;
    pub use validator;
}

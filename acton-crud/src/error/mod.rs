//! Error types and error handling

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

use crate::forms::ValidationErrors;
use crate::template::helpers::escape_html;

/// Framework error type
#[derive(Debug, Error)]
pub enum CrudError {
    /// No entity with this id exists (within the current scope)
    #[error("Not found: {resource} #{id}")]
    NotFound {
        /// Resource name (e.g. `cities`)
        resource: String,
        /// Requested identifier
        id: i64,
    },

    /// The entity failed validation; nothing was persisted
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Deletion refused because dependent records reference the entity
    #[error("Cannot delete {resource} #{id}: {count} dependent record(s) exist")]
    HasDependents {
        /// Resource name of the entity being deleted
        resource: String,
        /// Identifier of the entity being deleted
        id: i64,
        /// Number of dependent records found
        count: usize,
    },

    /// An association field was rendered without a collection to choose from
    #[error("No collection available for association field '{field}'")]
    MissingAssociation {
        /// Name of the association field
        field: String,
    },

    /// Storage backend failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Page template failed to render
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

impl CrudError {
    /// HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::HasDependents { .. } => StatusCode::CONFLICT,
            Self::MissingAssociation { .. }
            | Self::Persistence(_)
            | Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = format!(
            r#"<div class="error"><h1>{}</h1><p>{}</p></div>"#,
            status.canonical_reason().unwrap_or("Error"),
            escape_html(&self.to_string())
        );
        (status, Html(body)).into_response()
    }
}

//! The CRUD controller convention
//!
//! A [`CrudController`] implements the seven actions of a resource on top of
//! a [`Repository`]: `index`, `show`, `new_form`, `create`, `edit`, `update`
//! and `destroy`. Actions return a [`CrudResponse`] that the router turns
//! into an HTTP response (full page, HTMX fragment or redirect).
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_crud::prelude::*;
//!
//! let countries = InMemoryRepository::<Country>::new();
//! let cities = InMemoryRepository::<City>::new();
//!
//! let app = axum::Router::new()
//!     .merge(CrudController::new(countries.clone()).router())
//!     .merge(
//!         CrudController::new(cities.clone())
//!             .nested_in("countries", "country_id")
//!             .order_by(SortSpec::asc("name"))
//!             .router(),
//!     );
//! ```

mod flash;
mod router;

use std::sync::Arc;

use axum::http::StatusCode;
use inflector::Inflector;

pub use flash::{clear_flash, Flash, FLASH_COOKIE_NAME};

use crate::config::CrudConfig;
use crate::error::CrudError;
use crate::format::{render_attrs, RenderContext, RenderSpec};
use crate::forms::{form_action, render_form, ValidationErrors};
use crate::model::{assign_params, to_json, Entity, FieldDescriptor, Value};
use crate::persistence::{Associations, ListQuery, Repository};
use crate::routing::{ResourceRoutes, RouteTable, Scope};
use crate::sort::{SortParams, SortSpec};
use crate::table::render_table;
use crate::template::helpers::{link_action, link_action_destroy};

/// Result of a controller action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudResponse {
    /// A rendered page
    Page {
        /// Page heading and document title
        title: String,
        /// Rendered body markup
        body: String,
        /// HTTP status
        status: StatusCode,
    },
    /// Redirect after a state change, with an optional flash
    Redirect {
        /// Target URL
        location: String,
        /// Message for the next page
        flash: Option<Flash>,
    },
}

impl CrudResponse {
    fn page(title: impl Into<String>, body: String) -> Self {
        Self::Page {
            title: title.into(),
            body,
            status: StatusCode::OK,
        }
    }

    const fn redirect(location: String, flash: Option<Flash>) -> Self {
        Self::Redirect { location, flash }
    }
}

/// Parent resource of a nested controller
#[derive(Debug, Clone, PartialEq, Eq)]
struct Nesting {
    resource: String,
    foreign_key: String,
}

/// Controller for the resource `E` stored in `R`
pub struct CrudController<E: Entity, R> {
    repo: Arc<R>,
    routes: ResourceRoutes,
    nesting: Option<Nesting>,
    default_order: Vec<SortSpec>,
    spec: RenderSpec<E>,
    links: RouteTable,
    associations: Associations,
    config: Arc<CrudConfig>,
    show_redirects_to_index: bool,
}

impl<E: Entity, R: Repository<E>> CrudController<E, R> {
    /// Top-level controller with default configuration
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self::with_shared(Arc::new(repo))
    }

    /// Controller over a repository shared with other code
    #[must_use]
    pub fn with_shared(repo: Arc<R>) -> Self {
        Self {
            repo,
            routes: ResourceRoutes::new(E::RESOURCE),
            nesting: None,
            default_order: Vec::new(),
            spec: RenderSpec::new(),
            links: RouteTable::new("").with(E::RESOURCE),
            associations: Associations::new(),
            config: Arc::new(CrudConfig::default()),
            show_redirects_to_index: false,
        }
    }

    /// Use `config`; URLs are generated below its mount prefix
    #[must_use]
    pub fn with_config(mut self, config: Arc<CrudConfig>) -> Self {
        self.routes = ResourceRoutes::new(E::RESOURCE).with_mount(config.routes.mount.clone());
        self.config = config;
        self
    }

    /// Nest below `parent_resource`, scoping everything by `foreign_key`
    #[must_use]
    pub fn nested_in(mut self, parent_resource: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        self.nesting = Some(Nesting {
            resource: parent_resource.into(),
            foreign_key: foreign_key.into(),
        });
        self
    }

    /// Append a default sort key, applied after the requested sort
    #[must_use]
    pub fn order_by(mut self, spec: SortSpec) -> Self {
        self.default_order.push(spec);
        self
    }

    /// Fields and formatters of tables, detail pages and forms
    #[must_use]
    pub fn with_spec(mut self, spec: RenderSpec<E>) -> Self {
        self.spec = spec;
        self
    }

    /// Resources whose show pages association values link to
    #[must_use]
    pub fn with_links(mut self, links: RouteTable) -> Self {
        self.links = links;
        self
    }

    /// Choice sources of the associations referenced by the fields
    #[must_use]
    pub fn with_associations(mut self, associations: Associations) -> Self {
        self.associations = associations;
        self
    }

    /// Answer HTML `show` requests with a redirect to the list
    #[must_use]
    pub const fn redirect_show_to_index(mut self) -> Self {
        self.show_redirects_to_index = true;
        self
    }

    /// The underlying repository
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// URLs of the resource
    #[must_use]
    pub const fn routes(&self) -> &ResourceRoutes {
        &self.routes
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &CrudConfig {
        &self.config
    }

    /// Scope of a request with the given parent id
    #[must_use]
    pub fn scope(&self, parent_id: Option<i64>) -> Scope {
        match (&self.nesting, parent_id) {
            (Some(nesting), Some(id)) => Scope::nested(nesting.resource.clone(), id),
            _ => Scope::root(),
        }
    }

    /// List the entities of the scope, sorted by request then default order
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] for an unknown parent and propagates
    /// persistence errors.
    pub async fn index(&self, scope: &Scope, params: &SortParams) -> Result<CrudResponse, CrudError> {
        self.ensure_parent(scope).await?;
        let spec = self.list_spec();
        let sort = SortSpec::from_params(params, &spec.sortable_fields());

        let mut query = self.scoped_query(scope);
        query.order = sort.iter().chain(&self.default_order).cloned().collect();
        let entries = self.repo.list(&query).await?;

        let owners: Vec<i64> = entries.iter().filter_map(Entity::id).collect();
        let ctx = self.context(scope, &spec.fields, &owners).await?;

        let mut body = render_table(&entries, &spec, sort.as_ref(), &ctx);
        body.push_str("\n<p>");
        body.push_str(&link_action("New", &self.routes.new_url(scope), &[]));
        body.push_str("</p>");

        tracing::debug!(resource = E::RESOURCE, count = entries.len(), sort = ?sort, "index");
        Ok(CrudResponse::page(E::RESOURCE.to_title_case(), body))
    }

    /// Detail page of one entity
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] when the entity is not in the scope.
    pub async fn show(&self, scope: &Scope, id: i64) -> Result<CrudResponse, CrudError> {
        let entity = self.load(scope, id).await?;
        if self.show_redirects_to_index {
            return Ok(CrudResponse::redirect(self.routes.index_url(scope), None));
        }

        let spec = self.list_spec();
        let ctx = self.context(scope, &spec.fields, &[id]).await?;

        let mut body = render_attrs(&entity, &spec, &ctx);
        body.push_str("\n<p>");
        body.push_str(&link_action("Edit", &self.routes.edit_url(scope, id), &[]));
        body.push(' ');
        body.push_str(&link_action_destroy(
            &self.routes.show_url(scope, id),
            &self.config.table.action_class,
            &self.config.messages.confirm_delete,
        ));
        body.push(' ');
        body.push_str(&link_action("List", &self.routes.index_url(scope), &[]));
        body.push_str("</p>");

        Ok(CrudResponse::page(entity.label(), body))
    }

    /// One entity as JSON
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] when the entity is not in the scope.
    pub async fn show_json(&self, scope: &Scope, id: i64) -> Result<serde_json::Value, CrudError> {
        let entity = self.load(scope, id).await?;
        Ok(to_json(&entity))
    }

    /// Form for a new entity, with the parent key preset
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] for an unknown parent and
    /// [`CrudError::MissingAssociation`] when a select has no choices.
    pub async fn new_form(&self, scope: &Scope) -> Result<CrudResponse, CrudError> {
        self.ensure_parent(scope).await?;
        let mut entity = E::default();
        self.assign_scope(&mut entity, scope);
        self.form_page(scope, &entity, &ValidationErrors::new(), StatusCode::OK)
            .await
    }

    /// Create an entity from submitted form parameters
    ///
    /// Invalid input re-renders the form with status 422.
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] for an unknown parent and propagates
    /// persistence errors.
    pub async fn create(&self, scope: &Scope, params: &[(String, String)]) -> Result<CrudResponse, CrudError> {
        self.ensure_parent(scope).await?;
        let mut entity = E::default();
        let mut errors = assign_params(&mut entity, params, &self.form_fields());
        self.assign_scope(&mut entity, scope);

        if errors.has_errors() {
            errors.merge(&entity.validate());
            return self.invalid(scope, &entity, &errors).await;
        }

        match self.repo.create(entity.clone()).await {
            Ok(created) => {
                tracing::info!(resource = E::RESOURCE, id = ?created.id(), "entity created");
                Ok(CrudResponse::redirect(
                    self.routes.index_url(scope),
                    Some(Flash::Created),
                ))
            }
            Err(CrudError::Validation(errors)) => self.invalid(scope, &entity, &errors).await,
            Err(error) => Err(error),
        }
    }

    /// Edit form of an entity
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] when the entity is not in the scope.
    pub async fn edit(&self, scope: &Scope, id: i64) -> Result<CrudResponse, CrudError> {
        let entity = self.load(scope, id).await?;
        self.form_page(scope, &entity, &ValidationErrors::new(), StatusCode::OK)
            .await
    }

    /// Update an entity from submitted form parameters
    ///
    /// Invalid input re-renders the form with status 422.
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] when the entity is not in the scope
    /// and propagates persistence errors.
    pub async fn update(
        &self,
        scope: &Scope,
        id: i64,
        params: &[(String, String)],
    ) -> Result<CrudResponse, CrudError> {
        let mut entity = self.load(scope, id).await?;
        let mut errors = assign_params(&mut entity, params, &self.form_fields());
        self.assign_scope(&mut entity, scope);

        if errors.has_errors() {
            errors.merge(&entity.validate());
            return self.invalid(scope, &entity, &errors).await;
        }

        match self.repo.update(entity.clone()).await {
            Ok(_) => {
                tracing::info!(resource = E::RESOURCE, id, "entity updated");
                Ok(CrudResponse::redirect(
                    self.routes.index_url(scope),
                    Some(Flash::Updated),
                ))
            }
            Err(CrudError::Validation(errors)) => self.invalid(scope, &entity, &errors).await,
            Err(error) => Err(error),
        }
    }

    /// Delete an entity
    ///
    /// Deletion blocked by dependents redirects back to the entity with an
    /// alert.
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::NotFound`] when the entity is not in the scope
    /// and propagates persistence errors.
    pub async fn destroy(&self, scope: &Scope, id: i64) -> Result<CrudResponse, CrudError> {
        self.load(scope, id).await?;
        match self.repo.destroy(id).await {
            Ok(()) => {
                tracing::info!(resource = E::RESOURCE, id, "entity destroyed");
                Ok(CrudResponse::redirect(
                    self.routes.index_url(scope),
                    Some(Flash::Destroyed),
                ))
            }
            Err(CrudError::HasDependents { count, .. }) => {
                tracing::warn!(resource = E::RESOURCE, id, count, "destroy blocked by dependents");
                Ok(CrudResponse::redirect(
                    self.routes.show_url(scope, id),
                    Some(Flash::DestroyBlocked),
                ))
            }
            Err(error) => Err(error),
        }
    }

    async fn load(&self, scope: &Scope, id: i64) -> Result<E, CrudError> {
        self.ensure_parent(scope).await?;
        let not_found = || CrudError::NotFound {
            resource: E::RESOURCE.to_string(),
            id,
        };
        let entity = self.repo.find(id).await?.ok_or_else(not_found)?;
        if self.in_scope(&entity, scope) {
            Ok(entity)
        } else {
            Err(not_found())
        }
    }

    /// Checks the parent when a choice source is registered for it
    async fn ensure_parent(&self, scope: &Scope) -> Result<(), CrudError> {
        let Some(parent) = &scope.parent else {
            return Ok(());
        };
        let Some(source) = self.associations.get(&parent.resource) else {
            return Ok(());
        };
        if source.choices().await?.iter().any(|(id, _)| *id == parent.id) {
            Ok(())
        } else {
            Err(CrudError::NotFound {
                resource: parent.resource.clone(),
                id: parent.id,
            })
        }
    }

    fn in_scope(&self, entity: &E, scope: &Scope) -> bool {
        match (&self.nesting, scope.parent_id()) {
            (Some(nesting), Some(parent_id)) => {
                entity.get(&nesting.foreign_key) == Value::Integer(parent_id)
            }
            _ => true,
        }
    }

    fn assign_scope(&self, entity: &mut E, scope: &Scope) {
        if let (Some(nesting), Some(parent_id)) = (&self.nesting, scope.parent_id()) {
            entity.set(&nesting.foreign_key, Value::Integer(parent_id));
        }
    }

    fn scoped_query(&self, scope: &Scope) -> ListQuery {
        match (&self.nesting, scope.parent_id()) {
            (Some(nesting), Some(parent_id)) => {
                ListQuery::new().filtered(nesting.foreign_key.clone(), parent_id)
            }
            _ => ListQuery::new(),
        }
    }

    /// The render spec without the parent key of a nested resource
    fn list_spec(&self) -> RenderSpec<E> {
        let mut spec = self.spec.clone();
        if let Some(nesting) = &self.nesting {
            spec.fields.retain(|f| f.name != nesting.foreign_key);
        }
        spec
    }

    fn form_fields(&self) -> Vec<FieldDescriptor> {
        self.list_spec().fields
    }

    async fn context(
        &self,
        scope: &Scope,
        fields: &[FieldDescriptor],
        owners: &[i64],
    ) -> Result<RenderContext, CrudError> {
        let owner_key = format!("{}_id", E::PARAM_KEY);
        let associations = self.associations.load(fields, &owner_key, owners).await?;
        Ok(RenderContext::new(self.routes.clone())
            .with_config(Arc::clone(&self.config))
            .with_scope(scope.clone())
            .with_links(self.links.clone())
            .with_associations(associations))
    }

    async fn form_page(
        &self,
        scope: &Scope,
        entity: &E,
        errors: &ValidationErrors,
        status: StatusCode,
    ) -> Result<CrudResponse, CrudError> {
        let spec = self.list_spec();
        let ctx = self.context(scope, &spec.fields, &[]).await?;
        let mut body = render_form(entity, &spec, &form_action(entity, &ctx), errors, &ctx)?;

        body.push_str("\n<p>");
        if let Some(id) = entity.id() {
            body.push_str(&link_action("Show", &self.routes.show_url(scope, id), &[]));
            body.push(' ');
        }
        body.push_str(&link_action("List", &self.routes.index_url(scope), &[]));
        body.push_str("</p>");

        let title = if entity.is_new() {
            format!("New {}", E::model_name())
        } else {
            format!("Edit {}", E::model_name())
        };
        Ok(CrudResponse::Page {
            title,
            body,
            status,
        })
    }

    async fn invalid(
        &self,
        scope: &Scope,
        entity: &E,
        errors: &ValidationErrors,
    ) -> Result<CrudResponse, CrudError> {
        tracing::debug!(resource = E::RESOURCE, errors = %errors, "invalid submission");
        self.form_page(scope, entity, errors, StatusCode::UNPROCESSABLE_ENTITY)
            .await
    }
}

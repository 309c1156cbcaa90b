//! URL generation for CRUD resources
//!
//! Every URL is generated relative to a [`Scope`], so nested resources keep
//! their parent prefix (`/countries/2/cities/1`) without the controller
//! having to thread parent ids through each call site.

use std::collections::HashSet;
use std::fmt::Write;

use crate::sort::SortDir;

/// Parent resource of a nested resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    /// Parent resource name (e.g. `countries`)
    pub resource: String,
    /// Parent identifier
    pub id: i64,
}

/// Nesting context of a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Parent resource, `None` for top-level resources
    pub parent: Option<ParentRef>,
}

impl Scope {
    /// Top-level scope
    #[must_use]
    pub const fn root() -> Self {
        Self { parent: None }
    }

    /// Scope nested below `resource/id`
    #[must_use]
    pub fn nested(resource: impl Into<String>, id: i64) -> Self {
        Self {
            parent: Some(ParentRef {
                resource: resource.into(),
                id,
            }),
        }
    }

    /// Identifier of the parent, if nested
    #[must_use]
    pub fn parent_id(&self) -> Option<i64> {
        self.parent.as_ref().map(|p| p.id)
    }

    /// Path prefix contributed by the parent (`/countries/2`), empty at the root
    #[must_use]
    pub fn prefix(&self) -> String {
        self.parent
            .as_ref()
            .map(|p| format!("/{}/{}", p.resource, p.id))
            .unwrap_or_default()
    }
}

/// URL builder for one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRoutes {
    resource: String,
    mount: String,
}

impl ResourceRoutes {
    /// Routes for `resource` mounted at the application root
    #[must_use]
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            mount: String::new(),
        }
    }

    /// Prefix every URL with `mount` (e.g. `/admin`)
    #[must_use]
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = normalize_mount(&mount.into());
        self
    }

    /// Resource name
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// `GET` list URL
    ///
    /// ```rust
    /// use acton_crud::routing::{ResourceRoutes, Scope};
    ///
    /// let routes = ResourceRoutes::new("cities");
    /// assert_eq!(routes.index_url(&Scope::nested("countries", 2)), "/countries/2/cities");
    /// ```
    #[must_use]
    pub fn index_url(&self, scope: &Scope) -> String {
        format!("{}{}/{}", self.mount, scope.prefix(), self.resource)
    }

    /// List URL sorted by `field` in direction `dir`
    #[must_use]
    pub fn sorted_index_url(&self, scope: &Scope, field: &str, dir: SortDir) -> String {
        let mut url = self.index_url(scope);
        let _ = write!(url, "?sort={field}&sort_dir={}", dir.as_str());
        url
    }

    /// Form URL for a new entity
    #[must_use]
    pub fn new_url(&self, scope: &Scope) -> String {
        format!("{}/new", self.index_url(scope))
    }

    /// Show URL; also the target of update and delete requests
    #[must_use]
    pub fn show_url(&self, scope: &Scope, id: i64) -> String {
        format!("{}/{id}", self.index_url(scope))
    }

    /// Form URL for an existing entity
    #[must_use]
    pub fn edit_url(&self, scope: &Scope, id: i64) -> String {
        format!("{}/edit", self.show_url(scope, id))
    }

    /// Non-HTMX delete form target
    #[must_use]
    pub fn delete_url(&self, scope: &Scope, id: i64) -> String {
        format!("{}/delete", self.show_url(scope, id))
    }
}

/// Resources with a top-level show route
///
/// Association values only become links when their target resource is
/// registered here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    mount: String,
    resources: HashSet<String>,
}

impl RouteTable {
    /// Empty table for resources mounted under `mount`
    #[must_use]
    pub fn new(mount: &str) -> Self {
        Self {
            mount: normalize_mount(mount),
            resources: HashSet::new(),
        }
    }

    /// Register a top-level resource
    #[must_use]
    pub fn with(mut self, resource: impl Into<String>) -> Self {
        self.register(resource);
        self
    }

    /// Register a top-level resource in place
    pub fn register(&mut self, resource: impl Into<String>) {
        self.resources.insert(resource.into());
    }

    /// Whether `resource` has a show route
    #[must_use]
    pub fn has_route(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    /// Show URL of `resource/id`, if the resource is routed
    #[must_use]
    pub fn show_url(&self, resource: &str, id: i64) -> Option<String> {
        self.has_route(resource)
            .then(|| format!("{}/{resource}/{id}", self.mount))
    }
}

fn normalize_mount(mount: &str) -> String {
    let trimmed = mount.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_urls() {
        let routes = ResourceRoutes::new("countries");
        let scope = Scope::root();
        assert_eq!(routes.index_url(&scope), "/countries");
        assert_eq!(routes.new_url(&scope), "/countries/new");
        assert_eq!(routes.show_url(&scope, 3), "/countries/3");
        assert_eq!(routes.edit_url(&scope, 3), "/countries/3/edit");
        assert_eq!(routes.delete_url(&scope, 3), "/countries/3/delete");
    }

    #[test]
    fn test_nested_urls_keep_parent_prefix() {
        let routes = ResourceRoutes::new("cities");
        let scope = Scope::nested("countries", 2);
        assert_eq!(routes.show_url(&scope, 1), "/countries/2/cities/1");
        assert_eq!(routes.new_url(&scope), "/countries/2/cities/new");
        assert_eq!(scope.parent_id(), Some(2));
    }

    #[test]
    fn test_mount_prefix() {
        let routes = ResourceRoutes::new("countries").with_mount("admin/");
        assert_eq!(routes.index_url(&Scope::root()), "/admin/countries");
        let routes = ResourceRoutes::new("countries").with_mount("/");
        assert_eq!(routes.index_url(&Scope::root()), "/countries");
    }

    #[test]
    fn test_sorted_index_url() {
        let routes = ResourceRoutes::new("countries");
        assert_eq!(
            routes.sorted_index_url(&Scope::root(), "name", SortDir::Desc),
            "/countries?sort=name&sort_dir=desc"
        );
    }

    #[test]
    fn test_route_table() {
        let table = RouteTable::new("").with("countries");
        assert_eq!(table.show_url("countries", 4), Some("/countries/4".to_string()));
        assert_eq!(table.show_url("cities", 4), None);
    }
}

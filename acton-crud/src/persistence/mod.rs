//! Persistence interfaces for CRUD resources
//!
//! Controllers talk to storage through [`Repository`]. Select controls and
//! association labels read from [`ChoiceSource`]s collected in an
//! [`Associations`] registry. [`InMemoryRepository`] implements both.

mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

pub use memory::InMemoryRepository;

use crate::error::CrudError;
use crate::format::AssociationIndex;
use crate::model::{Entity, FieldDescriptor, FieldType, Value};
use crate::sort::SortSpec;

/// Filter and ordering of a list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// Only entities whose field equals the value
    pub filter: Option<(String, Value)>,
    /// Sort keys, most significant first
    pub order: Vec<SortSpec>,
}

impl ListQuery {
    /// Unfiltered, unordered query
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to entities with `field == value`
    #[must_use]
    pub fn filtered(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    /// Append a sort key
    #[must_use]
    pub fn ordered(mut self, spec: SortSpec) -> Self {
        self.order.push(spec);
        self
    }

    /// Whether `entity` passes the filter
    #[must_use]
    pub fn matches<E: Entity>(&self, entity: &E) -> bool {
        self.filter
            .as_ref()
            .is_none_or(|(field, value)| entity.get(field) == *value)
    }
}

/// Storage of one entity type
///
/// `create` and `update` validate first and persist nothing on failure.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync + 'static {
    /// Entities matching the query, in query order
    async fn list(&self, query: &ListQuery) -> Result<Vec<E>, CrudError>;

    /// Entity by id
    async fn find(&self, id: i64) -> Result<Option<E>, CrudError>;

    /// Validate and insert; returns the entity with its new id
    async fn create(&self, entity: E) -> Result<E, CrudError>;

    /// Validate and replace the stored entity with the same id
    async fn update(&self, entity: E) -> Result<E, CrudError>;

    /// Remove by id; [`CrudError::HasDependents`] when dependents restrict it
    async fn destroy(&self, id: i64) -> Result<(), CrudError>;

    /// Number of stored entities
    async fn count(&self) -> Result<usize, CrudError>;
}

/// Source of `(id, label)` pairs for an associated resource
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChoiceSource: Send + Sync {
    /// All selectable entities
    async fn choices(&self) -> Result<Vec<(i64, String)>, CrudError>;

    /// Entities whose `foreign_key` references `owner_id`
    async fn related(&self, foreign_key: &str, owner_id: i64)
        -> Result<Vec<(i64, String)>, CrudError>;
}

/// Fixed `(id, label)` list with no dependents
///
/// Stands in for a resource that is not managed by this application.
#[derive(Debug, Clone, Default)]
pub struct StaticChoices {
    choices: Vec<(i64, String)>,
}

impl StaticChoices {
    /// Choices in the given order
    #[must_use]
    pub fn new<L: Into<String>>(choices: impl IntoIterator<Item = (i64, L)>) -> Self {
        Self {
            choices: choices.into_iter().map(|(id, label)| (id, label.into())).collect(),
        }
    }
}

#[async_trait]
impl ChoiceSource for StaticChoices {
    async fn choices(&self) -> Result<Vec<(i64, String)>, CrudError> {
        Ok(self.choices.clone())
    }

    async fn related(&self, _foreign_key: &str, _owner_id: i64) -> Result<Vec<(i64, String)>, CrudError> {
        Ok(Vec::new())
    }
}

/// Choice sources keyed by resource name
#[derive(Clone, Default)]
pub struct Associations {
    sources: HashMap<String, Arc<dyn ChoiceSource>>,
}

impl std::fmt::Debug for Associations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Associations")
            .field("resources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Associations {
    /// Empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source of `resource`
    #[must_use]
    pub fn with(mut self, resource: impl Into<String>, source: Arc<dyn ChoiceSource>) -> Self {
        self.sources.insert(resource.into(), source);
        self
    }

    /// Source of `resource`
    #[must_use]
    pub fn get(&self, resource: &str) -> Option<&Arc<dyn ChoiceSource>> {
        self.sources.get(resource)
    }

    /// Load the labels referenced by `fields`
    ///
    /// Belongs-to targets load their choices; has-many targets load the
    /// dependents of each owner through `owner_key`. Targets without a
    /// registered source are skipped.
    ///
    /// # Errors
    ///
    /// Propagates errors of the choice sources.
    pub async fn load(
        &self,
        fields: &[FieldDescriptor],
        owner_key: &str,
        owners: &[i64],
    ) -> Result<AssociationIndex, CrudError> {
        let mut index = AssociationIndex::new();
        for field in fields {
            match field.field_type {
                FieldType::Association { target } => {
                    if index.choices(target).is_some() {
                        continue;
                    }
                    if let Some(source) = self.get(target) {
                        index.insert(target, source.choices().await?);
                    }
                }
                FieldType::Relation { target } => {
                    let Some(source) = self.get(target) else {
                        continue;
                    };
                    for owner in owners {
                        index.insert_related(target, *owner, source.related(owner_key, *owner).await?);
                    }
                }
                _ => {}
            }
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_entries, CrudTestModel};

    #[test]
    fn test_list_query_matches() {
        let entries = test_entries();
        let query = ListQuery::new().filtered("human", true);
        let names: Vec<_> = entries
            .iter()
            .filter(|e| query.matches(*e))
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["BBBBB", "DDDDD", "FFFFF"]);
        assert!(ListQuery::new().matches(&CrudTestModel::default()));
    }

    #[tokio::test]
    async fn test_load_only_referenced_targets() {
        let mut used = MockChoiceSource::new();
        used.expect_choices()
            .times(1)
            .returning(|| Ok(vec![(1, "AAAAA".to_string())]));
        let mut unused = MockChoiceSource::new();
        unused.expect_choices().never();

        let associations = Associations::new()
            .with("crud_test_models", Arc::new(used))
            .with("others", Arc::new(unused));

        let fields = vec![
            FieldDescriptor::string("name"),
            FieldDescriptor::association("companion_id", "crud_test_models"),
            FieldDescriptor::association("mentor_id", "crud_test_models"),
        ];
        let index = associations.load(&fields, "owner_id", &[]).await.unwrap();
        assert_eq!(index.label("crud_test_models", 1), Some("AAAAA"));
    }

    #[tokio::test]
    async fn test_load_relations_per_owner() {
        let mut source = MockChoiceSource::new();
        source
            .expect_related()
            .withf(|key, _| key == "crud_test_model_id")
            .times(2)
            .returning(|_, owner| Ok(vec![(owner * 10, format!("child of {owner}"))]));

        let associations = Associations::new().with("children", Arc::new(source));
        let fields = vec![FieldDescriptor::relation("kids", "children")];
        let index = associations
            .load(&fields, "crud_test_model_id", &[1, 2])
            .await
            .unwrap();

        assert_eq!(
            index.related("children", 2),
            Some(&[(20, "child of 2".to_string())][..])
        );
    }

    #[tokio::test]
    async fn test_missing_source_is_skipped() {
        let fields = vec![FieldDescriptor::association("companion_id", "crud_test_models")];
        let index = Associations::new().load(&fields, "x", &[]).await.unwrap();
        assert!(index.choices("crud_test_models").is_none());
    }

    #[tokio::test]
    async fn test_static_choices_fill_selects() {
        let associations = Associations::new().with(
            "crud_test_models",
            Arc::new(StaticChoices::new([(1, "AAAAA"), (2, "BBBBB")])),
        );
        let fields = vec![FieldDescriptor::association("companion_id", "crud_test_models")];
        let index = associations.load(&fields, "x", &[]).await.unwrap();

        assert_eq!(index.label("crud_test_models", 2), Some("BBBBB"));
        let source = associations.get("crud_test_models").unwrap();
        assert!(source.related("companion_id", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let mut source = MockChoiceSource::new();
        source
            .expect_choices()
            .returning(|| Err(CrudError::Persistence("offline".into())));
        let associations = Associations::new().with("crud_test_models", Arc::new(source));
        let fields = vec![FieldDescriptor::association("companion_id", "crud_test_models")];
        let result = associations.load(&fields, "x", &[]).await;
        assert!(matches!(result, Err(CrudError::Persistence(_))));
    }
}

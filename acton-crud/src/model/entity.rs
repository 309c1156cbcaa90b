//! The entity abstraction and attribute introspection

use std::collections::HashMap;

use chrono::NaiveDate;
use inflector::Inflector;

use super::field::{FieldDescriptor, FieldType};
use super::value::Value;
use crate::forms::ValidationErrors;

/// Name of the identifier column
pub const ID_FIELD: &str = "id";

/// A persistable record with a stable identifier and named, typed attributes
///
/// # Examples
///
/// ```rust
/// use acton_crud::model::{Entity, FieldDescriptor, Value};
///
/// #[derive(Debug, Clone, Default)]
/// struct Country {
///     id: Option<i64>,
///     name: String,
///     code: String,
/// }
///
/// impl Entity for Country {
///     const RESOURCE: &'static str = "countries";
///     const PARAM_KEY: &'static str = "country";
///
///     fn columns() -> Vec<FieldDescriptor> {
///         vec![
///             FieldDescriptor::integer("id"),
///             FieldDescriptor::string("name"),
///             FieldDescriptor::string("code"),
///         ]
///     }
///
///     fn id(&self) -> Option<i64> {
///         self.id
///     }
///
///     fn set_id(&mut self, id: i64) {
///         self.id = Some(id);
///     }
///
///     fn get(&self, field: &str) -> Value {
///         match field {
///             "id" => self.id.into(),
///             "name" => self.name.as_str().into(),
///             "code" => self.code.as_str().into(),
///             _ => Value::Null,
///         }
///     }
///
///     fn set(&mut self, field: &str, value: Value) {
///         match (field, value) {
///             ("name", Value::Text(v)) => self.name = v,
///             ("code", Value::Text(v)) => self.code = v,
///             _ => {}
///         }
///     }
///
///     fn label(&self) -> String {
///         self.name.clone()
///     }
/// }
///
/// let fields = acton_crud::model::fields::<Country>();
/// assert_eq!(fields.len(), 2);
/// ```
pub trait Entity: Clone + Default + Send + Sync + 'static {
    /// Resource name: route segment and collection name (e.g. `cities`)
    const RESOURCE: &'static str;

    /// Form parameter namespace (e.g. `city` for `city[name]`)
    const PARAM_KEY: &'static str;

    /// All columns in display order, including the identifier
    fn columns() -> Vec<FieldDescriptor>;

    /// Identifier, `None` until persisted
    fn id(&self) -> Option<i64>;

    /// Assign the identifier (called by the persistence layer)
    fn set_id(&mut self, id: i64);

    /// Read an attribute; unknown names yield [`Value::Null`]
    fn get(&self, field: &str) -> Value;

    /// Write an attribute; unknown names and mismatched values are ignored
    fn set(&mut self, field: &str, value: Value);

    /// Human-readable label used when the entity is referenced elsewhere
    fn label(&self) -> String;

    /// Validate the current state
    fn validate(&self) -> ValidationErrors {
        ValidationErrors::new()
    }

    /// Human model name (e.g. `City`)
    #[must_use]
    fn model_name() -> String {
        captionize(Self::PARAM_KEY)
    }

    /// Whether the entity has not been persisted yet
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// Displayable fields of an entity type, excluding the identifier
#[must_use]
pub fn fields<E: Entity>() -> Vec<FieldDescriptor> {
    E::columns()
        .into_iter()
        .filter(|f| f.name != ID_FIELD)
        .collect()
}

/// Look up a single column by name
#[must_use]
pub fn column<E: Entity>(name: &str) -> Option<FieldDescriptor> {
    E::columns().into_iter().find(|f| f.name == name)
}

/// Select columns by name, keeping the given order; unknown names are skipped
#[must_use]
pub fn select_fields<E: Entity>(names: &[&str]) -> Vec<FieldDescriptor> {
    let columns = E::columns();
    names
        .iter()
        .filter_map(|name| columns.iter().find(|f| f.name == *name).cloned())
        .collect()
}

/// Human caption for an attribute name
///
/// # Examples
///
/// ```rust
/// use acton_crud::model::captionize;
///
/// assert_eq!(captionize("name"), "Name");
/// assert_eq!(captionize("companion_id"), "Companion");
/// assert_eq!(captionize("created_at"), "Created At");
/// ```
#[must_use]
pub fn captionize(name: &str) -> String {
    let base = name.strip_suffix("_id").unwrap_or(name);
    base.to_title_case()
}

/// Collect `<param_key>[<field>]` entries of a submitted form (last value wins)
#[must_use]
pub fn nested_params(param_key: &str, params: &[(String, String)]) -> HashMap<String, String> {
    let prefix = format!("{param_key}[");
    params
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(&prefix)
                .and_then(|rest| rest.strip_suffix(']'))
                .map(|inner| (inner.to_string(), value.clone()))
        })
        .collect()
}

/// Apply submitted form parameters to an entity
///
/// Only the given editable fields are considered. Fields absent from the
/// submission stay untouched; unparseable values are reported as field
/// errors and leave the attribute unchanged.
pub fn assign_params<E: Entity>(
    entity: &mut E,
    params: &[(String, String)],
    fields: &[FieldDescriptor],
) -> ValidationErrors {
    let submitted = nested_params(E::PARAM_KEY, params);
    let mut errors = ValidationErrors::new();

    for field in fields
        .iter()
        .filter(|f| f.field_type.is_editable() && f.name != ID_FIELD)
    {
        let parsed = if field.field_type == FieldType::Date {
            date_from_parts(&submitted, &field.name)
        } else {
            submitted
                .get(&field.name)
                .map(|raw| Value::parse(&field.field_type, raw))
        };

        match parsed {
            Some(Ok(value)) => entity.set(&field.name, value),
            Some(Err(message)) => errors.add(field.name.clone(), message),
            None => {}
        }
    }

    errors
}

/// Read a date from `name(1i)`, `name(2i)`, `name(3i)` or a plain ISO `name`
fn date_from_parts(
    submitted: &HashMap<String, String>,
    name: &str,
) -> Option<Result<Value, String>> {
    let [year, month, day] =
        [1, 2, 3].map(|i| submitted.get(&format!("{name}({i}i)")).map(|s| s.trim()));

    if year.is_none() && month.is_none() && day.is_none() {
        return submitted
            .get(name)
            .map(|raw| Value::parse(&FieldType::Date, raw));
    }

    let (year, month, day) = (
        year.unwrap_or_default(),
        month.unwrap_or_default(),
        day.unwrap_or_default(),
    );
    if year.is_empty() && month.is_empty() && day.is_empty() {
        return Some(Ok(Value::Null));
    }

    let date = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };
    Some(date.map(Value::Date).ok_or_else(|| "is not a valid date".to_string()))
}

/// JSON object with the identifier and every non-relation column
#[must_use]
pub fn to_json<E: Entity>(entity: &E) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    map.insert(
        ID_FIELD.to_string(),
        entity.id().map_or(serde_json::Value::Null, serde_json::Value::from),
    );
    for field in fields::<E>()
        .into_iter()
        .filter(|f| f.field_type.is_editable())
    {
        let value = serde_json::to_value(entity.get(&field.name)).unwrap_or_default();
        map.insert(field.name, value);
    }
    serde_json::Value::Object(map)
}

//! Test fixtures shared by the unit tests
//!
//! `CrudTestModel` carries one attribute of every field type.

use chrono::{NaiveDate, NaiveDateTime};
use validator::Validate;

use crate::format::{AssociationIndex, RenderContext};
use crate::forms::ValidationErrors;
use crate::model::{Entity, FieldDescriptor, FieldType, Value};
use crate::routing::{ResourceRoutes, RouteTable};

#[derive(Debug, Clone, Default, Validate)]
pub struct CrudTestModel {
    pub id: Option<i64>,
    #[validate(length(min = 1, message = "can't be blank"))]
    pub name: String,
    pub whatever: Option<String>,
    pub children: Option<i64>,
    pub companion_id: Option<i64>,
    pub rating: Option<f64>,
    pub income: Option<f64>,
    pub birthdate: Option<NaiveDate>,
    pub human: bool,
    pub remarks: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Entity for CrudTestModel {
    const RESOURCE: &'static str = "crud_test_models";
    const PARAM_KEY: &'static str = "crud_test_model";

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer("id"),
            FieldDescriptor::string("name"),
            FieldDescriptor::string("whatever"),
            FieldDescriptor::integer("children"),
            FieldDescriptor::association("companion_id", "crud_test_models"),
            FieldDescriptor::float("rating"),
            FieldDescriptor::float("income"),
            FieldDescriptor::date("birthdate"),
            FieldDescriptor::boolean("human"),
            FieldDescriptor::new("remarks", FieldType::Text).unsortable(),
            FieldDescriptor::datetime("created_at"),
            FieldDescriptor::datetime("updated_at"),
        ]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn get(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "whatever" => self.whatever.clone().into(),
            "children" => self.children.into(),
            "companion_id" => self.companion_id.into(),
            "rating" => self.rating.into(),
            "income" => self.income.into(),
            "birthdate" => self.birthdate.into(),
            "human" => self.human.into(),
            "remarks" => self.remarks.clone().into(),
            "created_at" => self.created_at.into(),
            "updated_at" => self.updated_at.into(),
            _ => Value::Null,
        }
    }

    fn set(&mut self, field: &str, value: Value) {
        match (field, value) {
            ("name", Value::Text(v)) => self.name = v,
            ("name", Value::Null) => self.name.clear(),
            ("whatever", v) => self.whatever = v.as_str().map(ToString::to_string),
            ("remarks", v) => self.remarks = v.as_str().map(ToString::to_string),
            ("children", v) => self.children = v.as_i64(),
            ("companion_id", v) => self.companion_id = v.as_i64(),
            ("rating", Value::Float(v)) => self.rating = Some(v),
            ("rating", Value::Null) => self.rating = None,
            ("income", Value::Float(v)) => self.income = Some(v),
            ("income", Value::Null) => self.income = None,
            ("birthdate", v) => self.birthdate = v.as_date(),
            ("human", v) => self.human = v.as_bool().unwrap_or(false),
            ("created_at", Value::DateTime(v)) => self.created_at = Some(v),
            ("updated_at", Value::DateTime(v)) => self.updated_at = Some(v),
            _ => {}
        }
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn validate(&self) -> ValidationErrors {
        Validate::validate(self).map_or_else(Into::into, |()| ValidationErrors::new())
    }
}

/// Six entries `AAAAA` .. `FFFFF` with ids 1 to 6
///
/// Even ids are human; `CCCCC` has `AAAAA` as companion.
#[allow(clippy::cast_precision_loss)]
pub fn test_entries() -> Vec<CrudTestModel> {
    ["AAAAA", "BBBBB", "CCCCC", "DDDDD", "EEEEE", "FFFFF"]
        .into_iter()
        .zip(1_i64..)
        .map(|(name, i)| CrudTestModel {
            id: Some(i),
            name: name.to_string(),
            whatever: Some(name.to_lowercase()),
            children: Some(i * 2),
            companion_id: (i == 3).then_some(1),
            rating: Some(i as f64 * 1.1),
            income: Some(i as f64 * 1000.0),
            birthdate: None,
            human: i % 2 == 0,
            remarks: Some(format!("{name} remarks")),
            created_at: None,
            updated_at: None,
        })
        .collect()
}

/// Render context for `crud_test_models` with all test entries as choices
pub fn test_context() -> RenderContext {
    let choices = test_entries()
        .iter()
        .filter_map(|e| e.id.map(|id| (id, e.label())))
        .collect();
    RenderContext::new(ResourceRoutes::new(CrudTestModel::RESOURCE))
        .with_links(RouteTable::new("").with(CrudTestModel::RESOURCE))
        .with_associations(AssociationIndex::new().with(CrudTestModel::RESOURCE, choices))
}

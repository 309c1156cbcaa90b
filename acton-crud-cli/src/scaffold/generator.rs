//! CRUD scaffold generator orchestrator
//!
//! Turns a model name and its field definitions into three files:
//! - the entity (`src/models/<model>.rs`)
//! - the controller router (`src/controllers/<resource>.rs`)
//! - HTTP tests for it (`tests/<resource>_controller.rs`)

use super::field_type::{FieldDefinition, FieldType};
use super::helpers::TemplateHelpers;
use super::templates::TemplateRegistry;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// CRUD scaffold generator
pub struct ScaffoldGenerator {
    /// Model name (e.g. `City`, `UserProfile`)
    model_name: String,
    /// Field definitions, including the parent key when nested
    fields: Vec<FieldDefinition>,
    /// Parent model for nested routes
    parent: Option<String>,
    /// Rust identifier of the application crate, used by the tests
    crate_name: String,
    templates: TemplateRegistry,
}

impl ScaffoldGenerator {
    /// Create a new scaffold generator
    ///
    /// * `model_name` - Name of the model (e.g. `City`)
    /// * `field_specs` - Field specifications (e.g. `["name:string", "founded:date:optional"]`)
    /// * `parent` - Parent model when the resource is nested (e.g. `Country`)
    ///
    /// A nested resource gets a `references:<Parent>` field unless one is
    /// already present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the model or parent name is not `PascalCase`
    /// - a field specification cannot be parsed
    /// - no fields are specified
    pub fn new(model_name: String, field_specs: &[String], parent: Option<String>) -> Result<Self> {
        if !TemplateHelpers::is_pascal_case(&model_name) {
            anyhow::bail!("Model name must be PascalCase (start with uppercase): '{model_name}'");
        }
        if let Some(parent) = parent.as_deref() {
            if !TemplateHelpers::is_pascal_case(parent) {
                anyhow::bail!("Parent model must be PascalCase (start with uppercase): '{parent}'");
            }
        }

        let mut fields = field_specs
            .iter()
            .map(|spec| FieldDefinition::parse(spec))
            .collect::<Result<Vec<_>>>()
            .context("Failed to parse field definitions")?;

        if fields.is_empty() {
            anyhow::bail!("At least one field must be specified");
        }

        if let Some(parent) = parent.as_deref() {
            let foreign_key = TemplateHelpers::to_foreign_key(parent);
            if !fields.iter().any(|f| f.column_name() == foreign_key) {
                fields.push(FieldDefinition {
                    name: TemplateHelpers::to_snake_case(parent),
                    field_type: FieldType::Reference {
                        model: parent.to_string(),
                    },
                    optional: false,
                    sortable: true,
                });
            }
        }

        let templates = TemplateRegistry::new()?;

        Ok(Self {
            model_name,
            fields,
            parent,
            crate_name: "app".to_string(),
            templates,
        })
    }

    /// Use this crate name in the generated tests' imports
    #[must_use]
    pub fn with_crate_name(mut self, package: &str) -> Self {
        self.crate_name = TemplateHelpers::to_crate_ident(package);
        self
    }

    /// Parsed field definitions
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Generate all CRUD files
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails for any file
    pub fn generate(&self) -> Result<Vec<GeneratedFile>> {
        Ok(vec![
            self.generate_model()?,
            self.generate_controller()?,
            self.generate_tests()?,
        ])
    }

    fn model_snake(&self) -> String {
        TemplateHelpers::to_module_name(&self.model_name)
    }

    fn table_name(&self) -> String {
        TemplateHelpers::to_table_name(&self.model_name)
    }

    /// Collection path as seen by the generated tests (parent id 1 when nested)
    fn index_path(&self) -> String {
        let table = self.table_name();
        self.parent.as_deref().map_or_else(
            || format!("/{table}"),
            |parent| format!("/{}/1/{table}", TemplateHelpers::to_table_name(parent)),
        )
    }

    fn parent_foreign_key(&self) -> Option<String> {
        self.parent.as_deref().map(TemplateHelpers::to_foreign_key)
    }

    /// Label expression: the first text attribute, else title and id
    fn label_expr(&self) -> String {
        let title = TemplateHelpers::to_title(&self.model_name);
        self.fields
            .iter()
            .find(|f| matches!(f.field_type, FieldType::String))
            .map_or_else(
                || format!("format!(\"{title} #{{}}\", self.id.unwrap_or_default())"),
                |field| {
                    let column = field.column_name();
                    if field.optional {
                        format!("self.{column}.clone().unwrap_or_default()")
                    } else {
                        format!("self.{column}.clone()")
                    }
                },
            )
    }

    /// Default list order: the first sortable stored attribute
    fn order_field(&self) -> String {
        self.fields
            .iter()
            .find(|f| {
                f.sortable
                    && f.is_stored()
                    && !matches!(f.field_type, FieldType::Reference { .. })
            })
            .map_or_else(|| "id".to_string(), FieldDefinition::column_name)
    }

    /// Template variables shared by all files
    fn model_metadata(&self) -> serde_json::Value {
        let model_snake = self.model_snake();
        let table_name = self.table_name();
        let parent_key = self.parent_foreign_key();

        let attributes: Vec<serde_json::Value> = self
            .fields
            .iter()
            .filter(|f| f.is_stored())
            .map(|f| {
                serde_json::json!({
                    "column_name": f.column_name(),
                    "rust_type": f.rust_type(),
                    "validations": f.validations(),
                    "getter": f.getter(),
                    "setter": f.setter(),
                })
            })
            .collect();

        let columns: Vec<String> = self.fields.iter().map(FieldDefinition::descriptor).collect();

        let mut samples: Vec<serde_json::Value> = self
            .fields
            .iter()
            .filter_map(|f| {
                f.sample_literal().map(|literal| {
                    serde_json::json!({ "column": f.column_name(), "literal": literal })
                })
            })
            .collect();
        if let Some(key) = &parent_key {
            samples.push(serde_json::json!({ "column": key, "literal": "1_i64" }));
        }

        let form_params: Vec<serde_json::Value> = self
            .fields
            .iter()
            .filter_map(|f| {
                f.sample_input().map(|value| {
                    serde_json::json!({
                        "key": format!("{model_snake}[{}]", f.column_name()),
                        "value": value,
                    })
                })
            })
            .collect();

        let required_field = self
            .fields
            .iter()
            .find(|f| f.is_required_text())
            .map(FieldDefinition::column_name);

        let mut references: Vec<serde_json::Value> = Vec::new();
        for field in &self.fields {
            if let FieldType::Reference { model } = &field.field_type {
                let reference = serde_json::json!({
                    "table_name": TemplateHelpers::to_table_name(model),
                    "title": TemplateHelpers::to_title(model),
                });
                if !references.contains(&reference) {
                    references.push(reference);
                }
            }
        }

        let parent = self.parent.as_deref().map(|parent| {
            serde_json::json!({
                "title": TemplateHelpers::to_title(parent),
                "table_name": TemplateHelpers::to_table_name(parent),
                "foreign_key": TemplateHelpers::to_foreign_key(parent),
            })
        });

        let index_path = self.index_path();
        serde_json::json!({
            "model_name": self.model_name,
            "model_snake": model_snake,
            "table_name": table_name,
            "title": TemplateHelpers::to_title(&self.model_name),
            "plural_title": TemplateHelpers::to_plural_title(&self.model_name),
            "crate_name": self.crate_name,
            "attributes": attributes,
            "columns": columns,
            "label": self.label_expr(),
            "order_field": self.order_field(),
            "parent": parent,
            "samples": samples,
            "form_params": form_params,
            "required_field": required_field,
            "references": references,
            "member_path": format!("{index_path}/1"),
            "index_path": index_path,
        })
    }

    /// Generate the entity module
    fn generate_model(&self) -> Result<GeneratedFile> {
        let content = self.templates.render("model", &self.model_metadata())?;
        let model_snake = self.model_snake();
        let model_name = &self.model_name;

        Ok(GeneratedFile {
            path: PathBuf::from(format!("src/models/{model_snake}.rs")),
            content,
            description: format!("Entity for {model_name}"),
        })
    }

    /// Generate the controller module
    fn generate_controller(&self) -> Result<GeneratedFile> {
        let content = self.templates.render("controller", &self.model_metadata())?;
        let table_name = self.table_name();
        let model_name = &self.model_name;

        Ok(GeneratedFile {
            path: PathBuf::from(format!("src/controllers/{table_name}.rs")),
            content,
            description: format!("CRUD controller for {model_name}"),
        })
    }

    /// Generate integration tests
    fn generate_tests(&self) -> Result<GeneratedFile> {
        let content = self.templates.render("test", &self.model_metadata())?;
        let table_name = self.table_name();
        let model_name = &self.model_name;

        Ok(GeneratedFile {
            path: PathBuf::from(format!("tests/{table_name}_controller.rs")),
            content,
            description: format!("Integration tests for {model_name}"),
        })
    }
}

/// Represents a generated file
#[derive(Debug)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs(fields: &[&str]) -> Vec<String> {
        fields.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_new_generator() {
        let generator =
            ScaffoldGenerator::new("City".to_string(), &specs(&["name:string"]), None).unwrap();
        assert_eq!(generator.fields().len(), 1);
    }

    #[test]
    fn test_invalid_model_name() {
        let result = ScaffoldGenerator::new("city".to_string(), &specs(&["name:string"]), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_parent_name() {
        let result = ScaffoldGenerator::new(
            "City".to_string(),
            &specs(&["name:string"]),
            Some("country".to_string()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_no_fields() {
        let result = ScaffoldGenerator::new("City".to_string(), &[], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_bad_field_is_reported() {
        let error = ScaffoldGenerator::new("City".to_string(), &specs(&["name:blob"]), None)
            .err()
            .unwrap();
        assert!(format!("{error:#}").contains("Unknown field type"));
    }

    #[test]
    fn test_parent_adds_foreign_key() {
        let generator = ScaffoldGenerator::new(
            "City".to_string(),
            &specs(&["name:string"]),
            Some("Country".to_string()),
        )
        .unwrap();
        assert_eq!(generator.fields().len(), 2);
        assert_eq!(generator.fields()[1].column_name(), "country_id");
    }

    #[test]
    fn test_parent_keeps_declared_foreign_key() {
        let generator = ScaffoldGenerator::new(
            "City".to_string(),
            &specs(&["name:string", "country:references:Country"]),
            Some("Country".to_string()),
        )
        .unwrap();
        assert_eq!(generator.fields().len(), 2);
    }

    #[test]
    fn test_generate_model() {
        let generator = ScaffoldGenerator::new(
            "Member".to_string(),
            &specs(&[
                "name:string",
                "email:string:optional",
                "born_on:date:optional",
                "rating:float:unsortable",
                "city:references:City",
            ]),
            None,
        )
        .unwrap();

        let generated = generator.generate_model().unwrap();
        let content = &generated.content;
        assert_eq!(generated.path, PathBuf::from("src/models/member.rs"));
        assert!(content.contains("pub struct Member {"));
        assert!(content.contains(r#"#[validate(length(min = 1, message = "can't be blank"))]"#));
        assert!(content.contains("pub email: Option<String>,"));
        assert!(content.contains("pub born_on: Option<chrono::NaiveDate>,"));
        assert!(content.contains("pub city_id: Option<i64>,"));
        assert!(content.contains(r#"const RESOURCE: &'static str = "members";"#));
        assert!(content.contains(r#"const PARAM_KEY: &'static str = "member";"#));
        assert!(content.contains(r#"FieldDescriptor::float("rating").unsortable(),"#));
        assert!(content.contains(r#"FieldDescriptor::association("city_id", "cities"),"#));
        assert!(content.contains(r#""born_on" => self.born_on.into(),"#));
        assert!(content.contains(r#"("rating", v) => self.rating = v.as_f64().unwrap_or_default(),"#));
        assert!(content.contains("self.name.clone()"));
    }

    #[test]
    fn test_relation_is_column_only() {
        let generator = ScaffoldGenerator::new(
            "Country".to_string(),
            &specs(&["code:integer", "cities:has_many:City"]),
            None,
        )
        .unwrap();

        let content = generator.generate_model().unwrap().content;
        assert!(content.contains(r#"FieldDescriptor::relation("cities", "cities"),"#));
        assert!(!content.contains("pub cities"));
        assert!(content.contains(r#"format!("Country #{}", self.id.unwrap_or_default())"#));
    }

    #[test]
    fn test_generate_controller() {
        let generator =
            ScaffoldGenerator::new("Country".to_string(), &specs(&["name:string"]), None).unwrap();

        let generated = generator.generate_controller().unwrap();
        assert_eq!(generated.path, PathBuf::from("src/controllers/countries.rs"));
        assert!(generated.content.contains("use crate::models::country::Country;"));
        assert!(generated.content.contains(r#".order_by(SortSpec::asc("name"))"#));
        assert!(!generated.content.contains("nested_in"));
    }

    #[test]
    fn test_generate_nested_controller() {
        let generator = ScaffoldGenerator::new(
            "City".to_string(),
            &specs(&["population:integer"]),
            Some("Country".to_string()),
        )
        .unwrap();

        let content = generator.generate_controller().unwrap().content;
        assert!(content.contains(r#".nested_in("countries", "country_id")"#));
        assert!(content.contains(r#".order_by(SortSpec::asc("population"))"#));
    }

    #[test]
    fn test_generate_tests() {
        let generator = ScaffoldGenerator::new(
            "City".to_string(),
            &specs(&["name:string", "capital:boolean"]),
            Some("Country".to_string()),
        )
        .unwrap()
        .with_crate_name("world-atlas");

        let generated = generator.generate_tests().unwrap();
        let content = &generated.content;
        assert_eq!(generated.path, PathBuf::from("tests/cities_controller.rs"));
        assert!(content.contains("use world_atlas::controllers::cities;"));
        assert!(content.contains("async fn test_list_cities()"));
        assert!(content.contains("async fn test_create_city()"));
        assert!(content.contains("async fn test_show_city()"));
        assert!(content.contains("async fn test_update_city()"));
        assert!(content.contains("async fn test_delete_city()"));
        assert!(content.contains("async fn test_validation_errors()"));
        assert!(content.contains(r#".get("/countries/1/cities")"#));
        assert!(content.contains(r#".post("/countries/1/cities/1/delete")"#));
        assert!(content.contains(r#"("city[name]", "Sample name"),"#));
        assert!(content.contains(r#"("city[capital]", "1"),"#));
        assert!(content.contains(r#"entry.set("country_id", 1_i64.into());"#));
    }

    #[test]
    fn test_no_validation_test_without_required_text() {
        let generator =
            ScaffoldGenerator::new("Counter".to_string(), &specs(&["hits:integer"]), None).unwrap();

        let content = generator.generate_tests().unwrap().content;
        assert!(!content.contains("test_validation_errors"));
        assert!(content.contains(r#".get("/counters")"#));
    }

    #[test]
    fn test_complete_generation() {
        let generator = ScaffoldGenerator::new(
            "UserProfile".to_string(),
            &specs(&["nickname:string", "bio:text:optional"]),
            None,
        )
        .unwrap();

        let files = generator.generate().unwrap();
        assert_eq!(files.len(), 3);
        let paths: Vec<String> = files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();
        assert!(paths.contains(&"src/models/user_profile.rs".to_string()));
        assert!(paths.contains(&"src/controllers/user_profiles.rs".to_string()));
        assert!(paths.contains(&"tests/user_profiles_controller.rs".to_string()));
    }
}

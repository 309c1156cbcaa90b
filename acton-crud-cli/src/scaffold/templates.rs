//! Handlebars templates for the generated files

use anyhow::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;

/// Entity struct and its `Entity` impl
pub const MODEL_TEMPLATE: &str = r#"//! {{title}} entity

use acton_crud::prelude::*;
use validator::Validate;

/// {{title}} record
#[derive(Debug, Clone, Default, Validate)]
pub struct {{model_name}} {
    /// Identifier, `None` until created
    pub id: Option<i64>,
{{#each attributes}}
{{#each validations}}
    #[validate({{this}})]
{{/each}}
    pub {{column_name}}: {{rust_type}},
{{/each}}
}

impl Entity for {{model_name}} {
    const RESOURCE: &'static str = "{{table_name}}";
    const PARAM_KEY: &'static str = "{{model_snake}}";

    fn columns() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::integer("id"),
{{#each columns}}
            {{this}},
{{/each}}
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
{{#each attributes}}
            "{{column_name}}" => {{getter}},
{{/each}}
            _ => Value::Null,
        }
    }

    fn set(&mut self, field: &str, value: Value) {
        match (field, value) {
{{#each attributes}}
            {{setter}}
{{/each}}
            _ => {}
        }
    }

    fn label(&self) -> String {
        {{label}}
    }

    fn validate(&self) -> ValidationErrors {
        Validate::validate(self).map_or_else(Into::into, |()| ValidationErrors::new())
    }
}
"#;

/// Controller wiring the CRUD actions into a router
pub const CONTROLLER_TEMPLATE: &str = r#"//! {{plural_title}} controller

use acton_crud::prelude::*;

use crate::models::{{model_snake}}::{{model_name}};

/// Routes for {{plural_title}}
///
{{#if parent}}
/// Nested below {{parent.title}}: `/{{parent.table_name}}/{id}/{{table_name}}`.
{{else}}
/// Mounted at `/{{table_name}}`.
{{/if}}
pub fn router<R: Repository<{{model_name}}>>(
    repo: R,
    links: RouteTable,
    associations: Associations,
) -> axum::Router {
    CrudController::new(repo)
{{#if parent}}
        .nested_in("{{parent.table_name}}", "{{parent.foreign_key}}")
{{/if}}
        .with_links(links)
        .with_associations(associations)
        .order_by(SortSpec::asc("{{order_field}}"))
        .router()
}
"#;

/// Integration tests for the generated controller
pub const TEST_TEMPLATE: &str = r#"//! HTTP tests for the {{plural_title}} controller

use acton_crud::prelude::*;
use axum::http::StatusCode;
use axum_test::TestServer;
use {{crate_name}}::controllers::{{table_name}};
use {{crate_name}}::models::{{model_snake}}::{{model_name}};

fn sample() -> {{model_name}} {
    let mut entry = {{model_name}}::default();
    entry.set_id(1);
{{#each samples}}
    entry.set("{{column}}", {{literal}}.into());
{{/each}}
    entry
}

fn associations() -> Associations {
    Associations::new()
{{#each references}}
        .with(
            "{{table_name}}",
            std::sync::Arc::new(StaticChoices::new([(1, "{{title}} 1")])),
        )
{{/each}}
}

fn server(repo: &InMemoryRepository<{{model_name}}>) -> TestServer {
    let app = {{table_name}}::router(
        repo.clone(),
        RouteTable::new("").with("{{table_name}}"),
        associations(),
    );
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_list_{{table_name}}() {
    let repo = InMemoryRepository::with_entries([sample()]);
    let response = server(&repo).get("{{index_path}}").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("<tr"));
}

#[tokio::test]
async fn test_show_{{model_snake}}() {
    let repo = InMemoryRepository::with_entries([sample()]);
    let response = server(&repo).get("{{member_path}}").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_{{model_snake}}() {
    let repo = InMemoryRepository::<{{model_name}}>::new();
    let response = server(&repo)
        .post("{{index_path}}")
        .form(&[
{{#each form_params}}
            ("{{key}}", "{{value}}"),
{{/each}}
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_update_{{model_snake}}() {
    let repo = InMemoryRepository::with_entries([sample()]);
    let response = server(&repo)
        .post("{{member_path}}")
        .form(&[
{{#each form_params}}
            ("{{key}}", "{{value}}"),
{{/each}}
        ])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_delete_{{model_snake}}() {
    let repo = InMemoryRepository::with_entries([sample()]);
    let response = server(&repo).post("{{member_path}}/delete").await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(repo.count().await.unwrap(), 0);
}
{{#if required_field}}

#[tokio::test]
async fn test_validation_errors() {
    let repo = InMemoryRepository::<{{model_name}}>::new();
    let response = server(&repo)
        .post("{{index_path}}")
        .form(&[("{{model_snake}}[{{required_field}}]", "")])
        .await;

    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(repo.count().await.unwrap(), 0);
}
{{/if}}
"#;

/// Named templates ready for rendering
pub struct TemplateRegistry {
    handlebars: Handlebars<'static>,
}

impl TemplateRegistry {
    /// Register all scaffold templates
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to compile.
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // generated Rust, not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        for (name, source) in [
            ("model", MODEL_TEMPLATE),
            ("controller", CONTROLLER_TEMPLATE),
            ("test", TEST_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .with_context(|| format!("Failed to compile {name} template"))?;
        }

        Ok(Self { handlebars })
    }

    /// Render a registered template
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String> {
        self.handlebars
            .render(name, data)
            .with_context(|| format!("Failed to render {name} template"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        assert!(TemplateRegistry::new().is_ok());
    }

    #[test]
    fn test_rust_code_is_not_escaped() {
        let registry = TemplateRegistry::new().unwrap();
        let rendered = registry
            .render(
                "controller",
                &serde_json::json!({
                    "model_name": "City",
                    "model_snake": "city",
                    "table_name": "cities",
                    "plural_title": "Cities",
                    "order_field": "name",
                    "parent": { "title": "Country", "table_name": "countries", "foreign_key": "country_id" },
                }),
            )
            .unwrap();

        assert!(rendered.contains("pub fn router<R: Repository<City>>("));
        assert!(rendered.contains(r#".nested_in("countries", "country_id")"#));
        assert!(rendered.contains("`/countries/{id}/cities`"));
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::new().unwrap();
        assert!(registry.render("migration", &serde_json::json!({})).is_err());
    }
}

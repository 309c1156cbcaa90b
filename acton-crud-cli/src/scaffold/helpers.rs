//! Naming helpers for code generation
//!
//! Model names are `PascalCase`; everything derived from them (module,
//! resource, parameter key, titles) goes through these helpers so the
//! generated files agree with each other.

use inflector::Inflector;

/// Naming conventions shared by the scaffold templates
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Convert string to `snake_case`
    ///
    /// ```
    /// # use acton_crud_cli::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_snake_case("UserProfile"), "user_profile");
    /// ```
    #[must_use]
    pub fn to_snake_case(input: &str) -> String {
        input.to_snake_case()
    }

    /// Convert string to `PascalCase`
    #[must_use]
    pub fn to_pascal_case(input: &str) -> String {
        input.to_pascal_case()
    }

    /// Pluralize a word
    ///
    /// The inflector has known gaps with irregular plurals; model names are
    /// usually regular words.
    #[must_use]
    pub fn pluralize(input: &str) -> String {
        input.to_plural()
    }

    /// Resource name of a model: `snake_case` plural, also the route segment
    ///
    /// ```
    /// # use acton_crud_cli::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_table_name("Country"), "countries");
    /// assert_eq!(TemplateHelpers::to_table_name("UserProfile"), "user_profiles");
    /// ```
    #[must_use]
    pub fn to_table_name(model: &str) -> String {
        Self::pluralize(&Self::to_snake_case(model))
    }

    /// Module and form parameter key of a model (`snake_case` singular)
    #[must_use]
    pub fn to_module_name(model: &str) -> String {
        Self::to_snake_case(model)
    }

    /// Collection path of a top-level resource
    ///
    /// ```
    /// # use acton_crud_cli::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_route_path("UserProfile"), "/user_profiles");
    /// ```
    #[must_use]
    pub fn to_route_path(model: &str) -> String {
        format!("/{}", Self::to_table_name(model))
    }

    /// Human-readable title
    ///
    /// ```
    /// # use acton_crud_cli::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_title("UserProfile"), "User Profile");
    /// ```
    #[must_use]
    pub fn to_title(model: &str) -> String {
        model.to_title_case()
    }

    /// Human-readable plural title
    #[must_use]
    pub fn to_plural_title(model: &str) -> String {
        Self::pluralize(&Self::to_title(model))
    }

    /// Foreign key column pointing at a model
    ///
    /// ```
    /// # use acton_crud_cli::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_foreign_key("Country"), "country_id");
    /// ```
    #[must_use]
    pub fn to_foreign_key(model: &str) -> String {
        format!("{}_id", Self::to_snake_case(model))
    }

    /// Whether a name is `PascalCase` (leading uppercase, alphanumeric only)
    #[must_use]
    pub fn is_pascal_case(name: &str) -> bool {
        name.chars().next().is_some_and(char::is_uppercase)
            && name.chars().all(char::is_alphanumeric)
    }

    /// Rust identifier of a package name (`my-app` → `my_app`)
    #[must_use]
    pub fn to_crate_ident(package: &str) -> String {
        package.replace('-', "_")
    }
}

//! Field definitions for CRUD scaffolding
//!
//! Parses the `name:type[:modifier]*` arguments of `scaffold crud` and knows
//! how each field shows up in the generated entity.
//!
//! # Supported Field Types
//!
//! - `string` - short text, Rust `String`
//! - `text` - long text, Rust `String`
//! - `integer` - Rust `i64`
//! - `float` - Rust `f64`
//! - `date` - Rust `chrono::NaiveDate`
//! - `time` - Rust `chrono::NaiveTime`
//! - `datetime` - Rust `chrono::NaiveDateTime`
//! - `boolean` - Rust `bool`
//! - `references:Model` - foreign key column `<name>_id: Option<i64>`
//! - `has_many:Model` - display-only list of dependent entries, no struct field
//!
//! # Modifiers
//!
//! - `:optional` - wraps the Rust type in `Option<T>` and skips presence validation
//! - `:unsortable` - the list column header is not a sort link
//!
//! # Examples
//!
//! ```text
//! name:string                 → String
//! born_on:date:optional       → Option<NaiveDate>
//! country:references:Country  → country_id: Option<i64>
//! cities:has_many:City        → relation column "cities"
//! remarks:text:unsortable     → String, plain header
//! ```

use anyhow::{anyhow, Result};
use std::fmt;

use super::helpers::TemplateHelpers;

/// A field parsed from a `name:type[:modifier]*` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name as given (e.g. `title`, `author`)
    pub name: String,
    /// Field type
    pub field_type: FieldType,
    /// Whether the Rust field is an `Option`
    pub optional: bool,
    /// Whether the list header links to a sort
    pub sortable: bool,
}

/// Scaffold field types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Short text
    String,
    /// Long text
    Text,
    /// 64-bit integer
    Integer,
    /// 64-bit float
    Float,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// Boolean flag
    Boolean,
    /// Belongs-to reference to another model
    Reference {
        /// Referenced model name (e.g. `Country`)
        model: String,
    },
    /// Has-many list of dependent models
    HasMany {
        /// Dependent model name (e.g. `City`)
        model: String,
    },
}

impl FieldDefinition {
    /// Parse a field definition
    ///
    /// Format: `name:type[:modifier]*`
    ///
    /// ```
    /// # use acton_crud_cli::FieldDefinition;
    /// let field = FieldDefinition::parse("title:string").unwrap();
    /// assert_eq!(field.name, "title");
    ///
    /// let field = FieldDefinition::parse("born_on:date:optional").unwrap();
    /// assert!(field.optional);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the name or type is missing
    /// - the name is not a valid Rust identifier
    /// - the type is unknown, or a reference type lacks its model
    /// - a modifier is unknown
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(':').map(str::trim).collect();

        if parts.len() < 2 {
            return Err(anyhow!(
                "Invalid field definition: '{input}'. Expected format: name:type[:modifiers]"
            ));
        }

        let name = parts[0].to_string();
        if name.is_empty() {
            return Err(anyhow!("Field name cannot be empty"));
        }
        if !name.chars().next().unwrap_or('0').is_alphabetic()
            || !name.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            return Err(anyhow!(
                "Invalid field name: '{name}'. Must be a valid Rust identifier (alphanumeric + underscore)"
            ));
        }
        if name == "id" {
            return Err(anyhow!("Field 'id' is generated for every model"));
        }

        let kind = parts[1].to_lowercase();
        let (field_type, modifiers) = match kind.as_str() {
            "references" | "belongs_to" | "has_many" => {
                let model = parts
                    .get(2)
                    .filter(|m| !m.is_empty())
                    .ok_or_else(|| anyhow!("Field '{name}': {kind} needs a model, e.g. {kind}:Country"))?;
                let model = (*model).to_string();
                let field_type = if kind == "has_many" {
                    FieldType::HasMany { model }
                } else {
                    FieldType::Reference { model }
                };
                (field_type, &parts[3..])
            }
            other => (Self::parse_primitive(other)?, &parts[2..]),
        };

        let mut optional = false;
        let mut sortable = !matches!(field_type, FieldType::HasMany { .. });

        for modifier in modifiers {
            match modifier.to_lowercase().as_str() {
                "optional" => optional = true,
                "unsortable" => sortable = false,
                unknown => {
                    return Err(anyhow!(
                        "Unknown modifier: '{unknown}'. Valid modifiers: optional, unsortable"
                    ));
                }
            }
        }

        Ok(Self {
            name,
            field_type,
            optional,
            sortable,
        })
    }

    fn parse_primitive(type_str: &str) -> Result<FieldType> {
        match type_str {
            "string" => Ok(FieldType::String),
            "text" => Ok(FieldType::Text),
            "integer" | "int" | "i64" => Ok(FieldType::Integer),
            "float" | "f64" => Ok(FieldType::Float),
            "date" => Ok(FieldType::Date),
            "time" => Ok(FieldType::Time),
            "datetime" => Ok(FieldType::DateTime),
            "boolean" | "bool" => Ok(FieldType::Boolean),
            unknown => Err(anyhow!(
                "Unknown field type: '{unknown}'. Supported types: string, text, integer, float, date, time, datetime, boolean, references:Model, has_many:Model"
            )),
        }
    }

    /// Whether the field becomes a struct member (has-many lists do not)
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        !matches!(self.field_type, FieldType::HasMany { .. })
    }

    /// Attribute name in the entity: `<name>_id` for references, the
    /// snake-cased name otherwise
    ///
    /// ```
    /// # use acton_crud_cli::FieldDefinition;
    /// let field = FieldDefinition::parse("country:references:Country").unwrap();
    /// assert_eq!(field.column_name(), "country_id");
    /// ```
    #[must_use]
    pub fn column_name(&self) -> String {
        let snake = TemplateHelpers::to_snake_case(&self.name);
        match &self.field_type {
            FieldType::Reference { .. } if !snake.ends_with("_id") => format!("{snake}_id"),
            _ => snake,
        }
    }

    /// Rust type of the struct member
    #[must_use]
    pub fn rust_type(&self) -> String {
        let base = self.field_type.rust_type();
        let wraps = self.optional
            && !matches!(
                self.field_type,
                FieldType::Reference { .. } | FieldType::HasMany { .. }
            );
        if wraps {
            format!("Option<{base}>")
        } else {
            base
        }
    }

    /// `FieldDescriptor` constructor expression for `Entity::columns`
    #[must_use]
    pub fn descriptor(&self) -> String {
        let column = self.column_name();
        let base = match &self.field_type {
            FieldType::String => format!("FieldDescriptor::string(\"{column}\")"),
            FieldType::Text => format!("FieldDescriptor::text(\"{column}\")"),
            FieldType::Integer => format!("FieldDescriptor::integer(\"{column}\")"),
            FieldType::Float => format!("FieldDescriptor::float(\"{column}\")"),
            FieldType::Date => format!("FieldDescriptor::date(\"{column}\")"),
            FieldType::Time => format!("FieldDescriptor::new(\"{column}\", FieldType::Time)"),
            FieldType::DateTime => format!("FieldDescriptor::datetime(\"{column}\")"),
            FieldType::Boolean => format!("FieldDescriptor::boolean(\"{column}\")"),
            FieldType::Reference { model } => format!(
                "FieldDescriptor::association(\"{column}\", \"{}\")",
                TemplateHelpers::to_table_name(model)
            ),
            FieldType::HasMany { model } => format!(
                "FieldDescriptor::relation(\"{column}\", \"{}\")",
                TemplateHelpers::to_table_name(model)
            ),
        };
        // relations are unsortable already
        if self.sortable || !self.is_stored() {
            base
        } else {
            format!("{base}.unsortable()")
        }
    }

    /// Expression converting the struct member into a `Value`
    #[must_use]
    pub fn getter(&self) -> String {
        let column = self.column_name();
        match self.field_type {
            FieldType::String | FieldType::Text if !self.optional => {
                format!("self.{column}.as_str().into()")
            }
            FieldType::String | FieldType::Text => format!("self.{column}.clone().into()"),
            _ => format!("self.{column}.into()"),
        }
    }

    /// Match arm of `Entity::set` assigning this member from a `Value`
    #[must_use]
    pub fn setter(&self) -> String {
        let column = self.column_name();
        let accessor = match self.field_type {
            FieldType::String | FieldType::Text => {
                if self.optional {
                    return format!(
                        "(\"{column}\", v) => self.{column} = v.as_str().filter(|s| !s.is_empty()).map(ToString::to_string),"
                    );
                }
                return format!("(\"{column}\", Value::Text(v)) => self.{column} = v,");
            }
            FieldType::Reference { .. } => {
                return format!("(\"{column}\", v) => self.{column} = v.as_i64(),");
            }
            FieldType::HasMany { .. } => return String::new(),
            FieldType::Integer => "as_i64",
            FieldType::Float => "as_f64",
            FieldType::Boolean => "as_bool",
            FieldType::Date => "as_date",
            FieldType::Time => "as_time",
            FieldType::DateTime => "as_datetime",
        };
        let fallback = if self.optional { "" } else { ".unwrap_or_default()" };
        format!("(\"{column}\", v) => self.{column} = v.{accessor}(){fallback},")
    }

    /// Presence and format validations for the `validator` derive
    #[must_use]
    pub fn validations(&self) -> Vec<String> {
        let mut validations = Vec::new();

        if matches!(self.field_type, FieldType::String | FieldType::Text) && !self.optional {
            validations.push("length(min = 1, message = \"can't be blank\")".to_string());
        }
        if self.name.to_lowercase().contains("email") && self.field_type == FieldType::String {
            validations.push("email(message = \"is not a valid email address\")".to_string());
        }

        validations
    }

    /// Sample form input used by the generated tests, if the field takes one
    #[must_use]
    pub fn sample_input(&self) -> Option<String> {
        match self.field_type {
            FieldType::String | FieldType::Text => Some(if self.name.to_lowercase().contains("email") {
                "someone@example.com".to_string()
            } else {
                format!("Sample {}", TemplateHelpers::to_title(&self.name).to_lowercase())
            }),
            FieldType::Integer => Some("42".to_string()),
            FieldType::Float => Some("4.5".to_string()),
            FieldType::Boolean => Some("1".to_string()),
            FieldType::Date => Some("2024-05-17".to_string()),
            FieldType::Time => Some("09:30".to_string()),
            FieldType::DateTime => Some("2024-05-17T09:30".to_string()),
            FieldType::Reference { .. } | FieldType::HasMany { .. } => None,
        }
    }

    /// Rust literal of the sample value, convertible into a `Value`
    #[must_use]
    pub fn sample_literal(&self) -> Option<String> {
        match self.field_type {
            FieldType::String | FieldType::Text => self.sample_input().map(|s| format!("{s:?}")),
            FieldType::Integer => Some("42_i64".to_string()),
            FieldType::Float => Some("4.5_f64".to_string()),
            FieldType::Boolean => Some("true".to_string()),
            _ => None,
        }
    }

    /// Whether a blank submission is rejected
    #[must_use]
    pub fn is_required_text(&self) -> bool {
        !self.validations().is_empty() && !self.optional
    }
}

impl FieldType {
    /// Rust type of a non-optional member
    #[must_use]
    pub fn rust_type(&self) -> String {
        match self {
            Self::String | Self::Text => "String".to_string(),
            Self::Integer => "i64".to_string(),
            Self::Float => "f64".to_string(),
            Self::Date => "chrono::NaiveDate".to_string(),
            Self::Time => "chrono::NaiveTime".to_string(),
            Self::DateTime => "chrono::NaiveDateTime".to_string(),
            Self::Boolean => "bool".to_string(),
            Self::Reference { .. } => "Option<i64>".to_string(),
            Self::HasMany { model } => format!("Vec<{model}>"),
        }
    }
}

impl fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.name;
        let field_type = &self.field_type;
        write!(f, "{name}:{field_type}")?;
        if self.optional {
            write!(f, ":optional")?;
        }
        if !self.sortable && self.is_stored() {
            write!(f, ":unsortable")?;
        }
        Ok(())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Date => write!(f, "date"),
            Self::Time => write!(f, "time"),
            Self::DateTime => write!(f, "datetime"),
            Self::Boolean => write!(f, "boolean"),
            Self::Reference { model } => write!(f, "references:{model}"),
            Self::HasMany { model } => write!(f, "has_many:{model}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_string() {
        let field = FieldDefinition::parse("title:string").unwrap();
        assert_eq!(field.name, "title");
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.optional);
        assert!(field.sortable);
        assert_eq!(field.rust_type(), "String");
        assert_eq!(field.descriptor(), r#"FieldDescriptor::string("title")"#);
    }

    #[test]
    fn test_parse_optional_field() {
        let field = FieldDefinition::parse("age:integer:optional").unwrap();
        assert_eq!(field.field_type, FieldType::Integer);
        assert!(field.optional);
        assert_eq!(field.rust_type(), "Option<i64>");
        assert_eq!(field.setter(), r#"("age", v) => self.age = v.as_i64(),"#);
    }

    #[test]
    fn test_parse_unsortable_field() {
        let field = FieldDefinition::parse("remarks:text:unsortable").unwrap();
        assert!(!field.sortable);
        assert_eq!(
            field.descriptor(),
            r#"FieldDescriptor::text("remarks").unsortable()"#
        );
    }

    #[test]
    fn test_parse_multiple_modifiers() {
        let field = FieldDefinition::parse("rating:float:optional:unsortable").unwrap();
        assert!(field.optional);
        assert!(!field.sortable);
        assert_eq!(field.to_string(), "rating:float:optional:unsortable");
    }

    #[test]
    fn test_parse_reference() {
        let field = FieldDefinition::parse("country:references:Country").unwrap();
        assert_eq!(
            field.field_type,
            FieldType::Reference {
                model: "Country".to_string()
            }
        );
        assert_eq!(field.column_name(), "country_id");
        assert_eq!(field.rust_type(), "Option<i64>");
        assert_eq!(
            field.descriptor(),
            r#"FieldDescriptor::association("country_id", "countries")"#
        );
        assert_eq!(field.getter(), "self.country_id.into()");
    }

    #[test]
    fn test_reference_keeps_existing_id_suffix() {
        let field = FieldDefinition::parse("owner_id:belongs_to:User").unwrap();
        assert_eq!(field.column_name(), "owner_id");
    }

    #[test]
    fn test_parse_has_many() {
        let field = FieldDefinition::parse("cities:has_many:City").unwrap();
        assert!(!field.is_stored());
        assert!(!field.sortable);
        assert_eq!(
            field.descriptor(),
            r#"FieldDescriptor::relation("cities", "cities")"#
        );
        assert_eq!(field.to_string(), "cities:has_many:City");
    }

    #[test]
    fn test_reference_without_model_fails() {
        assert!(FieldDefinition::parse("country:references").is_err());
        assert!(FieldDefinition::parse("cities:has_many:").is_err());
    }

    #[test]
    fn test_time_uses_generic_descriptor() {
        let field = FieldDefinition::parse("opens_at:time").unwrap();
        assert_eq!(
            field.descriptor(),
            r#"FieldDescriptor::new("opens_at", FieldType::Time)"#
        );
        assert_eq!(
            field.setter(),
            r#"("opens_at", v) => self.opens_at = v.as_time().unwrap_or_default(),"#
        );
    }

    #[test]
    fn test_text_accessors() {
        let required = FieldDefinition::parse("name:string").unwrap();
        assert_eq!(required.getter(), "self.name.as_str().into()");
        assert_eq!(
            required.setter(),
            r#"("name", Value::Text(v)) => self.name = v,"#
        );
        assert!(required.is_required_text());

        let optional = FieldDefinition::parse("nickname:string:optional").unwrap();
        assert_eq!(optional.getter(), "self.nickname.clone().into()");
        assert!(optional.validations().is_empty());
        assert!(!optional.is_required_text());
    }

    #[test]
    fn test_email_validation() {
        let field = FieldDefinition::parse("email:string").unwrap();
        let validations = field.validations();
        assert_eq!(validations.len(), 2);
        assert!(validations[1].starts_with("email"));
        assert_eq!(field.sample_input().as_deref(), Some("someone@example.com"));
    }

    #[test]
    fn test_sample_values() {
        let field = FieldDefinition::parse("first_name:string").unwrap();
        assert_eq!(field.sample_input().as_deref(), Some("Sample first name"));
        assert_eq!(field.sample_literal().as_deref(), Some("\"Sample first name\""));
        let field = FieldDefinition::parse("born_on:date").unwrap();
        assert_eq!(field.sample_input().as_deref(), Some("2024-05-17"));
        assert!(field.sample_literal().is_none());
    }

    #[test]
    fn test_invalid_field_name() {
        assert!(FieldDefinition::parse("123invalid:string").is_err());
        assert!(FieldDefinition::parse("invalid-name:string").is_err());
        assert!(FieldDefinition::parse(":string").is_err());
        assert!(FieldDefinition::parse("id:integer").is_err());
    }

    #[test]
    fn test_invalid_type_and_modifier() {
        assert!(FieldDefinition::parse("title:invalid_type").is_err());
        assert!(FieldDefinition::parse("title:string:unique").is_err());
        assert!(FieldDefinition::parse("title").is_err());
    }

    #[test]
    fn test_type_aliases() {
        assert_eq!(
            FieldDefinition::parse("count:int").unwrap().field_type,
            FieldType::Integer
        );
        assert_eq!(
            FieldDefinition::parse("active:bool").unwrap().field_type,
            FieldType::Boolean
        );
        assert_eq!(
            FieldDefinition::parse("owner:belongs_to:User").unwrap().field_type,
            FieldType::Reference {
                model: "User".to_string()
            }
        );
    }
}

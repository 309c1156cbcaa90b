//! Configuration management for acton-crud
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `ACTON_CRUD_` prefix, `__` between sections)
//! 2. `./acton-crud.toml`
//! 3. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # acton-crud.toml
//! [messages]
//! no_entries = "Nothing to show yet"
//! confirm_delete = "Really delete?"
//!
//! [table]
//! list_class = "table is-striped"
//!
//! [forms]
//! textarea_rows = 8
//! htmx_boost = true
//!
//! [routes]
//! mount = "/admin"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use acton_crud::config::CrudConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = CrudConfig::load()?;
//! assert!(!config.messages.no_entries.is_empty());
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use anyhow::Context;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Default configuration file name
pub const CONFIG_FILE: &str = "acton-crud.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ACTON_CRUD_";

/// User-visible texts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    /// Shown instead of a table when a list is empty
    pub no_entries: String,

    /// Confirmation prompt on delete links
    pub confirm_delete: String,

    /// Label for an unset association
    pub none: String,

    /// Rendering of `true`
    pub yes: String,

    /// Rendering of `false`
    pub no: String,

    /// Submit button label
    pub submit: String,

    /// Flash notice after a successful create
    pub created: String,

    /// Flash notice after a successful update
    pub updated: String,

    /// Flash notice after a successful delete
    pub destroyed: String,

    /// Flash alert when a delete is blocked by dependent records
    pub destroy_blocked: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            no_entries: "No entries available".to_string(),
            confirm_delete: "Do you really want to delete this entry?".to_string(),
            none: "(none)".to_string(),
            yes: "yes".to_string(),
            no: "no".to_string(),
            submit: "Save".to_string(),
            created: "The entry was successfully created.".to_string(),
            updated: "The entry was successfully updated.".to_string(),
            destroyed: "The entry was successfully deleted.".to_string(),
            destroy_blocked: "The entry could not be deleted because dependent entries exist."
                .to_string(),
        }
    }
}

/// Table rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    /// CSS class of the `<table>` and of the empty-list placeholder
    pub list_class: String,

    /// CSS class of action cells and action links
    pub action_class: String,

    /// Markup appended to a header sorted ascending
    pub asc_indicator: String,

    /// Markup appended to a header sorted descending
    pub desc_indicator: String,

    /// Row classes, cycled per row
    pub row_classes: Vec<String>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            list_class: "list".to_string(),
            action_class: "action".to_string(),
            asc_indicator: " &darr;".to_string(),
            desc_indicator: " &uarr;".to_string(),
            row_classes: vec!["even".to_string(), "odd".to_string()],
        }
    }
}

/// Form rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Visible rows of long-text areas
    pub textarea_rows: u32,

    /// First year offered by date selectors
    pub date_year_start: i32,

    /// Last year offered by date selectors
    pub date_year_end: i32,

    /// Submit entity forms through HTMX (`hx-post`) instead of a full page post
    pub htmx_boost: bool,

    /// Target selector for HTMX-boosted forms
    pub htmx_target: String,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            textarea_rows: 5,
            date_year_start: 1900,
            date_year_end: 2050,
            htmx_boost: false,
            htmx_target: "#content".to_string(),
        }
    }
}

/// URL generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteSettings {
    /// Prefix under which all CRUD routers are mounted (e.g. `/admin`)
    pub mount: String,
}

/// Complete acton-crud configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CrudConfig {
    /// User-visible texts
    #[serde(default)]
    pub messages: MessageSettings,

    /// Table settings
    #[serde(default)]
    pub table: TableSettings,

    /// Form settings
    #[serde(default)]
    pub forms: FormSettings,

    /// Route settings
    #[serde(default)]
    pub routes: RouteSettings,
}

impl CrudConfig {
    /// Load configuration from `./acton-crud.toml` and the environment
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific file (missing files fall back to defaults)
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_crud::config::CrudConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = CrudConfig::load_from("./config/production.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config: Self = Self::figment(path)
            .extract()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// The provider stack used by [`Self::load_from`]
    #[must_use]
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

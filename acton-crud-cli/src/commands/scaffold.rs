//! `scaffold crud` command
//!
//! Generates the entity, controller and tests for a CRUD resource and
//! writes them below the project root.
//!
//! # Example
//!
//! ```bash
//! acton-crud scaffold crud City \
//!   name:string \
//!   population:integer:optional \
//!   --parent Country
//! ```

use crate::scaffold::{GeneratedFile, ScaffoldGenerator, TemplateHelpers};
use anyhow::{Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

/// Options of `scaffold crud`
#[derive(Debug, Clone)]
pub struct ScaffoldCommand {
    model: String,
    fields: Vec<String>,
    parent: Option<String>,
    crate_name: Option<String>,
    force: bool,
}

impl ScaffoldCommand {
    /// Scaffold `model` with the given field specifications
    #[must_use]
    pub const fn new(model: String, fields: Vec<String>) -> Self {
        Self {
            model,
            fields,
            parent: None,
            crate_name: None,
            force: false,
        }
    }

    /// Nest the resource below a parent model
    #[must_use]
    pub fn parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    /// Crate name used by the generated tests; defaults to the project directory name
    #[must_use]
    pub fn crate_name(mut self, crate_name: Option<String>) -> Self {
        self.crate_name = crate_name;
        self
    }

    /// Overwrite existing files
    #[must_use]
    pub const fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Run in the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unavailable or
    /// [`execute_in`](Self::execute_in) fails.
    pub fn execute(&self) -> Result<()> {
        let project_root = std::env::current_dir().context("Failed to get current directory")?;
        self.execute_in(&project_root)?;
        Ok(())
    }

    /// Generate and write the files below `project_root`, returning their paths
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails, a target file exists and
    /// `force` is not set, or writing fails.
    pub fn execute_in(&self, project_root: &Path) -> Result<Vec<PathBuf>> {
        println!(
            "\n{} {} {}",
            style("Scaffolding CRUD for").cyan().bold(),
            style(&self.model).green().bold(),
            style("...").cyan().bold()
        );

        let crate_name = self.crate_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map_or_else(|| "app".to_string(), |name| name.to_string_lossy().into_owned())
        });

        let generator =
            ScaffoldGenerator::new(self.model.clone(), &self.fields, self.parent.clone())
                .context("Failed to create scaffold generator")?
                .with_crate_name(&crate_name);

        let files = generator
            .generate()
            .context("Failed to generate scaffold files")?;

        self.check_overwrites(project_root, &files)?;

        println!(
            "\n{} {} files:",
            style("Generated").green().bold(),
            files.len()
        );

        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let full_path = project_root.join(&file.path);

            if let Some(parent) = full_path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }

            fs::write(&full_path, &file.content)
                .with_context(|| format!("Failed to write file: {}", full_path.display()))?;
            tracing::debug!(path = %full_path.display(), "scaffold file written");

            println!(
                "  {} {} ({})",
                style("✓").green(),
                style(file.path.display()).dim(),
                style(&file.description).dim()
            );
            written.push(full_path);
        }

        self.print_next_steps();
        Ok(written)
    }

    fn check_overwrites(&self, project_root: &Path, files: &[GeneratedFile]) -> Result<()> {
        if self.force {
            return Ok(());
        }

        let existing: Vec<String> = files
            .iter()
            .filter(|file| project_root.join(&file.path).exists())
            .map(|file| file.path.display().to_string())
            .collect();

        if existing.is_empty() {
            Ok(())
        } else {
            anyhow::bail!(
                "Refusing to overwrite existing files (use --force): {}",
                existing.join(", ")
            )
        }
    }

    fn print_next_steps(&self) {
        let module = TemplateHelpers::to_module_name(&self.model);
        let resource = TemplateHelpers::to_table_name(&self.model);

        println!(
            "\n{} CRUD scaffold for {} is ready!",
            style("✨").green().bold(),
            style(&self.model).green().bold()
        );

        println!("\n{}", style("Next steps:").cyan().bold());
        println!(
            "  1. Add the model to src/models/mod.rs: {}",
            style(format!("pub mod {module};")).yellow()
        );
        println!(
            "  2. Add the controller to src/controllers/mod.rs: {}",
            style(format!("pub mod {resource};")).yellow()
        );
        println!(
            "  3. Merge the routes: {}",
            style(format!(
                ".merge(controllers::{resource}::router(repo, links, associations))"
            ))
            .yellow()
        );
        println!(
            "  4. Dependencies: {} plus {} for tests",
            style("acton-crud, validator, chrono").yellow(),
            style("tokio, axum-test").yellow()
        );
        println!("  5. Run the tests: {}", style("cargo test").yellow());
    }
}

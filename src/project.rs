//! Project-level entry point tying configuration, selection and loading together.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::{Catalog, load_catalog_dir};
use crate::config::CatalogConfig;
use crate::resolver::ResolverOptions;
use crate::selection::UnitSelection;

/// A project directory and the configuration discovered in it.
#[derive(Debug, Clone)]
pub struct CatalogProject {
  project_dir: PathBuf,
  config: CatalogConfig,
}

impl CatalogProject {
  /// Discover configuration in `project_dir`, falling back to defaults.
  pub fn discover(project_dir: impl Into<PathBuf>) -> Self {
    let project_dir = project_dir.into();
    let config = CatalogConfig::discover(&project_dir);
    Self {
      project_dir,
      config,
    }
  }

  /// Use an explicit configuration for `project_dir`.
  pub fn with_config(project_dir: impl Into<PathBuf>, config: CatalogConfig) -> Self {
    Self {
      project_dir: project_dir.into(),
      config,
    }
  }

  /// Root directory of the project.
  pub fn project_dir(&self) -> &Path {
    &self.project_dir
  }

  /// Active configuration.
  pub fn config(&self) -> &CatalogConfig {
    &self.config
  }

  /// Resolver options derived from the configuration.
  pub fn resolver_options(&self) -> ResolverOptions {
    self.config.to_options()
  }

  /// Load the catalog from the configured JSON export, or by scanning the content directory.
  pub fn load_catalog(&self) -> Result<Catalog> {
    if let Some(export) = self.config.catalog_json_path(&self.project_dir) {
      let catalog = Catalog::from_json_file(&export)
        .with_context(|| format!("failed to load catalog export {}", export.display()))?;
      info!(units = catalog.len(), path = %export.display(), "loaded catalog export");
      return Ok(catalog);
    }

    let content_dir = self.config.content_dir_path(&self.project_dir);
    let selection_path = self.config.selection_file_path(&self.project_dir);
    let selection = UnitSelection::load_from_path(&selection_path)?;
    let catalog = load_catalog_dir(&self.config.layout(), &content_dir, &selection)
      .with_context(|| format!("failed to load content from {}", content_dir.display()))?;
    info!(units = catalog.len(), path = %content_dir.display(), "loaded content directory");
    Ok(catalog)
  }
}

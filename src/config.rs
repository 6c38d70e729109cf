//! Project configuration loader describing where content lives and how it is presented.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::navigation::LabelTable;
use crate::resolver::{DEFAULT_BASE_ROUTE, ResolverOptions};
use crate::selection::DEFAULT_SELECTION_FILE;
use crate::theme::{Theme, ThemePalette};

/// Configuration file searched for in the project directory.
pub const DEFAULT_CONFIG_FILE: &str = "catalog.config.json";

/// Discoverable project configuration describing content layout and presentation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Relative path from the project directory to the authored units.
    pub content_dir: String,
    /// Optional catalog JSON export used instead of scanning `content_dir`.
    pub catalog_json: Option<String>,
    /// Route prefix for generated breadcrumb and neighbour paths.
    pub base_route: String,
    /// Metadata filename describing a unit (title, description, etc.).
    pub unit_metadata_file: String,
    /// Metadata filename describing a week.
    pub week_metadata_file: String,
    /// File extension of activity markdown files.
    pub activity_extension: String,
    /// Selection file inside `content_dir` limiting which units are loaded.
    pub selection_file: String,
    /// Explicit breadcrumb labels keyed by route key or scope.
    pub labels: IndexMap<String, String>,
    /// Explicit theme names keyed by unit id.
    pub theme_overrides: IndexMap<String, String>,
    /// Custom positional palette replacing the built-in themes.
    pub palette: Vec<Theme>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            content_dir: "content/units".into(),
            catalog_json: None,
            base_route: DEFAULT_BASE_ROUTE.into(),
            unit_metadata_file: "unit.json".into(),
            week_metadata_file: "week.json".into(),
            activity_extension: "md".into(),
            selection_file: DEFAULT_SELECTION_FILE.into(),
            labels: IndexMap::new(),
            theme_overrides: IndexMap::new(),
            palette: Vec::new(),
        }
    }
}

/// Borrowed view of the file naming rules used while scanning content.
#[derive(Debug, Clone, Copy)]
pub struct ContentLayout<'a> {
    /// Name of the unit metadata file.
    pub unit_metadata_file: &'a str,
    /// Name of the week metadata file.
    pub week_metadata_file: &'a str,
    /// Extension of activity files, without the dot.
    pub activity_extension: &'a str,
}

impl CatalogConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall back to default
    /// values so callers can continue operating with sensible assumptions.
    pub fn discover(project_dir: &Path) -> Self {
        let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %candidate.display(), error = %err, "ignoring unusable config");
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// File naming rules for the content scanner.
    pub fn layout(&self) -> ContentLayout<'_> {
        ContentLayout {
            unit_metadata_file: &self.unit_metadata_file,
            week_metadata_file: &self.week_metadata_file,
            activity_extension: self.activity_extension.trim_start_matches('.'),
        }
    }

    /// Convert the presentation settings into resolver options.
    pub fn to_options(&self) -> ResolverOptions {
        ResolverOptions {
            base_route: self.base_route.clone(),
            labels: LabelTable::new(self.labels.clone()),
            use_record_titles: true,
            palette: ThemePalette::new(self.palette.clone(), self.theme_overrides.clone()),
        }
    }

    /// Path to the authored units relative to the project root.
    pub fn content_dir_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.content_dir)
    }

    /// Path to the selection file.
    pub fn selection_file_path(&self, project_dir: &Path) -> PathBuf {
        project_dir
            .join(&self.content_dir)
            .join(&self.selection_file)
    }

    /// Path to the catalog export, when one is configured.
    pub fn catalog_json_path(&self, project_dir: &Path) -> Option<PathBuf> {
        self.catalog_json
            .as_ref()
            .map(|relative| project_dir.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovers_defaults_without_a_config_file() {
        let temp = tempdir().unwrap();
        let config = CatalogConfig::discover(temp.path());
        assert_eq!(config.base_route, "/curriculum");
        assert_eq!(config.unit_metadata_file, "unit.json");
        assert_eq!(
            config.selection_file_path(temp.path()),
            temp.path().join("content/units/units.local.json")
        );
    }

    #[test]
    fn reads_partial_configuration() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join(DEFAULT_CONFIG_FILE),
            r#"{
              "baseRoute": "/units",
              "activityExtension": ".markdown",
              "labels": {"games-unit": "Let's Play"},
              "themeOverrides": {"games-unit": "coral"},
              "catalogJson": "export/catalog.json"
            }"#,
        )
        .unwrap();

        let config = CatalogConfig::discover(temp.path());
        assert_eq!(config.base_route, "/units");
        assert_eq!(config.content_dir, "content/units");
        assert_eq!(config.layout().activity_extension, "markdown");
        assert_eq!(
            config.catalog_json_path(temp.path()),
            Some(temp.path().join("export/catalog.json"))
        );

        let options = config.to_options();
        assert_eq!(options.base_route, "/units");
        assert_eq!(options.palette.select("games-unit", Some(1)).name, "coral");
    }

    #[test]
    fn falls_back_to_defaults_for_malformed_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();

        let config = CatalogConfig::discover(temp.path());
        assert_eq!(config.base_route, "/curriculum");
        assert!(CatalogConfig::from_path(&temp.path().join(DEFAULT_CONFIG_FILE)).is_err());
    }

    #[test]
    fn custom_palette_replaces_builtin_themes() {
        let config: CatalogConfig = serde_json::from_str(
            r##"{"palette": [{"name": "night", "background": "#000", "border": "#111", "accent": "#222", "text": "#fff"}]}"##,
        )
        .unwrap();

        let options = config.to_options();
        assert_eq!(options.palette.themes().len(), 1);
        assert_eq!(options.palette.select("any-unit", Some(4)).name, "night");
    }
}

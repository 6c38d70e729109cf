//! Helpers used to filter which units and weeks are loaded into a catalog.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Trait describing selection filters for authored content.
///
/// Scopes are either a unit id (`games-unit`) or a unit-qualified week (`games-unit/week2`).
pub trait UnitInclusion {
  /// Returns `true` when the scope should be loaded into the catalog.
  fn is_included(&self, scope: &str) -> bool;
}

/// Default selection file name searched for in the content directory.
pub const DEFAULT_SELECTION_FILE: &str = "units.local.json";

/// Configuration file layout for selecting which units to load.
#[derive(Debug, Default, Deserialize)]
struct UnitSelectionFile {
  #[serde(default)]
  include: Vec<String>,
  #[serde(default)]
  exclude: Vec<String>,
}

/// Selection helper allowing load-time filtering of authored units.
#[derive(Debug, Clone, Default)]
pub struct UnitSelection {
  include: Option<BTreeSet<String>>,
  exclude: BTreeSet<String>,
}

/// Errors that can occur while loading the selection configuration.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
  /// Failed to read the selection file from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse the JSON selection file.
  #[error("failed to parse {}: {source}", .path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

impl UnitSelection {
  /// Load configuration from the selection file if present.
  pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
      Ok(contents) => contents,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
        return Ok(Self::default());
      }
      Err(err) => {
        return Err(SelectionError::Io {
          path: path.to_path_buf(),
          source: err,
        });
      }
    };

    let file: UnitSelectionFile =
      serde_json::from_str(&contents).map_err(|err| SelectionError::Parse {
        path: path.to_path_buf(),
        source: err,
      })?;
    Ok(Self::from(file))
  }

  /// Determine whether a unit or week scope should be loaded.
  ///
  /// An include rule for a week also admits its parent unit so the week can be reached.
  pub fn is_included(&self, scope: &str) -> bool {
    if self
      .exclude
      .iter()
      .any(|value| scope_matches(value, scope))
    {
      return false;
    }

    match &self.include {
      Some(include) => include
        .iter()
        .any(|value| scope_matches(value, scope) || scope_matches(scope, value)),
      None => true,
    }
  }

  /// Returns true when no filtering rules are active.
  pub fn is_unfiltered(&self) -> bool {
    self.include.as_ref().is_none() && self.exclude.is_empty()
  }
}

impl UnitInclusion for UnitSelection {
  fn is_included(&self, scope: &str) -> bool {
    UnitSelection::is_included(self, scope)
  }
}

impl From<UnitSelectionFile> for UnitSelection {
  fn from(file: UnitSelectionFile) -> Self {
    let include = normalise_list(file.include);
    let exclude = normalise_list(file.exclude);

    Self {
      include: (!include.is_empty()).then_some(include),
      exclude,
    }
  }
}

/// Convert a list of raw scopes into a sorted, de-duplicated set.
///
/// Values are trimmed and empty entries are discarded to simplify downstream filtering logic.
fn normalise_list(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
  values
    .into_iter()
    .map(|value| value.trim().trim_matches('/').to_string())
    .filter(|value| !value.is_empty())
    .collect()
}

fn scope_matches(rule: &str, candidate: &str) -> bool {
  if candidate == rule {
    return true;
  }

  candidate
    .strip_prefix(rule)
    .is_some_and(|suffix| suffix.starts_with('/'))
}

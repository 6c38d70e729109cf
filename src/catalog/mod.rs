//! Validated, read-only content table of units, weeks and activities.
//!
//! A [`Catalog`] is constructed once, either from a JSON export or from an authored content
//! directory (see [`load_catalog_dir`]), and is never mutated afterwards. Every invariant of
//! the content model is checked at construction so the resolver can rely on unique keys and
//! non-empty weeks.

mod keys;
mod loading;
mod markdown;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::ContentUnit;

pub use keys::{is_url_safe_key, parse_week_key};
pub use loading::{LoadError, load_catalog_dir};
pub use markdown::{extract_first_heading, parse_activity_markdown, parse_order_from_id, render_notes_html};

/// Errors raised when a content table violates the catalog invariants.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  /// Two units share the same id.
  #[error("duplicate unit id '{0}'")]
  DuplicateUnit(String),
  /// A unit declares no weeks.
  #[error("unit '{0}' has no weeks")]
  EmptyUnit(String),
  /// Two weeks of the same unit share a number.
  #[error("unit '{unit}' declares week {number} more than once")]
  DuplicateWeek {
    /// Owning unit id.
    unit: String,
    /// Repeated week number.
    number: u32,
  },
  /// Week numbers start at one.
  #[error("unit '{0}' declares week 0; week numbers start at 1")]
  ZeroWeek(String),
  /// A week declares no activities.
  #[error("week {number} of unit '{unit}' has no activities")]
  EmptyWeek {
    /// Owning unit id.
    unit: String,
    /// Week number.
    number: u32,
  },
  /// Two activities of the same week share a slug.
  #[error("week {number} of unit '{unit}' declares activity '{slug}' more than once")]
  DuplicateActivity {
    /// Owning unit id.
    unit: String,
    /// Week number.
    number: u32,
    /// Repeated slug.
    slug: String,
  },
  /// A unit id or activity slug cannot be used as a route segment.
  #[error("'{0}' is not a url-safe key")]
  InvalidKey(String),
  /// Failed to read a catalog export from disk.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// Failed to parse a catalog export.
  #[error("failed to parse catalog json: {0}")]
  Parse(#[from] serde_json::Error),
}

/// Immutable, validated mapping of unit id to unit in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
  units: IndexMap<String, ContentUnit>,
}

/// Serialises as the same array-of-units shape accepted by [`Catalog::from_json_str`].
impl Serialize for Catalog {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.units.values())
  }
}

impl Catalog {
  /// Build a catalog from units in declaration order, validating every invariant.
  pub fn new(units: impl IntoIterator<Item = ContentUnit>) -> Result<Self, CatalogError> {
    let mut map = IndexMap::new();
    for unit in units {
      validate_unit(&unit)?;
      if map.contains_key(&unit.id) {
        return Err(CatalogError::DuplicateUnit(unit.id));
      }
      map.insert(unit.id.clone(), unit);
    }
    Ok(Self { units: map })
  }

  /// Parse a catalog export: a JSON array of units.
  pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
    let units: Vec<ContentUnit> = serde_json::from_str(json)?;
    Self::new(units)
  }

  /// Read and parse a catalog export from disk.
  pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json_str(&contents)
  }

  /// Look up a unit by id.
  pub fn unit(&self, id: &str) -> Option<&ContentUnit> {
    self.units.get(id)
  }

  /// Position of a unit in declaration order.
  pub fn unit_index(&self, id: &str) -> Option<usize> {
    self.units.get_index_of(id)
  }

  /// Unit at a declaration-order position.
  pub fn unit_at(&self, index: usize) -> Option<&ContentUnit> {
    self.units.get_index(index).map(|(_, unit)| unit)
  }

  /// Iterate over units in declaration order.
  pub fn units(&self) -> impl Iterator<Item = &ContentUnit> {
    self.units.values()
  }

  /// Number of units in the catalog.
  pub fn len(&self) -> usize {
    self.units.len()
  }

  /// Returns true when the catalog holds no units.
  pub fn is_empty(&self) -> bool {
    self.units.is_empty()
  }
}

fn validate_unit(unit: &ContentUnit) -> Result<(), CatalogError> {
  if !is_url_safe_key(&unit.id) {
    return Err(CatalogError::InvalidKey(unit.id.clone()));
  }
  if unit.weeks.is_empty() {
    return Err(CatalogError::EmptyUnit(unit.id.clone()));
  }

  let mut numbers = BTreeSet::new();
  for week in &unit.weeks {
    if week.number == 0 {
      return Err(CatalogError::ZeroWeek(unit.id.clone()));
    }
    if !numbers.insert(week.number) {
      return Err(CatalogError::DuplicateWeek {
        unit: unit.id.clone(),
        number: week.number,
      });
    }
    if week.activities.is_empty() {
      return Err(CatalogError::EmptyWeek {
        unit: unit.id.clone(),
        number: week.number,
      });
    }

    let mut slugs = BTreeSet::new();
    for activity in &week.activities {
      if !is_url_safe_key(&activity.slug) {
        return Err(CatalogError::InvalidKey(activity.slug.clone()));
      }
      if !slugs.insert(activity.slug.as_str()) {
        return Err(CatalogError::DuplicateActivity {
          unit: unit.id.clone(),
          number: week.number,
          slug: activity.slug.clone(),
        });
      }
    }
  }

  Ok(())
}

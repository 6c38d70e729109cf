//! Build a catalog by scanning an authored content directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::catalog::markdown::{
  extract_first_heading, parse_activity_markdown, parse_order_from_id, render_notes_html,
  strip_order_prefix,
};
use crate::catalog::{Catalog, CatalogError, is_url_safe_key, parse_week_key};
use crate::config::ContentLayout;
use crate::models::{Activity, ContentUnit, UnitMetaRecord, WeekMetaRecord, WeeklyActivity};
use crate::selection::{SelectionError, UnitInclusion};

/// Errors that abort loading a content directory.
///
/// Individual malformed files are skipped with a warning; only problems that make the whole
/// directory unusable are reported here.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
  /// The content directory itself could not be read.
  #[error("failed to read content directory {}: {source}", .path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The selection file exists but is unusable.
  #[error(transparent)]
  Selection(#[from] SelectionError),
  /// The assembled content violates the catalog invariants.
  #[error(transparent)]
  Catalog(#[from] CatalogError),
}

/// Traverse the authored units and assemble a validated catalog.
#[instrument(skip_all, fields(content_dir = %content_dir.display()))]
pub fn load_catalog_dir<S: UnitInclusion>(
  layout: &ContentLayout,
  content_dir: &Path,
  selection: &S,
) -> Result<Catalog, LoadError> {
  let entries = fs::read_dir(content_dir).map_err(|source| LoadError::Io {
    path: content_dir.to_path_buf(),
    source,
  })?;

  let mut units: Vec<ContentUnit> = Vec::new();

  for entry in entries.flatten() {
    if !entry.file_type().is_ok_and(|ft| ft.is_dir()) {
      continue;
    }

    let unit_id = entry.file_name().to_string_lossy().to_string();
    if unit_id.starts_with('.') {
      continue;
    }
    if !is_url_safe_key(&unit_id) {
      warn!(unit = %unit_id, "skipping unit directory with a non url-safe name");
      continue;
    }

    if !selection.is_included(&unit_id) {
      debug!(unit = %unit_id, "unit excluded by selection");
      continue;
    }

    let unit_path = entry.path();
    let meta_path = unit_path.join(layout.unit_metadata_file);
    if !meta_path.exists() {
      continue;
    }

    let meta: UnitMetaRecord = match read_json(&meta_path) {
      Some(meta) => meta,
      None => continue,
    };

    let weeks = load_weeks(layout, &unit_id, &unit_path, selection);
    if weeks.is_empty() {
      warn!(unit = %unit_id, "skipping unit without any loadable weeks");
      continue;
    }

    units.push(ContentUnit {
      id: unit_id,
      title: meta.title,
      description: meta.description,
      order: meta.order,
      theme: meta.theme,
      weeks,
    });
  }

  units.sort_by(|unit_a, unit_b| {
    unit_a
      .order
      .unwrap_or(usize::MAX)
      .cmp(&unit_b.order.unwrap_or(usize::MAX))
      .then_with(|| unit_a.id.cmp(&unit_b.id))
  });

  debug!(units = units.len(), "content directory scanned");
  Ok(Catalog::new(units)?)
}

fn load_weeks<S: UnitInclusion>(
  layout: &ContentLayout,
  unit_id: &str,
  unit_path: &Path,
  selection: &S,
) -> Vec<WeeklyActivity> {
  let mut weeks = Vec::new();

  let Ok(entries) = fs::read_dir(unit_path) else {
    return weeks;
  };

  for entry in entries.flatten() {
    if !entry.file_type().is_ok_and(|ft| ft.is_dir()) {
      continue;
    }

    let week_key = entry.file_name().to_string_lossy().to_string();
    let Some(number) = parse_week_key(&week_key) else {
      continue;
    };

    if !selection.is_included(&format!("{unit_id}/{week_key}")) {
      debug!(unit = %unit_id, week = number, "week excluded by selection");
      continue;
    }

    let week_path = entry.path();
    let meta_path = week_path.join(layout.week_metadata_file);
    let meta: WeekMetaRecord = if meta_path.exists() {
      read_json(&meta_path).unwrap_or_default()
    } else {
      WeekMetaRecord::default()
    };

    let activities = load_activities(layout, &week_path);
    if activities.is_empty() {
      warn!(unit = %unit_id, week = number, "skipping week without any activities");
      continue;
    }

    weeks.push(WeeklyActivity {
      number,
      title: meta.title.unwrap_or_else(|| format!("Week {number}")),
      theme: meta.theme,
      activities,
    });
  }

  weeks.sort_by_key(|week| week.number);
  weeks
}

fn load_activities(layout: &ContentLayout, week_path: &Path) -> Vec<Activity> {
  let mut activities: Vec<(usize, Activity)> = Vec::new();

  let Ok(entries) = fs::read_dir(week_path) else {
    return Vec::new();
  };

  for entry in entries.flatten() {
    let path = entry.path();
    if !path.is_file() {
      continue;
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some(layout.activity_extension) {
      continue;
    }
    let Some(stem) = path.file_stem().map(|stem| stem.to_string_lossy().to_string()) else {
      continue;
    };
    if stem.starts_with('.') {
      continue;
    }

    let slug = strip_order_prefix(&stem).to_string();
    if !is_url_safe_key(&slug) {
      warn!(path = %path.display(), "skipping activity file with a non url-safe name");
      continue;
    }

    let Some((frontmatter, body)) = parse_activity_markdown(&path) else {
      warn!(path = %path.display(), "skipping activity with unreadable frontmatter");
      continue;
    };

    let order = frontmatter
      .order
      .or_else(|| parse_order_from_id(&stem))
      .unwrap_or(usize::MAX);
    let title = frontmatter
      .title
      .clone()
      .or_else(|| extract_first_heading(&body))
      .unwrap_or_else(|| slug.clone());
    let notes_html = render_notes_html(&body);

    activities.push((order, frontmatter.into_activity(slug, title, notes_html)));
  }

  activities.sort_by(|(order_a, activity_a), (order_b, activity_b)| {
    order_a
      .cmp(order_b)
      .then_with(|| activity_a.slug.cmp(&activity_b.slug))
  });

  activities.into_iter().map(|(_, activity)| activity).collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
  let contents = match fs::read_to_string(path) {
    Ok(contents) => contents,
    Err(err) => {
      warn!(path = %path.display(), error = %err, "failed to read metadata");
      return None;
    }
  };

  match serde_json::from_str(&contents) {
    Ok(value) => Some(value),
    Err(err) => {
      warn!(path = %path.display(), error = %err, "failed to parse metadata");
      None
    }
  }
}

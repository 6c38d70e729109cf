//! Navigation metadata derived for a resolved route: breadcrumbs, neighbours and theme.

use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::{Catalog, parse_week_key};
use crate::theme::Theme;

/// Depth of a key within a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLevel {
  /// First segment: a unit id.
  Unit,
  /// Second segment: a week key.
  Week,
  /// Third segment: an activity slug.
  Activity,
}

impl KeyLevel {
  /// Level of the segment at a 0-based depth, if the depth is addressable.
  pub fn from_depth(depth: usize) -> Option<Self> {
    match depth {
      0 => Some(Self::Unit),
      1 => Some(Self::Week),
      2 => Some(Self::Activity),
      _ => None,
    }
  }

  fn generic_label(self, key: &str) -> String {
    match self {
      Self::Unit => "Unit".to_string(),
      Self::Week => parse_week_key(key)
        .map(|number| format!("Week {number}"))
        .unwrap_or_else(|| "Week".to_string()),
      Self::Activity => "Activity".to_string(),
    }
  }
}

/// Lookup table from route keys to human labels.
///
/// Explicit entries may be keyed by a bare segment (`week1`) or by a slash-joined scope
/// (`games-unit/week1`); scoped entries win because bare week keys repeat across units.
/// Record titles are kept apart under scoped keys and only apply when no explicit entry
/// matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
  labels: IndexMap<String, String>,
  titles: IndexMap<String, String>,
}

impl LabelTable {
  /// Create a table from explicit entries.
  pub fn new(labels: IndexMap<String, String>) -> Self {
    Self {
      labels,
      titles: IndexMap::new(),
    }
  }

  /// Populate scoped labels from the titles of every record in the catalog.
  pub fn from_catalog(catalog: &Catalog) -> Self {
    let mut titles = IndexMap::new();
    for unit in catalog.units() {
      titles.insert(unit.id.clone(), unit.title.clone());
      for week in &unit.weeks {
        let week_scope = format!("{}/{}", unit.id, week.key());
        for activity in &week.activities {
          titles.insert(
            format!("{week_scope}/{}", activity.slug),
            activity.title.clone(),
          );
        }
        titles.insert(week_scope, week.title.clone());
      }
    }
    Self {
      labels: IndexMap::new(),
      titles,
    }
  }

  /// Overlay entries from another table, replacing existing labels and titles.
  pub fn merged_with(mut self, overrides: &LabelTable) -> Self {
    for (key, label) in &overrides.labels {
      self.labels.insert(key.clone(), label.clone());
    }
    for (key, title) in &overrides.titles {
      self.titles.insert(key.clone(), title.clone());
    }
    self
  }

  /// Insert a single explicit label.
  pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
    self.labels.insert(key.into(), label.into());
  }

  /// Label for the last segment of `scope`.
  ///
  /// Tries explicit scoped and bare entries, then the record title, then a generic level label.
  pub fn label(&self, scope: &[String], level: KeyLevel) -> String {
    let Some(key) = scope.last() else {
      return level.generic_label("");
    };

    let scoped = scope.join("/");
    self
      .labels
      .get(&scoped)
      .or_else(|| self.labels.get(key))
      .or_else(|| self.titles.get(&scoped))
      .cloned()
      .unwrap_or_else(|| level.generic_label(key))
  }
}

/// One entry in the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
  /// Human label for the level.
  pub label: String,
  /// Route path of the level.
  pub path: String,
}

/// Reference to a neighbouring record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
  /// Human label of the target.
  pub label: String,
  /// Route path of the target.
  pub path: String,
  /// Keys identifying the target.
  pub key_path: Vec<String>,
}

impl NavLink {
  pub(crate) fn new(label: String, base_route: &str, key_path: Vec<String>) -> Self {
    Self {
      label,
      path: join_route(base_route, &key_path),
      key_path,
    }
  }
}

/// Navigation metadata computed fresh for every resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationContext {
  /// One entry per consumed key, outermost first.
  pub breadcrumbs: Vec<Breadcrumb>,
  /// Preceding sibling, `None` at the first position.
  pub previous: Option<NavLink>,
  /// Following sibling, `None` at the last position.
  pub next: Option<NavLink>,
  /// Theme tokens for the view.
  pub theme: Theme,
}

/// Build one breadcrumb per key, each linking to the route of its prefix.
pub fn build_breadcrumbs(labels: &LabelTable, base_route: &str, keys: &[String]) -> Vec<Breadcrumb> {
  (1..=keys.len())
    .map(|depth| {
      let scope = &keys[..depth];
      let level = KeyLevel::from_depth(depth - 1).unwrap_or(KeyLevel::Activity);
      Breadcrumb {
        label: labels.label(scope, level),
        path: join_route(base_route, scope),
      }
    })
    .collect()
}

/// Join route segments onto a base route, normalising slashes.
pub fn join_route(base_route: &str, segments: &[String]) -> String {
  let base = base_route.trim_end_matches('/');
  let mut path = if base.is_empty() || base.starts_with('/') {
    base.to_string()
  } else {
    format!("/{base}")
  };

  for segment in segments {
    path.push('/');
    path.push_str(segment);
  }

  if path.is_empty() {
    path.push('/');
  }
  path
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fixtures::sample_units;

  fn keys(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
  }

  #[test]
  fn joins_routes_with_normalised_slashes() {
    assert_eq!(join_route("/curriculum", &keys(&["games-unit"])), "/curriculum/games-unit");
    assert_eq!(join_route("/curriculum/", &keys(&["a", "b"])), "/curriculum/a/b");
    assert_eq!(join_route("curriculum", &keys(&["a"])), "/curriculum/a");
    assert_eq!(join_route("", &keys(&["a"])), "/a");
    assert_eq!(join_route("/", &[]), "/");
  }

  #[test]
  fn labels_prefer_scoped_then_bare_then_generic() {
    let mut labels = LabelTable::default();
    labels.insert("week1", "First Week");
    labels.insert("games-unit/week1", "Games Week One");

    assert_eq!(
      labels.label(&keys(&["games-unit", "week1"]), KeyLevel::Week),
      "Games Week One"
    );
    assert_eq!(
      labels.label(&keys(&["belonging-unit", "week1"]), KeyLevel::Week),
      "First Week"
    );
    assert_eq!(
      labels.label(&keys(&["belonging-unit", "week4"]), KeyLevel::Week),
      "Week 4"
    );
    assert_eq!(labels.label(&keys(&["mystery-unit"]), KeyLevel::Unit), "Unit");
  }

  #[test]
  fn catalog_labels_use_record_titles() {
    let catalog = Catalog::new(sample_units()).unwrap();
    let labels = LabelTable::from_catalog(&catalog);

    assert_eq!(labels.label(&keys(&["games-unit"]), KeyLevel::Unit), "Games Unit");
    assert_eq!(
      labels.label(&keys(&["games-unit", "week2"]), KeyLevel::Week),
      "Taking Turns"
    );
    assert_eq!(
      labels.label(&keys(&["belonging-unit", "week1"]), KeyLevel::Week),
      "All About Me"
    );
    assert_eq!(
      labels.label(&keys(&["games-unit", "week1", "parachute-play"]), KeyLevel::Activity),
      "Parachute Play"
    );
  }

  #[test]
  fn overrides_replace_catalog_labels() {
    let catalog = Catalog::new(sample_units()).unwrap();
    let mut overrides = LabelTable::default();
    overrides.insert("games-unit", "Let's Play");
    overrides.insert("week1", "First Week");
    overrides.insert("belonging-unit/week1", "Me and My Family");
    let labels = LabelTable::from_catalog(&catalog).merged_with(&overrides);

    assert_eq!(labels.label(&keys(&["games-unit"]), KeyLevel::Unit), "Let's Play");
    assert_eq!(
      labels.label(&keys(&["games-unit", "week1"]), KeyLevel::Week),
      "First Week"
    );
    assert_eq!(
      labels.label(&keys(&["belonging-unit", "week1"]), KeyLevel::Week),
      "Me and My Family"
    );
    assert_eq!(
      labels.label(&keys(&["games-unit", "week2"]), KeyLevel::Week),
      "Taking Turns"
    );
  }

  #[test]
  fn builds_one_breadcrumb_per_key() {
    let labels = LabelTable::default();
    let trail = build_breadcrumbs(&labels, "/curriculum", &keys(&["games-unit", "week1", "x"]));

    assert_eq!(trail.len(), 3);
    assert_eq!(trail[0], Breadcrumb {
      label: "Unit".into(),
      path: "/curriculum/games-unit".into(),
    });
    assert_eq!(trail[1].label, "Week 1");
    assert_eq!(trail[2].path, "/curriculum/games-unit/week1/x");
  }
}

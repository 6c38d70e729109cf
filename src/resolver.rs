//! Resolve route keys against the catalog and derive navigation for the result.
//!
//! Resolution walks the catalog one key at a time: unit id, then week key, then activity
//! slug. The first key that does not match stops the walk and yields a [`NotFound`] carrying
//! the keys consumed so far, which callers use to render a not-found view or redirect to the
//! deepest ancestor that does exist. There is no partial or fuzzy matching.
//!
//! ```
//! use curriculum_catalog::{Catalog, ContentResolver, KeyPath, ResolverOptions};
//!
//! let catalog = Catalog::from_json_str(r#"[{
//!   "id": "games-unit", "title": "Games Unit",
//!   "weeks": [{"number": 1, "title": "Playing Together",
//!     "activities": [{"slug": "favourite-game-show-tell", "title": "Show and Tell"}]}]
//! }]"#).unwrap();
//! let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
//!
//! let path = KeyPath::new(["games-unit", "week1", "favourite-game-show-tell"]).unwrap();
//! let resolved = resolver.resolve(&path).unwrap();
//! assert_eq!(resolved.navigation.breadcrumbs.len(), 3);
//! assert!(resolved.navigation.previous.is_none());
//!
//! let missing = KeyPath::new(["games-unit", "week1", "nonexistent-slug"]).unwrap();
//! let not_found = resolver.resolve(&missing).unwrap_err();
//! assert_eq!(not_found.consumed, vec!["games-unit", "week1"]);
//! ```

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{Activity, ContentUnit, WeeklyActivity};
use crate::navigation::{
  KeyLevel, LabelTable, NavLink, NavigationContext, build_breadcrumbs, join_route,
};
use crate::theme::ThemePalette;

/// Default base route prefixed to every generated path.
pub const DEFAULT_BASE_ROUTE: &str = "/curriculum";

/// Malformed key paths. These are caller bugs, not missing content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyPathError {
  /// The key path has no segments.
  #[error("key path must contain at least one segment")]
  Empty,
  /// A segment is empty or whitespace.
  #[error("key path segment {index} is empty")]
  EmptySegment {
    /// 0-based position of the offending segment.
    index: usize,
  },
}

/// Validated, non-empty sequence of route keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPath {
  segments: Vec<String>,
}

impl KeyPath {
  /// Validate route keys extracted by the router.
  pub fn new<I, S>(segments: I) -> Result<Self, KeyPathError>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
    if segments.is_empty() {
      return Err(KeyPathError::Empty);
    }
    if let Some(index) = segments.iter().position(|segment| segment.trim().is_empty()) {
      return Err(KeyPathError::EmptySegment { index });
    }
    Ok(Self { segments })
  }

  /// Split a route such as `/games-unit/week1/show-tell` into a key path.
  ///
  /// Leading and trailing slashes are ignored; doubled slashes inside the route are an
  /// empty segment.
  pub fn parse_route(route: &str) -> Result<Self, KeyPathError> {
    let trimmed = route.trim().trim_matches('/');
    if trimmed.is_empty() {
      return Err(KeyPathError::Empty);
    }
    Self::new(trimmed.split('/'))
  }

  /// Keys in route order.
  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  /// Number of keys.
  #[allow(clippy::len_without_is_empty)]
  pub fn len(&self) -> usize {
    self.segments.len()
  }
}

/// A route that does not fully resolve. This is an expected outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("no content for '{missing}' under /{}", .consumed.join("/"))]
pub struct NotFound {
  /// Keys that resolved before the walk stopped.
  pub consumed: Vec<String>,
  /// The first key that did not resolve.
  pub missing: String,
}

impl NotFound {
  /// Route of the deepest resolvable ancestor, suitable for a redirect.
  pub fn redirect_path(&self, base_route: &str) -> String {
    join_route(base_route, &self.consumed)
  }
}

/// The record a key path resolved to, borrowed from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentRecord<'a> {
  /// A unit id on its own.
  Unit {
    /// Resolved unit.
    unit: &'a ContentUnit,
  },
  /// A unit id and week key.
  Week {
    /// Owning unit.
    unit: &'a ContentUnit,
    /// Resolved week.
    week: &'a WeeklyActivity,
  },
  /// A full unit/week/activity path.
  Activity {
    /// Owning unit.
    unit: &'a ContentUnit,
    /// Owning week.
    week: &'a WeeklyActivity,
    /// Resolved activity.
    activity: &'a Activity,
  },
}

impl<'a> ContentRecord<'a> {
  /// Unit the record belongs to.
  pub fn unit(&self) -> &'a ContentUnit {
    match *self {
      Self::Unit { unit } | Self::Week { unit, .. } | Self::Activity { unit, .. } => unit,
    }
  }

  /// Week the record belongs to, if resolved that deep.
  pub fn week(&self) -> Option<&'a WeeklyActivity> {
    match *self {
      Self::Unit { .. } => None,
      Self::Week { week, .. } | Self::Activity { week, .. } => Some(week),
    }
  }

  /// Activity, if the path resolved to one.
  pub fn activity(&self) -> Option<&'a Activity> {
    match *self {
      Self::Activity { activity, .. } => Some(activity),
      _ => None,
    }
  }

  /// Depth of the record.
  pub fn level(&self) -> KeyLevel {
    match self {
      Self::Unit { .. } => KeyLevel::Unit,
      Self::Week { .. } => KeyLevel::Week,
      Self::Activity { .. } => KeyLevel::Activity,
    }
  }
}

/// A resolved record plus its navigation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedContent<'a> {
  /// Record stored at the key path.
  pub record: ContentRecord<'a>,
  /// Breadcrumbs, neighbours and theme for the record.
  pub navigation: NavigationContext,
}

/// Presentation settings applied to every resolution.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
  /// Base route prefixed to breadcrumb and neighbour paths.
  pub base_route: String,
  /// Explicit labels, layered over record titles when `use_record_titles` is set.
  pub labels: LabelTable,
  /// Populate labels from catalog titles before applying `labels`.
  pub use_record_titles: bool,
  /// Theme palette and unit overrides.
  pub palette: ThemePalette,
}

impl Default for ResolverOptions {
  fn default() -> Self {
    Self {
      base_route: DEFAULT_BASE_ROUTE.to_string(),
      labels: LabelTable::default(),
      use_record_titles: true,
      palette: ThemePalette::default(),
    }
  }
}

/// Stateless resolver over a borrowed catalog.
#[derive(Debug, Clone)]
pub struct ContentResolver<'a> {
  catalog: &'a Catalog,
  base_route: String,
  labels: LabelTable,
  palette: ThemePalette,
}

impl<'a> ContentResolver<'a> {
  /// Create a resolver for a catalog.
  pub fn new(catalog: &'a Catalog, options: ResolverOptions) -> Self {
    let labels = if options.use_record_titles {
      LabelTable::from_catalog(catalog).merged_with(&options.labels)
    } else {
      options.labels
    };

    Self {
      catalog,
      base_route: options.base_route,
      labels,
      palette: options.palette,
    }
  }

  /// Base route used for generated paths.
  pub fn base_route(&self) -> &str {
    &self.base_route
  }

  /// Resolve a key path to a record and its navigation context.
  pub fn resolve(&self, path: &KeyPath) -> Result<ResolvedContent<'a>, NotFound> {
    let record = self.walk(path.segments())?;
    let consumed = &path.segments()[..record_depth(&record)];

    let navigation = NavigationContext {
      breadcrumbs: build_breadcrumbs(&self.labels, &self.base_route, consumed),
      previous: self.neighbour(&record, Direction::Previous),
      next: self.neighbour(&record, Direction::Next),
      theme: self.palette.select_for(record.unit(), record.week()).clone(),
    };

    Ok(ResolvedContent { record, navigation })
  }

  /// Validate raw route keys and resolve them.
  ///
  /// Panics on a malformed key path; use [`KeyPath::new`] to handle that case explicitly.
  pub fn resolve_keys(&self, keys: &[&str]) -> Result<ResolvedContent<'a>, NotFound> {
    match KeyPath::new(keys.iter().copied()) {
      Ok(path) => self.resolve(&path),
      Err(err) => panic!("invalid key path {keys:?}: {err}"),
    }
  }

  fn walk(&self, segments: &[String]) -> Result<ContentRecord<'a>, NotFound> {
    let not_found = |depth: usize| {
      let missing = segments[depth].clone();
      debug!(consumed = ?&segments[..depth], %missing, "key path did not resolve");
      NotFound {
        consumed: segments[..depth].to_vec(),
        missing,
      }
    };

    let unit = self.catalog.unit(&segments[0]).ok_or_else(|| not_found(0))?;
    let Some(week_key) = segments.get(1) else {
      return Ok(ContentRecord::Unit { unit });
    };

    let week = unit.week(week_key).ok_or_else(|| not_found(1))?;
    let Some(slug) = segments.get(2) else {
      return Ok(ContentRecord::Week { unit, week });
    };

    let activity = week.activity(slug).ok_or_else(|| not_found(2))?;
    if segments.len() > 3 {
      return Err(not_found(3));
    }

    Ok(ContentRecord::Activity {
      unit,
      week,
      activity,
    })
  }

  fn neighbour(&self, record: &ContentRecord<'a>, direction: Direction) -> Option<NavLink> {
    match *record {
      ContentRecord::Unit { unit } => {
        let index = self.catalog.unit_index(&unit.id)?;
        let target = self.catalog.unit_at(direction.step(index)?)?;
        Some(self.link(vec![target.id.clone()], KeyLevel::Unit))
      }
      ContentRecord::Week { unit, week } => {
        let index = unit.weeks.iter().position(|candidate| candidate.number == week.number)?;
        let target = unit.weeks.get(direction.step(index)?)?;
        Some(self.link(vec![unit.id.clone(), target.key()], KeyLevel::Week))
      }
      ContentRecord::Activity {
        unit,
        week,
        activity,
      } => {
        let flattened: Vec<(&WeeklyActivity, &Activity)> = unit.flattened_activities().collect();
        let index = flattened.iter().position(|(candidate_week, candidate)| {
          candidate_week.number == week.number && candidate.slug == activity.slug
        })?;
        let (target_week, target) = flattened.get(direction.step(index)?)?;
        Some(self.link(
          vec![unit.id.clone(), target_week.key(), target.slug.clone()],
          KeyLevel::Activity,
        ))
      }
    }
  }

  fn link(&self, key_path: Vec<String>, level: KeyLevel) -> NavLink {
    let label = self.labels.label(&key_path, level);
    NavLink::new(label, &self.base_route, key_path)
  }
}

fn record_depth(record: &ContentRecord<'_>) -> usize {
  match record.level() {
    KeyLevel::Unit => 1,
    KeyLevel::Week => 2,
    KeyLevel::Activity => 3,
  }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
  Previous,
  Next,
}

impl Direction {
  fn step(self, index: usize) -> Option<usize> {
    match self {
      Self::Previous => index.checked_sub(1),
      Self::Next => index.checked_add(1),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::fixtures::sample_units;
  use pretty_assertions::assert_eq;

  fn catalog() -> Catalog {
    Catalog::new(sample_units()).unwrap()
  }

  fn path(keys: &[&str]) -> KeyPath {
    KeyPath::new(keys.iter().copied()).unwrap()
  }

  #[test]
  fn resolves_activity_to_the_stored_record() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let resolved = resolver
      .resolve(&path(&["games-unit", "week1", "favourite-game-show-tell"]))
      .unwrap();

    let stored = &catalog.unit("games-unit").unwrap().weeks[0].activities[0];
    assert!(std::ptr::eq(resolved.record.activity().unwrap(), stored));
    assert_eq!(resolved.navigation.breadcrumbs.len(), 3);
    assert!(resolved.navigation.previous.is_none());
    assert_eq!(
      resolved.navigation.next.as_ref().map(|link| link.path.as_str()),
      Some("/curriculum/games-unit/week1/parachute-play")
    );
  }

  #[test]
  fn breadcrumbs_use_titles_and_prefix_paths() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
    let resolved = resolver.resolve(&path(&["games-unit", "week2", "board-game-day"])).unwrap();

    let trail: Vec<(&str, &str)> = resolved
      .navigation
      .breadcrumbs
      .iter()
      .map(|crumb| (crumb.label.as_str(), crumb.path.as_str()))
      .collect();
    assert_eq!(trail, vec![
      ("Games Unit", "/curriculum/games-unit"),
      ("Taking Turns", "/curriculum/games-unit/week2"),
      ("Board Game Day", "/curriculum/games-unit/week2/board-game-day"),
    ]);
  }

  #[test]
  fn configured_bare_labels_win_over_record_titles() {
    let catalog = catalog();
    let mut labels = LabelTable::default();
    labels.insert("week1", "First Week");
    labels.insert("parachute-play", "Parachute!");
    let resolver = ContentResolver::new(&catalog, ResolverOptions {
      labels,
      ..ResolverOptions::default()
    });
    let resolved = resolver.resolve(&path(&["games-unit", "week1", "parachute-play"])).unwrap();

    let trail: Vec<&str> = resolved
      .navigation
      .breadcrumbs
      .iter()
      .map(|crumb| crumb.label.as_str())
      .collect();
    assert_eq!(trail, vec!["Games Unit", "First Week", "Parachute!"]);
    assert_eq!(
      resolved.navigation.previous.as_ref().map(|link| link.label.as_str()),
      Some("Favourite Game Show and Tell")
    );
  }

  #[test]
  fn generic_labels_without_record_titles() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions {
      use_record_titles: false,
      ..ResolverOptions::default()
    });
    let resolved = resolver.resolve(&path(&["games-unit", "week1"])).unwrap();

    let labels: Vec<&str> = resolved
      .navigation
      .breadcrumbs
      .iter()
      .map(|crumb| crumb.label.as_str())
      .collect();
    assert_eq!(labels, vec!["Unit", "Week 1"]);
  }

  #[test]
  fn missing_slug_reports_consumed_keys() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let not_found = resolver
      .resolve(&path(&["games-unit", "week1", "nonexistent-slug"]))
      .unwrap_err();

    assert_eq!(not_found, NotFound {
      consumed: vec!["games-unit".into(), "week1".into()],
      missing: "nonexistent-slug".into(),
    });
    assert_eq!(
      not_found.redirect_path(resolver.base_route()),
      "/curriculum/games-unit/week1"
    );
  }

  #[test]
  fn missing_unit_and_week_stop_early() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let unit = resolver.resolve(&path(&["space-unit", "week1"])).unwrap_err();
    assert!(unit.consumed.is_empty());
    assert_eq!(unit.missing, "space-unit");
    assert_eq!(unit.redirect_path("/curriculum"), "/curriculum");

    let week = resolver.resolve(&path(&["belonging-unit", "week2", "family-tree"])).unwrap_err();
    assert_eq!(week.consumed, vec!["belonging-unit".to_string()]);
  }

  #[test]
  fn extra_segments_are_not_found() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let not_found = resolver
      .resolve(&path(&["games-unit", "week2", "board-game-day", "extra"]))
      .unwrap_err();
    assert_eq!(not_found.consumed.len(), 3);
    assert_eq!(not_found.missing, "extra");
  }

  #[test]
  fn resolves_units_and_weeks() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let unit = resolver.resolve(&path(&["belonging-unit"])).unwrap();
    assert!(matches!(unit.record, ContentRecord::Unit { unit } if unit.id == "belonging-unit"));
    assert_eq!(unit.navigation.breadcrumbs.len(), 1);
    assert_eq!(
      unit.navigation.previous.map(|link| link.key_path),
      Some(vec!["games-unit".to_string()])
    );
    assert!(unit.navigation.next.is_none());

    let week = resolver.resolve(&path(&["games-unit", "week1"])).unwrap();
    assert_eq!(week.record.week().map(|week| week.number), Some(1));
    assert!(week.navigation.previous.is_none());
    assert_eq!(
      week.navigation.next.map(|link| link.label),
      Some("Taking Turns".to_string())
    );
  }

  #[test]
  fn previous_and_next_span_weeks_without_wrapping() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());

    let flattened: Vec<KeyPath> = catalog
      .unit("games-unit")
      .unwrap()
      .flattened_activities()
      .map(|(week, activity)| path(&["games-unit", &week.key(), &activity.slug]))
      .collect();

    for (index, current) in flattened.iter().enumerate() {
      let navigation = resolver.resolve(current).unwrap().navigation;
      assert_eq!(navigation.previous.is_none(), index == 0);
      assert_eq!(navigation.next.is_none(), index == flattened.len() - 1);

      if let Some(previous) = navigation.previous {
        let previous_path = KeyPath::new(previous.key_path).unwrap();
        let back = resolver.resolve(&previous_path).unwrap().navigation.next.unwrap();
        assert_eq!(back.key_path, current.segments());
      }
    }

    let last = resolver.resolve(&path(&["games-unit", "week2", "board-game-day"])).unwrap();
    assert_eq!(
      last.navigation.previous.map(|link| link.key_path),
      Some(vec![
        "games-unit".to_string(),
        "week1".to_string(),
        "parachute-play".to_string()
      ])
    );
  }

  #[test]
  fn activity_navigation_does_not_cross_units() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
    let only = resolver.resolve(&path(&["belonging-unit", "week1", "family-tree"])).unwrap();
    assert!(only.navigation.previous.is_none());
    assert!(only.navigation.next.is_none());
  }

  #[test]
  fn theme_follows_week_position_and_overrides() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions {
      palette: ThemePalette::default().with_override("belonging-unit", "coral"),
      ..ResolverOptions::default()
    });

    let week_two = resolver.resolve(&path(&["games-unit", "week2"])).unwrap();
    assert_eq!(week_two.navigation.theme.name, "meadow");
    let unit = resolver.resolve(&path(&["games-unit"])).unwrap();
    assert_eq!(unit.navigation.theme.name, "sky");
    let belonging = resolver.resolve(&path(&["belonging-unit", "week1"])).unwrap();
    assert_eq!(belonging.navigation.theme.name, "coral");
  }

  #[test]
  fn resolution_is_idempotent() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
    let key_path = path(&["games-unit", "week1", "parachute-play"]);

    assert_eq!(resolver.resolve(&key_path), resolver.resolve(&key_path));
  }

  #[test]
  fn resolves_concurrently_without_coordination() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
    let key_path = path(&["games-unit", "week1", "parachute-play"]);
    let expected = resolver.resolve(&key_path).unwrap();

    std::thread::scope(|scope| {
      let handles: Vec<_> = (0..4)
        .map(|_| scope.spawn(|| resolver.resolve(&key_path).unwrap().navigation))
        .collect();
      for handle in handles {
        assert_eq!(handle.join().unwrap(), expected.navigation);
      }
    });
  }

  #[test]
  fn rejects_malformed_key_paths() {
    assert_eq!(KeyPath::new(Vec::<String>::new()), Err(KeyPathError::Empty));
    assert_eq!(
      KeyPath::new(["games-unit", " "]),
      Err(KeyPathError::EmptySegment { index: 1 })
    );
    assert_eq!(KeyPath::parse_route("/"), Err(KeyPathError::Empty));
    assert_eq!(
      KeyPath::parse_route("/games-unit//x"),
      Err(KeyPathError::EmptySegment { index: 1 })
    );
  }

  #[test]
  fn parses_routes_into_key_paths() {
    let parsed = KeyPath::parse_route("/games-unit/week1/parachute-play/").unwrap();
    assert_eq!(parsed.segments(), ["games-unit", "week1", "parachute-play"]);
    assert_eq!(parsed.len(), 3);
  }

  #[test]
  #[should_panic(expected = "invalid key path")]
  fn resolve_keys_fails_fast_on_empty_segments() {
    let catalog = catalog();
    let resolver = ContentResolver::new(&catalog, ResolverOptions::default());
    let _ = resolver.resolve_keys(&["games-unit", ""]);
  }
}

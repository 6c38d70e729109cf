//! Color themes attached to units and weeks.
//!
//! Theme selection is total: every unit id and week position maps to some theme, falling
//! back to the palette default when nothing more specific matches.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{ContentUnit, WeeklyActivity};

/// Named color tokens used by presentation code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
  /// Palette name, referenced by overrides and authored content.
  pub name: String,
  /// Background color token.
  pub background: String,
  /// Border color token.
  pub border: String,
  /// Accent color token used for headings and badges.
  pub accent: String,
  /// Foreground text color token.
  pub text: String,
}

impl Theme {
  fn new(name: &str, background: &str, border: &str, accent: &str, text: &str) -> Self {
    Self {
      name: name.into(),
      background: background.into(),
      border: border.into(),
      accent: accent.into(),
      text: text.into(),
    }
  }
}

/// Built-in themes in positional order; the first entry is the default.
pub fn builtin_themes() -> Vec<Theme> {
  vec![
    Theme::new("sky", "#f0f9ff", "#bae6fd", "#0369a1", "#0c4a6e"),
    Theme::new("meadow", "#f0fdf4", "#bbf7d0", "#15803d", "#14532d"),
    Theme::new("sunshine", "#fefce8", "#fef08a", "#a16207", "#713f12"),
    Theme::new("coral", "#fff1f2", "#fecdd3", "#be123c", "#881337"),
    Theme::new("lavender", "#faf5ff", "#e9d5ff", "#7e22ce", "#581c87"),
  ]
}

/// Ordered palette plus explicit unit overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemePalette {
  themes: Vec<Theme>,
  overrides: IndexMap<String, String>,
}

impl Default for ThemePalette {
  fn default() -> Self {
    Self {
      themes: builtin_themes(),
      overrides: IndexMap::new(),
    }
  }
}

impl ThemePalette {
  /// Create a palette from an ordered theme list and unit-id overrides.
  ///
  /// An empty theme list is replaced by the built-in themes so selection stays total.
  pub fn new(themes: Vec<Theme>, overrides: IndexMap<String, String>) -> Self {
    let themes = if themes.is_empty() {
      warn!("empty theme palette configured, using built-in themes");
      builtin_themes()
    } else {
      themes
    };
    Self { themes, overrides }
  }

  /// Add or replace an explicit theme for a unit.
  pub fn with_override(mut self, unit_id: impl Into<String>, theme: impl Into<String>) -> Self {
    self.overrides.insert(unit_id.into(), theme.into());
    self
  }

  /// Theme used when nothing more specific applies.
  pub fn default_theme(&self) -> &Theme {
    &self.themes[0]
  }

  /// Themes in positional order.
  pub fn themes(&self) -> &[Theme] {
    &self.themes
  }

  /// Look up a theme by name.
  pub fn by_name(&self, name: &str) -> Option<&Theme> {
    self.themes.iter().find(|theme| theme.name == name)
  }

  /// Theme at a 1-based week position, cycling through the palette.
  pub fn for_week(&self, week_number: u32) -> &Theme {
    let index = week_number.saturating_sub(1) as usize % self.themes.len();
    &self.themes[index]
  }

  /// Select a theme for a unit id and optional week number.
  ///
  /// Order: explicit unit override, positional week theme, default. Overrides naming a theme
  /// missing from the palette are ignored.
  pub fn select(&self, unit_id: &str, week_number: Option<u32>) -> &Theme {
    if let Some(theme) = self
      .overrides
      .get(unit_id)
      .and_then(|name| self.by_name(name))
    {
      return theme;
    }

    match week_number {
      Some(number) => self.for_week(number),
      None => self.default_theme(),
    }
  }

  /// Select a theme for resolved records, honouring theme names authored on them.
  ///
  /// Configured unit overrides win, then the week's own theme, then the unit's own theme,
  /// then the positional/default rule of [`ThemePalette::select`].
  pub fn select_for(&self, unit: &ContentUnit, week: Option<&WeeklyActivity>) -> &Theme {
    if let Some(theme) = self
      .overrides
      .get(&unit.id)
      .and_then(|name| self.by_name(name))
    {
      return theme;
    }

    let authored = week
      .and_then(|week| week.theme.as_deref())
      .and_then(|name| self.by_name(name))
      .or_else(|| unit.theme.as_deref().and_then(|name| self.by_name(name)));

    authored.unwrap_or_else(|| self.select(&unit.id, week.map(|week| week.number)))
  }
}

//! Data structures describing the curriculum content tables.

use serde::{Deserialize, Serialize};

/// Top-level curriculum grouping such as the "Belonging Unit".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUnit {
  /// Route key identifying the unit within the catalog.
  pub id: String,
  /// Unit title rendered in listings and headers.
  pub title: String,
  /// Short description shown alongside the title.
  #[serde(default)]
  pub description: String,
  /// Explicit ordering override supplied in authored content.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub order: Option<usize>,
  /// Theme name requested by the unit, consulted before positional themes.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub theme: Option<String>,
  /// Weeks belonging to the unit, in declaration order.
  pub weeks: Vec<WeeklyActivity>,
}

impl ContentUnit {
  /// Find a week by its route key (`week1`, `week2`, ...).
  pub fn week(&self, key: &str) -> Option<&WeeklyActivity> {
    self.weeks.iter().find(|week| week.key() == key)
  }

  /// Iterate over every activity of the unit in declaration order, paired with its week.
  pub fn flattened_activities(&self) -> impl Iterator<Item = (&WeeklyActivity, &Activity)> {
    self
      .weeks
      .iter()
      .flat_map(|week| week.activities.iter().map(move |activity| (week, activity)))
  }
}

/// A numbered week of activities inside a unit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyActivity {
  /// Week number, unique within the owning unit.
  pub number: u32,
  /// Week title, e.g. "All About Me".
  pub title: String,
  /// Optional theme name overriding the positional week theme.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub theme: Option<String>,
  /// Activities planned for the week, in declaration order.
  pub activities: Vec<Activity>,
}

impl WeeklyActivity {
  /// Route key used for the week.
  pub fn key(&self) -> String {
    format!("week{}", self.number)
  }

  /// Find an activity by slug.
  pub fn activity(&self, slug: &str) -> Option<&Activity> {
    self.activities.iter().find(|activity| activity.slug == slug)
  }
}

/// A single lesson or activity record with its instructional metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
  /// URL-safe identifier, unique within the owning week.
  pub slug: String,
  /// Activity title.
  pub title: String,
  /// Type tag such as "Circle Time" or "Art".
  #[serde(default, rename = "type")]
  pub activity_type: String,
  /// Human readable duration, e.g. "20 minutes".
  #[serde(default)]
  pub duration: String,
  /// Participant mode, e.g. "Whole group" or "Pairs".
  #[serde(default)]
  pub participants: String,
  /// Learning objectives.
  #[serde(default)]
  pub objectives: Vec<String>,
  /// Materials to prepare.
  #[serde(default)]
  pub materials: Vec<String>,
  /// Step-by-step instructions.
  #[serde(default)]
  pub instructions: Vec<String>,
  /// Observation and assessment prompts.
  #[serde(default)]
  pub assessment: Vec<String>,
  /// Extension ideas.
  #[serde(default)]
  pub extensions: Vec<String>,
  /// Educator tips.
  #[serde(default)]
  pub tips: Vec<String>,
  /// Vocabulary introduced by the activity.
  #[serde(default)]
  pub vocabulary: Vec<String>,
  /// Safety notes, present only for activities that need them.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub safety_notes: Option<Vec<String>>,
  /// Rendered HTML for free-form notes authored below the frontmatter.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes_html: Option<String>,
}

/// Frontmatter fields accepted at the top of an activity markdown file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFrontmatterRecord {
  /// Activity title, falling back to the first heading of the body.
  pub title: Option<String>,
  /// Explicit ordering override within the week.
  pub order: Option<usize>,
  /// Type tag.
  #[serde(default, rename = "type")]
  pub activity_type: String,
  /// Duration.
  #[serde(default)]
  pub duration: String,
  /// Participant mode.
  #[serde(default)]
  pub participants: String,
  /// Learning objectives.
  #[serde(default)]
  pub objectives: Vec<String>,
  /// Materials.
  #[serde(default)]
  pub materials: Vec<String>,
  /// Instructions.
  #[serde(default)]
  pub instructions: Vec<String>,
  /// Assessment prompts.
  #[serde(default)]
  pub assessment: Vec<String>,
  /// Extensions.
  #[serde(default)]
  pub extensions: Vec<String>,
  /// Tips.
  #[serde(default)]
  pub tips: Vec<String>,
  /// Vocabulary.
  #[serde(default)]
  pub vocabulary: Vec<String>,
  /// Safety notes.
  pub safety_notes: Option<Vec<String>>,
}

impl ActivityFrontmatterRecord {
  /// Combine frontmatter with the resolved slug, title and rendered notes.
  pub fn into_activity(self, slug: String, title: String, notes_html: Option<String>) -> Activity {
    Activity {
      slug,
      title,
      activity_type: self.activity_type,
      duration: self.duration,
      participants: self.participants,
      objectives: self.objectives,
      materials: self.materials,
      instructions: self.instructions,
      assessment: self.assessment,
      extensions: self.extensions,
      tips: self.tips,
      vocabulary: self.vocabulary,
      safety_notes: self.safety_notes,
      notes_html,
    }
  }
}

/// Metadata describing a unit, parsed from the unit metadata file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMetaRecord {
  /// Unit title.
  pub title: String,
  /// Unit description.
  #[serde(default)]
  pub description: String,
  /// Explicit ordering override.
  pub order: Option<usize>,
  /// Requested theme name.
  pub theme: Option<String>,
}

/// Metadata describing a week, parsed from the week metadata file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMetaRecord {
  /// Week title, defaulting to "Week N".
  pub title: Option<String>,
  /// Requested theme name.
  pub theme: Option<String>,
}

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod models;
pub mod navigation;
pub mod project;
pub mod resolver;
pub mod selection;
pub mod theme;
pub mod worksheet;

pub use catalog::{Catalog, CatalogError, LoadError, load_catalog_dir};
pub use config::{CatalogConfig, ContentLayout};
pub use models::{Activity, ContentUnit, WeeklyActivity};
pub use navigation::{Breadcrumb, LabelTable, NavLink, NavigationContext};
pub use project::CatalogProject;
pub use resolver::{
  ContentRecord, ContentResolver, KeyPath, KeyPathError, NotFound, ResolvedContent,
  ResolverOptions,
};
pub use selection::{UnitInclusion, UnitSelection};
pub use theme::{Theme, ThemePalette};
pub use worksheet::{WorksheetFlags, WorksheetSheet, WorksheetSpec, generate, letter_label};

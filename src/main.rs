//! `curriculum` command line: inspect a catalog, resolve routes and generate worksheets.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use curriculum_catalog::navigation::KeyLevel;
use curriculum_catalog::{
  Activity, CatalogProject, ContentResolver, KeyPath, NavigationContext, WorksheetFlags,
  WorksheetSpec, generate,
};

/// Resolve curriculum routes and generate worksheets.
#[derive(Parser)]
#[command(name = "curriculum", version, about, long_about = None)]
struct Cli {
  /// Project directory containing `catalog.config.json`.
  #[arg(long, short, default_value = ".", env = "CURRICULUM_PROJECT", global = true)]
  project: PathBuf,

  /// Verbosity level (-v, -vv).
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List units with their weeks and activity counts.
  Units,

  /// Resolve a route (`games-unit/week1/show-tell`) or individual keys.
  Resolve {
    /// Route string or one key per argument.
    #[arg(required = true)]
    keys: Vec<String>,
  },

  /// Generate a matching worksheet.
  Worksheet {
    /// Read the worksheet parameters from a JSON file instead of flags.
    #[arg(long, conflicts_with_all = ["subject", "grade", "topic", "count"])]
    spec: Option<PathBuf>,

    /// Subject area.
    #[arg(long, default_value = "Literacy")]
    subject: String,

    /// Grade or age band.
    #[arg(long, default_value = "Pre-K")]
    grade: String,

    /// Topic the items cover.
    #[arg(long, default_value = "Matching")]
    topic: String,

    /// Number of prompt/answer pairs.
    #[arg(long, default_value_t = 5)]
    count: usize,

    /// Include an answer key.
    #[arg(long)]
    answer_key: bool,

    /// Omit the instruction line.
    #[arg(long)]
    no_instructions: bool,
  },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitSummary<'a> {
  id: &'a str,
  title: &'a str,
  weeks: Vec<WeekSummary<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekSummary<'a> {
  key: String,
  title: &'a str,
  activities: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedReport<'a> {
  level: KeyLevel,
  title: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  activity: Option<&'a Activity>,
  navigation: &'a NavigationContext,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NotFoundReport<'a> {
  consumed: &'a [String],
  missing: &'a str,
  redirect: String,
}

fn main() -> Result<ExitCode> {
  let cli = Cli::parse();
  init_tracing(cli.verbose);
  run(cli)
}

fn run(cli: Cli) -> Result<ExitCode> {
  let project = CatalogProject::discover(&cli.project);
  debug!(project = %project.project_dir().display(), "using project directory");

  match cli.command {
    Command::Units => list_units(&project),
    Command::Resolve { keys } => {
      let (report, code) = resolve(&project, &keys)?;
      println!("{}", serde_json::to_string_pretty(&report)?);
      Ok(code)
    }
    Command::Worksheet {
      spec,
      subject,
      grade,
      topic,
      count,
      answer_key,
      no_instructions,
    } => {
      let spec = match spec {
        Some(path) => {
          let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
          serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => WorksheetSpec {
          subject,
          grade,
          topic,
          question_count: count,
          flags: WorksheetFlags {
            include_answer_key: answer_key,
            show_instructions: !no_instructions,
          },
        },
      };
      println!("{}", serde_json::to_string_pretty(&generate(&spec))?);
      Ok(ExitCode::SUCCESS)
    }
  }
}

fn list_units(project: &CatalogProject) -> Result<ExitCode> {
  let catalog = project.load_catalog()?;
  let summaries: Vec<UnitSummary> = catalog
    .units()
    .map(|unit| UnitSummary {
      id: &unit.id,
      title: &unit.title,
      weeks: unit
        .weeks
        .iter()
        .map(|week| WeekSummary {
          key: week.key(),
          title: &week.title,
          activities: week.activities.len(),
        })
        .collect(),
    })
    .collect();

  println!("{}", serde_json::to_string_pretty(&summaries)?);
  Ok(ExitCode::SUCCESS)
}

fn resolve(project: &CatalogProject, keys: &[String]) -> Result<(serde_json::Value, ExitCode)> {
  let key_path = match keys {
    [route] if route.contains('/') => KeyPath::parse_route(route),
    _ => KeyPath::new(keys.iter().cloned()),
  }
  .with_context(|| format!("invalid key path {keys:?}"))?;

  let catalog = project.load_catalog()?;
  let resolver = ContentResolver::new(&catalog, project.resolver_options());

  match resolver.resolve(&key_path) {
    Ok(resolved) => {
      let record = resolved.record;
      let title = match record.activity() {
        Some(activity) => &activity.title,
        None => match record.week() {
          Some(week) => &week.title,
          None => &record.unit().title,
        },
      };
      let report = ResolvedReport {
        level: record.level(),
        title,
        activity: record.activity(),
        navigation: &resolved.navigation,
      };
      Ok((serde_json::to_value(&report)?, ExitCode::SUCCESS))
    }
    Err(not_found) => {
      let report = NotFoundReport {
        consumed: &not_found.consumed,
        missing: &not_found.missing,
        redirect: not_found.redirect_path(resolver.base_route()),
      };
      eprintln!("{not_found}");
      Ok((serde_json::to_value(&report)?, ExitCode::from(2)))
    }
  }
}

fn init_tracing(verbose: u8) {
  use tracing_subscriber::{EnvFilter, fmt};

  let filter = match verbose {
    0 => "curriculum_catalog=warn,curriculum=warn",
    1 => "curriculum_catalog=debug,curriculum=debug",
    _ => "curriculum_catalog=trace,curriculum=trace",
  };

  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

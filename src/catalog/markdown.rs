//! Markdown parsing helpers used while loading authored activities.

use std::fs;
use std::path::Path;

use gray_matter::{Matter, engine::YAML};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::models::ActivityFrontmatterRecord;

fn markdown_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Parse the numeric ordering prefix from a file stem such as `02-parachute-play`.
pub fn parse_order_from_id(id: &str) -> Option<usize> {
    let prefix = id.split_once('-').map(|(value, _)| value).unwrap_or(id);
    let digits: String = prefix.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.len() != prefix.len() {
        None
    } else {
        digits.parse::<usize>().ok()
    }
}

/// Strip a numeric ordering prefix from a file stem, leaving the activity slug.
pub(super) fn strip_order_prefix(id: &str) -> &str {
    match id.split_once('-') {
        Some((prefix, rest)) if parse_order_from_id(prefix).is_some() && !rest.is_empty() => rest,
        _ => id,
    }
}

/// Parse an activity markdown file, extracting frontmatter metadata and the content body.
///
/// Returns `None` when the file cannot be read or the frontmatter block is not valid YAML.
/// Frontmatter that parses but does not match the activity shape also yields `None`, so a
/// typo in a list field is reported instead of silently dropping the field.
pub fn parse_activity_markdown(path: &Path) -> Option<(ActivityFrontmatterRecord, String)> {
    let content = fs::read_to_string(path).ok()?;
    let matter = Matter::<YAML>::new();
    let parsed = matter.parse(&content).ok()?;

    let frontmatter: ActivityFrontmatterRecord = match parsed.data {
        Some(yaml) => serde_yaml::from_value::<ActivityFrontmatterRecord>(yaml).ok()?,
        None => ActivityFrontmatterRecord::default(),
    };

    Some((frontmatter, parsed.content))
}

/// Render free-form activity notes to HTML, returning `None` for a blank body.
pub fn render_notes_html(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let parser = Parser::new_ext(body, markdown_options());
    let mut output = String::new();
    html::push_html(&mut output, parser);
    Some(output)
}

/// Return the text of the first non-empty heading in the markdown body.
pub fn extract_first_heading(body: &str) -> Option<String> {
    let parser = Parser::new_ext(body, markdown_options());
    let mut in_heading = false;
    let mut heading_text = String::new();

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => {
                in_heading = true;
                heading_text.clear();
            }
            Event::End(TagEnd::Heading(_)) => {
                if in_heading && !heading_text.trim().is_empty() {
                    return Some(heading_text.trim().to_string());
                }
                in_heading = false;
            }
            Event::Text(text) | Event::Code(text) if in_heading => {
                heading_text.push_str(&text);
            }
            _ => {}
        }
    }

    None
}

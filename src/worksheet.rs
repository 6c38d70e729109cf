//! Matching-worksheet generation.
//!
//! A worksheet is derived deterministically from a handful of parameters: `question_count`
//! numbered prompts and the same number of lettered answers. Prompts and answers share an
//! index but are not guaranteed to be semantic matches; shuffling the answer column is left
//! to presentation code.

use serde::{Deserialize, Serialize};

/// Display toggles for a generated worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorksheetFlags {
  /// Emit an answer key pairing prompt numbers with answer letters.
  pub include_answer_key: bool,
  /// Emit the instruction line shown above the grid.
  pub show_instructions: bool,
}

impl Default for WorksheetFlags {
  fn default() -> Self {
    Self {
      include_answer_key: false,
      show_instructions: true,
    }
  }
}

/// Parameters describing a worksheet to generate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetSpec {
  /// Subject area, e.g. "Literacy".
  pub subject: String,
  /// Grade or age band, e.g. "Pre-K".
  pub grade: String,
  /// Topic the items cover.
  pub topic: String,
  /// Number of prompt/answer pairs.
  pub question_count: usize,
  /// Display toggles.
  #[serde(default)]
  pub flags: WorksheetFlags,
}

/// A labelled prompt or answer cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetItem {
  /// Display label: `1`, `2`, ... for prompts and `A`, `B`, ... for answers.
  pub label: String,
  /// Placeholder body text.
  pub body: String,
}

/// Generated worksheet content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetSheet {
  /// Heading shown at the top of the sheet.
  pub title: String,
  /// Subject and grade line.
  pub subtitle: String,
  /// Instruction line, present when `show_instructions` is set.
  pub instructions: Option<String>,
  /// Numbered prompts.
  pub prompts: Vec<WorksheetItem>,
  /// Lettered answers, positionally associated with `prompts`.
  pub answers: Vec<WorksheetItem>,
  /// `(prompt number, answer letter)` pairs, empty unless `include_answer_key` is set.
  pub answer_key: Vec<(usize, String)>,
}

/// Letter label for a 0-based index.
///
/// `A`..`Z` cover 0..=25; later indexes continue spreadsheet-style (`AA`, `AB`, ..., `AZ`,
/// `BA`, ...) so every index has a unique label.
pub fn letter_label(index: usize) -> String {
  let mut remaining = index;
  let mut letters = Vec::new();
  loop {
    letters.push(char::from(b'A' + (remaining % 26) as u8));
    if remaining < 26 {
      break;
    }
    remaining = remaining / 26 - 1;
  }
  letters.iter().rev().collect()
}

/// Generate the prompt and answer grid for a worksheet.
pub fn generate(spec: &WorksheetSpec) -> WorksheetSheet {
  let mut prompts = Vec::with_capacity(spec.question_count);
  let mut answers = Vec::with_capacity(spec.question_count);

  for index in 0..spec.question_count {
    let number = index + 1;
    let letter = letter_label(index);
    prompts.push(WorksheetItem {
      label: number.to_string(),
      body: format!("Sample prompt {number}: Item {letter}"),
    });
    answers.push(WorksheetItem {
      label: letter.clone(),
      body: format!("Sample answer {letter}"),
    });
  }

  let answer_key = if spec.flags.include_answer_key {
    answers
      .iter()
      .enumerate()
      .map(|(index, answer)| (index + 1, answer.label.clone()))
      .collect()
  } else {
    Vec::new()
  };

  WorksheetSheet {
    title: format!("{} Matching Worksheet", spec.topic),
    subtitle: format!("{} | Grade {}", spec.subject, spec.grade),
    instructions: spec
      .flags
      .show_instructions
      .then(|| "Draw a line from each numbered item to its matching letter.".to_string()),
    prompts,
    answers,
    answer_key,
  }
}

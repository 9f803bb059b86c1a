// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Conversion of tasks to and from the line-oriented text format used
//! for persisting them.
//!
//! Each task occupies a single line of the form
//! ```text
//! <type> | <done> | <description> | <date>
//! ```
//! where `<type>` is one of `T` (to-do), `D` (deadline), or `E`
//! (event), `<done>` is `1` for completed tasks and `0` otherwise, and
//! `<date>` is a date in `YYYY-MM-DD` format. For to-do items, which do
//! not carry a date, the last field is governed by [`TodoDate`].
//!
//! # Notes
//! No escaping is performed on descriptions. Descriptions for which
//! [`is_representable`] is `false` cannot be read back correctly.

use chrono::NaiveDate;

use serde::Deserialize;
use serde::Serialize;

use crate::date::format_date;
use crate::date::parse_date;
use crate::date::today;
use crate::log::warn;
use crate::task::Kind;
use crate::task::Task;

use super::Malformation;
use super::MalformedRecordError;


/// The token separating the fields of a record.
pub const SEPARATOR: &str = " | ";


/// What to emit into the date field of a to-do item.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoDate {
  /// Emit the date on which encoding happens.
  #[default]
  Today,
  /// Emit the given date.
  Fixed(NaiveDate),
  /// Omit the date field altogether.
  Omit,
}


/// Check whether a task description survives an encode-decode cycle.
///
/// A description must not contain [`SEPARATOR`] or a line break, and
/// it must not end in the separator's leading part (`" |"`), which
/// would merge with the separator following the description.
pub fn is_representable(description: &str) -> bool {
  !description.contains(SEPARATOR)
    && !description.contains(['\r', '\n'])
    && !description.ends_with(SEPARATOR.trim_end())
}


/// Append the record representing `task` to `string`.
fn emit_record(string: &mut String, task: &Task, todo_date: Option<NaiveDate>) {
  let description = task.description();
  if !is_representable(description) {
    warn!("description {description:?} will not be read back correctly");
  }

  let done = if task.is_done() { '1' } else { '0' };
  let () = string.push(task.code());
  let () = string.push_str(SEPARATOR);
  let () = string.push(done);
  let () = string.push_str(SEPARATOR);
  let () = string.push_str(description);

  if let Some(date) = task.date().or(todo_date) {
    let () = string.push_str(SEPARATOR);
    let () = string.push_str(&format_date(date));
  }
  let () = string.push('\n');
}


/// Encode a sequence of tasks into text, one line per task.
///
/// Absent tasks (`None` items) are skipped. The date field of to-do
/// items is filled with the current date.
pub fn encode<'task, I, T>(tasks: I) -> String
where
  I: IntoIterator<Item = T>,
  T: Into<Option<&'task Task>>,
{
  encode_with(tasks, TodoDate::Today)
}

/// Encode a sequence of tasks into text, one line per task, using the
/// provided policy for the date field of to-do items.
pub fn encode_with<'task, I, T>(tasks: I, todo_date: TodoDate) -> String
where
  I: IntoIterator<Item = T>,
  T: Into<Option<&'task Task>>,
{
  // The current date is only inquired once, so that all records agree.
  let todo_date = match todo_date {
    TodoDate::Today => Some(today()),
    TodoDate::Fixed(date) => Some(date),
    TodoDate::Omit => None,
  };

  tasks
    .into_iter()
    .filter_map(Into::into)
    .fold(String::new(), |mut string, task| {
      let () = emit_record(&mut string, task, todo_date);
      string
    })
}


/// Decode a single line into a task.
///
/// A line carrying an unknown type code results in `Ok(None)`, while a
/// line that does not adhere to the format results in a
/// [`MalformedRecordError`].
pub fn decode(line: &str) -> Result<Option<Task>, MalformedRecordError> {
  let line = line.trim_end_matches(['\r', '\n']);
  let malformed = |reason| MalformedRecordError::new(line, reason);

  let fields = line.split(SEPARATOR).collect::<Vec<_>>();
  // SANITY: `split` always yields at least one item.
  let kind = fields.first().copied().unwrap_or_default();
  let mut chars = kind.chars();
  let code = match (chars.next(), chars.next()) {
    (Some(code), None) => code,
    _ => return Err(malformed(Malformation::BadKindField(kind.to_string()))),
  };

  let (done, description, date) = match (code, fields.as_slice()) {
    // A trailing date on a to-do item is accepted but not interpreted.
    (Kind::TODO_CODE, [_, done, description] | [_, done, description, _]) => {
      (*done, *description, None)
    },
    (Kind::TODO_CODE, fields) => {
      return Err(malformed(Malformation::Arity {
        code,
        expected: "3 or 4",
        found: fields.len(),
      }))
    },
    (Kind::DEADLINE_CODE | Kind::EVENT_CODE, [_, done, description, date]) => {
      (*done, *description, Some(*date))
    },
    (Kind::DEADLINE_CODE | Kind::EVENT_CODE, fields) => {
      return Err(malformed(Malformation::Arity {
        code,
        expected: "4",
        found: fields.len(),
      }))
    },
    _ => return Ok(None),
  };

  let done = match done {
    "0" => false,
    "1" => true,
    _ => return Err(malformed(Malformation::BadDoneFlag(done.to_string()))),
  };

  let date = date
    .map(|text| {
      let text = text.trim();
      parse_date(text).map_err(|source| {
        malformed(Malformation::BadDate {
          text: text.to_string(),
          source,
        })
      })
    })
    .transpose()?;

  let task = match (code, date) {
    (Kind::DEADLINE_CODE, Some(by)) => Task::deadline(description, by),
    (Kind::EVENT_CODE, Some(at)) => Task::event(description, at),
    _ => Task::todo(description),
  };
  Ok(Some(task.with_done(done)))
}


#[cfg(test)]
mod tests {
  use super::*;


  fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
  }

  /// Decode a line that is expected to be malformed, returning the
  /// reason.
  fn malformation(line: &str) -> Malformation {
    let err = decode(line).unwrap_err();
    assert_eq!(err.line, line.trim_end_matches(['\r', '\n']));
    err.reason
  }


  /// Check that encoding an empty list of tasks results in an empty
  /// string.
  #[test]
  fn encode_empty() {
    assert_eq!(encode(&[] as &[Task]), "");
    assert_eq!(encode_with(Vec::<Option<&Task>>::new(), TodoDate::Omit), "");
  }

  /// Make sure that absent tasks are skipped during encoding.
  #[test]
  fn encode_skips_absent() {
    let task = Task::deadline("submit report", date(2024, 12, 1));
    let encoded = encode([None, Some(&task), None]);
    assert_eq!(encoded, "D | 0 | submit report | 2024-12-01\n");
  }

  /// Check that we emit the expected lines for the different task kinds.
  #[test]
  fn encode_kinds() {
    let tasks = [
      Task::todo("buy milk"),
      Task::deadline("submit report", date(2024, 12, 1)),
      Task::event("team meeting", date(2024, 11, 20)).with_done(true),
    ];
    let encoded = encode_with(&tasks, TodoDate::Fixed(date(2024, 1, 2)));
    let expected = "\
T | 0 | buy milk | 2024-01-02
D | 0 | submit report | 2024-12-01
E | 1 | team meeting | 2024-11-20
";
    assert_eq!(encoded, expected);

    let encoded = encode_with(&tasks[..1], TodoDate::Omit);
    assert_eq!(encoded, "T | 0 | buy milk\n");
  }

  /// Check that to-do items are stamped with the current date by
  /// default.
  ///
  /// The test is inherently racy around midnight, which is why we
  /// accept either of the dates bracketing the encoding.
  #[test]
  fn encode_todo_with_current_date() {
    let before = today();
    let encoded = encode([&Task::todo("read book")]);
    let after = today();

    let candidates = [before, after]
      .map(|date| format!("T | 0 | read book | {}\n", format_date(date)));
    assert!(candidates.contains(&encoded), "{encoded}");
  }

  /// Make sure that tasks survive an encode-decode cycle.
  #[test]
  fn encode_decode() {
    let tasks = [
      Task::deadline("submit report", date(2024, 12, 1)),
      Task::deadline("file taxes", date(2025, 4, 15)).with_done(true),
      Task::event("team meeting", date(2024, 11, 20)),
      Task::event("birthday party", date(2024, 2, 29)).with_done(true),
      Task::todo("buy milk"),
      Task::todo("read book").with_done(true),
    ];

    for todo_date in [TodoDate::Today, TodoDate::Omit] {
      let encoded = encode_with(&tasks, todo_date);
      let decoded = encoded
        .lines()
        .map(|line| decode(line).unwrap().unwrap())
        .collect::<Vec<_>>();
      assert_eq!(decoded, tasks);
    }
  }

  /// Make sure that tasks with an empty description survive an
  /// encode-decode cycle.
  #[test]
  fn encode_decode_empty_description() {
    let tasks = [
      Task::todo(""),
      Task::deadline("", date(2024, 12, 1)).with_done(true),
      Task::event("", date(2024, 11, 20)),
    ];

    let encoded = encode_with(&tasks, TodoDate::Fixed(date(2024, 1, 2)));
    assert!(encoded.starts_with("T | 0 |  | 2024-01-02\n"), "{encoded}");

    for todo_date in [TodoDate::Today, TodoDate::Omit] {
      let encoded = encode_with(&tasks, todo_date);
      let decoded = encoded
        .lines()
        .map(|line| decode(line).unwrap().unwrap())
        .collect::<Vec<_>>();
      assert_eq!(decoded, tasks);
    }

    let task = decode("T | 1 |  ").unwrap().unwrap();
    assert_eq!(task, Task::todo("").with_done(true));
  }

  /// Check which descriptions can be represented in a record.
  #[test]
  fn representable_descriptions() {
    assert!(is_representable("buy milk"));
    assert!(is_representable(""));
    assert!(is_representable("|"));
    assert!(is_representable("a|b"));
    assert!(is_representable("| leading bar"));

    assert!(!is_representable("this | that"));
    assert!(!is_representable("foo |"));
    assert!(!is_representable(" |"));
    assert!(!is_representable("two\nlines"));
    assert!(!is_representable("carriage\rreturn"));
  }

  /// Check that representable descriptions survive an encode-decode
  /// cycle for all task kinds, while the others indeed do not.
  #[test]
  fn encode_decode_representable() {
    let descriptions = ["|", "a|b", "| leading bar", "foo |", "a\nb"];
    for description in descriptions {
      let tasks = [
        Task::todo(description),
        Task::deadline(description, date(2024, 12, 1)),
        Task::event(description, date(2024, 11, 20)),
      ];

      for task in tasks {
        let encoded = encode_with([&task], TodoDate::Fixed(date(2024, 1, 2)));
        let decoded = encoded.lines().map(decode).collect::<Vec<_>>();
        let round_trips = matches!(decoded.as_slice(), [Ok(Some(t))] if *t == task);
        assert_eq!(round_trips, is_representable(description), "{encoded:?}");
      }
    }
  }

  /// Check that we can decode a to-do item without a date field.
  #[test]
  fn decode_todo() {
    let task = decode("T | 1 | read book").unwrap().unwrap();
    assert_eq!(task, Task::todo("read book").with_done(true));

    let task = decode("T | 0 | buy milk | 2024-01-02").unwrap().unwrap();
    assert_eq!(task, Task::todo("buy milk"));

    // The trailing date of a to-do item is not interpreted.
    let task = decode("T | 0 | buy milk | whenever").unwrap().unwrap();
    assert_eq!(task, Task::todo("buy milk"));
  }

  /// Check that we can decode a deadline.
  #[test]
  fn decode_deadline() {
    let task = decode("D | 0 | submit report | 2024-12-01")
      .unwrap()
      .unwrap();
    assert_eq!(task.kind(), &Kind::Deadline { by: date(2024, 12, 1) });
    assert_eq!(task.description(), "submit report");
    assert!(!task.is_done());
  }

  /// Check that we can decode an event.
  #[test]
  fn decode_event() {
    let task = decode("E | 1 | team meeting | 2024-11-20\n")
      .unwrap()
      .unwrap();
    assert_eq!(task, Task::event("team meeting", date(2024, 11, 20)).with_done(true));
  }

  /// Make sure that line terminators and surrounding white space are
  /// ignored.
  #[test]
  fn decode_trims() {
    let task = decode("D | 1 |   submit report   |  2024-12-01 \r\n")
      .unwrap()
      .unwrap();
    assert_eq!(task, Task::deadline("submit report", date(2024, 12, 1)).with_done(true));
  }

  /// Check that an unknown type code results in no task.
  #[test]
  fn decode_unknown_kind() {
    assert_eq!(decode("X | 0 | foo | 2024-01-01").unwrap(), None);
    assert_eq!(decode("X | 7").unwrap(), None);
    assert_eq!(decode("t | 0 | lower case").unwrap(), None);
  }

  /// Check that malformed lines are reported with the correct reason.
  #[test]
  fn decode_malformed() {
    assert!(matches!(
      malformation(""),
      Malformation::BadKindField(kind) if kind.is_empty()
    ));
    assert!(matches!(
      malformation("garbage"),
      Malformation::BadKindField(kind) if kind == "garbage"
    ));
    assert!(matches!(
      malformation("TD | 0 | buy milk"),
      Malformation::BadKindField(..)
    ));
    assert!(matches!(
      malformation("T | 0"),
      Malformation::Arity {
        code: 'T',
        found: 2,
        ..
      }
    ));
    assert!(matches!(
      malformation("T | 0 | buy | milk | 2024-01-01"),
      Malformation::Arity {
        code: 'T',
        found: 5,
        ..
      }
    ));
    assert!(matches!(
      malformation("D | 0 | submit report"),
      Malformation::Arity {
        code: 'D',
        found: 3,
        ..
      }
    ));
    assert!(matches!(
      malformation("E | 0 | a | b | 2024-01-01"),
      Malformation::Arity {
        code: 'E',
        found: 5,
        ..
      }
    ));
    assert!(matches!(
      malformation("T | x | buy milk"),
      Malformation::BadDoneFlag(flag) if flag == "x"
    ));
    assert!(matches!(
      malformation("D | 1 | submit report | 2024-13-01"),
      Malformation::BadDate { text, .. } if text == "2024-13-01"
    ));
    assert!(matches!(
      malformation("E | 0 | team meeting | "),
      Malformation::BadDate { text, .. } if text.is_empty()
    ));
  }

  /// Check that a description containing the separator desynchronizes
  /// the fields, but is reported instead of being misread.
  #[test]
  fn decode_description_with_separator() {
    let task = Task::deadline("this | that", date(2024, 12, 1));
    let encoded = encode([&task]);

    let reason = malformation(encoded.trim_end());
    assert!(matches!(reason, Malformation::Arity { found: 5, .. }));
  }

  /// Check the error message of a malformed record.
  #[test]
  fn malformed_error_display() {
    let err = decode("D | 0 | submit report").unwrap_err();
    assert_eq!(err.to_string(), "malformed task record 'D | 0 | submit report'");
    assert_eq!(
      err.reason.to_string(),
      "task type 'D' requires 4 fields but 3 were found"
    );
  }
}

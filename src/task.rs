// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Definitions of the task records managed by the program.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use chrono::NaiveDate;

use crate::date::format_date;


/// The kind of a task, along with kind specific data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
  /// A plain task without any temporal attribute.
  ToDo,
  /// A task that is due by a certain date.
  Deadline {
    /// The date by which the task is due.
    by: NaiveDate,
  },
  /// A task occurring at a certain date.
  Event {
    /// The date at which the event takes place.
    at: NaiveDate,
  },
}

impl Kind {
  /// The code identifying a [`Kind::ToDo`].
  pub const TODO_CODE: char = 'T';
  /// The code identifying a [`Kind::Deadline`].
  pub const DEADLINE_CODE: char = 'D';
  /// The code identifying a [`Kind::Event`].
  pub const EVENT_CODE: char = 'E';

  /// Retrieve the single character code identifying this kind.
  #[inline]
  pub fn code(&self) -> char {
    match self {
      Self::ToDo => Self::TODO_CODE,
      Self::Deadline { .. } => Self::DEADLINE_CODE,
      Self::Event { .. } => Self::EVENT_CODE,
    }
  }

  /// Retrieve the date associated with this kind, if any.
  #[inline]
  pub fn date(&self) -> Option<NaiveDate> {
    match self {
      Self::ToDo => None,
      Self::Deadline { by } => Some(*by),
      Self::Event { at } => Some(*at),
    }
  }
}


/// A task as tracked by the program.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Task {
  /// A description of what the task is about.
  description: String,
  /// The kind of the task.
  kind: Kind,
  /// Whether or not the task has been completed.
  done: bool,
}

impl Task {
  /// Create a new task, stripping surrounding white space from its
  /// description.
  fn new(description: impl Into<String>, kind: Kind) -> Self {
    let mut description = description.into();
    let trimmed = description.trim();
    if trimmed.len() != description.len() {
      description = trimmed.to_string();
    }

    Self {
      description,
      kind,
      done: false,
    }
  }

  /// Create a new, not yet completed, task without a date.
  pub fn todo(description: impl Into<String>) -> Self {
    Self::new(description, Kind::ToDo)
  }

  /// Create a new, not yet completed, task due by the given date.
  pub fn deadline(description: impl Into<String>, by: NaiveDate) -> Self {
    Self::new(description, Kind::Deadline { by })
  }

  /// Create a new, not yet completed, event taking place at the given
  /// date.
  pub fn event(description: impl Into<String>, at: NaiveDate) -> Self {
    Self::new(description, Kind::Event { at })
  }

  /// Set the completion state of the task, returning the result.
  #[inline]
  pub fn with_done(mut self, done: bool) -> Self {
    self.done = done;
    self
  }

  /// Check whether the task has been completed.
  #[inline]
  pub fn is_done(&self) -> bool {
    self.done
  }

  /// Set the completion state of the task.
  #[inline]
  pub fn set_done(&mut self, done: bool) {
    self.done = done
  }

  /// Retrieve the task's description.
  #[inline]
  pub fn description(&self) -> &str {
    &self.description
  }

  /// Retrieve the task's kind.
  #[inline]
  pub fn kind(&self) -> &Kind {
    &self.kind
  }

  /// Retrieve the single character code of the task's kind.
  #[inline]
  pub fn code(&self) -> char {
    self.kind.code()
  }

  /// Retrieve the task's date, if its kind has one.
  #[inline]
  pub fn date(&self) -> Option<NaiveDate> {
    self.kind.date()
  }
}

impl Display for Task {
  /// Format the task for human consumption, e.g., `[D][ ] submit
  /// report (by: 2024-12-01)`.
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let done = if self.done { 'X' } else { ' ' };
    write!(f, "[{}][{done}] {}", self.code(), self.description)?;

    match self.kind {
      Kind::ToDo => Ok(()),
      Kind::Deadline { by } => write!(f, " (by: {})", format_date(by)),
      Kind::Event { at } => write!(f, " (at: {})", format_date(at)),
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;


  fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
  }


  /// Check that the kind of a task determines its code and date.
  #[test]
  fn kind_code_and_date() {
    let task = Task::todo("buy milk");
    assert_eq!(task.code(), 'T');
    assert_eq!(task.date(), None);

    let task = Task::deadline("submit report", date(2024, 12, 1));
    assert_eq!(task.code(), 'D');
    assert_eq!(task.date(), Some(date(2024, 12, 1)));

    let task = Task::event("team meeting", date(2024, 11, 20));
    assert_eq!(task.code(), 'E');
    assert_eq!(task.date(), Some(date(2024, 11, 20)));
  }

  /// Make sure that the completion state can be toggled.
  #[test]
  fn completion() {
    let mut task = Task::todo("read book");
    assert!(!task.is_done());

    let () = task.set_done(true);
    assert!(task.is_done());

    let task = task.with_done(false);
    assert!(!task.is_done());
  }

  /// Make sure that surrounding white space does not become part of a
  /// task's description.
  #[test]
  fn description_trimmed() {
    let task = Task::todo("  buy milk \t");
    assert_eq!(task.description(), "buy milk");

    let task = Task::deadline(" ", date(2024, 12, 1));
    assert_eq!(task.description(), "");

    let task = Task::event("team  meeting", date(2024, 11, 20));
    assert_eq!(task.description(), "team  meeting");
  }

  /// Check the human readable representation of tasks.
  #[test]
  fn display() {
    let task = Task::todo("read book").with_done(true);
    assert_eq!(task.to_string(), "[T][X] read book");

    let task = Task::deadline("submit report", date(2024, 12, 1));
    assert_eq!(task.to_string(), "[D][ ] submit report (by: 2024-12-01)");

    let task = Task::event("team meeting", date(2024, 11, 20));
    assert_eq!(task.to_string(), "[E][ ] team meeting (at: 2024-11-20)");
  }
}

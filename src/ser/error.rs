// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::ParseError;

use thiserror::Error;


/// The reason a line could not be converted into a task.
#[derive(Debug, Error)]
pub enum Malformation {
  /// The first field is not a single character type code.
  #[error("expected a single character type code but found '{0}'")]
  BadKindField(String),
  /// The completion flag is neither `0` nor `1`.
  #[error("expected completion flag '0' or '1' but found '{0}'")]
  BadDoneFlag(String),
  /// The number of fields does not match what the task type requires.
  #[error("task type '{code}' requires {expected} fields but {found} were found")]
  Arity {
    /// The type code of the record.
    code: char,
    /// A human readable description of the accepted field counts.
    expected: &'static str,
    /// The number of fields encountered.
    found: usize,
  },
  /// The date could not be parsed.
  #[error("failed to parse date '{text}'")]
  BadDate {
    /// The offending date text.
    text: String,
    /// The underlying parse error.
    #[source]
    source: ParseError,
  },
}


/// An error indicating that a persisted line does not represent a
/// valid task record.
#[derive(Debug, Error)]
#[error("malformed task record '{line}'")]
pub struct MalformedRecordError {
  /// The offending line, without line terminator.
  pub line: String,
  /// The reason the line was rejected.
  #[source]
  pub reason: Malformation,
}

impl MalformedRecordError {
  pub(crate) fn new(line: &str, reason: Malformation) -> Self {
    Self {
      line: line.to_string(),
      reason,
    }
  }
}

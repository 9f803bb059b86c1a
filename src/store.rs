// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistence of tasks in a task file.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::str::from_utf8;
use std::str::Utf8Error;

use anyhow::Context as _;
use anyhow::Result;

use thiserror::Error;

use tokio::fs::create_dir_all;
use tokio::fs::read;
use tokio::fs::File;
use tokio::io::AsyncWriteExt as _;

use crate::log::debug;
use crate::log::warn;
use crate::ser::decode;
use crate::ser::encode_with;
use crate::ser::MalformedRecordError;
use crate::ser::TodoDate;
use crate::task::Task;


/// Read the contents of a file, if it exists.
pub(crate) async fn read_file(path: &Path) -> Result<Option<Vec<u8>>> {
  match read(path).await {
    Ok(data) => Ok(Some(data)),
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
    Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
  }
}

/// Write `data` to a file, creating parent directories as necessary.
pub(crate) async fn write_file(path: &Path, data: &[u8]) -> Result<()> {
  if let Some(dir) = path.parent() {
    let () = create_dir_all(dir)
      .await
      .with_context(|| format!("failed to create directory {}", dir.display()))?;
  }

  let mut file = File::create(path)
    .await
    .with_context(|| format!("failed to open {} for writing", path.display()))?;
  let () = file
    .write_all(data)
    .await
    .with_context(|| format!("failed to write {}", path.display()))?;
  let () = file
    .flush()
    .await
    .with_context(|| format!("failed to flush {}", path.display()))?;
  Ok(())
}


/// The reason a line of a task file did not result in a task.
#[derive(Debug, Error)]
pub enum SkipReason {
  /// The line carries a type code we do not know about.
  #[error("unknown task type '{0}'")]
  UnknownKind(char),
  /// The line is not a valid task record.
  #[error("{}", .0.reason)]
  Malformed(#[from] MalformedRecordError),
  /// The line is not valid UTF-8.
  #[error("line is not valid UTF-8")]
  InvalidUtf8(#[source] Utf8Error),
}


/// A line of a task file that did not result in a task.
#[derive(Debug)]
pub struct Skipped {
  /// The one-based number of the line.
  pub line_no: usize,
  /// The contents of the line.
  pub line: String,
  /// Why the line was skipped.
  pub reason: SkipReason,
}

impl Display for Skipped {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "line {}: {} ('{}')", self.line_no, self.reason, self.line)
  }
}


/// The result of loading a task file.
#[derive(Debug, Default)]
pub struct Loaded {
  /// The tasks that could be read, in file order.
  pub tasks: Vec<Task>,
  /// The lines that could not be converted into tasks.
  pub skipped: Vec<Skipped>,
}

impl Loaded {
  /// Convert the contents of a task file into tasks.
  ///
  /// Lines that cannot be converted, including ones that are not valid
  /// UTF-8, are recorded but do not prevent the remaining ones from
  /// being read. Blank lines are ignored.
  pub fn parse(content: &[u8]) -> Self {
    let mut loaded = Self::default();

    for (idx, line) in content.split(|byte| *byte == b'\n').enumerate() {
      let reason = match from_utf8(line) {
        Ok(text) if text.trim().is_empty() => continue,
        Ok(text) => match decode(text) {
          Ok(Some(task)) => {
            let () = loaded.tasks.push(task);
            continue
          },
          // SANITY: `decode` only reports an unknown type if the line
          //         starts with a single character type code.
          Ok(None) => SkipReason::UnknownKind(text.chars().next().unwrap_or_default()),
          Err(err) => SkipReason::Malformed(err),
        },
        Err(err) => SkipReason::InvalidUtf8(err),
      };

      let skipped = Skipped {
        line_no: idx + 1,
        line: String::from_utf8_lossy(line)
          .trim_end_matches('\r')
          .to_string(),
        reason,
      };
      warn!("skipping {skipped}");
      let () = loaded.skipped.push(skipped);
    }
    loaded
  }
}


/// A file storing tasks, one per line.
#[derive(Debug)]
pub struct TaskFile {
  /// The path to the file.
  path: PathBuf,
}

impl TaskFile {
  /// Create a `TaskFile` object referencing the file at `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Load the tasks contained in the file.
  ///
  /// A file that does not exist is treated as one without any tasks.
  pub async fn load(&self) -> Result<Loaded> {
    let data = match read_file(&self.path).await? {
      Some(data) => data,
      None => {
        debug!("task file {} not present", self.path.display());
        return Ok(Loaded::default())
      },
    };

    let loaded = Loaded::parse(&data);
    debug!(
      "loaded {} tasks from {} ({} lines skipped)",
      loaded.tasks.len(),
      self.path.display(),
      loaded.skipped.len()
    );
    Ok(loaded)
  }

  /// Persist the provided tasks in the file, replacing its contents.
  pub async fn save(&self, tasks: &[Task], todo_date: TodoDate) -> Result<()> {
    let content = encode_with(tasks, todo_date);
    let () = write_file(&self.path, content.as_bytes())
      .await
      .with_context(|| format!("failed to save tasks to {}", self.path.display()))?;
    debug!("saved {} tasks to {}", tasks.len(), self.path.display());
    Ok(())
  }

  /// Retrieve the path to the file.
  #[inline]
  pub fn path(&self) -> &Path {
    &self.path
  }
}

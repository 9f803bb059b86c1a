// Copyright (C) 2024-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::NaiveDate;

use clap::Parser;
use clap::Subcommand;

use crate::date::parse_date;


/// A personal task tracker storing tasks in a plain text file.
#[derive(Debug, Parser)]
#[clap(version = env!("HAL_VERSION"))]
pub struct Args {
  /// The configuration directory to use.
  ///
  /// The directory typically contains a `hal.json` configuration
  /// alongside the `tasks.txt` task file.
  #[clap(short, long)]
  pub config_dir: Option<PathBuf>,
  /// The task file to use instead of the one in the configuration
  /// directory.
  #[clap(short, long)]
  pub tasks_file: Option<PathBuf>,
  /// Force reclamation of stale lock files in case a previous program
  /// instance terminated improperly.
  #[clap(short, long)]
  pub force: bool,
  /// Allow modifications of a task file containing lines that could
  /// not be read, dropping these lines.
  #[clap(long)]
  pub discard_invalid: bool,
  /// The operation to perform.
  #[clap(subcommand)]
  pub command: Command,
}


/// The operations the program supports.
#[derive(Debug, Subcommand)]
pub enum Command {
  /// List all tasks.
  List,
  /// Check the task file for lines that cannot be read.
  Check,
  /// Add a task without a date.
  Todo {
    /// The task's description.
    #[clap(required = true)]
    description: Vec<String>,
  },
  /// Add a task that is due by a certain date.
  Deadline {
    /// The date by which the task is due, in YYYY-MM-DD format.
    #[clap(long, value_parser = parse_date)]
    by: NaiveDate,
    /// The task's description.
    #[clap(required = true)]
    description: Vec<String>,
  },
  /// Add an event taking place at a certain date.
  Event {
    /// The date at which the event takes place, in YYYY-MM-DD format.
    #[clap(long, value_parser = parse_date)]
    at: NaiveDate,
    /// The event's description.
    #[clap(required = true)]
    description: Vec<String>,
  },
  /// Mark a task as done.
  Done {
    /// The one-based index of the task, as reported by `list`.
    index: NonZeroUsize,
  },
}

impl Command {
  /// Check whether the command modifies the task file.
  pub fn is_modifying(&self) -> bool {
    !matches!(self, Self::List | Self::Check)
  }
}

// Copyright (C) 2017-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! A personal task tracker persisting tasks in a line-oriented text
//! format.
//!
//! The heart of the crate is the [`ser`] module, which converts
//! [`Task`] objects to and from lines of text. The remaining modules
//! take care of storing these lines in a file and of providing a
//! command line interface on top.

#[macro_use]
mod log;

mod args;
mod config;
pub mod date;
mod paths;
pub mod ser;
pub mod store;
pub mod task;

pub use crate::args::Args;
pub use crate::args::Command;
pub use crate::config::Config;
pub use crate::paths::Paths;
pub use crate::task::Kind;
pub use crate::task::Task;

use std::env::args_os;
use std::fs::create_dir_all;
use std::fs::remove_file;
use std::fs::File;
use std::io::stdout;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Context as _;
use anyhow::Result;

use clap::error::ErrorKind as ClapError;
use clap::Parser as _;

use tokio::runtime::Builder;

use crate::log::debug;
use crate::log::error;
use crate::ser::is_representable;
use crate::ser::SEPARATOR;
use crate::store::Loaded;
use crate::store::TaskFile;


/// Create a task from the words of its description, as provided on
/// the command line.
fn make_task<F>(description: Vec<String>, make: F) -> Result<Task>
where
  F: FnOnce(String) -> Task,
{
  let task = make(description.join(" "));
  if !is_representable(task.description()) {
    bail!(
      "task description {:?} cannot be stored: it must not contain '{SEPARATOR}' or line breaks and must not end in '{}'",
      task.description(),
      SEPARATOR.trim_end(),
    )
  }
  Ok(task)
}


/// Ensure that the loaded task file can be rewritten without losing
/// data.
fn ensure_rewritable(task_file: &TaskFile, loaded: &Loaded, discard_invalid: bool) -> Result<()> {
  if !loaded.skipped.is_empty() && !discard_invalid {
    bail!(
      "refusing to modify {}: {} line(s) could not be read and would be lost; \
       re-run with --discard-invalid to drop them",
      task_file.path().display(),
      loaded.skipped.len()
    )
  }
  Ok(())
}


/// Run the program, executing the provided command.
pub async fn run_prog<W>(
  out: &mut W,
  paths: &Paths,
  command: Command,
  discard_invalid: bool,
) -> Result<()>
where
  W: Write,
{
  let config = Config::load(&paths.config_file())
    .await
    .context("failed to load configuration")?;
  let task_file = TaskFile::new(paths.tasks_file());
  let mut loaded = task_file
    .load()
    .await
    .with_context(|| format!("failed to load tasks from {}", task_file.path().display()))?;

  let (verb, idx) = match command {
    Command::List => {
      for skipped in &loaded.skipped {
        writeln!(out, "skipping {skipped}")?;
      }
      for (idx, task) in loaded.tasks.iter().enumerate() {
        writeln!(out, "{}. {task}", idx + 1)?;
      }
      return Ok(())
    },
    Command::Check => {
      for skipped in &loaded.skipped {
        writeln!(out, "{skipped}")?;
      }
      if !loaded.skipped.is_empty() {
        bail!(
          "{} contains {} line(s) that could not be read",
          task_file.path().display(),
          loaded.skipped.len()
        )
      }
      writeln!(
        out,
        "{}: {} task(s), no problems found",
        task_file.path().display(),
        loaded.tasks.len()
      )?;
      return Ok(())
    },
    Command::Todo { description } => {
      let task = make_task(description, Task::todo)?;
      let () = ensure_rewritable(&task_file, &loaded, discard_invalid)?;
      let () = loaded.tasks.push(task);
      ("added", loaded.tasks.len() - 1)
    },
    Command::Deadline { by, description } => {
      let task = make_task(description, |description| Task::deadline(description, by))?;
      let () = ensure_rewritable(&task_file, &loaded, discard_invalid)?;
      let () = loaded.tasks.push(task);
      ("added", loaded.tasks.len() - 1)
    },
    Command::Event { at, description } => {
      let task = make_task(description, |description| Task::event(description, at))?;
      let () = ensure_rewritable(&task_file, &loaded, discard_invalid)?;
      let () = loaded.tasks.push(task);
      ("added", loaded.tasks.len() - 1)
    },
    Command::Done { index } => {
      let () = ensure_rewritable(&task_file, &loaded, discard_invalid)?;
      let idx = index.get() - 1;
      let count = loaded.tasks.len();
      let task = loaded
        .tasks
        .get_mut(idx)
        .ok_or_else(|| anyhow!("no task with index {index} (have {count} task(s))"))?;
      let () = task.set_done(true);
      ("completed", idx)
    },
  };

  let () = task_file.save(&loaded.tasks, config.todo_date).await?;
  // SANITY: `idx` always references a task we just added or modified.
  let task = &loaded.tasks[idx];
  writeln!(out, "{verb} {}. {task}", idx + 1)?;
  Ok(())
}


struct LockFile<'path>(&'path Path);

impl Drop for LockFile<'_> {
  fn drop(&mut self) {
    if let Err(err) = remove_file(self.0) {
      error!("failed to remove lock file {}: {err}", self.0.display());
      eprintln!("failed to remove lock file {}: {err}", self.0.display());
    }
  }
}


/// Run a function after attempting to create a lock file and remove it
/// once the function has returned.
fn with_lockfile<F>(lock_file: &Path, force: bool, f: F) -> Result<()>
where
  F: FnOnce() -> Result<()>,
{
  if let Some(dir) = lock_file.parent() {
    let () = create_dir_all(dir)
      .with_context(|| format!("failed to create directory {}", dir.display()))?;
  }

  if force {
    let _file = File::options()
      .create(true)
      .truncate(true)
      .write(true)
      .open(lock_file)
      .with_context(|| {
        format!(
          "failed to take ownership of lock file {}",
          lock_file.display()
        )
      })?;
  } else {
    let result = File::options().create_new(true).write(true).open(lock_file);
    if matches!(&result, Err(err) if err.kind() == ErrorKind::AlreadyExists) {
      eprintln!(
        "lock file {} already present; is another program instance running?",
        lock_file.display()
      );
      eprintln!("re-run with --force/-f if you are sure that the file is stale");
    }
    let _file =
      result.with_context(|| format!("failed to create lock file {}", lock_file.display()))?;
  }

  let _guard = LockFile(lock_file);
  f()
}

/// Run the provided command on a freshly created async runtime.
fn run_now(paths: &Paths, command: Command, discard_invalid: bool) -> Result<()> {
  let rt = Builder::new_current_thread()
    .build()
    .context("failed to instantiate async runtime")?;

  let stdout = stdout();
  let mut out = stdout.lock();
  let future = run_prog(&mut out, paths, command, discard_invalid);
  rt.block_on(future)
}

/// Parse the arguments and run the program.
fn run_with_args() -> Result<()> {
  let args = match Args::try_parse_from(args_os()) {
    Ok(args) => args,
    Err(err) => match err.kind() {
      ClapError::DisplayHelp | ClapError::DisplayVersion => {
        print!("{err}");
        return Ok(())
      },
      _ => return Err(err.into()),
    },
  };

  let Args {
    config_dir,
    tasks_file,
    force,
    discard_invalid,
    command,
  } = args;

  let paths = Paths::new(config_dir, tasks_file)?;
  debug!("using task file {}", paths.tasks_file().display());

  // Only modifications need protection from concurrent instances.
  if command.is_modifying() {
    with_lockfile(&paths.lock_file(), force, || {
      run_now(&paths, command, discard_invalid)
    })
  } else {
    run_now(&paths, command, discard_invalid)
  }
}

fn run_with_result() -> Result<()> {
  let () = log::init()?;
  run_with_args()
}

/// Run the program and handle errors.
pub fn run() -> i32 {
  match run_with_result() {
    Ok(_) => 0,
    Err(err) => {
      error!("{err:?}");
      eprintln!("{err:?}");
      1
    },
  }
}

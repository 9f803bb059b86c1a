// Copyright (C) 2024-2026 Daniel Mueller (deso@posteo.net)
// SPDX-License-Identifier: GPL-3.0-or-later

use std::ffi::OsString;
use std::path::absolute;
use std::path::Path;
use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Context as _;
use anyhow::Result;

use dirs::cache_dir;
use dirs::config_dir;


/// The name of the program's configuration file.
const CONFIG_FILE: &str = "hal.json";
/// The name of the task file used when none is provided.
const TASKS_FILE: &str = "tasks.txt";


/// A type taking care of the program's path handling needs.
#[derive(Debug)]
pub struct Paths {
  /// The path to the configuration directory.
  config_dir: PathBuf,
  /// The absolute path to the task file.
  tasks_file: PathBuf,
  /// The path to the directory containing "ephemeral" state.
  state_dir: PathBuf,
}

impl Paths {
  /// Instantiate a new `Paths` object, optionally using `config_dir` as
  /// the directory storing configuration data and `tasks_file` as the
  /// file storing tasks.
  pub fn new(config_dir: Option<PathBuf>, tasks_file: Option<PathBuf>) -> Result<Self> {
    let config_dir = if let Some(config_dir) = config_dir {
      config_dir
    } else {
      self::config_dir()
        .ok_or_else(|| anyhow!("unable to determine config directory"))?
        .join("hal")
    };

    let tasks_file = tasks_file.unwrap_or_else(|| config_dir.join(TASKS_FILE));
    let tasks_file = absolute(&tasks_file)
      .with_context(|| format!("failed to make path `{}` absolute", tasks_file.display()))?;

    let state_dir = cache_dir()
      .ok_or_else(|| anyhow!("unable to determine cache directory"))?
      .join("hal");

    let slf = Self {
      config_dir,
      tasks_file,
      state_dir,
    };
    Ok(slf)
  }

  /// Retrieve the path to the program's configuration file.
  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }

  /// Retrieve the path to the program's task file.
  pub fn tasks_file(&self) -> &Path {
    &self.tasks_file
  }

  /// Retrieve the path to the lock file guarding the task file.
  ///
  /// Each task file has its own lock file, mirroring the task file's
  /// absolute path inside the state directory.
  pub(crate) fn lock_file(&self) -> PathBuf {
    let mut relative = self.tasks_file.components();
    let _root = relative.next();

    let mut lock_file = OsString::from(relative.as_path().as_os_str());
    let () = lock_file.push(".lock");
    self.state_dir.join(lock_file)
  }
}

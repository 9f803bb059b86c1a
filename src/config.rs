// Copyright (C) 2023-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use anyhow::Context as _;
use anyhow::Result;

use serde::Deserialize;
use serde::Serialize;
use serde_json::from_slice as from_json;
use serde_json::to_vec_pretty as to_json;

use crate::ser::TodoDate;
use crate::store::read_file;
use crate::store::write_file;


/// The program's configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
  /// What to emit into the date field of to-do items when saving.
  pub todo_date: TodoDate,
}

impl Config {
  /// Load a `Config` object from a file.
  ///
  /// If the file does not exist the default configuration is used.
  pub async fn load(path: &Path) -> Result<Self> {
    let config = read_file(path)
      .await?
      .map(|data| from_json::<Self>(&data))
      .transpose()
      .with_context(|| format!("failed to load configuration from {}", path.display()))?
      .unwrap_or_default();
    Ok(config)
  }

  /// Persist the configuration into a file.
  pub async fn save(&self, path: &Path) -> Result<()> {
    let data = to_json(self).context("failed to serialize configuration")?;
    write_file(path, &data)
      .await
      .with_context(|| format!("failed to save configuration to {}", path.display()))
  }
}

// Copyright (C) 2017-2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! A personal task tracker persisting tasks in a line-oriented text
//! format.

use std::process::exit;

use hal::run;


fn main() {
  exit(run());
}

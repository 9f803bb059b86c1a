// Copyright (C) 2026 Daniel Mueller <deso@posteo.net>
// SPDX-License-Identifier: GPL-3.0-or-later

//! Calendar date handling for task records.

use chrono::Local;
use chrono::NaiveDate;
use chrono::ParseResult;


/// The format in which dates are represented textually.
pub const DATE_FORMAT: &str = "%Y-%m-%d";


/// Parse a date in [`DATE_FORMAT`], e.g., `2024-12-01`.
pub fn parse_date(text: &str) -> ParseResult<NaiveDate> {
  NaiveDate::parse_from_str(text, DATE_FORMAT)
}

/// Render a date in [`DATE_FORMAT`].
pub fn format_date(date: NaiveDate) -> String {
  date.format(DATE_FORMAT).to_string()
}

/// Retrieve the current date in the local time zone.
pub fn today() -> NaiveDate {
  Local::now().date_naive()
}

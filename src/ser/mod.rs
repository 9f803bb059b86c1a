// Copyright (C) 2018-2026 Daniel Mueller (deso@posteo.net)
// SPDX-License-Identifier: GPL-3.0-or-later

//! A module housing serialization related definitions.

mod error;
mod line;

pub use error::Malformation;
pub use error::MalformedRecordError;
pub use line::decode;
pub use line::encode;
pub use line::encode_with;
pub use line::is_representable;
pub use line::TodoDate;
pub use line::SEPARATOR;

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types shared by every decoder: the reading value model, the error
//! type, and the bounds-checked payload cursor.

pub mod cursor;
pub mod error;
pub mod value;

pub use cursor::ByteCursor;
pub use error::{CodecError, Result};
pub use value::{Reading, ReadingValue};

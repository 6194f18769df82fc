// Copyright (C) 2022 Quickwit, Inc.
//
// Quickwit is offered under the AGPL v3.0 and as commercial software.
// For commercial licensing, contact us at hello@quickwit.io.
//
// AGPL:
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! This library reads and writes line-oriented trace records.
//!
//! Each line starts with a one-character mode, followed by space
//! separated fields:
//!
//! ```text
//! <mode> <field1> <field2> ... <fieldN>\n
//! ```
//!
//! Numeric fields are written in lowercase hexadecimal, without prefix
//! nor leading zeroes. What a mode means is up to the caller.
//!
//! The [`LineWriter`] buffers lines and only hands them to the underlying
//! sink when its buffer of [`BUFFER_CAPACITY`] bytes overflows, or
//! when `.flush()` is called explicitly.
//!
//! The [`LineReader`] reads one line at a time, and extracts its fields
//! from left to right.
//!
//! # Usage
//!
//! ```
//! use tracelog::{LineReader, LineWriter};
//! # fn main() -> Result<(), tracelog::WriteError> {
//! // We use a simple `Vec<u8>` to act as our
//! // file in this example.
//! let mut writer = LineWriter::new(Vec::new());
//! writer.write_hex_line('t', &[0x4, 0x3])?;
//! write!(writer, "m {} {:x}\n", "/usr/lib/libc.so.6", 0x7f48beedc00u64)?;
//! writer.flush()?;
//! let buffer = writer.detach().unwrap();
//!
//! // ... and the reader can work with any `io::BufRead`.
//! let mut lines = &buffer[..];
//! let mut reader = LineReader::new();
//! assert!(reader.get_line(&mut lines)?);
//! assert_eq!(reader.mode(), Some('t'));
//! assert_eq!(reader.read::<u32>(), Some(0x4));
//! assert_eq!(reader.read::<u32>(), Some(0x3));
//! assert_eq!(reader.read::<u32>(), None);
//! assert!(reader.get_line(&mut lines)?);
//! assert_eq!(reader.mode(), Some('m'));
//! assert_eq!(reader.read_str(), Some("/usr/lib/libc.so.6"));
//! assert_eq!(reader.read::<u64>(), Some(0x7f48beedc00));
//! assert!(!reader.get_line(&mut lines)?);
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;
mod writer;

pub use self::error::WriteError;
pub use self::reader::{Extract, LineReader};
pub use self::writer::{LineWriter, BUFFER_CAPACITY, MAX_WRITE_LEN};

#[cfg(test)]
mod tests;

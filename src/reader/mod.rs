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

mod hex;

use std::convert::TryFrom;
use std::io::{self, BufRead};
use std::ops::Range;

use log::warn;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use self::hex::parse_hex;

/// Types that can be extracted from a line field.
///
/// Integers are read as hexadecimal, strings are read verbatim.
pub trait Extract: Sized {
    fn extract(reader: &mut LineReader) -> Option<Self>;
}

impl Extract for u64 {
    fn extract(reader: &mut LineReader) -> Option<Self> {
        reader.read_hex()
    }
}

impl Extract for u32 {
    fn extract(reader: &mut LineReader) -> Option<Self> {
        reader.read_hex()
    }
}

impl Extract for usize {
    fn extract(reader: &mut LineReader) -> Option<Self> {
        reader.read_hex()
    }
}

impl Extract for String {
    fn extract(reader: &mut LineReader) -> Option<Self> {
        reader.read_str().map(str::to_string)
    }
}

impl Extract for Vec<u8> {
    fn extract(reader: &mut LineReader) -> Option<Self> {
        reader.read_bytes().map(<[u8]>::to_vec)
    }
}

/// Decodes the first character of `line`.
///
/// Returns `None` for an empty line, or if the line does not start
/// with a valid UTF-8 character.
fn decode_mode(line: &[u8]) -> Option<char> {
    let first = *line.first()?;
    let width = match first {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return None,
    };
    std::str::from_utf8(line.get(..width)?).ok()?.chars().next()
}

/// Reads a stream line by line, and extracts the fields of
/// the current line from left to right.
///
/// A line is made of a one-character mode, followed by whitespace
/// separated fields. Lines are kept as raw bytes: a field that is not
/// valid UTF-8 can still be read with `.read_bytes()`.
/// Once an extraction fails, all of the following extractions on the
/// same line fail too.
#[derive(Default)]
pub struct LineReader {
    line: Vec<u8>,
    mode: Option<char>,
    // Byte offset right after the last consumed field.
    cursor: usize,
    expect_sized_strings: bool,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, string fields are expected to be encoded as
    /// `<hex-length> <bytes>`, and can therefore contain whitespace.
    pub fn set_expect_sized_strings(&mut self, expect_sized_strings: bool) {
        self.expect_sized_strings = expect_sized_strings;
    }

    /// Reads the next line of `rdr`.
    ///
    /// Returns `Ok(false)` once the stream is exhausted.
    pub fn get_line<R: BufRead>(&mut self, rdr: &mut R) -> io::Result<bool> {
        self.line.clear();
        match BufRead::read_until(rdr, b'\n', &mut self.line) {
            Ok(num_bytes) => Ok(self.start_line(num_bytes)),
            Err(io_err) => {
                self.clear();
                Err(io_err)
            }
        }
    }

    /// Same as `.get_line()`, reading from an async stream.
    pub async fn get_line_async<R: AsyncBufRead + Unpin>(
        &mut self,
        rdr: &mut R,
    ) -> io::Result<bool> {
        self.line.clear();
        match AsyncBufReadExt::read_until(rdr, b'\n', &mut self.line).await {
            Ok(num_bytes) => Ok(self.start_line(num_bytes)),
            Err(io_err) => {
                self.clear();
                Err(io_err)
            }
        }
    }

    /// Returns the current line, without its trailing newline.
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// Returns the first character of the current line.
    pub fn mode(&self) -> Option<char> {
        self.mode
    }

    /// Extracts the next field of the line.
    ///
    /// Returns `None` if the line has no more fields, or if the field
    /// cannot be decoded as a `T`.
    pub fn read<T: Extract>(&mut self) -> Option<T> {
        T::extract(self)
    }

    /// Extracts the next string field as raw bytes, without copying it.
    pub fn read_bytes(&mut self) -> Option<&[u8]> {
        let range = self.next_field_range()?;
        Some(&self.line[range])
    }

    /// Extracts the next string field, without copying it.
    ///
    /// Fails if the field is not valid UTF-8.
    pub fn read_str(&mut self) -> Option<&str> {
        let range = self.next_field_range()?;
        if let Err(utf8_err) = std::str::from_utf8(&self.line[range.clone()]) {
            warn!(
                "field at offset {} is not valid utf-8 ({}) in line {:?}",
                range.start,
                utf8_err,
                String::from_utf8_lossy(&self.line)
            );
            self.exhaust();
            return None;
        }
        std::str::from_utf8(&self.line[range]).ok()
    }

    fn start_line(&mut self, num_bytes: usize) -> bool {
        if num_bytes == 0 {
            self.clear();
            return false;
        }
        if self.line.last() == Some(&b'\n') {
            self.line.pop();
        }
        self.mode = decode_mode(&self.line);
        self.cursor = self
            .mode
            .map(char::len_utf8)
            .unwrap_or_else(|| self.line.len().min(1));
        true
    }

    fn clear(&mut self) {
        self.line.clear();
        self.mode = None;
        self.cursor = 0;
    }

    fn exhaust(&mut self) {
        self.cursor = self.line.len();
    }

    fn read_hex<T: TryFrom<u64>>(&mut self) -> Option<T> {
        let range = self.next_token_range()?;
        let token = &self.line[range.clone()];
        if let Some(value) = parse_hex(token).and_then(|value| T::try_from(value).ok()) {
            return Some(value);
        }
        warn!(
            "unexpected hex field {:?} at offset {} in line {:?}",
            String::from_utf8_lossy(token),
            range.start,
            String::from_utf8_lossy(&self.line)
        );
        self.exhaust();
        None
    }

    fn next_field_range(&mut self) -> Option<Range<usize>> {
        if self.expect_sized_strings {
            self.next_sized_range()
        } else {
            self.next_token_range()
        }
    }

    /// Skips whitespace and returns the range of the next token.
    fn next_token_range(&mut self) -> Option<Range<usize>> {
        let bytes = &self.line[..];
        let start = self.cursor
            + bytes[self.cursor..]
                .iter()
                .take_while(|b| b.is_ascii_whitespace())
                .count();
        let stop = start
            + bytes[start..]
                .iter()
                .take_while(|b| !b.is_ascii_whitespace())
                .count();
        if start == stop {
            self.exhaust();
            return None;
        }
        self.cursor = stop;
        Some(start..stop)
    }

    /// Returns the range of a `<hex-length> <bytes>` field.
    fn next_sized_range(&mut self) -> Option<Range<usize>> {
        let len: usize = self.read_hex()?;
        let has_separator = self
            .line
            .get(self.cursor)
            .map_or(false, u8::is_ascii_whitespace);
        let start = self.cursor + 1;
        let stop = start.saturating_add(len);
        if !has_separator || stop > self.line.len() {
            warn!(
                "sized string of length {} does not fit in line {:?}",
                len,
                String::from_utf8_lossy(&self.line)
            );
            self.exhaust();
            return None;
        }
        self.cursor = stop;
        Some(start..stop)
    }
}

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

use std::fmt;
use std::io::{self, Write};

use log::{debug, warn};

use crate::WriteError;

/// Size of the writer buffer.
///
/// This is `PIPE_BUF`, so that a flush targeting a pipe is atomic.
/// The buffer holds up to `BUFFER_CAPACITY` bytes of content.
pub const BUFFER_CAPACITY: usize = 4_096;

/// Maximum number of bytes a single write can append.
///
/// Longer writes are truncated to their first `MAX_WRITE_LEN` bytes.
pub const MAX_WRITE_LEN: usize = BUFFER_CAPACITY - 1;

/// Returns the part of a rendered write that will be appended to the buffer.
fn writable_prefix(rendered: &[u8]) -> &[u8] {
    &rendered[..rendered.len().min(MAX_WRITE_LEN)]
}

/// Buffered writer of text lines.
///
/// Nothing reaches the underlying sink until the buffer overflows
/// or `.flush()` is called. Dropping the writer does not flush.
pub struct LineWriter<W> {
    wrt: Option<W>,
    buffer: Box<[u8; BUFFER_CAPACITY]>,
    buffer_len: usize,
    // Staging area for formatted and hex lines.
    render_buffer: Vec<u8>,
}

impl<W: io::Write> LineWriter<W> {
    pub fn new(wrt: W) -> Self {
        LineWriter {
            wrt: Some(wrt),
            buffer: Box::new([0u8; BUFFER_CAPACITY]),
            buffer_len: 0,
            render_buffer: Vec::with_capacity(BUFFER_CAPACITY),
        }
    }

    /// Returns true iff a sink is bound to this writer.
    pub fn can_write(&self) -> bool {
        self.wrt.is_some()
    }

    /// Number of bytes currently held in the buffer.
    pub fn buffered_len(&self) -> usize {
        self.buffer_len
    }

    /// Returns the bound sink, if any.
    pub fn get_ref(&self) -> Option<&W> {
        self.wrt.as_ref()
    }

    /// Unbinds the sink and returns it.
    ///
    /// Buffered bytes are discarded, and the sink is neither flushed nor closed.
    pub fn detach(&mut self) -> Option<W> {
        self.buffer_len = 0;
        self.wrt.take()
    }

    /// Appends formatted text.
    ///
    /// This makes the writer usable with the `write!` macro:
    /// `write!(writer, "{} {:x}\n", 42, 42)`.
    ///
    /// An error is only returned if this write triggered a flush and
    /// that flush failed.
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), WriteError> {
        self.render_buffer.clear();
        io::Write::write_fmt(&mut self.render_buffer, args).map_err(|_| WriteError::Format)?;
        self.append_rendered()
    }

    /// Appends `text` verbatim.
    pub fn write_str(&mut self, text: &str) -> Result<(), WriteError> {
        self.append(text.as_bytes())
    }

    /// Appends a line of the form `<mode> <hex> <hex> ...\n`.
    ///
    /// Values are rendered in lowercase hexadecimal without leading zeroes.
    /// 32-bit values can be passed via `u64::from`.
    pub fn write_hex_line(&mut self, mode: char, values: &[u64]) -> Result<(), WriteError> {
        self.render_buffer.clear();
        let mut mode_utf8 = [0u8; 4];
        self.render_buffer
            .extend_from_slice(mode.encode_utf8(&mut mode_utf8).as_bytes());
        for &value in values {
            self.render_buffer.push(b' ');
            hex::push_hex(value, &mut self.render_buffer);
        }
        self.render_buffer.push(b'\n');
        self.append_rendered()
    }

    /// Writes all of the buffered bytes to the sink, and empties the buffer.
    ///
    /// A failure is fatal: the bytes handed to the sink are lost,
    /// and the sink gets unbound from this writer.
    pub fn flush(&mut self) -> Result<(), WriteError> {
        let wrt = self.wrt.as_mut().ok_or(WriteError::Closed)?;
        let num_bytes = self.buffer_len;
        let flush_res = wrt
            .write_all(&self.buffer[..num_bytes])
            .and_then(|_| wrt.flush());
        self.buffer_len = 0;
        if let Err(io_err) = flush_res {
            warn!("failed to flush {} bytes: {}", num_bytes, io_err);
            self.wrt = None;
            return Err(WriteError::Io(io_err));
        }
        debug!("flushed {} bytes", num_bytes);
        Ok(())
    }

    fn append_rendered(&mut self) -> Result<(), WriteError> {
        let rendered = std::mem::take(&mut self.render_buffer);
        let append_res = self.append(&rendered);
        self.render_buffer = rendered;
        append_res
    }

    fn append(&mut self, rendered: &[u8]) -> Result<(), WriteError> {
        let payload = writable_prefix(rendered);
        if self.buffer_len + payload.len() > BUFFER_CAPACITY {
            // Only the previously buffered bytes are flushed.
            self.flush()?;
        }
        let start = self.buffer_len;
        let stop = start + payload.len();
        self.buffer[start..stop].copy_from_slice(payload);
        self.buffer_len = stop;
        Ok(())
    }
}

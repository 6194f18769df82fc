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

use std::fs::File;
use std::io::BufReader;

use rand::Rng;
use tempfile::NamedTempFile;

use crate::{LineReader, LineWriter, BUFFER_CAPACITY};

fn read_all_hex_lines(file: &NamedTempFile) -> Vec<(char, Vec<u64>)> {
    let mut stream = BufReader::new(File::open(file.path()).unwrap());
    let mut reader = LineReader::new();
    let mut lines = Vec::new();
    while reader.get_line(&mut stream).unwrap() {
        let mut values = Vec::new();
        while let Some(value) = reader.read::<u64>() {
            values.push(value);
        }
        lines.push((reader.mode().unwrap(), values));
    }
    lines
}

#[test]
fn test_hex_lines_written_then_read() {
    let file = NamedTempFile::new().unwrap();
    let mut rng = rand::thread_rng();
    let mut expected = Vec::new();
    {
        let mut writer = LineWriter::new(file.as_file());
        for i in 0..2_000u64 {
            let mode = if i % 2 == 0 { 'a' } else { 'f' };
            let num_values = rng.gen_range(0..8usize);
            let values: Vec<u64> = (0..num_values)
                .map(|_| rng.gen::<u64>() >> rng.gen_range(0..64u32))
                .collect();
            writer.write_hex_line(mode, &values).unwrap();
            expected.push((mode, values));
        }
        writer.flush().unwrap();
    }
    assert_eq!(read_all_hex_lines(&file), expected);
}

#[test]
fn test_mixed_records_written_then_read() {
    let file = NamedTempFile::new().unwrap();
    {
        let mut writer = LineWriter::new(file.as_file());
        let module = "/usr/lib/libc.so.6";
        write!(writer, "m {} {:x} {:x}\n", module, 0x7f48beedc00u64, 0).unwrap();
        writer.write_hex_line('t', &[4, 3]).unwrap();
        writer.write_hex_line('+', &[0]).unwrap();
        writer.flush().unwrap();
    }
    let mut stream = BufReader::new(File::open(file.path()).unwrap());
    let mut reader = LineReader::new();

    assert!(reader.get_line(&mut stream).unwrap());
    assert_eq!(reader.mode(), Some('m'));
    assert_eq!(reader.read::<String>().as_deref(), Some("/usr/lib/libc.so.6"));
    assert_eq!(reader.read::<u64>(), Some(0x7f48beedc00));
    assert_eq!(reader.read::<u64>(), Some(0));
    assert_eq!(reader.read::<u64>(), None);

    assert!(reader.get_line(&mut stream).unwrap());
    assert_eq!(reader.line(), b"t 4 3");

    assert!(reader.get_line(&mut stream).unwrap());
    assert_eq!(reader.line(), b"+ 0");

    assert!(!reader.get_line(&mut stream).unwrap());
}

#[test]
fn test_sized_strings_written_then_read() {
    let file = NamedTempFile::new().unwrap();
    let paths = ["/opt/My Application/lib.so", "", "/tmp/x"];
    {
        let mut writer = LineWriter::new(file.as_file());
        for (i, path) in paths.iter().enumerate() {
            write!(writer, "s {:x} {} {:x}\n", path.len(), path, i).unwrap();
        }
        writer.flush().unwrap();
    }
    let mut stream = BufReader::new(File::open(file.path()).unwrap());
    let mut reader = LineReader::new();
    reader.set_expect_sized_strings(true);
    for (i, path) in paths.iter().enumerate() {
        assert!(reader.get_line(&mut stream).unwrap());
        assert_eq!(reader.mode(), Some('s'));
        assert_eq!(reader.read_str(), Some(*path));
        assert_eq!(reader.read::<usize>(), Some(i));
    }
    assert!(!reader.get_line(&mut stream).unwrap());
}

#[test]
fn test_lines_survive_implicit_flushes() {
    let file = NamedTempFile::new().unwrap();
    let num_lines = 3 * BUFFER_CAPACITY;
    {
        let mut writer = LineWriter::new(file.as_file());
        for i in 0..num_lines as u64 {
            writer.write_hex_line('i', &[i, u64::MAX - i]).unwrap();
        }
        writer.flush().unwrap();
    }
    let lines = read_all_hex_lines(&file);
    assert_eq!(lines.len(), num_lines);
    for (i, (mode, values)) in lines.into_iter().enumerate() {
        let i = i as u64;
        assert_eq!(mode, 'i');
        assert_eq!(values, vec![i, u64::MAX - i]);
    }
}

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

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Number of hex digits required to render `u64::MAX`.
pub(crate) const MAX_HEX_LEN: usize = 16;

/// Appends the lowercase hexadecimal representation of `value`,
/// without prefix nor leading zeroes. `0` is rendered as `"0"`.
pub(crate) fn push_hex(mut value: u64, out: &mut Vec<u8>) {
    let mut digits = [0u8; MAX_HEX_LEN];
    let mut start = MAX_HEX_LEN;
    loop {
        start -= 1;
        digits[start] = HEX_DIGITS[(value & 0xf) as usize];
        value >>= 4;
        if value == 0 {
            break;
        }
    }
    out.extend_from_slice(&digits[start..]);
}

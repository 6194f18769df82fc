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

/// Parses a hexadecimal token, without `0x` prefix.
///
/// Returns `None` if the token is empty, contains a non-hex character,
/// or overflows a `u64`.
pub(crate) fn parse_hex(token: &[u8]) -> Option<u64> {
    if token.is_empty() {
        return None;
    }
    token.iter().try_fold(0u64, |acc, &b| {
        let digit = char::from(b).to_digit(16)?;
        acc.checked_mul(16)?.checked_add(u64::from(digit))
    })
}

#[cfg(test)]
mod tests {
    use super::parse_hex;

    #[test]
    fn test_parse_hex_simple() {
        assert_eq!(parse_hex(b"0"), Some(0));
        assert_eq!(parse_hex(b"2a"), Some(42));
        assert_eq!(parse_hex(b"7f48beedc00"), Some(0x7f48beedc00));
    }

    #[test]
    fn test_parse_hex_max() {
        assert_eq!(parse_hex(b"ffffffffffffffff"), Some(u64::MAX));
        assert_eq!(parse_hex(b"00000000000000000001"), Some(1));
    }

    #[test]
    fn test_parse_hex_overflow_rejected() {
        assert_eq!(parse_hex(b"10000000000000000"), None);
    }

    #[test]
    fn test_parse_hex_invalid_rejected() {
        assert_eq!(parse_hex(b""), None);
        assert_eq!(parse_hex(b"0x10"), None);
        assert_eq!(parse_hex(b"12g"), None);
        assert_eq!(parse_hex(b"-1"), None);
        assert_eq!(parse_hex(b"+1"), None);
    }
}

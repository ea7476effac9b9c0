//! Useful functions with designated modules.

/// Returns the byte offset in `buf` corresponding to the `pos`-th character, which is
/// guaranteed to be aligned to a UTF-8 code point boundary in `buf`.
///
/// If `buf` contains less than `pos` characters, then `buf.len()` is returned.
pub fn pos_to_offset(buf: &str, pos: usize) -> usize {
    buf.char_indices()
        .nth(pos)
        .map(|(offset, _)| offset)
        .unwrap_or(buf.len())
}

/// Returns the number of characters in `buf`.
#[inline]
pub fn char_len(buf: &str) -> usize {
    buf.chars().count()
}

/// Returns the slice of `buf` between the character positions `start` and `end`,
/// where both positions are clamped to the length of `buf`.
pub fn char_slice(buf: &str, start: usize, end: usize) -> &str {
    let start_ofs = pos_to_offset(buf, start);
    let end_ofs = pos_to_offset(buf, end).max(start_ofs);
    &buf[start_ofs..end_ofs]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "aé😀b";

    #[test]
    fn positions_and_offsets() {
        assert_eq!(pos_to_offset(TEXT, 0), 0);
        assert_eq!(pos_to_offset(TEXT, 2), 3);
        assert_eq!(pos_to_offset(TEXT, 3), 7);
        assert_eq!(pos_to_offset(TEXT, 9), TEXT.len());
    }

    #[test]
    fn slices() {
        assert_eq!(char_len(TEXT), 4);
        assert_eq!(char_slice(TEXT, 1, 3), "é😀");
        assert_eq!(char_slice(TEXT, 3, 10), "b");
        assert_eq!(char_slice(TEXT, 3, 1), "");
    }
}

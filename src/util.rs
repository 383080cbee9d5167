//! Byte-level scanning helpers shared by the block and inline parsers

/// Advance from `start` past every consecutive `ch`
pub(crate) fn skip_char(data: &[u8], start: usize, ch: u8) -> usize {
    let mut i = start;
    while i < data.len() && data[i] == ch {
        i += 1;
    }
    i
}

/// Advance from `start` to the next `ch`, or to the end of `data`
pub(crate) fn skip_until_char(data: &[u8], start: usize, ch: u8) -> usize {
    let mut i = start;
    while i < data.len() && data[i] != ch {
        i += 1;
    }
    i
}

/// Check whether the byte at `i` is preceded by an odd number of backslashes
pub(crate) fn is_backslash_escaped(data: &[u8], i: usize) -> bool {
    let mut backslashes = 0;
    while backslashes < i && data[i - backslashes - 1] == b'\\' {
        backslashes += 1;
    }
    backslashes % 2 == 1
}

pub(crate) fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub(crate) fn is_punct(c: u8) -> bool {
    c.is_ascii_punctuation()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_helpers() {
        assert_eq!(skip_char(b"###  x", 0, b'#'), 3);
        assert_eq!(skip_char(b"###  x", 3, b' '), 5);
        assert_eq!(skip_char(b"abc", 3, b'a'), 3);
        assert_eq!(skip_until_char(b"abc\ndef", 0, b'\n'), 3);
        assert_eq!(skip_until_char(b"abc", 1, b'\n'), 3);
    }

    #[test]
    fn test_backslash_escaped() {
        assert!(!is_backslash_escaped(b"#", 0));
        assert!(is_backslash_escaped(b"\\#", 1));
        assert!(!is_backslash_escaped(b"\\\\#", 2));
        assert!(is_backslash_escaped(b"a\\\\\\#", 4));
        assert!(!is_backslash_escaped(b"a#", 1));
    }

    #[test]
    fn test_character_classes() {
        for c in [b' ', b'\t', b'\n', b'\r', 0x0b, 0x0c] {
            assert!(is_space(c));
        }
        assert!(!is_space(b'a'));
        for c in b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~" {
            assert!(is_punct(*c));
        }
        assert!(!is_punct(b'a'));
        assert!(!is_punct(b' '));
    }
}

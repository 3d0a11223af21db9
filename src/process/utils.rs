/// Strip every leading and trailing `marker` character, then whitespace.
pub fn strip_marker(raw: &str, marker: &str) -> String {
    let mut s = raw;
    if !marker.is_empty() {
        while let Some(rest) = s.strip_prefix(marker) {
            s = rest;
        }
        while let Some(rest) = s.strip_suffix(marker) {
            s = rest;
        }
    }
    s.trim().to_string()
}

/// The `n`th `sep`-separated segment of `s`, if there are that many.
pub fn segment<'a>(s: &'a str, sep: &str, n: usize) -> Option<&'a str> {
    s.split(sep).nth(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("# a\tb\n", "#"), "a\tb");
        assert_eq!(strip_marker("## a\tb #", "#"), "a\tb");
        // the line terminator shields trailing markers
        assert_eq!(strip_marker("## a\tb #\n", "#"), "a\tb #");
        assert_eq!(strip_marker("  x  ", ""), "x");
    }

    #[test]
    fn test_segment() {
        assert_eq!(segment("S1_RIF_25", "_", 1), Some("RIF"));
        assert_eq!(segment("S1_RIF", "_", 2), None);
        assert_eq!(segment("RVBD1234:abc", ":", 0), Some("RVBD1234"));
    }
}

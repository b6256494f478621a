//! Exact byte-pattern search over file contents

use memchr::memmem;

/// Find the first occurrence of `pattern` in `haystack`
///
/// Byte-exact comparison. Only the first match is reported; a file
/// containing the pattern more than once is patched at the first location
/// only. An empty pattern never matches.
pub fn find_pattern(haystack: &[u8], pattern: &[u8]) -> Option<usize> {
    if pattern.is_empty() {
        return None;
    }
    memmem::find(haystack, pattern)
}

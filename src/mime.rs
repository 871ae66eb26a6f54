//! Suffix-to-MIME-type lookup.
//!
//! A pure, config-driven table rather than content sniffing: the original keys its
//! MIME map by the literal filename suffix and falls back to `application/octet-stream`
//! when a suffix is missing from the map. No content inspection is ever performed, so
//! the same suffix always yields the same answer for the lifetime of the process.

use std::collections::HashMap;

const FALLBACK: &str = "application/octet-stream";

/// Immutable suffix -> MIME type table, loaded once at startup.
pub struct MimeTable(HashMap<String, String>);

impl MimeTable {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    /// Looks up the MIME type for a suffix (e.g. `.png`). Unknown or empty suffixes
    /// fall back to `application/octet-stream`.
    pub fn lookup(&self, suffix: &str) -> String {
        self.0
            .get(suffix)
            .cloned()
            .unwrap_or_else(|| FALLBACK.to_string())
    }
}

/// Returns the suffix of a filename, including the leading dot, or `""` if there
/// is none (no dot, or the dot is the last character makes an empty suffix too).
pub fn suffix_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(i) => &name[i..],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MimeTable {
        let mut map = HashMap::new();
        map.insert(".png".to_string(), "image/png".to_string());
        map.insert(".txt".to_string(), "text/plain".to_string());
        MimeTable::new(map)
    }

    #[test]
    fn known_suffix_resolves() {
        assert_eq!(table().lookup(".png"), "image/png");
    }

    #[test]
    fn unknown_suffix_falls_back() {
        assert_eq!(table().lookup(".zip"), FALLBACK);
    }

    #[test]
    fn lookup_is_pure_and_repeatable() {
        let t = table();
        let a = t.lookup(".txt");
        let b = t.lookup(".txt");
        assert_eq!(a, b);
    }

    #[test]
    fn suffix_of_extracts_extension() {
        assert_eq!(suffix_of("photo.PNG"), ".PNG");
        assert_eq!(suffix_of("noext"), "");
        assert_eq!(suffix_of("archive.tar.gz"), ".gz");
    }
}

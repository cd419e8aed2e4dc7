//! Index entries

use std::fmt;

/// One archived record described by a line of the index file.
///
/// `length` is the stored size and counts the trailing terminator byte that
/// the archive builder appends after every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Record name
    pub name: String,
    /// Byte offset of the record in the data file
    pub offset: u64,
    /// Stored length, terminator included (always at least 1)
    pub length: u64,
}

impl Entry {
    /// Create an entry. `length` must include the terminator byte.
    pub fn new(name: impl Into<String>, offset: u64, length: u64) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
        }
    }

    /// Number of bytes extracted for this entry (terminator excluded).
    pub fn content_len(&self) -> u64 {
        self.length.saturating_sub(1)
    }

    /// One past the last stored byte, or `None` on overflow.
    pub fn end(&self) -> Option<u64> {
        self.offset.checked_add(self.length)
    }

    /// Whether the stored range fits inside a data region of `data_size` bytes.
    pub fn fits_within(&self, data_size: u64) -> bool {
        self.end().is_some_and(|end| end <= data_size)
    }

    /// Parse one index line of the form `name<TAB>offset<TAB>length`.
    ///
    /// Any run of ASCII whitespace separates the fields. On failure the
    /// returned string describes the problem; the caller attaches the line
    /// number.
    pub(crate) fn parse_line(line: &str) -> Result<Self, String> {
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        let [name, offset, length] = fields.as_slice() else {
            return Err(format!("expected 3 fields, found {}", fields.len()));
        };

        let offset = offset
            .parse::<u64>()
            .map_err(|e| format!("invalid offset '{offset}': {e}"))?;
        let length = length
            .parse::<u64>()
            .map_err(|e| format!("invalid length '{length}': {e}"))?;

        if length == 0 {
            return Err(format!(
                "entry '{name}' has length 0 and cannot hold a terminator byte"
            ));
        }

        Ok(Self::new(*name, offset, length))
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.name, self.offset, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tab_separated() {
        let entry = Entry::parse_line("seq_0001\t1024\t57").unwrap();
        assert_eq!(entry, Entry::new("seq_0001", 1024, 57));
        assert_eq!(entry.content_len(), 56);
    }

    #[test]
    fn test_parse_space_separated() {
        let entry = Entry::parse_line("  doc   0  6 ").unwrap();
        assert_eq!(entry, Entry::new("doc", 0, 6));
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        let err = Entry::parse_line("doc\t12").unwrap_err();
        assert_eq!(err, "expected 3 fields, found 2");
    }

    #[test]
    fn test_parse_rejects_extra_field() {
        let err = Entry::parse_line("doc\t0\t6\tx").unwrap_err();
        assert_eq!(err, "expected 3 fields, found 4");
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(
            Entry::parse_line("doc\tabc\t6")
                .unwrap_err()
                .starts_with("invalid offset 'abc'")
        );
        assert!(
            Entry::parse_line("doc\t0\t-6")
                .unwrap_err()
                .starts_with("invalid length '-6'")
        );
    }

    #[test]
    fn test_parse_rejects_zero_length() {
        assert!(Entry::parse_line("empty\t0\t0").is_err());
    }

    #[test]
    fn test_bounds() {
        let entry = Entry::new("a", 10, 6);
        assert_eq!(entry.end(), Some(16));
        assert!(entry.fits_within(16));
        assert!(!entry.fits_within(15));

        let overflowing = Entry::new("b", u64::MAX, 2);
        assert_eq!(overflowing.end(), None);
        assert!(!overflowing.fits_within(u64::MAX));
    }

    #[test]
    fn test_display_matches_index_format() {
        let entry = Entry::new("seq", 5, 9);
        assert_eq!(entry.to_string(), "seq\t5\t9");
        assert_eq!(Entry::parse_line(&entry.to_string()).unwrap(), entry);
    }
}

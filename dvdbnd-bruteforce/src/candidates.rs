//! Candidate fragment generators.
//!
//! Each slot of a template is fed by one generator: a lazily produced,
//! possibly huge sequence of substrings. Generators declare their length
//! for progress estimation only; a declared length of zero means "unknown,
//! count by materializing once". Correctness never depends on the declared
//! numbers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use tracing::warn;

/// A lazily enumerable fragment sequence.
pub trait Candidates: Sync {
    /// Declared sequence length; 0 means unknown.
    fn declared_len(&self) -> u64;

    /// A fresh pass over the sequence.
    fn iter(&self) -> Box<dyn Iterator<Item = String> + Send + '_>;

    /// Declared length, or an exact count when nothing was declared.
    ///
    /// Only used for progress percentages.
    fn resolved_len(&self) -> u64 {
        match self.declared_len() {
            0 => self.iter().count() as u64,
            n => n,
        }
    }
}

/// Zero-padded decimal numbers over `start..end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberRange {
    /// First value, inclusive.
    pub start: u64,
    /// One past the last value.
    pub end: u64,
    /// Zero-pad width.
    pub width: usize,
}

impl NumberRange {
    /// Numbers `start..end`, zero-padded to `width` digits.
    pub fn new(start: u64, end: u64, width: usize) -> Self {
        Self { start, end, width }
    }

    /// Split into up to `parts` disjoint sub-ranges covering the whole.
    ///
    /// This is how the outermost dimension is partitioned across workers;
    /// no rebalancing happens afterwards.
    pub fn split(&self, parts: usize) -> Vec<Self> {
        let total = self.end.saturating_sub(self.start);
        let parts = (parts as u64).clamp(1, total.max(1));
        let base = total / parts;
        let remainder = total % parts;

        let mut out = Vec::with_capacity(parts as usize);
        let mut cursor = self.start;
        for i in 0..parts {
            let size = base + u64::from(i < remainder);
            if size == 0 {
                continue;
            }
            out.push(Self::new(cursor, cursor + size, self.width));
            cursor += size;
        }
        out
    }
}

impl Candidates for NumberRange {
    fn declared_len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    fn iter(&self) -> Box<dyn Iterator<Item = String> + Send + '_> {
        let width = self.width;
        Box::new((self.start..self.end).map(move |n| format!("{n:0width$}")))
    }
}

/// A fixed fragment set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Wrap an explicit word list.
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Convenience constructor from string literals.
    pub fn from_slice(words: &[&str]) -> Self {
        Self::new(words.iter().map(|w| (*w).to_string()).collect())
    }
}

impl Candidates for WordList {
    fn declared_len(&self) -> u64 {
        self.words.len() as u64
    }

    fn iter(&self) -> Box<dyn Iterator<Item = String> + Send + '_> {
        Box::new(self.words.iter().cloned())
    }
}

/// Single characters from an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chars {
    alphabet: String,
}

impl Chars {
    /// One fragment per character of `alphabet`.
    pub fn new(alphabet: &str) -> Self {
        Self {
            alphabet: alphabet.to_string(),
        }
    }
}

impl Candidates for Chars {
    fn declared_len(&self) -> u64 {
        self.alphabet.chars().count() as u64
    }

    fn iter(&self) -> Box<dyn Iterator<Item = String> + Send + '_> {
        Box::new(self.alphabet.chars().map(String::from))
    }
}

/// Corpus-derived fragments read lazily from a text file, one per line.
///
/// Declares no length; the file is only counted when a progress total is
/// actually wanted. Unreadable lines are skipped with a warning.
#[derive(Debug, Clone)]
pub struct LinesFile {
    path: PathBuf,
}

impl LinesFile {
    /// Fragments from the lines of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Candidates for LinesFile {
    fn declared_len(&self) -> u64 {
        0
    }

    fn iter(&self) -> Box<dyn Iterator<Item = String> + Send + '_> {
        match File::open(&self.path) {
            Ok(file) => Box::new(
                BufReader::new(file)
                    .lines()
                    .filter_map(std::result::Result::ok)
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty() && !l.starts_with('#')),
            ),
            Err(e) => {
                warn!("Cannot open fragment file {:?}: {}", self.path, e);
                Box::new(std::iter::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_number_range_zero_padded() {
        let range = NumberRange::new(0, 3, 4);
        let values: Vec<String> = range.iter().collect();
        assert_eq!(values, vec!["0000", "0001", "0002"]);
        assert_eq!(range.declared_len(), 3);
    }

    #[test]
    fn test_split_covers_disjointly() {
        let range = NumberRange::new(0, 10, 2);
        let parts = range.split(3);
        assert_eq!(parts.len(), 3);

        let mut all: Vec<String> = parts.iter().flat_map(|p| p.iter()).collect();
        let whole: Vec<String> = range.iter().collect();
        all.sort();
        let mut expected = whole.clone();
        expected.sort();
        assert_eq!(all, expected);
        assert_eq!(all.len(), 10);
    }

    #[test]
    fn test_split_more_parts_than_values() {
        let range = NumberRange::new(5, 7, 1);
        let parts = range.split(8);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].declared_len() + parts[1].declared_len(), 2);
    }

    #[test]
    fn test_lines_file_unknown_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file, "c0000").unwrap();
        writeln!(file, "c1000").unwrap();
        file.flush().unwrap();

        let lines = LinesFile::new(file.path());
        assert_eq!(lines.declared_len(), 0);
        assert_eq!(lines.resolved_len(), 2);
        assert_eq!(lines.iter().count(), 2);
    }

    #[test]
    fn test_chars() {
        let chars = Chars::new("abc");
        assert_eq!(chars.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }
}

//! Reverse index from filename hash to known path.
//!
//! Archive indices store only hashes, so recovering original paths means
//! hashing every *known* path up front and looking entries up backwards.
//! The corpus is a plain text file of logical paths (`data1:/chr/c1234.bnd`)
//! collected offline; a per-title substitution table folds the logical drive
//! prefixes into the physical archive namespace they actually live in
//! (several drives may fold into the same archive).
//!
//! A hash with more than one known path is a genuine collision; callers get
//! [`Resolution::Ambiguous`] and must not guess.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{GameVersion, Result, hash};

/// Outcome of a reverse lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Exactly one known path.
    Found(&'a str),
    /// Several distinct paths share this hash.
    Ambiguous(&'a [String]),
    /// No known path.
    Unknown,
}

/// Per-archive-namespace reverse index from hash to candidate paths.
#[derive(Debug, Clone)]
pub struct NameDictionary {
    version: GameVersion,
    /// Logical drive (lowercased, no colon) to physical archive namespace.
    substitutions: Vec<(String, String)>,
    entries: HashMap<String, HashMap<u64, Vec<String>>>,
}

impl NameDictionary {
    /// Create an empty dictionary with the title's default drive table.
    pub fn new(version: GameVersion) -> Self {
        Self::with_substitutions(version, default_substitutions(version))
    }

    /// Create an empty dictionary with an explicit drive table.
    pub fn with_substitutions(
        version: GameVersion,
        substitutions: Vec<(String, String)>,
    ) -> Self {
        Self {
            version,
            substitutions,
            entries: HashMap::new(),
        }
    }

    /// The title this dictionary hashes for.
    pub fn version(&self) -> GameVersion {
        self.version
    }

    /// Number of distinct hash keys across all namespaces.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Whether the dictionary holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a candidate path under an explicit namespace and hash.
    ///
    /// This is the primitive `add_path` builds on; it is also how paths
    /// recovered offline by the brute-force engine are merged back in.
    /// Re-inserting an already-known path is a no-op.
    pub fn insert(&mut self, namespace: &str, hashed: u64, path: &str) {
        let list = self
            .entries
            .entry(namespace.to_ascii_lowercase())
            .or_default()
            .entry(hashed)
            .or_default();

        let normalized = hash::normalize(path);
        if !list.contains(&normalized) {
            list.push(normalized);
        }
    }

    /// Add one corpus line of the form `drive:/path/to/file`.
    ///
    /// Returns `false` (with a warning) for lines without a drive prefix.
    pub fn add_path(&mut self, line: &str) -> bool {
        let line = line.trim();
        let Some((drive, remainder)) = line.split_once(':') else {
            warn!("Corpus line has no drive prefix: {line:?}");
            return false;
        };

        let drive = drive.to_ascii_lowercase();
        let namespace = self
            .substitutions
            .iter()
            .find(|(logical, _)| *logical == drive)
            .map_or(drive, |(_, physical)| physical.clone());

        let remainder = remainder.trim_start_matches(['/', '\\']);
        let rooted = format!("/{remainder}");
        let hashed = hash::hash_path(&rooted, self.version);
        self.insert(&namespace, hashed, &rooted);
        true
    }

    /// Load a corpus from a reader: one path per line, `#` comments.
    ///
    /// Returns the number of lines accepted.
    pub fn load_corpus<R: BufRead>(&mut self, reader: R) -> Result<usize> {
        let mut loaded = 0;
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if self.add_path(line) {
                loaded += 1;
            }
        }

        debug!("Loaded {} corpus paths", loaded);
        Ok(loaded)
    }

    /// Load a corpus file from disk.
    pub fn load_corpus_file(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path)?;
        self.load_corpus(BufReader::new(file))
    }

    /// Look a hash up within an archive namespace.
    pub fn resolve(&self, namespace: &str, hashed: u64) -> Resolution<'_> {
        let candidates = self
            .entries
            .get(&namespace.to_ascii_lowercase())
            .and_then(|by_hash| by_hash.get(&hashed));

        match candidates.map(Vec::as_slice) {
            None | Some([]) => Resolution::Unknown,
            Some([single]) => Resolution::Found(single.as_str()),
            Some(several) => Resolution::Ambiguous(several),
        }
    }

    /// Like [`resolve`][Self::resolve], but prefers a candidate with the
    /// given extension when a collision would otherwise be ambiguous.
    pub fn resolve_with_extension(
        &self,
        namespace: &str,
        hashed: u64,
        extension: &str,
    ) -> Resolution<'_> {
        match self.resolve(namespace, hashed) {
            Resolution::Ambiguous(candidates) => {
                let extension = extension.to_ascii_lowercase();
                let mut matching = candidates.iter().filter(|c| c.ends_with(&extension));
                match (matching.next(), matching.next()) {
                    (Some(single), None) => Resolution::Found(single.as_str()),
                    _ => Resolution::Ambiguous(candidates),
                }
            }
            other => other,
        }
    }
}

/// Synthetic output name for a hash the dictionary cannot resolve.
///
/// Not an error path: unresolved entries are extracted under this name.
pub fn synthetic_name(namespace: &str, hashed: u64) -> String {
    if hashed <= u64::from(u32::MAX) {
        format!("{namespace}_{hashed:08x}")
    } else {
        format!("{namespace}_{hashed:016x}")
    }
}

/// Normalize a recovered path for the host filesystem: strip virtual drive
/// prefixes, convert separators, trim leading separators.
pub fn to_host_path(path: &str, virtual_drives: &[String]) -> PathBuf {
    let mut rest = path.trim();
    for drive in virtual_drives {
        if rest.len() >= drive.len() && rest[..drive.len()].eq_ignore_ascii_case(drive) {
            rest = &rest[drive.len()..];
            break;
        }
    }

    let converted: String = rest
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' {
                std::path::MAIN_SEPARATOR
            } else {
                c
            }
        })
        .collect();

    PathBuf::from(converted.trim_start_matches(std::path::MAIN_SEPARATOR))
}

/// The logical-drive substitution table a title ships with.
///
/// Several logical drives can fold into one physical archive namespace.
pub fn default_substitutions(version: GameVersion) -> Vec<(String, String)> {
    let pairs: &[(&str, &str)] = match version {
        GameVersion::DarkSouls => &[
            ("dvdbnd0", "dvdbnd0"),
            ("dvdbnd1", "dvdbnd1"),
            ("hkxbnd", "dvdbnd0"),
        ],
        GameVersion::DarkSouls2 => &[
            ("gamedata", "gamedata"),
            ("chrhq", "chrhq"),
            ("dlc1", "gamedata"),
            ("dlc2", "gamedata"),
        ],
        GameVersion::DarkSouls3 | GameVersion::Sekiro => &[
            ("data1", "data1"),
            ("data2", "data2"),
            ("data3", "data3"),
            ("data4", "data4"),
            ("data5", "data5"),
            ("capture", "data1"),
            ("system", "data1"),
        ],
        GameVersion::EldenRing => &[
            ("data0", "data0"),
            ("data1", "data1"),
            ("data2", "data2"),
            ("data3", "data3"),
            ("sd", "sd"),
        ],
    };

    pairs
        .iter()
        .map(|(l, p)| ((*l).to_string(), (*p).to_string()))
        .collect()
}

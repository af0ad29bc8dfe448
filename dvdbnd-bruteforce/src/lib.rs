//! Brute-force reverse-hash search for unknown archive filenames.
//!
//! Index entries carry only filename hashes; paths the dictionary cannot
//! resolve can sometimes be reconstructed by enumerating a declared
//! candidate space: a path [`Template`] with `{i}` slots, each fed by a
//! [`Candidates`] generator. Every combination is hashed and tested
//! against the set of unsolved hashes.
//!
//! Candidate spaces are routinely in the billions, so the engine is built
//! to run for a long time politely: explicit-stack traversal, periodic
//! progress reports through a [`ProgressSink`], cooperative cancellation,
//! and a parallel mode that splits the outermost slot across OS threads.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashSet;
//! use std::sync::atomic::AtomicBool;
//! use dvdbnd_bruteforce::{
//!     Candidates, NumberRange, NullProgress, SearchContext, Template, search_sequential,
//! };
//! use dvdbnd_names::{GameVersion, hash_path};
//!
//! let template = Template::parse("/chr/c{0}.chrbnd").unwrap();
//! let generators: Vec<Box<dyn Candidates>> = vec![Box::new(NumberRange::new(0, 10000, 4))];
//!
//! let mut targets = HashSet::new();
//! targets.insert(hash_path("/chr/c5280.chrbnd", GameVersion::DarkSouls3));
//!
//! let cancel = AtomicBool::new(false);
//! let ctx = SearchContext::new(GameVersion::DarkSouls3, &NullProgress, &cancel);
//! let found = search_sequential(&targets, &template, &generators, &ctx).unwrap();
//! assert_eq!(found, vec!["/chr/c5280.chrbnd"]);
//! ```

#![warn(missing_docs)]

pub mod candidates;
pub mod error;
pub mod progress;
pub mod search;
pub mod template;

pub use error::{Result, SearchError};

// Re-export commonly used items
pub use candidates::{Candidates, Chars, LinesFile, NumberRange, WordList};
pub use progress::{LatestProgress, LoggingProgress, NullProgress, ProgressEvent, ProgressSink};
pub use search::{DEFAULT_REPORT_INTERVAL, SearchContext, search_parallel, search_sequential};
pub use template::Template;

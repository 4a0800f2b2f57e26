// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::regex_creation_in_loops)]
#![allow(clippy::match_like_matches_macro)]

//! # Manuscript Ingest
//!
//! Document-ingestion pipeline for Hebrew literary manuscripts: one uploaded
//! word-processor export in, clean per-work text and metadata out.
//!
//! ## Core Features
//!
//! - **Normalization**: converter output → a restricted markup dialect with
//!   Hebrew-specific typographic rules (vocalized lines quoted as poetry,
//!   stanza breaks preserved, footnote continuations indented)
//! - **Work Splitting**: one merged document → an ordered list of works,
//!   delimited by the `&&& ` marker compatible with existing source documents
//! - **Footnote Relocation**: trailing footnote-definition blocks moved into
//!   the works that actually reference them
//! - **Table-of-Contents Codec**: byte-stable flat format reviewers edit
//!   between splitting and finalization
//! - **Contributor/Rights Resolution**: per-role merging of work and default
//!   contributor lists, rights classification from authority records
//! - **Conflict Detection**: set-based duplicate checks gating creation of a
//!   new target container
//! - **Advisory Locking**: single-writer session locks with expiry and
//!   refresh debouncing
//!
//! External collaborators (the binary-document converter, the vocalized-line
//! classifier, storage queries, and authority records) are injected behind
//! traits so the deterministic pipeline is testable in isolation.
//!
//! ## Quick Start
//!
//! ```
//! use manuscript_ingest::hebrew::DensityVocalization;
//! use manuscript_ingest::normalizer::Normalizer;
//! use manuscript_ingest::splitter::split_works;
//!
//! let classifier = DensityVocalization::new();
//! let normalizer = Normalizer::new(&classifier);
//!
//! let markup = normalizer.normalize("&&& שיר\n<span>שִׁיר הַשִּׁירִים</span>");
//! let works = split_works(&markup);
//! assert_eq!(works[0].title, "שיר");
//! assert_eq!(works[0].content, "> שִׁיר הַשִּׁירִים");
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Hebrew script helpers
pub mod hebrew;

// Normalization pipeline
pub mod normalizer;
pub mod stanza;

// Work extraction
pub mod footnotes;
pub mod splitter;

// Per-work metadata
pub mod contributors;
pub mod toc;

// Finalization gates
pub mod conflicts;

// The session aggregate
pub mod session;

// External converter interface
pub mod converter;

// Configuration
pub mod config;

// Re-exports
pub use config::IngestConfig;
pub use conflicts::{detect_conflicts, Conflict};
pub use contributors::{Contributor, RightsStatus, Role};
pub use error::{Error, Result};
pub use session::{ContainerTarget, IngestSession, Status};
pub use splitter::{Work, WORK_SEPARATOR};
pub use toc::TocEntry;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

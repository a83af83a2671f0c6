//! Output writers.
//!
//! # Submodules
//!
//! - [`jsonl`]: append-only store written record by record during a range walk
//! - [`json`]: pretty-printed array of full records for batch runs
//! - [`markdown`]: human-readable report for batch runs
//!
//! # Output Files
//!
//! ```text
//! abstract.jsonl     # range walk, one record per line
//! articles.json      # batch run
//! articles.md        # batch run
//! ```

pub mod json;
pub mod jsonl;
pub mod markdown;

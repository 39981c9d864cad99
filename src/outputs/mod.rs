//! Output generation.
//!
//! The crawl produces a flat collection of records; [`json`] writes it in
//! one of two shapes:
//!
//! - a pretty-printed JSON array, replacing the output file atomically
//! - newline-delimited JSON, one compact object per line, which consumers
//!   can tail without parsing the whole file
//!
//! Both are UTF-8 with Arabic text preserved verbatim.

pub mod json;

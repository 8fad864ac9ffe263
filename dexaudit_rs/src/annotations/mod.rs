//! Annotation extractor/grouper.
//!
//! Resource scripts tag behaviour with one-line comments such as
//! `// @status burn 1, damage`. This module scrapes them out of a directory,
//! groups them by key and order, and renders the result:
//!
//! scan ([`extract`]) -> group ([`group`]) -> print ([`output`]).
//!
//! The convention itself is pluggable through [`AnnotationFormat`].

pub mod extract;
pub mod format;
pub mod group;
pub mod output;

pub use extract::{ScanResult, scan_directory, scan_text};
pub use format::{Annotation, AnnotationFormat, OrderKey, OrderKeying, coerce_order};
pub use group::{AnnotationGroup, AnnotationReport, OrderedEntry, build_report};
pub use output::{write_human, write_json};
